// Pin transactions replaying a sensor waveform on an `embedded-hal-mock` pin.
//
// Each `measure` call consumes the polls at the measured level plus the
// single poll that shows the level change.

extern crate std;
use std::io::ErrorKind;
use std::vec;
use std::vec::Vec;

use embedded_hal_mock::eh1::MockError;
use embedded_hal_mock::eh1::digital::{State, Transaction as PinTransaction};

// Polls per phase. A one bit has a high phase longer than its low phase.
pub(crate) const LOW_POLLS: usize = 5;
pub(crate) const ZERO_POLLS: usize = 2;
pub(crate) const ONE_POLLS: usize = 8;

// A pulse at `level` lasting `polls`, followed by the poll showing the change.
pub(crate) fn pulse(level: State, polls: usize) -> Vec<PinTransaction> {
    let end = match level {
        State::High => State::Low,
        State::Low => State::High,
    };

    let mut transactions = vec![PinTransaction::get(level); polls];
    transactions.push(PinTransaction::get(end));
    transactions
}

// The host side of the start signal: settle, pull low, hand-off.
pub(crate) fn start_signal() -> Vec<PinTransaction> {
    vec![
        PinTransaction::set(State::High),
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ]
}

// The sensor's low/high acknowledgement.
pub(crate) fn acknowledgement() -> Vec<PinTransaction> {
    let mut transactions = pulse(State::Low, 3);
    transactions.extend(pulse(State::High, 3));
    transactions
}

// The 40 data bits, most significant bit first.
pub(crate) fn data_bits(bytes: [u8; 5]) -> Vec<PinTransaction> {
    let mut transactions = Vec::new();
    for byte in bytes {
        for i in (0..8).rev() {
            let high_polls = if byte & (1 << i) != 0 {
                ONE_POLLS
            } else {
                ZERO_POLLS
            };
            transactions.extend(pulse(State::Low, LOW_POLLS));
            transactions.extend(pulse(State::High, high_polls));
        }
    }
    transactions
}

// A complete successful transaction.
pub(crate) fn transaction(bytes: [u8; 5]) -> Vec<PinTransaction> {
    let mut transactions = start_signal();
    transactions.extend(acknowledgement());
    transactions.extend(data_bits(bytes));
    transactions
}

// The error returned by a failing line read.
pub(crate) fn read_error() -> MockError {
    MockError::Io(ErrorKind::Other)
}

// A transaction where reading the line fails during the first data bit.
pub(crate) fn line_failure() -> Vec<PinTransaction> {
    let mut transactions = start_signal();
    transactions.extend(acknowledgement());
    transactions.extend([
        PinTransaction::get(State::Low),
        PinTransaction::get(State::Low),
        PinTransaction::get(State::Low).with_error(read_error()),
    ]);
    transactions
}

// A transaction where the sensor never answers the start signal.
pub(crate) fn unanswered() -> Vec<PinTransaction> {
    let mut transactions = start_signal();
    transactions.push(PinTransaction::get(State::High));
    transactions
}
