//! # Bit Decoder
//!
//! Captures the 40 data bits that follow the sensor's acknowledgement.
//!
//! Every bit starts with a low phase of fixed length followed by a high
//! phase whose length encodes the value: a high phase longer than the low
//! phase is a one, otherwise a zero. Comparing the two phases of the same bit
//! makes the decode independent of the actual polling rate.

use embedded_hal::digital::PinState;

use crate::error::Dht22Error;
use crate::line::SensorLine;
use crate::payload::{PAYLOAD_LEN, RawPayload};
use crate::pulse::{PulseTimer, TIMEOUT};

/// Number of data bits in a transaction.
pub const DATA_BITS: usize = PAYLOAD_LEN * 8;

/// Number of pulse widths captured per transaction, a low and a high phase
/// for each data bit.
pub const PULSE_COUNT: usize = DATA_BITS * 2;

/// Captures pulse widths and turns them into a [`RawPayload`].
///
/// The capture buffer lives inside the decoder, so reading the sensor never
/// allocates.
#[derive(Debug, Clone)]
pub struct BitDecoder {
    pulses: [u32; PULSE_COUNT],
}

impl Default for BitDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BitDecoder {
    /// Creates a [`BitDecoder`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pulses: [TIMEOUT; PULSE_COUNT],
        }
    }

    /// Pulse widths captured by the last read, low and high phase of each
    /// bit in arrival order.
    ///
    /// After a timeout, the pulse that timed out and every following one
    /// are [`TIMEOUT`].
    #[must_use]
    pub const fn pulses(&self) -> &[u32; PULSE_COUNT] {
        &self.pulses
    }

    /// Reads the five payload bytes from the sensor.
    ///
    /// Must be called right after a successful start signal. Interrupts are
    /// disabled for the duration of the pulse capture only.
    ///
    /// # Errors
    ///
    /// Returns [`Dht22Error::BitTimeout`] if any pulse times out, or
    /// [`Dht22Error::Pin`] if reading the line fails.
    pub fn read_bytes<L>(
        &mut self,
        line: &mut L,
        timer: &PulseTimer,
    ) -> Result<RawPayload, Dht22Error<L::Error>>
    where
        L: SensorLine,
    {
        self.pulses.fill(TIMEOUT);

        let pulses = &mut self.pulses;
        critical_section::with(|_cs| -> Result<(), L::Error> {
            for pair in pulses.chunks_exact_mut(2) {
                pair[0] = timer.measure(line, PinState::Low)?;
                if pair[0] == TIMEOUT {
                    break;
                }
                pair[1] = timer.measure(line, PinState::High)?;
                if pair[1] == TIMEOUT {
                    break;
                }
            }
            Ok(())
        })?;

        self.decode()
    }

    /// Converts the captured pulse widths into bytes, most significant bit
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`Dht22Error::BitTimeout`] if any pulse is [`TIMEOUT`].
    pub fn decode<E>(&self) -> Result<RawPayload, Dht22Error<E>> {
        let mut bytes = [0u8; PAYLOAD_LEN];

        for (bit, pair) in self.pulses.chunks_exact(2).enumerate() {
            let (low, high) = (pair[0], pair[1]);
            if low == TIMEOUT || high == TIMEOUT {
                return Err(Dht22Error::BitTimeout);
            }

            let byte = &mut bytes[bit / 8];
            *byte <<= 1;
            if high > low {
                *byte |= 1;
            }
        }

        Ok(RawPayload::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::vec;

    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};

    use crate::line::OpenDrainLine;
    use crate::testing::{LOW_POLLS, ONE_POLLS, data_bits, pulse, read_error};

    fn decoder_from_bits(bytes: [u8; PAYLOAD_LEN], low: u32, zero: u32, one: u32) -> BitDecoder {
        let mut decoder = BitDecoder::new();
        for (bit, pair) in decoder.pulses.chunks_exact_mut(2).enumerate() {
            let value = bytes[bit / 8] & (0x80 >> (bit % 8)) != 0;
            pair[0] = low;
            pair[1] = if value { one } else { zero };
        }
        decoder
    }

    #[test]
    fn test_decode_reconstructs_bytes() {
        let payloads = [
            [0x00, 0x00, 0x00, 0x00, 0x00],
            [0xFF, 0xFF, 0xFF, 0xFF, 0xFC],
            [0x02, 0x26, 0x80, 0x19, 0xC1],
            [0xA5, 0x5A, 0x01, 0x80, 0x80],
        ];

        for bytes in payloads {
            // Typical timings: 50 µs low, 26 µs for a zero, 70 µs for a one.
            let decoder = decoder_from_bits(bytes, 50, 26, 70);
            assert_eq!(decoder.decode::<()>(), Ok(RawPayload::new(bytes)));

            // Only the ratio within a bit matters, not the absolute rate.
            let decoder = decoder_from_bits(bytes, 5000, 4999, 5001);
            assert_eq!(decoder.decode::<()>(), Ok(RawPayload::new(bytes)));
        }
    }

    #[test]
    fn test_decode_equal_phases_is_zero() {
        let decoder = decoder_from_bits([0xFF; PAYLOAD_LEN], 40, 40, 40);
        assert_eq!(decoder.decode::<()>(), Ok(RawPayload::new([0; PAYLOAD_LEN])));
    }

    #[test]
    fn test_decode_timeout() {
        let mut decoder = decoder_from_bits([0x12; PAYLOAD_LEN], 50, 26, 70);
        decoder.pulses[PULSE_COUNT - 1] = TIMEOUT;
        assert_eq!(decoder.decode::<()>(), Err(Dht22Error::BitTimeout));

        let mut decoder = decoder_from_bits([0x12; PAYLOAD_LEN], 50, 26, 70);
        decoder.pulses[10] = TIMEOUT;
        assert_eq!(decoder.decode::<()>(), Err(Dht22Error::BitTimeout));
    }

    #[test]
    fn test_read_bytes() {
        let bytes = [0x02, 0x8C, 0x01, 0x5F, 0xEE];
        let expectations = data_bits(bytes);

        let mut line = OpenDrainLine::new(PinMock::new(&expectations));
        let mut decoder = BitDecoder::new();
        let timer = PulseTimer::new(100);

        let payload = decoder.read_bytes(&mut line, &timer).unwrap();
        assert_eq!(payload.bytes(), bytes);
        assert_eq!(decoder.pulses()[0], LOW_POLLS as u32);

        line.into_inner().done();
    }

    #[test]
    fn test_read_bytes_stops_at_first_timeout() {
        // The first bit is fine, the second one never leaves its low phase.
        let mut expectations = pulse(State::Low, LOW_POLLS);
        expectations.extend(pulse(State::High, 8));
        expectations.extend(vec![PinTransaction::get(State::Low); 11]);

        let mut line = OpenDrainLine::new(PinMock::new(&expectations));
        let mut decoder = BitDecoder::new();

        let result = decoder.read_bytes(&mut line, &PulseTimer::new(10));
        assert!(matches!(result, Err(Dht22Error::BitTimeout)));
        assert_eq!(decoder.pulses()[..3], [LOW_POLLS as u32, 8, TIMEOUT]);
        assert!(decoder.pulses()[3..].iter().all(|&width| width == TIMEOUT));

        line.into_inner().done();
    }

    #[test]
    fn test_read_bytes_line_error() {
        // Reading the line fails during the low phase of the second bit.
        let mut expectations = pulse(State::Low, LOW_POLLS);
        expectations.extend(pulse(State::High, ONE_POLLS));
        expectations.extend([
            PinTransaction::get(State::Low),
            PinTransaction::get(State::Low).with_error(read_error()),
        ]);

        let mut line = OpenDrainLine::new(PinMock::new(&expectations));
        let mut decoder = BitDecoder::new();

        let result = decoder.read_bytes(&mut line, &PulseTimer::new(10));
        assert_eq!(result, Err(Dht22Error::Pin(read_error())));

        // The critical section has been released.
        critical_section::with(|_cs| ());

        line.into_inner().done();
    }
}
