//! # Start Signal
//!
//! Requests a transaction from the sensor and checks its acknowledgement.
//!
//! ```text
//!  host   | release (10 ms) | low (20 ms) | release (30 µs) |
//!  sensor |                                                 | low | high | data...
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

use crate::error::Dht22Error;
use crate::line::{LineMode, SensorLine};
use crate::pulse::{PulseTimer, TIMEOUT};

// Protocol-specific timing constants.
const SETTLE_HIGH_MS: u32 = 10; // Released line settles on the pull-up.
const START_SIGNAL_LOW_MS: u32 = 20; // Host pulls the line low to request a reading.
const HANDOFF_US: u32 = 30; // Gap before the sensor takes over the line.

/// Sends the start signal and waits for the sensor's low/high acknowledgement.
///
/// On return the line is an input with its pull-up enabled, and the sensor
/// is about to transmit the first data bit.
///
/// # Errors
///
/// Returns [`Dht22Error::StartTimeout`] if either acknowledgement pulse
/// times out, or [`Dht22Error::Pin`] if accessing the line fails.
pub fn generate_start<L, D>(
    line: &mut L,
    delay: &mut D,
    timer: &PulseTimer,
) -> Result<(), Dht22Error<L::Error>>
where
    L: SensorLine,
    D: DelayNs,
{
    // Release the line high and let it settle.
    line.write(PinState::High)?;
    delay.delay_ms(SETTLE_HIGH_MS);

    // Pull the line low to signal the sensor.
    line.set_mode(LineMode::Output)?;
    line.write(PinState::Low)?;
    delay.delay_ms(START_SIGNAL_LOW_MS);

    // Hand the line over to the sensor.
    line.set_mode(LineMode::InputPullUp)?;
    delay.delay_us(HANDOFF_US);

    // The sensor pulls the line low and then high to acknowledge.
    if timer.measure(line, PinState::Low)? == TIMEOUT {
        return Err(Dht22Error::StartTimeout);
    }
    if timer.measure(line, PinState::High)? == TIMEOUT {
        return Err(Dht22Error::StartTimeout);
    }

    Ok(())
}
