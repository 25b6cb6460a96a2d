//! # Pulse Timer
//!
//! Measures how long the line stays at a given level by counting polling
//! iterations. The count is not converted into time: the protocol only
//! needs pulse widths relative to each other, so the raw iteration count is
//! good enough and keeps the loop body down to a single line read.

use embedded_hal::digital::PinState;

use crate::line::SensorLine;

/// Pulse width returned when the level did not change before the deadline.
pub const TIMEOUT: u32 = 0;

/// Polls the line and counts how long a level lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseTimer {
    max_cycles: u32,
}

impl PulseTimer {
    /// Creates a [`PulseTimer`] that gives up after `max_cycles` polls.
    #[must_use]
    pub const fn new(max_cycles: u32) -> Self {
        Self { max_cycles }
    }

    /// Maximum number of polls before a measurement times out.
    #[must_use]
    pub const fn max_cycles(&self) -> u32 {
        self.max_cycles
    }

    /// Counts the polls during which the line stays at `level`.
    ///
    /// Returns [`TIMEOUT`] when the level outlasts the deadline, and also
    /// when the line is not at `level` on the very first poll.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the line fails.
    #[inline]
    pub fn measure<L>(&self, line: &mut L, level: PinState) -> Result<u32, L::Error>
    where
        L: SensorLine,
    {
        let target = level == PinState::High;
        let mut count = 0;

        while line.is_high()? == target {
            if count >= self.max_cycles {
                return Ok(TIMEOUT);
            }
            count += 1;
        }

        Ok(count)
    }
}
