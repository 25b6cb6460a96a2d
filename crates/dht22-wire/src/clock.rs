//! Time source used by the driver.
//!
//! Blocking waits go through [`embedded_hal::delay::DelayNs`]; this module
//! only covers what `embedded-hal` does not describe: a free-running
//! millisecond counter and the conversion from a wall-clock budget to the
//! number of polling iterations the pulse timer is allowed to spin.

/// A millisecond counter and a polling-rate conversion.
pub trait Timebase {
    /// Milliseconds elapsed since an arbitrary origin.
    ///
    /// The counter is allowed to wrap around.
    fn now_ms(&self) -> u32;

    /// Converts a duration in microseconds into the number of line polls
    /// that fit in it.
    fn cycles_for(&self, micros: u32) -> u32;
}

/// A [`Timebase`] made of a millisecond source and a fixed polling rate.
///
/// `cycles_per_us` is the number of polling iterations the core performs
/// in one microsecond, usually the CPU frequency in MHz divided by the cost
/// of one iteration.
pub struct CycleClock<F>
where
    F: Fn() -> u32,
{
    millis: F,
    cycles_per_us: u32,
}

impl<F> CycleClock<F>
where
    F: Fn() -> u32,
{
    /// Creates a [`CycleClock`].
    #[must_use]
    pub const fn new(millis: F, cycles_per_us: u32) -> Self {
        Self {
            millis,
            cycles_per_us,
        }
    }
}

impl<F> Timebase for CycleClock<F>
where
    F: Fn() -> u32,
{
    #[inline]
    fn now_ms(&self) -> u32 {
        (self.millis)()
    }

    #[inline]
    fn cycles_for(&self, micros: u32) -> u32 {
        micros.saturating_mul(self.cycles_per_us)
    }
}
