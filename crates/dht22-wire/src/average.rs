//! # Sample Averager
//!
//! A moving average over the most recent successful readings.
//!
//! The buffer capacity is a const generic, so it is fixed when the driver
//! type is chosen and never reallocated. A capacity of zero disables
//! averaging and values pass through unchanged.

/// Fixed-capacity circular buffer feeding an integer mean.
#[derive(Debug, Clone)]
pub struct SampleAverager<const N: usize> {
    samples: [i16; N],
    len: usize,
    cursor: usize,
}

impl<const N: usize> Default for SampleAverager<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleAverager<N> {
    /// Creates an empty [`SampleAverager`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: [0; N],
            len: 0,
            cursor: 0,
        }
    }

    /// Whether averaging is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        N > 0
    }

    /// Number of samples currently in the window.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the window holds no samples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds `raw` to the window, overwriting the oldest sample once full,
    /// and returns the truncated mean of the window.
    pub fn fold(&mut self, raw: i16) -> i16 {
        if N == 0 {
            return raw;
        }

        self.samples[self.cursor] = raw;
        self.cursor += 1;
        if self.cursor == N {
            self.cursor = 0;
        }
        if self.len < N {
            self.len += 1;
        }

        let sum: i32 = self.samples[..self.len]
            .iter()
            .copied()
            .map(i32::from)
            .sum();
        // The mean of i16 values always fits in an i16.
        (sum / self.len as i32) as i16
    }
}
