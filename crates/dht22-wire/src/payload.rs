//! # Raw Payload
//!
//! The five bytes of a transaction and the decoding of their values.

use crate::error::Dht22Error;

/// Number of bytes in a sensor transaction.
pub const PAYLOAD_LEN: usize = 5;

/// The five raw bytes sent by the sensor.
///
/// Humidity high, humidity low, temperature high, temperature low, checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawPayload([u8; PAYLOAD_LEN]);

impl RawPayload {
    /// Creates a [`RawPayload`] from the received bytes.
    #[must_use]
    pub const fn new(bytes: [u8; PAYLOAD_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the received bytes.
    #[must_use]
    pub const fn bytes(&self) -> [u8; PAYLOAD_LEN] {
        self.0
    }

    /// Whether the checksum byte is the low 8 bits of the sum of the first
    /// four bytes.
    #[must_use]
    pub fn checksum_ok(&self) -> bool {
        let [hh, hl, th, tl, checksum] = self.0;
        hh.wrapping_add(hl).wrapping_add(th).wrapping_add(tl) == checksum
    }

    /// Returns the payload if its checksum is valid.
    ///
    /// # Errors
    ///
    /// Returns [`Dht22Error::ChecksumMismatch`] otherwise.
    pub fn validate<E>(self) -> Result<Self, Dht22Error<E>> {
        if self.checksum_ok() {
            Ok(self)
        } else {
            Err(Dht22Error::ChecksumMismatch)
        }
    }

    /// Relative humidity in tenths of a percent.
    #[must_use]
    pub const fn humidity(&self) -> i16 {
        i16::from_be_bytes([self.0[0], self.0[1]])
    }

    /// Temperature in tenths of a degree Celsius.
    ///
    /// The most significant bit is a sign flag and the remaining 15 bits
    /// are the magnitude, so this is not a two's complement value.
    #[must_use]
    pub const fn temperature(&self) -> i16 {
        let magnitude = i16::from_be_bytes([self.0[2] & 0x7F, self.0[3]]);
        if self.0[2] & 0x80 != 0 {
            -magnitude
        } else {
            magnitude
        }
    }
}
