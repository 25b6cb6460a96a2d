use core::fmt;

/// Errors that may occur while acquiring a reading from the `DHT22` sensor.
///
/// Every variant is recoverable: the driver retries the whole transaction
/// and only reports success or failure to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dht22Error<E> {
    /// GPIO line errors.
    Pin(E),
    /// The sensor did not acknowledge the start signal.
    StartTimeout,
    /// A data bit pulse exceeded the measurement deadline.
    BitTimeout,
    /// Data checksum mismatch.
    ChecksumMismatch,
}

impl<E> From<E> for Dht22Error<E> {
    fn from(e: E) -> Self {
        Dht22Error::Pin(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Dht22Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pin(e) => write!(f, "line error: {e:?}"),
            Self::StartTimeout => f.write_str("start error: sensor did not respond"),
            Self::BitTimeout => f.write_str("read error: data bit timed out"),
            Self::ChecksumMismatch => f.write_str("parity error: checksum mismatch"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Dht22Error<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::string::ToString;

    #[test]
    fn test_display() {
        let error: Dht22Error<()> = Dht22Error::ChecksumMismatch;
        assert_eq!(error.to_string(), "parity error: checksum mismatch");

        let error = Dht22Error::from(7u8);
        assert_eq!(error, Dht22Error::Pin(7));
        assert_eq!(error.to_string(), "line error: 7");
    }
}
