//! `dht22-wire` is an architecture-agnostic driver for the `DHT22`
//! (`AM2302`) humidity and temperature sensor.
//!
//! The sensor talks over a single data wire: the host pulls the wire low to
//! request a reading, the sensor acknowledges and then sends 40 bits whose
//! values are encoded in the length of their high pulses. This crate
//! measures those pulses by polling the wire, decodes and validates the five
//! payload bytes, retries failed transactions, caches the result for the
//! sensor's minimum read interval and optionally averages successive
//! readings.
//!
//! Pins are accessed through the [`SensorLine`] trait, implemented for any
//! [`embedded-hal`] open-drain pin by [`OpenDrainLine`] and for raw port
//! registers by [`PortLine`]. The pulse capture runs inside a
//! [`critical-section`], so the target must provide an implementation.
//!
//! The crate is `no_std` and never allocates.
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal
//! [`critical-section`]: https://crates.io/crates/critical-section

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![no_std]

#[cfg(test)]
mod testing;

mod error;

/// Moving average of successive readings.
pub mod average;
/// Time source abstraction.
pub mod clock;
/// Pulse capture and bit decoding.
pub mod decoder;
/// Acquisition orchestration and caller interface.
pub mod driver;
/// Data line abstraction.
pub mod line;
/// Raw sensor payload.
pub mod payload;
/// Pulse width measurement.
pub mod pulse;
/// Start signal generation.
pub mod start;

pub use clock::{CycleClock, Timebase};
pub use driver::{Config, Dht22, INVALID, Measurement};
pub use error::Dht22Error;
pub use line::{LineMode, OpenDrainLine, PortLine, PortRegisters, SensorLine};
pub use payload::RawPayload;
