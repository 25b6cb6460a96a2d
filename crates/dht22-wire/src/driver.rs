//! # DHT22 Driver
//!
//! Sequences a complete acquisition: start signal, bit capture and checksum
//! validation, retried up to a configured bound. Readings are cached so the
//! sensor is queried at most once per minimum interval, which keeps it from
//! self-heating.
//!
//! The `DHT22` sensor provides the following measurements:
//! - **Humidity**: Relative humidity in tenths of a percent (‰ RH)
//! - **Temperature**: Temperature in tenths of a degree Celsius
//!
//! For detailed specifications, refer to the
//! [datasheet](https://www.alldatasheet.com/datasheet-pdf/pdf/1132459/ETC2/DHT22.html).

use core::fmt::Debug;

use embedded_hal::delay::DelayNs;

use log::{debug, trace, warn};

use crate::average::SampleAverager;
use crate::clock::Timebase;
use crate::decoder::BitDecoder;
use crate::error::Dht22Error;
use crate::line::{LineMode, SensorLine};
use crate::payload::RawPayload;
use crate::pulse::PulseTimer;
use crate::start::generate_start;

/// Value returned by [`Dht22::read_temperature`] and
/// [`Dht22::read_humidity`] when the last read failed.
///
/// All bits set, which is also how a valid -0.1 °C reading looks: use
/// [`Dht22::last_read_succeeded`] or [`Dht22::measurement`] when the two
/// must be told apart.
pub const INVALID: i16 = !0;

const DEFAULT_MAX_RETRIES: u8 = 2;
const DEFAULT_MIN_INTERVAL_MS: u32 = 2000;
const DEFAULT_PULSE_TIMEOUT_US: u32 = 1000;

/// Driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    max_retries: u8,
    min_interval_ms: u32,
    pulse_timeout_us: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Creates a [`Config`] with 2 retries, a 2 s minimum interval between
    /// reads and a 1 ms pulse timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            pulse_timeout_us: DEFAULT_PULSE_TIMEOUT_US,
        }
    }

    /// Sets how many times a failed acquisition is retried.
    #[must_use]
    pub const fn max_retries(mut self, max_retries: u8) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the minimum interval between two hardware transactions.
    #[must_use]
    pub const fn min_interval_ms(mut self, min_interval_ms: u32) -> Self {
        self.min_interval_ms = min_interval_ms;
        self
    }

    /// Sets how long a single pulse may last before it counts as a timeout.
    #[must_use]
    pub const fn pulse_timeout_us(mut self, pulse_timeout_us: u32) -> Self {
        self.pulse_timeout_us = pulse_timeout_us;
        self
    }

    /// Maximum number of retries.
    #[must_use]
    pub const fn retries(&self) -> u8 {
        self.max_retries
    }

    /// Minimum interval between two hardware transactions, in milliseconds.
    #[must_use]
    pub const fn interval_ms(&self) -> u32 {
        self.min_interval_ms
    }

    /// Pulse timeout, in microseconds.
    #[must_use]
    pub const fn timeout_us(&self) -> u32 {
        self.pulse_timeout_us
    }
}

/// A single humidity and temperature measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Relative humidity as a percentage (% RH).
    pub humidity: f32,
    /// Temperature in degrees Celsius (°C).
    pub temperature: f32,
}

// Averaged values of the last successful read, in tenths.
#[derive(Debug, Clone, Copy)]
struct Reading {
    temperature: i16,
    humidity: i16,
}

// Outcome of the last acquisition.
#[derive(Debug)]
struct ReadState<E> {
    last_attempt_ms: Option<u32>,
    succeeded: bool,
    retries_used: u8,
    last_error: Option<Dht22Error<E>>,
}

/// The `DHT22` driver.
///
/// `SAMPLES` is the depth of the moving average applied to temperature and
/// humidity. Zero disables averaging.
pub struct Dht22<L, D, C, const SAMPLES: usize = 0>
where
    L: SensorLine,
    D: DelayNs,
    C: Timebase,
{
    line: L,
    delay: D,
    clock: C,
    config: Config,
    timer: PulseTimer,
    decoder: BitDecoder,
    state: ReadState<L::Error>,
    payload: Option<RawPayload>,
    reading: Option<Reading>,
    temperatures: SampleAverager<SAMPLES>,
    humidities: SampleAverager<SAMPLES>,
}

impl<L, D, C, const SAMPLES: usize> Dht22<L, D, C, SAMPLES>
where
    L: SensorLine,
    L::Error: Debug,
    D: DelayNs,
    C: Timebase,
{
    /// Creates a [`Dht22`] driver and releases the line with its pull-up
    /// enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be configured as an input.
    pub fn new(mut line: L, delay: D, clock: C, config: Config) -> Result<Self, L::Error> {
        line.set_mode(LineMode::InputPullUp)?;
        let timer = PulseTimer::new(clock.cycles_for(config.pulse_timeout_us));

        Ok(Self {
            line,
            delay,
            clock,
            config,
            timer,
            decoder: BitDecoder::new(),
            state: ReadState {
                last_attempt_ms: None,
                succeeded: false,
                retries_used: 0,
                last_error: None,
            },
            payload: None,
            reading: None,
            temperatures: SampleAverager::new(),
            humidities: SampleAverager::new(),
        })
    }

    /// Driver configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Whether enough time has passed since the last attempt for a new
    /// hardware transaction.
    #[must_use]
    pub fn interval_elapsed(&self) -> bool {
        self.interval_elapsed_at(self.clock.now_ms())
    }

    /// Reads the sensor if the minimum interval has elapsed and reports
    /// whether valid values are available.
    ///
    /// Within the minimum interval the sensor is left alone and the outcome
    /// of the previous read is returned.
    pub fn is_available(&mut self) -> bool {
        let now = self.clock.now_ms();
        if self.interval_elapsed_at(now) {
            self.acquire(now);
        }
        self.state.succeeded
    }

    /// Temperature in tenths of a degree Celsius, averaged over the last
    /// `SAMPLES` successful reads.
    ///
    /// Returns [`INVALID`] if the last read failed.
    #[must_use]
    pub fn read_temperature(&self) -> i16 {
        self.reading.map_or(INVALID, |reading| reading.temperature)
    }

    /// Relative humidity in tenths of a percent, averaged over the last
    /// `SAMPLES` successful reads.
    ///
    /// Returns [`INVALID`] if the last read failed.
    #[must_use]
    pub fn read_humidity(&self) -> i16 {
        self.reading.map_or(INVALID, |reading| reading.humidity)
    }

    /// Averaged values in degrees Celsius and percent, or `None` if the
    /// last read failed.
    #[must_use]
    pub fn measurement(&self) -> Option<Measurement> {
        self.reading.map(|reading| Measurement {
            humidity: f32::from(reading.humidity) / 10.0,
            temperature: f32::from(reading.temperature) / 10.0,
        })
    }

    /// Whether the last read succeeded.
    #[must_use]
    pub const fn last_read_succeeded(&self) -> bool {
        self.state.succeeded
    }

    /// Number of retries needed by the last read.
    ///
    /// Equals the configured maximum when every attempt failed.
    #[must_use]
    pub const fn retries_used_last_read(&self) -> u8 {
        self.state.retries_used
    }

    /// Error of the last failed attempt of the last read, if it failed.
    #[must_use]
    pub const fn last_error(&self) -> Option<&Dht22Error<L::Error>> {
        self.state.last_error.as_ref()
    }

    /// Last payload that passed checksum validation.
    #[must_use]
    pub const fn raw_payload(&self) -> Option<RawPayload> {
        self.payload
    }

    /// Releases the line, the delay provider and the clock.
    pub fn release(self) -> (L, D, C) {
        (self.line, self.delay, self.clock)
    }

    fn interval_elapsed_at(&self, now: u32) -> bool {
        self.state
            .last_attempt_ms
            .is_none_or(|last| now.wrapping_sub(last) >= self.config.min_interval_ms)
    }

    fn acquire(&mut self, now: u32) {
        self.state.last_attempt_ms = Some(now);

        let mut attempt = 0;
        let outcome = loop {
            match self.attempt() {
                Ok(payload) => break Ok(payload),
                Err(e) => {
                    debug!("DHT22: attempt {attempt} failed: {e}");
                    if attempt >= self.config.max_retries {
                        break Err(e);
                    }
                    attempt += 1;
                }
            }
        };
        self.state.retries_used = attempt;

        match outcome {
            Ok(payload) => {
                trace!("DHT22: payload {:02X?}", payload.bytes());
                self.state.succeeded = true;
                self.state.last_error = None;
                self.payload = Some(payload);
                self.reading = Some(Reading {
                    temperature: self.temperatures.fold(payload.temperature()),
                    humidity: self.humidities.fold(payload.humidity()),
                });
            }
            Err(e) => {
                warn!("DHT22: read failed after {} attempts: {e}", u16::from(attempt) + 1);
                self.state.succeeded = false;
                self.state.last_error = Some(e);
                self.reading = None;
            }
        }
    }

    fn attempt(&mut self) -> Result<RawPayload, Dht22Error<L::Error>> {
        generate_start(&mut self.line, &mut self.delay, &self.timer)?;
        self.decoder.read_bytes(&mut self.line, &self.timer)?.validate()
    }
}
