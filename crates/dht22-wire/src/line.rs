//! # Sensor Line
//!
//! The single data wire shared between the host and the sensor.
//!
//! The driver only needs three things from it: switching between input and
//! output, writing a level while it owns the wire, and sampling the current
//! level as fast as possible. [`SensorLine`] captures exactly that.
//!
//! Two implementations are provided and the choice between them is made at
//! build time through the driver's type parameter:
//!
//! - [`OpenDrainLine`] works with any `embedded-hal` pin configured as
//!   open-drain with a pull-up resistor.
//! - [`PortLine`] accesses the port registers directly through a bit mask,
//!   which keeps the polling loop as short as possible on slow cores.

use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// Direction of the data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Floating input.
    Input,
    /// Input with the pull-up resistor enabled, if available.
    InputPullUp,
    /// Push-pull or open-drain output driven by the host.
    Output,
}

impl LineMode {
    #[inline]
    const fn is_input(self) -> bool {
        matches!(self, Self::Input | Self::InputPullUp)
    }
}

/// Digital I/O capability required to talk to the sensor.
pub trait SensorLine {
    /// Error returned by line accesses.
    type Error;

    /// Changes the direction of the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying hardware rejects the change.
    fn set_mode(&mut self, mode: LineMode) -> Result<(), Self::Error>;

    /// Writes a level to the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying hardware cannot be written.
    fn write(&mut self, level: PinState) -> Result<(), Self::Error>;

    /// Samples the current level of the line.
    ///
    /// This is called in a tight loop while measuring pulses, so
    /// implementations must not block or perform any extra work.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying hardware cannot be read.
    fn is_high(&mut self) -> Result<bool, Self::Error>;
}

/// A [`SensorLine`] built on an `embedded-hal` open-drain pin.
///
/// The wire needs an external (or internal) pull-up resistor: releasing the
/// line means driving the open-drain output high and letting the resistor
/// and the sensor decide the level.
pub struct OpenDrainLine<P>
where
    P: InputPin + OutputPin,
{
    pin: P,
    mode: LineMode,
}

impl<P> OpenDrainLine<P>
where
    P: InputPin + OutputPin,
{
    /// Creates an [`OpenDrainLine`] from an open-drain pin.
    #[must_use]
    pub const fn new(pin: P) -> Self {
        Self {
            pin,
            mode: LineMode::Input,
        }
    }

    /// Returns the wrapped pin.
    #[must_use]
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> SensorLine for OpenDrainLine<P>
where
    P: InputPin + OutputPin,
{
    type Error = P::Error;

    fn set_mode(&mut self, mode: LineMode) -> Result<(), Self::Error> {
        // Entering any input mode releases the wire.
        if mode.is_input() {
            self.pin.set_high()?;
        }
        self.mode = mode;
        Ok(())
    }

    fn write(&mut self, level: PinState) -> Result<(), Self::Error> {
        match (self.mode, level) {
            (_, PinState::High) => self.pin.set_high(),
            (LineMode::Output, PinState::Low) => self.pin.set_low(),
            // An input cannot pull the wire low.
            (_, PinState::Low) => Ok(()),
        }
    }

    #[inline(always)]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }
}

/// Direct access to the registers of a GPIO port.
///
/// Each method receives the bit mask of the pin inside the port, so a
/// single implementation serves every pin of the same port.
pub trait PortRegisters {
    /// Reads the input register.
    fn read_input(&self) -> u32;

    /// Sets (`true`) or clears (`false`) the masked bits of the direction
    /// register. A set bit configures the pin as an output.
    fn write_direction(&mut self, mask: u32, output: bool);

    /// Sets (`true`) or clears (`false`) the masked bits of the output
    /// register. While the pin is an input, a set bit enables its pull-up.
    fn write_output(&mut self, mask: u32, high: bool);
}

/// A [`SensorLine`] that talks to the port registers directly.
pub struct PortLine<R>
where
    R: PortRegisters,
{
    registers: R,
    mask: u32,
}

impl<R> PortLine<R>
where
    R: PortRegisters,
{
    /// Creates a [`PortLine`] for the pin at position `bit` of the port.
    ///
    /// `bit` must be below 32.
    #[must_use]
    pub const fn new(registers: R, bit: u8) -> Self {
        debug_assert!(bit < 32, "pin bit outside of the port register");
        Self {
            registers,
            mask: 1u32 << (bit % 32),
        }
    }

    /// Returns the wrapped registers.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.registers
    }
}

impl<R> SensorLine for PortLine<R>
where
    R: PortRegisters,
{
    type Error = Infallible;

    fn set_mode(&mut self, mode: LineMode) -> Result<(), Self::Error> {
        match mode {
            LineMode::Input => {
                self.registers.write_direction(self.mask, false);
                self.registers.write_output(self.mask, false);
            }
            LineMode::InputPullUp => {
                self.registers.write_direction(self.mask, false);
                self.registers.write_output(self.mask, true);
            }
            LineMode::Output => self.registers.write_direction(self.mask, true),
        }
        Ok(())
    }

    fn write(&mut self, level: PinState) -> Result<(), Self::Error> {
        self.registers.write_output(self.mask, level == PinState::High);
        Ok(())
    }

    #[inline(always)]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.registers.read_input() & self.mask != 0)
    }
}
