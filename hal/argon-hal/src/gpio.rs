//! Digital I/O contracts
//!
//! A GPIO binding is one zero-sized type per physical pin (or per port for
//! [`GpioPort`]). Because pins are types, a device driver names the lines it
//! needs as generic parameters and the compiler wires them directly:
//!
//! ```ignore
//! type DisplayReset = Pin<'C', 13>;
//! let mut display = SiemensS75Portrait::<Bus, DisplayReset>::new();
//! ```

/// Internal pull resistor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull resistor (floating input)
    #[default]
    None,
    /// Pull towards VDD
    Up,
    /// Pull towards ground
    Down,
}

/// Digital output pin
///
/// # Preconditions
///
/// [`GpioOutput::set_output`] must have been called before driving the pin.
pub trait GpioOutput {
    /// Configure the pin as a push-pull output
    ///
    /// Enables the port clock if needed. Re-configuring is allowed.
    fn set_output();

    /// Set the pin high (logic 1)
    fn set_high();

    /// Set the pin low (logic 0)
    fn set_low();

    /// Toggle the pin state
    fn toggle() {
        if Self::is_set_high() {
            Self::set_low();
        } else {
            Self::set_high();
        }
    }

    /// Set the pin to a specific state
    fn set_state(high: bool) {
        if high {
            Self::set_high();
        } else {
            Self::set_low();
        }
    }

    /// Check if the pin is currently driven high
    fn is_set_high() -> bool;

    /// Check if the pin is currently driven low
    fn is_set_low() -> bool {
        !Self::is_set_high()
    }
}

/// Digital input pin
pub trait GpioInput {
    /// Configure the pin as an input with the given pull resistor
    fn set_input(pull: Pull);

    /// Check if the pin reads high (logic 1)
    fn is_high() -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low() -> bool {
        !Self::is_high()
    }
}

/// Pin that can switch between input and output at runtime
///
/// Open-drain style buses (single-wire, bit-banged I2C) need this.
pub trait GpioIo: GpioOutput + GpioInput {}

// Blanket implementation for types that implement both traits
impl<T: GpioOutput + GpioInput> GpioIo for T {}

/// Sixteen pins driven and sampled together
///
/// Used as the data lines of parallel memory buses.
pub trait GpioPort {
    /// Configure all pins of the port as outputs
    fn set_output();

    /// Configure all pins of the port as floating inputs
    fn set_input();

    /// Drive all pins at once
    fn write(data: u16);

    /// Sample all pins at once
    fn read() -> u16;
}
