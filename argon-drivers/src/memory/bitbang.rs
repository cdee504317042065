//! Bit-banged 8080-style parallel bus
//!
//! Sixteen data lines on one GPIO port plus four active-low control
//! lines:
//!
//! | Line | Meaning |
//! |------|---------|
//! | `CS` | chip select |
//! | `CD` | command (low) / data (high) |
//! | `WR` | write strobe, data latched on the rising edge |
//! | `RD` | read strobe, data valid while low |
//!
//! Every line change is a separate register write, which on the supported
//! chips already exceeds the controller's minimum pulse widths.

use core::marker::PhantomData;

use argon_hal::gpio::{GpioOutput, GpioPort};
use argon_hal::MemoryInterface;

/// Parallel memory bus driven by software
///
/// All five parameters are GPIO bindings; the type is never instantiated.
pub struct BitbangMemoryInterface<PORT, CS, CD, WR, RD> {
    _lines: PhantomData<(PORT, CS, CD, WR, RD)>,
}

impl<PORT, CS, CD, WR, RD> BitbangMemoryInterface<PORT, CS, CD, WR, RD>
where
    PORT: GpioPort,
    CS: GpioOutput,
    CD: GpioOutput,
    WR: GpioOutput,
    RD: GpioOutput,
{
    fn write(word: u16) {
        CS::set_low();
        PORT::write(word);
        WR::set_low();
        WR::set_high();
        CS::set_high();
    }
}

impl<PORT, CS, CD, WR, RD> MemoryInterface for BitbangMemoryInterface<PORT, CS, CD, WR, RD>
where
    PORT: GpioPort,
    CS: GpioOutput,
    CD: GpioOutput,
    WR: GpioOutput,
    RD: GpioOutput,
{
    fn initialize() {
        // Idle levels before the lines become outputs
        CS::set_high();
        CD::set_high();
        WR::set_high();
        RD::set_high();

        CS::set_output();
        CD::set_output();
        WR::set_output();
        RD::set_output();
        PORT::set_output();
    }

    fn write_register(index: u16) {
        CD::set_low();
        Self::write(index);
    }

    fn write_data(data: u16) {
        CD::set_high();
        Self::write(data);
    }

    fn read_data() -> u16 {
        CD::set_high();
        PORT::set_input();
        CS::set_low();
        RD::set_low();
        let word = PORT::read();
        RD::set_high();
        CS::set_high();
        PORT::set_output();
        word
    }
}
