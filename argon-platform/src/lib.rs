//! Chip family selection
//!
//! Application code and device drivers name peripherals through this
//! crate, so moving to another chip family is a Cargo feature change:
//!
//! ```toml
//! argon-platform = { path = "...", default-features = false, features = ["stm32f1"] }
//! ```
//!
//! The selected family crate is re-exported as [`chip`], and its
//! peripherals under family-independent names. Exactly one family feature
//! must be enabled; none or several is a build error.
//!
//! ```no_run
//! use argon_platform::hal::{AnalogDigitalConverter, Uart};
//! use argon_platform::{adc, Adc1, Usart1};
//!
//! Usart1::initialize::<115_200>();
//! Adc1::initialize(adc::Prescaler::default());
//! Adc1::set_channel(adc::Channel::PinA0, adc::SampleTime::default());
//! Adc1::start_conversion();
//! let _sample = Adc1::get_value();
//! ```

#![cfg_attr(not(test), no_std)]

pub use argon_hal as hal;

cfg_if::cfg_if! {
    if #[cfg(feature = "stm32f1")] {
        pub use argon_hal_stm32f1 as chip;
        /// The family this build targets
        pub const FAMILY: Family = Family::Stm32f1;
    } else if #[cfg(feature = "stm32f4")] {
        pub use argon_hal_stm32f4 as chip;
        /// The family this build targets
        pub const FAMILY: Family = Family::Stm32f4;
    } else {
        compile_error!(
            "No chip family selected!\n\
            Use: cargo build --features stm32f4\n\
            Or:  cargo build --no-default-features --features stm32f1"
        );
    }
}

// Ensure only one family is selected
#[cfg(all(feature = "stm32f1", feature = "stm32f4"))]
compile_error!("Multiple chip families selected! Choose only one: stm32f1 OR stm32f4");

pub use chip::{adc, clocks, gpio, usart};
pub use chip::{CycleDelay, Mmio};

/// ADC1 on the memory-mapped registers
pub type Adc1 = chip::Adc1<Mmio>;
/// USART1 on the memory-mapped registers, default APB2 clock
pub type Usart1 = chip::Usart1<Mmio>;
/// GPIO pin `P{PORT}{N}`
pub type Pin<const PORT: char, const N: u8> = chip::Pin<PORT, N, Mmio>;
/// 16-bit GPIO port
pub type Port<const PORT: char> = chip::Port<PORT, Mmio>;
/// Interrupt controller
pub type Nvic = chip::Nvic<Mmio>;

/// Busy-wait delay calibrated to the selected family's core clock
pub type CoreDelay = CycleDelay<{ clocks::SYSCLK_HZ }>;

/// Supported chip families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Family {
    Stm32f1,
    Stm32f4,
}

impl Family {
    /// Human readable family name
    pub const fn name(self) -> &'static str {
        match self {
            Family::Stm32f1 => "STM32F1",
            Family::Stm32f4 => "STM32F4",
        }
    }
}
