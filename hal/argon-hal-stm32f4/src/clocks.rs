//! Clock tree assumptions
//!
//! The binding does not configure the PLL. These are the bus frequencies
//! of the usual 168 MHz setup (8 MHz HSE, PLL to 168 MHz, APB2 = /2).
//! Peripherals that derive timing from a bus clock take the frequency as a
//! const parameter defaulting to these values, so other clock trees only
//! need a different type argument.

/// Core clock
pub const SYSCLK_HZ: u32 = 168_000_000;

/// APB2 peripheral clock (USART1, ADC1)
pub const APB2_HZ: u32 = 84_000_000;

/// Highest ADC clock allowed by the datasheet at 2.4 V - 3.6 V
pub const ADC_MAX_HZ: u32 = 36_000_000;
