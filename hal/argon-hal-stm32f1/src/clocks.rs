//! Clock tree assumptions
//!
//! The binding does not configure the PLL. These are the bus frequencies
//! of the usual 72 MHz setup (8 MHz HSE, PLL x9, APB2 undivided).

/// Core clock
pub const SYSCLK_HZ: u32 = 72_000_000;

/// APB2 peripheral clock (USART1, ADC1)
pub const APB2_HZ: u32 = 72_000_000;

/// Highest ADC clock allowed by the datasheet
pub const ADC_MAX_HZ: u32 = 14_000_000;
