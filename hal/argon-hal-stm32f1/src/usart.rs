//! USART1
//!
//! The register block is shared with the other STM32 families, see
//! [`argon_hal_stm32::usart`]. The divider is checked at compile time:
//!
//! ```compile_fail
//! use argon_hal::Uart;
//! use argon_hal_stm32f1::{Mmio, Usart1};
//!
//! // 8 MHz / 16 = 500 kBd is the closest rate, 2% off
//! Usart1::<Mmio, 8_000_000>::initialize::<490_000>();
//! ```

use argon_hal::interrupt::IrqNumber;
use argon_hal_cortex_m::Mmio;
use argon_hal_stm32::usart::{Usart, UsartInstance};

use crate::clocks;
use crate::map::{rcc, usart1};

/// USART1 placement: APB2, clock gate in `APB2ENR`
pub struct Usart1Block;

impl UsartInstance for Usart1Block {
    const BASE: usize = usart1::BASE;
    const IRQ: IrqNumber = usart1::IRQ;
    const CLOCK_ENABLE: usize = rcc::APB2ENR;
    const CLOCK_ENABLE_BIT: u32 = rcc::USART1EN;
}

/// USART1 on APB2
///
/// `PCLK_HZ` is the APB2 clock feeding the divider.
pub type Usart1<A = Mmio, const PCLK_HZ: u32 = { clocks::APB2_HZ }> = Usart<Usart1Block, A, PCLK_HZ>;
