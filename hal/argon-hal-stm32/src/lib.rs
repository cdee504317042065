//! STM32 peripheral blocks shared across chip families
//!
//! Several STM32 peripherals have the same register layout on every family
//! and differ only in base address, interrupt vector and clock gate. Those
//! are implemented once here, generic over an instance trait that the
//! family crates implement from their register maps.
//!
//! - [`Usart`] - [`Uart`](argon_hal::Uart) for the F1/F2/F4 USART block
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting and logging

#![cfg_attr(not(test), no_std)]

pub mod usart;

pub use usart::{Usart, UsartInstance};
