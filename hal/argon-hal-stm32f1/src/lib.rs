//! STM32F10x platform binding for the Argon HAL
//!
//! Zero-sized peripheral types implementing the `argon-hal` contracts for
//! the STM32F1 family (medium and high density parts):
//!
//! - [`Adc1`] - [`AnalogDigitalConverter`](argon_hal::AnalogDigitalConverter)
//! - [`Usart1`] - [`Uart`](argon_hal::Uart) with compile-time baudrate checks
//! - [`Pin`] / [`Port`] - GPIO pins and 16-bit parallel ports
//!
//! Every type takes a register backend parameter defaulting to
//! [`Mmio`]. Host tests substitute `argon_hal::sim::Simulated`.
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting and logging

#![cfg_attr(not(test), no_std)]

pub mod adc;
pub mod clocks;
pub mod gpio;
pub mod map;
pub mod usart;

pub use adc::Adc1;
pub use gpio::{Pin, Port};
pub use usart::Usart1;

pub use argon_hal_cortex_m::{CycleDelay, Mmio, Nvic};

/// Human readable family name
pub const FAMILY: &str = "STM32F1";
