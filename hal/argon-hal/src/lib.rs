//! Argon Hardware Abstraction Layer
//!
//! This crate declares the capability contracts that every chip-family
//! binding implements. A contract is a trait whose operations are all
//! associated functions: it has no data, it is never instantiated, and it
//! never appears in a compiled image. Concrete peripherals are zero-sized
//! marker types (one per physical hardware unit), so a call through a
//! contract resolves at compile time to direct register access.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / device drivers           │
//! │  (argon-drivers, generic over traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  argon-hal (this crate - contracts)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  argon-hal-   │       │  argon-hal-   │
//! │   stm32f1     │       │   stm32f4     │
//! └───────────────┘       └───────────────┘
//!         └─────── exactly one ───┘
//!              (argon-platform)
//! ```
//!
//! # Contracts
//!
//! - [`Peripheral`] - interrupt flag read / acknowledge, shared by all
//! - [`gpio::GpioOutput`], [`gpio::GpioInput`], [`gpio::GpioPort`] - Digital I/O
//! - [`uart::Uart`] - Serial communication
//! - [`spi::SpiMaster`] - SPI bus
//! - [`i2c::I2cMaster`] - I2C bus
//! - [`one_wire::OneWire`] - Single-wire bus
//! - [`can::Can`] - CAN bus
//! - [`register::RegisterAccess`] - Generic register access
//! - [`memory::MemoryInterface`] - Generic addressable memory (display buses)
//! - [`adc::AnalogDigitalConverter`] - Analog-to-digital conversion
//! - [`interrupt::InterruptController`] - Interrupt priority and masking
//!
//! # Preconditions
//!
//! Every contract requires its `initialize` operation to run before any
//! other. Calling out of order is undefined at the hardware level and is
//! **not** checked at runtime; the contracts trade defensive checks for
//! zero overhead and document the ordering the caller must uphold.
//!
//! # Concurrency
//!
//! Nothing here locks. If main-flow code and an interrupt handler touch
//! the same peripheral's configuration, the caller serializes them (for
//! example by masking the interrupt around the access).

#![cfg_attr(not(any(test, feature = "sim")), no_std)]
#![deny(unsafe_code)]

pub mod adc;
pub mod can;
pub mod gpio;
pub mod i2c;
pub mod interrupt;
pub mod memory;
pub mod one_wire;
pub mod register;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod spi;
pub mod tolerance;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::AnalogDigitalConverter;
pub use can::Can;
pub use gpio::{GpioInput, GpioOutput, GpioPort};
pub use i2c::I2cMaster;
pub use interrupt::InterruptController;
pub use memory::MemoryInterface;
pub use one_wire::OneWire;
pub use register::RegisterAccess;
pub use spi::SpiMaster;
pub use tolerance::is_value_in_tolerance;
pub use uart::Uart;

/// Operations common to every peripheral contract
///
/// Status conditions are surfaced as pollable flags, never as errors.
/// Reading a flag is non-blocking and has no side effects; a set flag stays
/// set until it is acknowledged.
pub trait Peripheral {
    /// Status conditions this peripheral can report
    type Interrupt: Copy;

    /// Read an interrupt flag
    fn get_interrupt_flag(flag: Self::Interrupt) -> bool;

    /// Acknowledge an interrupt flag
    ///
    /// "Acknowledge" describes the intent: the condition already happened and
    /// this releases it. Handlers must call this or the condition re-fires.
    fn acknowledge_interrupt_flag(flag: Self::Interrupt);
}
