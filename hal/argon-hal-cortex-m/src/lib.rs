//! Cortex-M bindings shared by every Argon chip family
//!
//! - [`Mmio`] - volatile memory-mapped [`RegisterAccess`](argon_hal::RegisterAccess) backend
//! - [`Nvic`] - [`InterruptController`](argon_hal::InterruptController) for the
//!   Nested Vectored Interrupt Controller
//! - [`CycleDelay`] - busy-wait `embedded-hal` delay calibrated to the core clock
//!
//! Everything here is generic over the register backend so chip families can
//! be tested on the host against `argon_hal::sim::Simulated`.

#![cfg_attr(not(test), no_std)]

pub mod delay;
pub mod mmio;
pub mod nvic;

pub use delay::CycleDelay;
pub use mmio::Mmio;
pub use nvic::Nvic;
