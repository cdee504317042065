//! Device drivers built on the Argon HAL contracts
//!
//! Drivers here never touch registers. They are generic over the
//! peripherals they run on, which are passed as type parameters:
//!
//! - Memory buses ([`memory::BitbangMemoryInterface`]) over a GPIO port and
//!   four control lines
//! - Displays ([`display::SiemensS75Portrait`], [`display::SiemensS75Landscape`])
//!   over a memory bus and a reset line, with an owned
//!   [`display::Framebuffer`] that `embedded-graphics` can draw into

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod memory;

#[cfg(test)]
pub(crate) mod mock;
