//! Memory bus implementations
//!
//! Each type here implements [`argon_hal::MemoryInterface`] on top of
//! lower-level peripherals.

pub mod bitbang;

pub use bitbang::BitbangMemoryInterface;
