//! Display drivers
//!
//! - [`Framebuffer`] - owned monochrome pixel buffer with `embedded-graphics` support
//! - [`SiemensS75Portrait`] / [`SiemensS75Landscape`] - SSD1286 colour panel of
//!   the Siemens S75/CX75/C81/M75 phones

pub mod framebuffer;
pub mod siemens_s75;

pub use framebuffer::Framebuffer;
pub use siemens_s75::{Colors, SiemensS75Landscape, SiemensS75Portrait};
