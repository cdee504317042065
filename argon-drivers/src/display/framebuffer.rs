//! Monochrome framebuffer
//!
//! One bit per pixel, organised in pages of eight rows like most
//! monochrome controllers: byte `pages[p][x]` holds rows `8p..8p+8` of
//! column `x`, least significant bit on top.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};

/// Buffer of `WIDTH` x `PAGES * 8` pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer<const WIDTH: usize, const PAGES: usize> {
    pages: [[u8; WIDTH]; PAGES],
}

impl<const WIDTH: usize, const PAGES: usize> Default for Framebuffer<WIDTH, PAGES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WIDTH: usize, const PAGES: usize> Framebuffer<WIDTH, PAGES> {
    pub const WIDTH: usize = WIDTH;
    pub const HEIGHT: usize = PAGES * 8;

    /// Create a blank buffer
    pub const fn new() -> Self {
        Self {
            pages: [[0; WIDTH]; PAGES],
        }
    }

    /// Turn every pixel on or off
    pub fn fill(&mut self, on: bool) {
        let byte = if on { 0xFF } else { 0x00 };
        for page in self.pages.iter_mut() {
            page.fill(byte);
        }
    }

    /// Set one pixel; coordinates outside the buffer are ignored
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= Self::HEIGHT {
            return;
        }
        let mask = 1 << (y % 8);
        let byte = &mut self.pages[y / 8][x];
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize) {
        self.set(x, y, true);
    }

    pub fn clear_pixel(&mut self, x: usize, y: usize) {
        self.set(x, y, false);
    }

    /// Whether a pixel is on; `false` outside the buffer
    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= Self::HEIGHT {
            return false;
        }
        self.pages[y / 8][x] & (1 << (y % 8)) != 0
    }

    /// Raw page data
    pub fn pages(&self) -> &[[u8; WIDTH]; PAGES] {
        &self.pages
    }
}

impl<const WIDTH: usize, const PAGES: usize> OriginDimensions for Framebuffer<WIDTH, PAGES> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, Self::HEIGHT as u32)
    }
}

impl<const WIDTH: usize, const PAGES: usize> DrawTarget for Framebuffer<WIDTH, PAGES> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            self.set(point.x as usize, point.y as usize, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.is_on());
        Ok(())
    }
}
