//! Siemens S75 display (Solomon Systech SSD1286)
//!
//! The panel is 132 x 176 pixels in its native (portrait) orientation,
//! connector at the bottom. Landscape puts the connector on the right.
//!
//! The drivers keep a monochrome [`Framebuffer`] and expand it to RGB565
//! on [`update`](SiemensS75Portrait::update): lit pixels are sent in the
//! foreground colour, the rest in the background colour. Framebuffer rows
//! come in pages of eight, so the 132-row landscape buffer is 136 rows
//! tall and the bottom four are never sent.
//!
//! Both drivers are generic over the bus and reset line:
//!
//! ```ignore
//! type Bus = BitbangMemoryInterface<Port<'D'>, Pin<'C', 0>, Pin<'C', 1>, Pin<'C', 2>, Pin<'C', 3>>;
//! type Reset = Pin<'C', 4>;
//!
//! Bus::initialize();
//! let mut display = SiemensS75Portrait::<Bus, Reset>::new();
//! display.initialize(&mut delay);
//! Text::new("Hello", Point::new(10, 20), style).draw(&mut display)?;
//! display.update();
//! ```

use core::marker::PhantomData;

use argon_hal::gpio::GpioOutput;
use argon_hal::MemoryInterface;
use embedded_graphics::pixelcolor::{BinaryColor, IntoStorage, Rgb565};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, RgbColor, Size};
use embedded_hal::delay::DelayNs;

use super::Framebuffer;

/// Native panel width
pub const NATIVE_WIDTH: usize = 132;
/// Native panel height
pub const NATIVE_HEIGHT: usize = 176;
/// Pixels sent by every full-frame transfer
pub const PIXEL_COUNT: usize = NATIVE_WIDTH * NATIVE_HEIGHT;

/// SSD1286 registers
mod reg {
    pub const OSCILLATION: u16 = 0x00;
    pub const DRIVER_OUTPUT: u16 = 0x01;
    pub const DRIVING_WAVEFORM: u16 = 0x02;
    pub const POWER_CONTROL_1: u16 = 0x03;
    pub const DISPLAY_CONTROL: u16 = 0x07;
    pub const POWER_CONTROL_2: u16 = 0x0C;
    pub const SLEEP_MODE: u16 = 0x10;
    pub const ENTRY_MODE: u16 = 0x11;
    pub const RAM_ADDRESS: u16 = 0x21;
    pub const RAM_DATA: u16 = 0x22;
    pub const HORIZONTAL_WINDOW: u16 = 0x44;
    pub const VERTICAL_WINDOW: u16 = 0x45;
}

/// Entry mode: 65k colours, address counter increments in both directions
const ENTRY_MODE_PORTRAIT: u16 = 0x6830;
/// Same, with the counter running down the columns (`AM` set)
const ENTRY_MODE_LANDSCAPE: u16 = 0x6838;

/// Foreground and background colour of the expanded framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colors {
    /// Colour of lit pixels
    pub foreground: Rgb565,
    /// Colour of unlit pixels
    pub background: Rgb565,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            foreground: Rgb565::BLACK,
            background: Rgb565::WHITE,
        }
    }
}

/// Pulse the reset line and bring the controller up
///
/// Shared by both orientations; only the entry mode differs.
fn settings<MEMORY, RESET>(delay: &mut impl DelayNs, landscape: bool)
where
    MEMORY: MemoryInterface,
    RESET: GpioOutput,
{
    RESET::set_output();
    RESET::set_low();
    delay.delay_ms(10);
    RESET::set_high();
    delay.delay_ms(50);

    MEMORY::write_register_data(reg::OSCILLATION, 0x0001);
    delay.delay_ms(10);
    MEMORY::write_register_data(reg::POWER_CONTROL_1, 0xEC0C);
    MEMORY::write_register_data(reg::POWER_CONTROL_2, 0x0005);
    MEMORY::write_register_data(reg::SLEEP_MODE, 0x0000);
    delay.delay_ms(30);

    // 176 gate lines, 132 source lines
    MEMORY::write_register_data(reg::DRIVER_OUTPUT, 0x31AF);
    MEMORY::write_register_data(reg::DRIVING_WAVEFORM, 0x0200);
    let entry_mode = if landscape {
        ENTRY_MODE_LANDSCAPE
    } else {
        ENTRY_MODE_PORTRAIT
    };
    MEMORY::write_register_data(reg::ENTRY_MODE, entry_mode);
    // Window end address in the high byte, start 0 in the low byte
    MEMORY::write_register_data(reg::HORIZONTAL_WINDOW, (NATIVE_WIDTH as u16 - 1) << 8);
    MEMORY::write_register_data(reg::VERTICAL_WINDOW, (NATIVE_HEIGHT as u16 - 1) << 8);
    MEMORY::write_register_data(reg::DISPLAY_CONTROL, 0x0033);
}

/// Point the address counter at the first pixel and open RAM for writing
fn begin_frame<MEMORY: MemoryInterface>() {
    MEMORY::write_register(reg::RAM_ADDRESS);
    MEMORY::write_data(0x0000);
    MEMORY::write_register(reg::RAM_DATA);
}

/// Fill controller RAM with one colour
fn cls<MEMORY: MemoryInterface>(colour: Rgb565) {
    let colour = colour.into_storage();
    begin_frame::<MEMORY>();
    for _ in 0..PIXEL_COUNT {
        MEMORY::write_data(colour);
    }
}

/// Stream `width` x `height` pixels in row-major order
fn write_frame<MEMORY: MemoryInterface>(
    colors: Colors,
    width: usize,
    height: usize,
    lit: impl Fn(usize, usize) -> bool,
) {
    let foreground = colors.foreground.into_storage();
    let background = colors.background.into_storage();

    begin_frame::<MEMORY>();
    for y in 0..height {
        for x in 0..width {
            MEMORY::write_data(if lit(x, y) { foreground } else { background });
        }
    }
}

/// Display type for one orientation
///
/// Both orientations share the controller routines above and differ only in
/// buffer shape and entry mode. Padding rows of the last page accept no
/// drawing and are never sent.
macro_rules! s75_display {
    (
        $(#[$meta:meta])*
        $name:ident,
        $orientation:literal,
        $width:expr,
        $height:expr,
        $pages:literal,
        landscape: $landscape:literal
    ) => {
        $(#[$meta])*
        pub struct $name<MEMORY, RESET> {
            buffer: Framebuffer<{ $width }, $pages>,
            colors: Colors,
            _bus: PhantomData<(MEMORY, RESET)>,
        }

        impl<MEMORY: MemoryInterface, RESET: GpioOutput> Default for $name<MEMORY, RESET> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<MEMORY: MemoryInterface, RESET: GpioOutput> $name<MEMORY, RESET> {
            pub const WIDTH: usize = $width;
            pub const HEIGHT: usize = $height;

            /// Create a driver with a blank buffer and default colours
            pub const fn new() -> Self {
                Self {
                    buffer: Framebuffer::new(),
                    colors: Colors {
                        foreground: Rgb565::BLACK,
                        background: Rgb565::WHITE,
                    },
                    _bus: PhantomData,
                }
            }

            #[doc = concat!("Reset the controller and configure it for ", $orientation, " mode")]
            ///
            /// # Preconditions
            ///
            /// `MEMORY` is already initialized.
            pub fn initialize(&mut self, delay: &mut impl DelayNs) {
                settings::<MEMORY, RESET>(delay, $landscape);

                #[cfg(feature = "defmt")]
                defmt::debug!("S75: initialized, {=str}", $orientation);
            }

            /// Send the visible part of the buffer to the display
            ///
            /// Blocks for the duration of the transfer.
            pub fn update(&mut self) {
                let buffer = &self.buffer;
                write_frame::<MEMORY>(
                    self.colors,
                    Self::WIDTH,
                    Self::HEIGHT,
                    |x, y| buffer.get_pixel(x, y),
                );
            }

            /// Fill the display with `colour`, bypassing the buffer
            pub fn clear_screen(&mut self, colour: Rgb565) {
                cls::<MEMORY>(colour);
            }

            pub fn set_colors(&mut self, colors: Colors) {
                self.colors = colors;
            }

            pub fn colors(&self) -> Colors {
                self.colors
            }

            pub fn framebuffer(&self) -> &Framebuffer<{ $width }, $pages> {
                &self.buffer
            }

            pub fn framebuffer_mut(&mut self) -> &mut Framebuffer<{ $width }, $pages> {
                &mut self.buffer
            }
        }

        impl<MEMORY, RESET> OriginDimensions for $name<MEMORY, RESET> {
            fn size(&self) -> Size {
                Size::new($width as u32, $height as u32)
            }
        }

        impl<MEMORY, RESET> DrawTarget for $name<MEMORY, RESET> {
            type Color = BinaryColor;
            type Error = core::convert::Infallible;

            fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
            where
                I: IntoIterator<Item = Pixel<Self::Color>>,
            {
                self.buffer.draw_iter(
                    pixels
                        .into_iter()
                        .filter(|Pixel(point, _)| point.y < $height as i32),
                )
            }

            fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
                self.buffer.clear(color)
            }
        }
    };
}

s75_display!(
    /// Siemens S75 display, 132 x 176, connector at the bottom
    SiemensS75Portrait,
    "portrait",
    NATIVE_WIDTH,
    NATIVE_HEIGHT,
    22,
    landscape: false
);

s75_display!(
    /// Siemens S75 display, 176 x 132, connector on the right
    ///
    /// The buffer holds 136 rows; the last 4 are padding.
    SiemensS75Landscape,
    "landscape",
    NATIVE_HEIGHT,
    NATIVE_WIDTH,
    17,
    landscape: true
);
