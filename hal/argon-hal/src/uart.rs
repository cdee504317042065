//! UART serial communication contract
//!
//! The baud rate is a const generic of [`Uart::initialize`], so each
//! binding can compute its divider and check it against
//! [`crate::tolerance`] at compile time. A baud rate the clock tree cannot
//! produce closely enough is a build error, never a runtime one.

use crate::Peripheral;

/// Default tolerance for baud rate dividers in parts per thousand (1%)
pub const DEFAULT_BAUDRATE_TOLERANCE: u16 = 10;

/// UART status conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartInterrupt {
    /// Transmit data register is empty
    TxEmpty,
    /// Transmission of the last frame is complete
    TxComplete,
    /// A received byte is waiting
    RxNotEmpty,
    /// A byte was received while the previous one was unread
    Overrun,
}

/// Error from UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// The hardware cannot produce the requested frame format
    UnsupportedFrameFormat,
}

/// Serial port
///
/// # Preconditions
///
/// [`Uart::initialize`] must run before any other operation, and the TX/RX
/// pins must already be routed to the peripheral.
pub trait Uart: Peripheral<Interrupt = UartInterrupt> {
    /// Enable the peripheral at `BAUDRATE` with 8N1 framing
    ///
    /// Fails to compile if the closest achievable rate is more than
    /// [`DEFAULT_BAUDRATE_TOLERANCE`] away from `BAUDRATE`.
    fn initialize<const BAUDRATE: u32>();

    /// Change the frame format (data bits, parity, stop bits)
    ///
    /// A format the hardware cannot produce is rejected with
    /// [`UartError::UnsupportedFrameFormat`] and the current format stays
    /// in effect.
    fn configure(format: FrameFormat) -> Result<(), UartError>;

    /// Queue one byte for transmission
    ///
    /// Non-blocking. Returns `false` if the transmit register is still full.
    fn write(data: u8) -> bool;

    /// Transmit all bytes, busy-waiting for room
    fn write_blocking(data: &[u8]) {
        for &byte in data {
            while !Self::write(byte) {
                core::hint::spin_loop();
            }
        }
    }

    /// Busy-wait until the last queued frame has left the shift register
    fn flush();

    /// Take one received byte, if any
    ///
    /// Non-blocking.
    fn read() -> Option<u8>;

    /// Fill `buffer` with whatever bytes are waiting
    ///
    /// Returns the number of bytes read. Non-blocking.
    fn read_into(buffer: &mut [u8]) -> usize {
        let mut count = 0;
        for slot in buffer.iter_mut() {
            match Self::read() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }
}

/// UART frame format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameFormat {
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self::EIGHT_N_ONE
    }
}

impl FrameFormat {
    /// 8 data bits, no parity, 1 stop bit
    pub const EIGHT_N_ONE: Self = Self::new(DataBits::Eight, Parity::None, StopBits::One);

    pub const fn new(data_bits: DataBits, parity: Parity, stop_bits: StopBits) -> Self {
        Self {
            data_bits,
            parity,
            stop_bits,
        }
    }

    /// Word length on the wire including the parity bit
    pub const fn word_bits(&self) -> u8 {
        let data = match self.data_bits {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
            DataBits::Nine => 9,
        };
        match self.parity {
            Parity::None => data,
            Parity::Even | Parity::Odd => data + 1,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
