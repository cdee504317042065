//! Addressable memory bus contract
//!
//! Display controllers and similar devices expose an index register plus a
//! data port. A [`MemoryInterface`] selects a register with
//! [`write_register`](MemoryInterface::write_register) and then transfers
//! words with [`write_data`](MemoryInterface::write_data) /
//! [`read_data`](MemoryInterface::read_data). Whether the words travel over
//! a bit-banged parallel bus, an FSMC bank or SPI is invisible to the
//! device driver.

/// Register/data memory bus
///
/// # Preconditions
///
/// [`MemoryInterface::initialize`] must run before any transfer.
///
/// A stalled bus stalls the caller; there is no timeout at this layer.
pub trait MemoryInterface {
    /// Configure the bus lines
    fn initialize();

    /// Select the register (or issue the command) `index`
    fn write_register(index: u16);

    /// Write one data word to the selected register
    fn write_data(data: u16);

    /// Read one data word from the selected register
    fn read_data() -> u16;

    /// Select `index` and write `data` to it
    fn write_register_data(index: u16, data: u16) {
        Self::write_register(index);
        Self::write_data(data);
    }
}
