//! I2C master contract

use crate::Peripheral;

/// I2C status conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cInterrupt {
    /// A transaction finished
    TransferComplete,
    /// The addressed device did not acknowledge
    Nack,
    /// Bus error or arbitration lost
    BusError,
}

/// Error from I2C transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// Misplaced start or stop condition
    Bus,
    /// Arbitration lost to another master
    ArbitrationLost,
    /// NACK received
    Nack,
    /// Data overrun or underrun
    Overrun,
}

/// I2C bus master
///
/// # Preconditions
///
/// [`I2cMaster::initialize`] must run first.
pub trait I2cMaster: Peripheral<Interrupt = I2cInterrupt> {
    /// Enable the peripheral with the given bus frequency
    fn initialize(config: I2cConfig);

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(address: u8, data: &[u8]) -> Result<(), I2cError>;

    /// Read data from a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buffer` - Buffer to read into
    fn read(address: u8, buffer: &mut [u8]) -> Result<(), I2cError>;

    /// Write then read in a single transaction (repeated start)
    ///
    /// This is commonly used to write a register address then read data.
    fn write_read(address: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<(), I2cError>;
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
    };
}
