//! SPI master contract

use crate::Peripheral;

/// SPI status conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiInterrupt {
    /// Transmit buffer empty
    TxEmpty,
    /// Receive buffer holds a byte
    RxNotEmpty,
    /// Received byte was overwritten before it was read
    Overrun,
    /// Mode fault (another master drove NSS)
    ModeFault,
}

/// SPI bus master
///
/// Transfers are full duplex: every byte written clocks one byte in.
///
/// # Preconditions
///
/// [`SpiMaster::initialize`] must run first; chip select is the caller's.
pub trait SpiMaster: Peripheral<Interrupt = SpiInterrupt> {
    /// Enable the peripheral with the given clock and mode
    fn initialize(config: SpiConfig);

    /// Change clock polarity and phase
    fn set_mode(mode: Mode);

    /// Exchange one byte, busy-waiting for the transfer to finish
    fn transfer(data: u8) -> u8;

    /// Write data, discarding what is clocked in
    fn write(data: &[u8]) {
        for &byte in data {
            Self::transfer(byte);
        }
    }

    /// Read data, clocking out zeros
    fn read(buffer: &mut [u8]) {
        for slot in buffer.iter_mut() {
            *slot = Self::transfer(0);
        }
    }

    /// Exchange a buffer in place
    fn transfer_in_place(data: &mut [u8]) {
        for slot in data.iter_mut() {
            *slot = Self::transfer(*slot);
        }
    }
}

/// SPI configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity
    pub polarity: Polarity,
    /// Clock phase
    pub phase: Phase,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 1_000_000, // 1 MHz
            polarity: Polarity::IdleLow,
            phase: Phase::CaptureOnFirstTransition,
        }
    }
}

impl SpiConfig {
    /// Configuration with the given frequency in `mode`
    pub fn new(frequency: u32, mode: Mode) -> Self {
        let (polarity, phase) = mode.into();
        Self {
            frequency,
            polarity,
            phase,
        }
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    std::thread_local! {
        static LOOPBACK: Cell<u8> = const { Cell::new(0) };
    }

    /// Loopback bus that returns the previous byte sent
    struct Loopback;

    impl Peripheral for Loopback {
        type Interrupt = SpiInterrupt;

        fn get_interrupt_flag(_flag: SpiInterrupt) -> bool {
            false
        }

        fn acknowledge_interrupt_flag(_flag: SpiInterrupt) {}
    }

    impl SpiMaster for Loopback {
        fn initialize(_config: SpiConfig) {
            LOOPBACK.with(|b| b.set(0));
        }

        fn set_mode(_mode: Mode) {}

        fn transfer(data: u8) -> u8 {
            LOOPBACK.with(|b| b.replace(data))
        }
    }

    #[test]
    fn test_mode_decomposition() {
        let config = SpiConfig::new(8_000_000, Mode::Mode3);
        assert_eq!(config.polarity, Polarity::IdleHigh);
        assert_eq!(config.phase, Phase::CaptureOnSecondTransition);
    }

    #[test]
    fn test_default_transfer_helpers() {
        Loopback::initialize(SpiConfig::default());

        let mut data = [1, 2, 3];
        Loopback::transfer_in_place(&mut data);
        assert_eq!(data, [0, 1, 2]);

        let mut buffer = [0xFF; 2];
        Loopback::read(&mut buffer);
        assert_eq!(buffer, [3, 0]);
    }
}
