//! Single-wire bus contract
//!
//! Dallas/Maxim 1-Wire: one open-drain data line, reset/presence handshake,
//! LSB-first byte transfers and 64-bit ROM codes that address devices.

/// Match ROM command: the next 8 bytes select one device
pub const MATCH_ROM: u8 = 0x55;
/// Skip ROM command: address every device on the bus
pub const SKIP_ROM: u8 = 0xCC;
/// Read ROM command: only valid with a single device on the bus
pub const READ_ROM: u8 = 0x33;

/// 64-bit device ROM code (family, 48-bit serial, CRC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RomCode(pub [u8; 8]);

impl RomCode {
    /// Device family code
    pub fn family(&self) -> u8 {
        self.0[0]
    }

    /// Check the trailing CRC byte
    pub fn is_valid(&self) -> bool {
        crc8(&self.0[..7]) == self.0[7]
    }
}

/// Single-wire bus master
///
/// All operations generate precisely timed slots and therefore busy-wait
/// for the duration of the slot (about 60 µs per bit, 1 ms per reset).
pub trait OneWire {
    /// Configure the data line
    fn initialize();

    /// Issue a reset pulse and sample the presence pulse
    ///
    /// Returns `true` if at least one device answered.
    fn touch_reset() -> bool;

    /// Write a single bit
    fn write_bit(bit: bool);

    /// Read a single bit
    fn read_bit() -> bool;

    /// Write a byte, LSB first
    fn write_byte(byte: u8) {
        for i in 0..8 {
            Self::write_bit(byte & (1 << i) != 0);
        }
    }

    /// Read a byte, LSB first
    fn read_byte() -> u8 {
        let mut byte = 0;
        for i in 0..8 {
            if Self::read_bit() {
                byte |= 1 << i;
            }
        }
        byte
    }

    /// Address one device for the following command
    fn select(rom: &RomCode) {
        Self::write_byte(MATCH_ROM);
        for &byte in rom.0.iter() {
            Self::write_byte(byte);
        }
    }

    /// Address every device for the following command
    fn skip_rom() {
        Self::write_byte(SKIP_ROM);
    }

    /// Read the ROM code of the only device on the bus
    ///
    /// Returns `None` if nothing answered the reset.
    fn read_rom() -> Option<RomCode> {
        if !Self::touch_reset() {
            return None;
        }
        Self::write_byte(READ_ROM);
        let mut rom = [0u8; 8];
        for byte in rom.iter_mut() {
            *byte = Self::read_byte();
        }
        Some(RomCode(rom))
    }
}

/// Dallas/Maxim CRC-8 (polynomial x^8 + x^5 + x^4 + 1, reflected)
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut byte = byte;
        for _ in 0..8 {
            let mix = (crc ^ byte) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            byte >>= 1;
        }
    }
    crc
}
