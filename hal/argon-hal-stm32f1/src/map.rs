//! Register map
//!
//! Addresses and bit positions from RM0008. Only the registers the binding
//! touches are listed.

use argon_hal::register::bit;

/// Reset and clock control
pub mod rcc {
    use super::bit;

    pub const BASE: usize = 0x4002_1000;
    pub const CFGR: usize = BASE + 0x04;
    pub const APB2ENR: usize = BASE + 0x18;

    /// `CFGR` ADC prescaler field
    pub const ADCPRE_SHIFT: u32 = 14;
    /// `APB2ENR`: IOPx clock enable, bit = shift + port index
    pub const IOPEN_SHIFT: u32 = 2;
    pub const ADC1EN: u32 = bit(9);
    pub const USART1EN: u32 = bit(14);
}

/// General purpose I/O, one block per port
pub mod gpio {
    pub const BASE: usize = 0x4001_0800;
    pub const STRIDE: usize = 0x400;

    /// Configuration for pins 0-7 and 8-15, four bits per pin
    pub const CRL: usize = 0x00;
    pub const CRH: usize = 0x04;
    pub const IDR: usize = 0x08;
    pub const ODR: usize = 0x0C;
    pub const BSRR: usize = 0x10;

    /// `CNF:MODE` nibbles
    pub const ANALOG: u32 = 0b0000;
    pub const FLOATING_INPUT: u32 = 0b0100;
    pub const PULL_INPUT: u32 = 0b1000;
    /// Push-pull, 50 MHz
    pub const PUSH_PULL_OUTPUT: u32 = 0b0011;
}

/// ADC1
pub mod adc {
    use super::bit;

    pub const BASE: usize = 0x4001_2400;
    pub const SR: usize = BASE;
    pub const CR1: usize = BASE + 0x04;
    pub const CR2: usize = BASE + 0x08;
    pub const SMPR1: usize = BASE + 0x0C;
    pub const SMPR2: usize = BASE + 0x10;
    pub const SQR1: usize = BASE + 0x2C;
    pub const SQR3: usize = BASE + 0x34;
    pub const DR: usize = BASE + 0x4C;

    /// `SR` bits, all rc_w0
    pub const AWD: u32 = bit(0);
    pub const EOC: u32 = bit(1);
    pub const JEOC: u32 = bit(2);

    /// `CR1` interrupt enables
    pub const EOCIE: u32 = bit(5);
    pub const AWDIE: u32 = bit(6);
    pub const JEOCIE: u32 = bit(7);

    /// `CR2` bits
    pub const ADON: u32 = bit(0);
    pub const CONT: u32 = bit(1);
    pub const CAL: u32 = bit(2);
    pub const RSTCAL: u32 = bit(3);
    pub const ALIGN: u32 = bit(11);
    /// Regular trigger = `SWSTART`
    pub const EXTSEL_SWSTART: u32 = 0b111 << 17;
    pub const EXTTRIG: u32 = bit(20);
    pub const SWSTART: u32 = bit(22);
    pub const TSVREFE: u32 = bit(23);

    /// ADC1_2 global interrupt vector
    pub const IRQ: u16 = 18;
}

/// USART1
pub mod usart1 {
    pub const BASE: usize = 0x4001_3800;

    pub const IRQ: u16 = 37;
}

