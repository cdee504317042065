//! Register map
//!
//! Addresses and bit positions from RM0090. Only the registers the binding
//! touches are listed.

use argon_hal::register::bit;

/// Reset and clock control
pub mod rcc {
    use super::bit;

    pub const BASE: usize = 0x4002_3800;
    pub const AHB1ENR: usize = BASE + 0x30;
    pub const APB2ENR: usize = BASE + 0x44;

    /// `AHB1ENR`: GPIOx clock enable, bit = port index
    pub const GPIOEN_SHIFT: u32 = 0;
    /// `APB2ENR` bits
    pub const USART1EN: u32 = bit(4);
    pub const ADC1EN: u32 = bit(8);
}

/// General purpose I/O, one block per port
pub mod gpio {
    pub const BASE: usize = 0x4002_0000;
    pub const STRIDE: usize = 0x400;

    pub const MODER: usize = 0x00;
    pub const PUPDR: usize = 0x0C;
    pub const IDR: usize = 0x10;
    pub const ODR: usize = 0x14;
    pub const BSRR: usize = 0x18;

    /// Two-bit `MODER` values
    pub const MODE_INPUT: u32 = 0b00;
    pub const MODE_OUTPUT: u32 = 0b01;
    pub const MODE_ANALOG: u32 = 0b11;

    /// Two-bit `PUPDR` values
    pub const PULL_NONE: u32 = 0b00;
    pub const PULL_UP: u32 = 0b01;
    pub const PULL_DOWN: u32 = 0b10;
}

/// ADC1 and the ADC common registers
pub mod adc {
    use super::bit;

    pub const BASE: usize = 0x4001_2000;
    pub const SR: usize = BASE;
    pub const CR1: usize = BASE + 0x04;
    pub const CR2: usize = BASE + 0x08;
    pub const SMPR1: usize = BASE + 0x0C;
    pub const SMPR2: usize = BASE + 0x10;
    pub const SQR1: usize = BASE + 0x2C;
    pub const SQR3: usize = BASE + 0x34;
    pub const DR: usize = BASE + 0x4C;
    pub const CCR: usize = 0x4001_2304;

    /// `SR` bits, all rc_w0
    pub const AWD: u32 = bit(0);
    pub const EOC: u32 = bit(1);
    pub const JEOC: u32 = bit(2);
    pub const OVR: u32 = bit(5);

    /// `CR1` interrupt enables
    pub const AWDIE: u32 = bit(6);
    pub const EOCIE: u32 = bit(5);
    pub const JEOCIE: u32 = bit(7);
    pub const OVRIE: u32 = bit(26);

    /// `CR2` bits
    pub const ADON: u32 = bit(0);
    pub const CONT: u32 = bit(1);
    pub const ALIGN: u32 = bit(11);
    pub const SWSTART: u32 = bit(30);

    /// `CCR` fields
    pub const ADCPRE_SHIFT: u32 = 16;
    pub const VBATE: u32 = bit(22);
    pub const TSVREFE: u32 = bit(23);

    /// Global ADC1/2/3 interrupt vector
    pub const IRQ: u16 = 18;
}

/// USART1
pub mod usart1 {
    pub const BASE: usize = 0x4001_1000;

    pub const IRQ: u16 = 37;
}

