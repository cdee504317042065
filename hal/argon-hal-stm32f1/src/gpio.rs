//! GPIO pins and ports
//!
//! Pins are addressed by type: `Pin<'C', 13>` is PC13. Each pin has a
//! four-bit `CNF:MODE` nibble in `CRL` (pins 0-7) or `CRH` (pins 8-15).
//! The pull direction of an input shares the output data register.

use core::marker::PhantomData;

use argon_hal::gpio::{GpioInput, GpioOutput, GpioPort, Pull};
use argon_hal::RegisterAccess;
use argon_hal_cortex_m::Mmio;

use crate::map::{gpio, rcc};

const fn port_index(port: char) -> usize {
    assert!(
        port >= 'A' && port <= 'G',
        "GPIO port must be one of A..=G"
    );
    (port as u8 - b'A') as usize
}

const fn port_base(port: char) -> usize {
    gpio::BASE + port_index(port) * gpio::STRIDE
}

fn enable_port_clock<A: RegisterAccess>(port: char) {
    A::set_bits(rcc::APB2ENR, 1 << (rcc::IOPEN_SHIFT + port_index(port) as u32));
}

/// Single GPIO pin `P{PORT}{N}`
pub struct Pin<const PORT: char, const N: u8, A = Mmio> {
    _registers: PhantomData<A>,
}

impl<const PORT: char, const N: u8, A: RegisterAccess> Pin<PORT, N, A> {
    const BASE: usize = {
        assert!(N < 16, "GPIO pin number must be below 16");
        port_base(PORT)
    };
    const MASK: u32 = 1 << N;
    const CONFIG: usize = Self::BASE + if N < 8 { gpio::CRL } else { gpio::CRH };
    const CONFIG_SHIFT: u32 = (N as u32 % 8) * 4;

    fn configure(nibble: u32) {
        enable_port_clock::<A>(PORT);
        A::write_field(Self::CONFIG, Self::CONFIG_SHIFT, 4, nibble);
    }

    /// Disconnect the digital input stage so the pin can feed the ADC
    pub fn set_analog() {
        Self::configure(gpio::ANALOG);
    }
}

impl<const PORT: char, const N: u8, A: RegisterAccess> GpioOutput for Pin<PORT, N, A> {
    fn set_output() {
        Self::configure(gpio::PUSH_PULL_OUTPUT);
    }

    fn set_high() {
        A::write(Self::BASE + gpio::BSRR, Self::MASK);
    }

    fn set_low() {
        A::write(Self::BASE + gpio::BSRR, Self::MASK << 16);
    }

    fn is_set_high() -> bool {
        A::is_set(Self::BASE + gpio::ODR, Self::MASK)
    }
}

impl<const PORT: char, const N: u8, A: RegisterAccess> GpioInput for Pin<PORT, N, A> {
    fn set_input(pull: Pull) {
        match pull {
            Pull::None => Self::configure(gpio::FLOATING_INPUT),
            Pull::Up => {
                Self::configure(gpio::PULL_INPUT);
                Self::set_high();
            }
            Pull::Down => {
                Self::configure(gpio::PULL_INPUT);
                Self::set_low();
            }
        }
    }

    fn is_high() -> bool {
        A::is_set(Self::BASE + gpio::IDR, Self::MASK)
    }
}

/// All 16 pins of port `PORT` as one parallel bus
pub struct Port<const PORT: char, A = Mmio> {
    _registers: PhantomData<A>,
}

impl<const PORT: char, A: RegisterAccess> Port<PORT, A> {
    const BASE: usize = port_base(PORT);

    fn configure_all(nibble: u32) {
        enable_port_clock::<A>(PORT);
        let word = nibble * 0x1111_1111;
        A::write(Self::BASE + gpio::CRL, word);
        A::write(Self::BASE + gpio::CRH, word);
    }
}

impl<const PORT: char, A: RegisterAccess> GpioPort for Port<PORT, A> {
    fn set_output() {
        Self::configure_all(gpio::PUSH_PULL_OUTPUT);
    }

    fn set_input() {
        Self::configure_all(gpio::FLOATING_INPUT);
    }

    fn write(data: u16) {
        A::write(Self::BASE + gpio::ODR, data as u32);
    }

    fn read() -> u16 {
        (A::read(Self::BASE + gpio::IDR) & 0xFFFF) as u16
    }
}
