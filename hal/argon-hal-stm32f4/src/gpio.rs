//! GPIO pins and ports
//!
//! Pins are addressed by type: `Pin<'A', 5>` is PA5. Port letters outside
//! `A..=I` or pin numbers above 15 fail to compile on first use.

use core::marker::PhantomData;

use argon_hal::gpio::{GpioInput, GpioOutput, GpioPort, Pull};
use argon_hal::RegisterAccess;
use argon_hal_cortex_m::Mmio;

use crate::map::{gpio, rcc};

const fn port_index(port: char) -> usize {
    assert!(
        port >= 'A' && port <= 'I',
        "GPIO port must be one of A..=I"
    );
    (port as u8 - b'A') as usize
}

const fn port_base(port: char) -> usize {
    gpio::BASE + port_index(port) * gpio::STRIDE
}

/// Gate the port clock on. Idempotent.
fn enable_port_clock<A: RegisterAccess>(port: char) {
    A::set_bits(rcc::AHB1ENR, 1 << (rcc::GPIOEN_SHIFT + port_index(port) as u32));
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

    fn set_mode(mode: u32) {
        enable_port_clock::<A>(PORT);
        A::write_field(Self::BASE + gpio::MODER, N as u32 * 2, 2, mode);
    }

    fn set_pull(pull: u32) {
        A::write_field(Self::BASE + gpio::PUPDR, N as u32 * 2, 2, pull);
    }

    /// Disconnect the digital input stage so the pin can feed the ADC
    pub fn set_analog() {
        Self::set_mode(gpio::MODE_ANALOG);
        Self::set_pull(gpio::PULL_NONE);
    }
}

impl<const PORT: char, const N: u8, A: RegisterAccess> GpioOutput for Pin<PORT, N, A> {
    fn set_output() {
        Self::set_mode(gpio::MODE_OUTPUT);
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
        Self::set_mode(gpio::MODE_INPUT);
        Self::set_pull(match pull {
            Pull::None => gpio::PULL_NONE,
            Pull::Up => gpio::PULL_UP,
            Pull::Down => gpio::PULL_DOWN,
        });
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
}

impl<const PORT: char, A: RegisterAccess> GpioPort for Port<PORT, A> {
    fn set_output() {
        enable_port_clock::<A>(PORT);
        A::write(Self::BASE + gpio::MODER, 0x5555_5555);
    }

    fn set_input() {
        enable_port_clock::<A>(PORT);
        A::write(Self::BASE + gpio::MODER, 0);
        A::write(Self::BASE + gpio::PUPDR, 0);
    }

    fn write(data: u16) {
        A::write(Self::BASE + gpio::ODR, data as u32);
    }

    fn read() -> u16 {
        (A::read(Self::BASE + gpio::IDR) & 0xFFFF) as u16
    }
}
