//! USART register block
//!
//! Oversampling by 16. The divider `BRR` holds `PCLK / baudrate` as a 12.4
//! fixed point number, which is just the rounded integer quotient. It is
//! computed at compile time and checked against
//! [`DEFAULT_BAUDRATE_TOLERANCE`].
//!
//! The word length is 8 or 9 bits including parity, so 7N and 9-bit frames
//! with parity are rejected by [`Uart::configure`].

use core::marker::PhantomData;

use argon_hal::interrupt::{InterruptController, IrqNumber, Priority};
use argon_hal::tolerance::assert_in_tolerance;
use argon_hal::uart::{
    FrameFormat, Parity, StopBits, UartError, UartInterrupt, DEFAULT_BAUDRATE_TOLERANCE,
};
use argon_hal::{Peripheral, RegisterAccess, Uart};
use argon_hal_cortex_m::Nvic;

/// Register offsets and bits of the USART block
pub mod reg {
    use argon_hal::register::bit;

    pub const SR: usize = 0x00;
    pub const DR: usize = 0x04;
    pub const BRR: usize = 0x08;
    pub const CR1: usize = 0x0C;
    pub const CR2: usize = 0x10;

    /// `SR` bits
    pub const ORE: u32 = bit(3);
    pub const RXNE: u32 = bit(5);
    pub const TC: u32 = bit(6);
    pub const TXE: u32 = bit(7);

    /// `CR1` bits
    pub const RE: u32 = bit(2);
    pub const TE: u32 = bit(3);
    pub const RXNEIE: u32 = bit(5);
    pub const TCIE: u32 = bit(6);
    pub const TXEIE: u32 = bit(7);
    pub const PS: u32 = bit(9);
    pub const PCE: u32 = bit(10);
    pub const M: u32 = bit(12);
    pub const UE: u32 = bit(13);

    /// `CR2` stop bit field
    pub const STOP_SHIFT: u32 = 12;
}

const INTERRUPT_ENABLES: u32 = reg::TXEIE | reg::TCIE | reg::RXNEIE;

/// Where one USART instance lives on a given chip
pub trait UsartInstance {
    /// Base address of the register block
    const BASE: usize;
    /// NVIC vector
    const IRQ: IrqNumber;
    /// RCC enable register gating the bus clock
    const CLOCK_ENABLE: usize;
    /// Bit in [`Self::CLOCK_ENABLE`]
    const CLOCK_ENABLE_BIT: u32;
}

/// USART instance `I` clocked at `PCLK_HZ`
///
/// Family crates expose this through aliases such as `Usart1` that fix the
/// instance and default the clock.
pub struct Usart<I, A, const PCLK_HZ: u32> {
    _instance: PhantomData<I>,
    _registers: PhantomData<A>,
}

impl<I: UsartInstance, A: RegisterAccess, const PCLK_HZ: u32> Usart<I, A, PCLK_HZ> {
    const SR: usize = I::BASE + reg::SR;
    const DR: usize = I::BASE + reg::DR;
    const BRR: usize = I::BASE + reg::BRR;
    const CR1: usize = I::BASE + reg::CR1;
    const CR2: usize = I::BASE + reg::CR2;

    /// `BRR` value for `baudrate`
    ///
    /// Panics (at compile time when called from a `const` block) if the
    /// divider is out of range or the achieved rate is out of tolerance.
    pub const fn divider(baudrate: u32) -> u32 {
        assert!(baudrate > 0, "Baudrate must not be zero");
        let brr = (PCLK_HZ as u64 + baudrate as u64 / 2) / baudrate as u64;
        assert!(
            brr >= 16 && brr <= 0xFFFF,
            "The requested baudrate is out of range for the peripheral clock!"
        );
        let brr = brr as u32;
        assert_in_tolerance(
            Self::achieved_baudrate(brr),
            baudrate,
            DEFAULT_BAUDRATE_TOLERANCE,
        );
        brr
    }

    /// Baud rate actually produced by divider `brr`
    pub const fn achieved_baudrate(brr: u32) -> u32 {
        ((PCLK_HZ as u64 + brr as u64 / 2) / brr as u64) as u32
    }

    /// `CR1` word length and parity bits for `format`
    pub const fn frame_bits(format: FrameFormat) -> Result<u32, UartError> {
        let word = match format.word_bits() {
            8 => 0,
            9 => reg::M,
            _ => return Err(UartError::UnsupportedFrameFormat),
        };
        let parity = match format.parity {
            Parity::None => 0,
            Parity::Even => reg::PCE,
            Parity::Odd => reg::PCE | reg::PS,
        };
        Ok(word | parity)
    }

    const fn enable_bit(interrupt: UartInterrupt) -> u32 {
        match interrupt {
            UartInterrupt::TxEmpty => reg::TXEIE,
            UartInterrupt::TxComplete => reg::TCIE,
            // Overrun shares the receive interrupt enable
            UartInterrupt::RxNotEmpty | UartInterrupt::Overrun => reg::RXNEIE,
        }
    }

    /// Route `interrupt` to the NVIC at `priority`
    pub fn enable_interrupt(interrupt: UartInterrupt, priority: Priority) {
        Nvic::<A>::enable(I::IRQ, priority);
        A::set_bits(Self::CR1, Self::enable_bit(interrupt));
    }

    /// Stop routing `interrupt`; the vector is masked once no source is left
    pub fn disable_interrupt(interrupt: UartInterrupt) {
        A::clear_bits(Self::CR1, Self::enable_bit(interrupt));
        if A::read(Self::CR1) & INTERRUPT_ENABLES == 0 {
            Nvic::<A>::disable(I::IRQ);
        }
    }
}

impl<I: UsartInstance, A: RegisterAccess, const PCLK_HZ: u32> Peripheral
    for Usart<I, A, PCLK_HZ>
{
    type Interrupt = UartInterrupt;

    fn get_interrupt_flag(flag: UartInterrupt) -> bool {
        let mask = match flag {
            UartInterrupt::TxEmpty => reg::TXE,
            UartInterrupt::TxComplete => reg::TC,
            UartInterrupt::RxNotEmpty => reg::RXNE,
            UartInterrupt::Overrun => reg::ORE,
        };
        A::is_set(Self::SR, mask)
    }

    fn acknowledge_interrupt_flag(flag: UartInterrupt) {
        match flag {
            // Cleared by the next write to DR
            UartInterrupt::TxEmpty => {}
            UartInterrupt::TxComplete => A::write(Self::SR, !reg::TC),
            UartInterrupt::RxNotEmpty => A::write(Self::SR, !reg::RXNE),
            // SR read followed by DR read
            UartInterrupt::Overrun => {
                let _ = A::read(Self::SR);
                let _ = A::read(Self::DR);
            }
        }
    }
}

impl<I: UsartInstance, A: RegisterAccess, const PCLK_HZ: u32> Uart for Usart<I, A, PCLK_HZ> {
    fn initialize<const BAUDRATE: u32>() {
        let brr = const { Self::divider(BAUDRATE) };

        A::set_bits(I::CLOCK_ENABLE, I::CLOCK_ENABLE_BIT);
        A::write(Self::CR1, 0);
        A::write(Self::BRR, brr);
        A::write(Self::CR2, 0);
        A::write(Self::CR1, reg::UE | reg::TE | reg::RE);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "USART@{=usize:#x}: {} baud requested, {} achieved",
            I::BASE,
            BAUDRATE,
            Self::achieved_baudrate(brr)
        );
    }

    fn configure(format: FrameFormat) -> Result<(), UartError> {
        let frame = match Self::frame_bits(format) {
            Ok(frame) => frame,
            Err(error) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("USART@{=usize:#x}: unsupported frame {}", I::BASE, format);
                return Err(error);
            }
        };

        A::modify(Self::CR1, |cr1| (cr1 & !(reg::M | reg::PCE | reg::PS)) | frame);

        let stop = match format.stop_bits {
            StopBits::One => 0b00,
            StopBits::Two => 0b10,
        };
        A::write_field(Self::CR2, reg::STOP_SHIFT, 2, stop);
        Ok(())
    }

    fn write(data: u8) -> bool {
        if !A::is_set(Self::SR, reg::TXE) {
            return false;
        }
        A::write(Self::DR, data as u32);
        true
    }

    fn flush() {
        while !A::is_set(Self::SR, reg::TC) {
            core::hint::spin_loop();
        }
    }

    fn read() -> Option<u8> {
        if A::is_set(Self::SR, reg::RXNE) {
            Some((A::read(Self::DR) & 0xFF) as u8)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon_hal::sim::{self, Model, RegisterFile, Simulated};
    use argon_hal::uart::DataBits;
    use argon_hal_cortex_m::nvic::{NVIC_ICER, NVIC_ISER};

    /// USART1 as laid out on the STM32F4
    struct Usart1;

    impl UsartInstance for Usart1 {
        const BASE: usize = 0x4001_1000;
        const IRQ: IrqNumber = 37;
        const CLOCK_ENABLE: usize = 0x4002_3844;
        const CLOCK_ENABLE_BIT: u32 = 1 << 4;
    }

    const SR: usize = Usart1::BASE + reg::SR;
    const DR: usize = Usart1::BASE + reg::DR;
    const CR1: usize = Usart1::BASE + reg::CR1;
    const CR2: usize = Usart1::BASE + reg::CR2;

    type Serial = Usart<Usart1, Simulated, 84_000_000>;

    /// Simulated status register: frames leave instantly, rc_w0 flags
    struct UsartModel;

    impl Model for UsartModel {
        fn handles(&self, address: usize) -> bool {
            address == SR || address == DR
        }

        fn on_read(&mut self, registers: &mut RegisterFile, address: usize) {
            if address == DR {
                registers.clear_bits(SR, reg::RXNE | reg::ORE);
            }
        }

        fn on_write(
            &mut self,
            registers: &mut RegisterFile,
            address: usize,
            previous: u32,
            value: u32,
        ) -> u32 {
            if address == SR {
                // Only TC and RXNE are rc_w0, the rest is read-only
                let cleared = !value & (reg::TC | reg::RXNE);
                previous & !cleared
            } else {
                registers.set_bits(SR, reg::TXE | reg::TC);
                value
            }
        }
    }

    fn setup() {
        sim::reset();
        sim::attach(UsartModel);
        // Reset value: transmitter idle
        sim::poke(SR, reg::TXE | reg::TC);
    }

    #[test]
    fn test_divider() {
        assert_eq!(Serial::divider(115_200), 729);
        assert_eq!(Serial::achieved_baudrate(729), 115_226);
        assert_eq!(Usart::<Usart1, Simulated, 8_000_000>::divider(115_200), 69);
    }

    #[test]
    #[should_panic(expected = "exceeds the tolerance")]
    fn test_divider_out_of_tolerance() {
        Usart::<Usart1, Simulated, 8_000_000>::divider(490_000);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_divider_out_of_range() {
        Serial::divider(10_000_000);
    }

    #[test]
    fn test_initialize() {
        setup();
        Serial::initialize::<115_200>();

        assert_eq!(sim::peek(Usart1::CLOCK_ENABLE), Usart1::CLOCK_ENABLE_BIT);
        assert_eq!(sim::peek(Usart1::BASE + reg::BRR), 729);
        assert_eq!(sim::peek(CR1), reg::UE | reg::TE | reg::RE);
    }

    #[test]
    fn test_configure_frame() {
        setup();
        Serial::initialize::<9_600>();
        let format = FrameFormat::new(DataBits::Eight, Parity::Odd, StopBits::Two);
        assert_eq!(Serial::configure(format), Ok(()));

        let cr1 = sim::peek(CR1);
        assert!(cr1 & reg::M != 0);
        assert!(cr1 & reg::PCE != 0);
        assert!(cr1 & reg::PS != 0);
        assert!(cr1 & reg::UE != 0);
        assert_eq!(sim::peek(CR2), 0b10 << reg::STOP_SHIFT);

        assert_eq!(Serial::configure(FrameFormat::EIGHT_N_ONE), Ok(()));
        assert_eq!(sim::peek(CR1), reg::UE | reg::TE | reg::RE);
        assert_eq!(sim::peek(CR2), 0);
    }

    #[test]
    fn test_seven_bits_with_parity_use_eight_bit_word() {
        setup();
        Serial::initialize::<9_600>();
        let format = FrameFormat::new(DataBits::Seven, Parity::Even, StopBits::One);
        assert_eq!(Serial::configure(format), Ok(()));

        assert_eq!(sim::peek(CR1), reg::UE | reg::TE | reg::RE | reg::PCE);
    }

    #[test]
    fn test_unsupported_frames_are_rejected() {
        setup();
        Serial::initialize::<9_600>();
        let even = FrameFormat::new(DataBits::Eight, Parity::Even, StopBits::One);
        assert_eq!(Serial::configure(even), Ok(()));
        let configured = (sim::peek(CR1), sim::peek(CR2));

        let nine_e_one = FrameFormat::new(DataBits::Nine, Parity::Even, StopBits::One);
        assert_eq!(
            Serial::configure(nine_e_one),
            Err(UartError::UnsupportedFrameFormat)
        );
        let seven_n_one = FrameFormat::new(DataBits::Seven, Parity::None, StopBits::Two);
        assert_eq!(
            Serial::configure(seven_n_one),
            Err(UartError::UnsupportedFrameFormat)
        );

        // Rejected formats leave the previous one in place
        assert_eq!((sim::peek(CR1), sim::peek(CR2)), configured);
    }

    #[test]
    fn test_nine_data_bits_without_parity() {
        let format = FrameFormat::new(DataBits::Nine, Parity::None, StopBits::One);
        assert_eq!(Serial::frame_bits(format), Ok(reg::M));
    }

    #[test]
    fn test_write_respects_full_register() {
        setup();
        Serial::initialize::<115_200>();

        sim::poke(SR, 0);
        assert!(!Serial::write(b'x'));
        assert!(sim::writes_to(DR).is_empty());

        sim::poke(SR, reg::TXE);
        Serial::write_blocking(b"ok");
        Serial::flush();
        assert_eq!(sim::writes_to(DR), [b'o' as u32, b'k' as u32]);
    }

    #[test]
    fn test_read() {
        setup();
        Serial::initialize::<115_200>();
        assert_eq!(Serial::read(), None);

        sim::poke(DR, 0x41);
        sim::raise(SR, reg::RXNE);
        let mut buffer = [0u8; 4];
        assert_eq!(Serial::read_into(&mut buffer), 1);
        assert_eq!(buffer[0], 0x41);
        assert!(!Serial::get_interrupt_flag(UartInterrupt::RxNotEmpty));
    }

    #[test]
    fn test_flags_stay_until_acknowledged() {
        setup();
        assert!(Serial::get_interrupt_flag(UartInterrupt::TxComplete));
        assert!(Serial::get_interrupt_flag(UartInterrupt::TxComplete));
        Serial::acknowledge_interrupt_flag(UartInterrupt::TxComplete);
        assert!(!Serial::get_interrupt_flag(UartInterrupt::TxComplete));
        // TXE is not writable
        assert!(Serial::get_interrupt_flag(UartInterrupt::TxEmpty));

        // The next frame raises TC again
        assert!(Serial::write(b'a'));
        assert!(Serial::get_interrupt_flag(UartInterrupt::TxComplete));

        sim::raise(SR, reg::RXNE | reg::ORE);
        assert!(Serial::get_interrupt_flag(UartInterrupt::Overrun));
        Serial::acknowledge_interrupt_flag(UartInterrupt::Overrun);
        assert!(!Serial::get_interrupt_flag(UartInterrupt::Overrun));
    }

    #[test]
    fn test_interrupt_routing() {
        setup();
        Serial::enable_interrupt(UartInterrupt::RxNotEmpty, 3);
        Serial::enable_interrupt(UartInterrupt::TxComplete, 3);
        assert_eq!(sim::writes_to(NVIC_ISER + 4), [1 << 5, 1 << 5]);
        assert_eq!(sim::peek(CR1), reg::RXNEIE | reg::TCIE);

        Serial::disable_interrupt(UartInterrupt::RxNotEmpty);
        assert!(sim::writes_to(NVIC_ICER + 4).is_empty());
        Serial::disable_interrupt(UartInterrupt::TxComplete);
        assert_eq!(sim::writes_to(NVIC_ICER + 4), [1 << 5]);
    }
}
