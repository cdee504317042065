//! ADC1
//!
//! Single regular-channel conversions started by software. The sequence
//! length is always one; [`set_channel`](AnalogDigitalConverter::set_channel)
//! replaces the first (and only) sequence slot.
//!
//! Besides the external pins, channel 16 samples the internal temperature
//! sensor, 17 the internal reference and 18 the backup battery. These need
//! [`Adc1::enable_temperature_ref_measurement`] or
//! [`Adc1::enable_vbat_measurement`] first. On STM32F40x/F41x the two share
//! channel 16/18 routing; VBAT wins when both are enabled.

use core::marker::PhantomData;

use argon_hal::adc::AnalogDigitalConverter;
use argon_hal::interrupt::{InterruptController, Priority};
use argon_hal::{Peripheral, RegisterAccess};
use argon_hal_cortex_m::{Mmio, Nvic};

use crate::clocks;
use crate::gpio::Pin;
use crate::map::{adc, rcc};

const FLAGS: u32 = adc::AWD | adc::EOC | adc::JEOC | adc::OVR;
const INTERRUPT_ENABLES: u32 = adc::AWDIE | adc::EOCIE | adc::JEOCIE | adc::OVRIE;

/// ADC input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Channel {
    PinA0 = 0,
    PinA1 = 1,
    PinA2 = 2,
    PinA3 = 3,
    PinA4 = 4,
    PinA5 = 5,
    PinA6 = 6,
    PinA7 = 7,
    PinB0 = 8,
    PinB1 = 9,
    PinC0 = 10,
    PinC1 = 11,
    PinC2 = 12,
    PinC3 = 13,
    PinC4 = 14,
    PinC5 = 15,
    TemperatureSensor = 16,
    VRefInt = 17,
    VBat = 18,
}

impl Channel {
    /// Hardware channel number
    pub const fn number(self) -> u8 {
        self as u8
    }
}

/// ADC clock divider applied to APB2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Prescaler {
    Div2 = 0,
    #[default]
    Div4 = 1,
    Div6 = 2,
    Div8 = 3,
}

impl Prescaler {
    pub const fn divisor(self) -> u32 {
        (self as u32 + 1) * 2
    }

    /// ADC clock for the default APB2 frequency
    ///
    /// Must not exceed [`clocks::ADC_MAX_HZ`]. `Div2` violates it at 84 MHz.
    pub const fn adc_clock_hz(self) -> u32 {
        clocks::APB2_HZ / self.divisor()
    }
}

/// Sampling duration in ADC clock cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SampleTime {
    #[default]
    Cycles3 = 0,
    Cycles15 = 1,
    Cycles28 = 2,
    Cycles56 = 3,
    Cycles84 = 4,
    Cycles112 = 5,
    Cycles144 = 6,
    Cycles480 = 7,
}

/// ADC status conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcInterrupt {
    /// Regular conversion finished
    EndOfConversionRegular,
    /// Injected conversion finished
    EndOfConversionInjected,
    /// Sample outside the analog watchdog window
    AnalogWatchdog,
    /// A result was overwritten before it was read
    Overrun,
}

impl AdcInterrupt {
    const fn flag(self) -> u32 {
        match self {
            Self::EndOfConversionRegular => adc::EOC,
            Self::EndOfConversionInjected => adc::JEOC,
            Self::AnalogWatchdog => adc::AWD,
            Self::Overrun => adc::OVR,
        }
    }

    const fn enable_bit(self) -> u32 {
        match self {
            Self::EndOfConversionRegular => adc::EOCIE,
            Self::EndOfConversionInjected => adc::JEOCIE,
            Self::AnalogWatchdog => adc::AWDIE,
            Self::Overrun => adc::OVRIE,
        }
    }
}

/// ADC1
pub struct Adc1<A = Mmio> {
    _registers: PhantomData<A>,
}

impl<A: RegisterAccess> Adc1<A> {
    /// Connect the temperature sensor and internal reference to channels 16/17
    pub fn enable_temperature_ref_measurement() {
        A::set_bits(adc::CCR, adc::TSVREFE);
    }

    pub fn disable_temperature_ref_measurement() {
        A::clear_bits(adc::CCR, adc::TSVREFE);
    }

    /// Connect the VBAT/2 divider to channel 18
    pub fn enable_vbat_measurement() {
        A::set_bits(adc::CCR, adc::VBATE);
    }

    pub fn disable_vbat_measurement() {
        A::clear_bits(adc::CCR, adc::VBATE);
    }

    fn set_sample_time(channel: u8, sample_time: SampleTime) {
        let (register, slot) = if channel < 10 {
            (adc::SMPR2, channel)
        } else {
            (adc::SMPR1, channel - 10)
        };
        A::write_field(register, slot as u32 * 3, 3, sample_time as u32);
    }

    fn route_pin(channel: Channel) {
        match channel.number() {
            0 => Pin::<'A', 0, A>::set_analog(),
            1 => Pin::<'A', 1, A>::set_analog(),
            2 => Pin::<'A', 2, A>::set_analog(),
            3 => Pin::<'A', 3, A>::set_analog(),
            4 => Pin::<'A', 4, A>::set_analog(),
            5 => Pin::<'A', 5, A>::set_analog(),
            6 => Pin::<'A', 6, A>::set_analog(),
            7 => Pin::<'A', 7, A>::set_analog(),
            8 => Pin::<'B', 0, A>::set_analog(),
            9 => Pin::<'B', 1, A>::set_analog(),
            10 => Pin::<'C', 0, A>::set_analog(),
            11 => Pin::<'C', 1, A>::set_analog(),
            12 => Pin::<'C', 2, A>::set_analog(),
            13 => Pin::<'C', 3, A>::set_analog(),
            14 => Pin::<'C', 4, A>::set_analog(),
            15 => Pin::<'C', 5, A>::set_analog(),
            // Internal channels have no pin
            _ => {}
        }
    }
}

impl<A: RegisterAccess> Peripheral for Adc1<A> {
    type Interrupt = AdcInterrupt;

    fn get_interrupt_flag(flag: AdcInterrupt) -> bool {
        A::is_set(adc::SR, flag.flag())
    }

    fn acknowledge_interrupt_flag(flag: AdcInterrupt) {
        // rc_w0: ones leave the other flags untouched
        A::write(adc::SR, !flag.flag());
    }
}

impl<A: RegisterAccess> AnalogDigitalConverter for Adc1<A> {
    type Channel = Channel;
    type Prescaler = Prescaler;
    type SampleTime = SampleTime;

    fn initialize(prescaler: Prescaler) {
        A::set_bits(rcc::APB2ENR, rcc::ADC1EN);
        Self::set_prescaler(prescaler);
        A::set_bits(adc::CR2, adc::ADON);

        #[cfg(feature = "defmt")]
        defmt::debug!("ADC1: on, clock {} Hz", prescaler.adc_clock_hz());
    }

    fn shutdown() {
        A::clear_bits(adc::CR2, adc::ADON);
        A::clear_bits(rcc::APB2ENR, rcc::ADC1EN);
    }

    fn set_prescaler(prescaler: Prescaler) {
        A::write_field(adc::CCR, adc::ADCPRE_SHIFT, 2, prescaler as u32);
    }

    fn set_channel(channel: Channel, sample_time: SampleTime) {
        Self::route_pin(channel);
        Self::set_sample_time(channel.number(), sample_time);
        // Sequence length 1, slot 1 = channel
        A::write(adc::SQR1, 0);
        A::write_field(adc::SQR3, 0, 5, channel.number() as u32);
    }

    fn start_conversion() {
        A::write(adc::SR, !FLAGS);
        A::set_bits(adc::CR2, adc::SWSTART);
    }

    fn is_conversion_finished() -> bool {
        A::is_set(adc::SR, adc::EOC)
    }

    fn get_value() -> u16 {
        while !Self::is_conversion_finished() {
            core::hint::spin_loop();
        }
        // Reading DR clears EOC
        (A::read(adc::DR) & 0xFFFF) as u16
    }

    fn enable_free_running_mode() {
        A::set_bits(adc::CR2, adc::CONT);
    }

    fn disable_free_running_mode() {
        A::clear_bits(adc::CR2, adc::CONT);
    }

    fn set_left_adjust_result(enable: bool) {
        if enable {
            A::set_bits(adc::CR2, adc::ALIGN);
        } else {
            A::clear_bits(adc::CR2, adc::ALIGN);
        }
    }

    fn enable_interrupt(interrupt: AdcInterrupt, priority: Priority) {
        Nvic::<A>::enable(adc::IRQ, priority);
        A::set_bits(adc::CR1, interrupt.enable_bit());
    }

    /// The shared ADC vector stays unmasked while another source is enabled
    fn disable_interrupt(interrupt: AdcInterrupt) {
        A::clear_bits(adc::CR1, interrupt.enable_bit());
        if A::read(adc::CR1) & INTERRUPT_ENABLES == 0 {
            Nvic::<A>::disable(adc::IRQ);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{AdcModel, FIRST_SAMPLE, SAMPLE_STEP};
    use super::*;
    use crate::map::gpio;
    use argon_hal::sim::{self, Access, Simulated};
    use argon_hal_cortex_m::nvic::{NVIC_ICER, NVIC_IPR, NVIC_ISER};

    type Adc = Adc1<Simulated>;

    const GPIOC_MODER: usize = gpio::BASE + 2 * gpio::STRIDE + gpio::MODER;

    fn setup() {
        sim::reset();
        sim::attach(AdcModel::new(3));
        Adc::initialize(Prescaler::Div4);
        Adc::set_channel(Channel::PinA0, SampleTime::Cycles84);
    }

    #[test]
    fn test_initialize_powers_up() {
        setup();
        assert!(sim::peek(rcc::APB2ENR) & rcc::ADC1EN != 0);
        assert!(sim::peek(adc::CR2) & adc::ADON != 0);
        assert_eq!(sim::peek(adc::CCR), 0b01 << 16);

        Adc::set_prescaler(Prescaler::Div8);
        assert_eq!(sim::peek(adc::CCR), 0b11 << 16);
        assert_eq!(Prescaler::Div4.adc_clock_hz(), 21_000_000);

        Adc::shutdown();
        assert_eq!(sim::peek(adc::CR2) & adc::ADON, 0);
        assert_eq!(sim::peek(rcc::APB2ENR) & rcc::ADC1EN, 0);
    }

    #[test]
    fn test_set_channel_replaces_previous() {
        setup();
        assert_eq!(sim::peek(adc::SQR3), 0);
        assert_eq!(sim::peek(adc::SMPR2), 4);

        Adc::set_channel(Channel::PinC2, SampleTime::Cycles480);
        assert_eq!(sim::peek(adc::SQR1), 0);
        assert_eq!(sim::peek(adc::SQR3), 12);
        assert_eq!(sim::peek(adc::SMPR1), 7 << 6);
        assert_eq!(sim::peek(GPIOC_MODER), 0b11 << 4);

        Adc::set_channel(Channel::VBat, SampleTime::Cycles3);
        assert_eq!(sim::peek(adc::SQR3), 18);
        // No pin behind an internal channel
        assert_eq!(sim::peek(GPIOC_MODER), 0b11 << 4);
    }

    #[test]
    fn test_get_value_waits_for_conversion() {
        setup();
        Adc::start_conversion();
        assert!(!Adc::is_conversion_finished());
        assert!(!Adc::is_conversion_finished());

        assert_eq!(Adc::get_value(), FIRST_SAMPLE);
        let log = sim::accesses();
        let last = log.len() - 1;
        assert_eq!(log[last], Access::Read(adc::DR, FIRST_SAMPLE as u32));
        assert!(matches!(log[last - 1], Access::Read(adc::SR, sr) if sr & adc::EOC != 0));
        // Reading the result cleared the flag
        assert!(!Adc::is_conversion_finished());
    }

    #[test]
    fn test_restart_discards_unread_result() {
        setup();
        Adc::start_conversion();
        while !Adc::is_conversion_finished() {}
        assert_eq!(sim::peek(adc::DR), FIRST_SAMPLE as u32);

        Adc::start_conversion();
        assert!(!Adc::is_conversion_finished());
        assert_eq!(Adc::get_value(), FIRST_SAMPLE + SAMPLE_STEP);
    }

    #[test]
    fn test_free_running_yields_fresh_samples() {
        setup();
        Adc::enable_free_running_mode();
        Adc::start_conversion();

        let mut previous = Adc::get_value();
        for _ in 0..4 {
            let sample = Adc::get_value();
            assert!(sample > previous);
            previous = sample;
        }

        Adc::disable_free_running_mode();
        assert_eq!(sim::peek(adc::CR2) & adc::CONT, 0);
    }

    #[test]
    fn test_flags_stay_set_until_acknowledged() {
        setup();
        Adc::start_conversion();
        while !Adc::is_conversion_finished() {}

        let flag = AdcInterrupt::EndOfConversionRegular;
        assert!(Adc::get_interrupt_flag(flag));
        assert!(Adc::get_interrupt_flag(flag));
        Adc::acknowledge_interrupt_flag(flag);
        assert!(!Adc::get_interrupt_flag(flag));

        // The next conversion raises it again until acknowledged
        Adc::start_conversion();
        while !Adc::is_conversion_finished() {}
        assert!(Adc::get_interrupt_flag(flag));
        assert!(Adc::get_interrupt_flag(flag));
        Adc::acknowledge_interrupt_flag(flag);
        assert!(!Adc::get_interrupt_flag(flag));

        sim::raise(adc::SR, adc::AWD);
        assert!(Adc::get_interrupt_flag(AdcInterrupt::AnalogWatchdog));
        assert!(!Adc::get_interrupt_flag(AdcInterrupt::EndOfConversionInjected));
        Adc::acknowledge_interrupt_flag(AdcInterrupt::AnalogWatchdog);
        assert!(!Adc::get_interrupt_flag(AdcInterrupt::AnalogWatchdog));
    }

    #[test]
    fn test_overrun_and_stale_flags() {
        setup();
        Adc::enable_free_running_mode();
        Adc::start_conversion();
        // Poll through two completions without reading DR
        for _ in 0..6 {
            Adc::is_conversion_finished();
        }
        assert!(Adc::get_interrupt_flag(AdcInterrupt::Overrun));

        Adc::disable_free_running_mode();
        Adc::start_conversion();
        assert!(!Adc::get_interrupt_flag(AdcInterrupt::Overrun));
        assert!(!Adc::is_conversion_finished());
    }

    #[test]
    fn test_left_adjust() {
        setup();
        Adc::set_left_adjust_result(true);
        assert!(sim::peek(adc::CR2) & adc::ALIGN != 0);
        Adc::set_left_adjust_result(false);
        assert_eq!(sim::peek(adc::CR2) & adc::ALIGN, 0);
    }

    #[test]
    fn test_internal_measurement_paths() {
        setup();
        Adc::enable_temperature_ref_measurement();
        Adc::enable_vbat_measurement();
        let paths = adc::TSVREFE | adc::VBATE;
        assert_eq!(sim::peek(adc::CCR) & paths, paths);
        Adc::disable_vbat_measurement();
        Adc::disable_temperature_ref_measurement();
        assert_eq!(sim::peek(adc::CCR), 0b01 << 16);
    }

    #[test]
    fn test_interrupt_routing() {
        setup();
        Adc::enable_interrupt(AdcInterrupt::EndOfConversionRegular, 2);
        Adc::enable_interrupt(AdcInterrupt::Overrun, 2);

        assert_eq!(sim::writes_to(NVIC_ISER), [1 << 18, 1 << 18]);
        assert_eq!(sim::peek(NVIC_IPR + 16), 0x20 << 16);
        assert_eq!(sim::peek(adc::CR1), adc::EOCIE | adc::OVRIE);

        Adc::disable_interrupt(AdcInterrupt::Overrun);
        assert!(sim::writes_to(NVIC_ICER).is_empty());
        assert_eq!(sim::peek(adc::CR1), adc::EOCIE);

        Adc::disable_interrupt(AdcInterrupt::EndOfConversionRegular);
        assert_eq!(sim::writes_to(NVIC_ICER), [1 << 18]);
        assert_eq!(sim::peek(adc::CR1), 0);
    }
}
