//! ADC1
//!
//! Single regular-channel conversions started through `SWSTART`. The
//! sequence length is always one.
//!
//! `CR2` needs care on this family: writing `ADON = 1` while the converter
//! is already on, with no other bit changing, starts a conversion. All
//! `CR2` updates go through [`Adc1::update_control`], which skips writes
//! that would not change the register.
//!
//! After power-up the converter should be calibrated once with
//! [`Adc1::calibrate`].

use core::marker::PhantomData;

use argon_hal::adc::AnalogDigitalConverter;
use argon_hal::interrupt::{InterruptController, Priority};
use argon_hal::{Peripheral, RegisterAccess};
use argon_hal_cortex_m::{Mmio, Nvic};

use crate::clocks;
use crate::gpio::Pin;
use crate::map::{adc, rcc};

const FLAGS: u32 = adc::AWD | adc::EOC | adc::JEOC;
const INTERRUPT_ENABLES: u32 = adc::AWDIE | adc::EOCIE | adc::JEOCIE;

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
    Div4 = 1,
    #[default]
    Div6 = 2,
    Div8 = 3,
}

impl Prescaler {
    pub const fn divisor(self) -> u32 {
        (self as u32 + 1) * 2
    }

    /// ADC clock for the default APB2 frequency
    ///
    /// Must not exceed [`clocks::ADC_MAX_HZ`]; at 72 MHz only `Div6` and
    /// `Div8` are in range.
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
    Cycles1_5 = 0,
    Cycles7_5 = 1,
    Cycles13_5 = 2,
    Cycles28_5 = 3,
    Cycles41_5 = 4,
    Cycles55_5 = 5,
    Cycles71_5 = 6,
    Cycles239_5 = 7,
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
}

impl AdcInterrupt {
    const fn flag(self) -> u32 {
        match self {
            Self::EndOfConversionRegular => adc::EOC,
            Self::EndOfConversionInjected => adc::JEOC,
            Self::AnalogWatchdog => adc::AWD,
        }
    }

    const fn enable_bit(self) -> u32 {
        match self {
            Self::EndOfConversionRegular => adc::EOCIE,
            Self::EndOfConversionInjected => adc::JEOCIE,
            Self::AnalogWatchdog => adc::AWDIE,
        }
    }
}

/// ADC1
pub struct Adc1<A = Mmio> {
    _registers: PhantomData<A>,
}

impl<A: RegisterAccess> Adc1<A> {
    /// Read-modify-write `CR2`, skipping the write if nothing changes
    pub fn update_control(f: impl FnOnce(u32) -> u32) {
        let current = A::read(adc::CR2);
        let next = f(current);
        if next != current {
            A::write(adc::CR2, next);
        }
    }

    /// Reset and run the built-in offset calibration
    ///
    /// **Blocks** until the hardware reports completion. The converter must
    /// have been on for at least two ADC clock cycles.
    pub fn calibrate() {
        Self::update_control(|cr2| cr2 | adc::RSTCAL);
        while A::is_set(adc::CR2, adc::RSTCAL) {
            core::hint::spin_loop();
        }
        Self::update_control(|cr2| cr2 | adc::CAL);
        while A::is_set(adc::CR2, adc::CAL) {
            core::hint::spin_loop();
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("ADC1: calibrated");
    }

    /// Connect the temperature sensor and internal reference to channels 16/17
    pub fn enable_temperature_ref_measurement() {
        Self::update_control(|cr2| cr2 | adc::TSVREFE);
    }

    pub fn disable_temperature_ref_measurement() {
        Self::update_control(|cr2| cr2 & !adc::TSVREFE);
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
        A::write(adc::SR, !flag.flag());
    }
}

impl<A: RegisterAccess> AnalogDigitalConverter for Adc1<A> {
    type Channel = Channel;
    type Prescaler = Prescaler;
    type SampleTime = SampleTime;

    fn initialize(prescaler: Prescaler) {
        Self::set_prescaler(prescaler);
        A::set_bits(rcc::APB2ENR, rcc::ADC1EN);
        Self::update_control(|cr2| cr2 | adc::ADON);
        // Regular conversions triggered by SWSTART
        Self::update_control(|cr2| cr2 | adc::EXTTRIG | adc::EXTSEL_SWSTART);

        #[cfg(feature = "defmt")]
        defmt::debug!("ADC1: on, clock {} Hz", prescaler.adc_clock_hz());
    }

    fn shutdown() {
        Self::update_control(|cr2| cr2 & !adc::ADON);
        A::clear_bits(rcc::APB2ENR, rcc::ADC1EN);
    }

    /// The divider lives in `RCC_CFGR` on this family
    fn set_prescaler(prescaler: Prescaler) {
        A::write_field(rcc::CFGR, rcc::ADCPRE_SHIFT, 2, prescaler as u32);
    }

    fn set_channel(channel: Channel, sample_time: SampleTime) {
        Self::route_pin(channel);
        Self::set_sample_time(channel.number(), sample_time);
        A::write(adc::SQR1, 0);
        A::write_field(adc::SQR3, 0, 5, channel.number() as u32);
    }

    fn start_conversion() {
        A::write(adc::SR, !FLAGS);
        Self::update_control(|cr2| cr2 | adc::SWSTART);
    }

    fn is_conversion_finished() -> bool {
        A::is_set(adc::SR, adc::EOC)
    }

    fn get_value() -> u16 {
        while !Self::is_conversion_finished() {
            core::hint::spin_loop();
        }
        (A::read(adc::DR) & 0xFFFF) as u16
    }

    fn enable_free_running_mode() {
        Self::update_control(|cr2| cr2 | adc::CONT);
    }

    fn disable_free_running_mode() {
        Self::update_control(|cr2| cr2 & !adc::CONT);
    }

    fn set_left_adjust_result(enable: bool) {
        Self::update_control(|cr2| {
            if enable {
                cr2 | adc::ALIGN
            } else {
                cr2 & !adc::ALIGN
            }
        });
    }

    fn enable_interrupt(interrupt: AdcInterrupt, priority: Priority) {
        Nvic::<A>::enable(adc::IRQ, priority);
        A::set_bits(adc::CR1, interrupt.enable_bit());
    }

    /// ADC1 and ADC2 share a vector; it stays unmasked while another ADC1
    /// source is enabled
    fn disable_interrupt(interrupt: AdcInterrupt) {
        A::clear_bits(adc::CR1, interrupt.enable_bit());
        if A::read(adc::CR1) & INTERRUPT_ENABLES == 0 {
            Nvic::<A>::disable(adc::IRQ);
        }
    }
}

/// Simulated ADC1
///
/// A conversion takes `conversion_polls` reads of `SR`. Results start at
/// 100 and grow by 7. Rewriting `ADON` with no other change starts a
/// conversion, like the hardware.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use argon_hal::sim::{Model, RegisterFile};

    pub const FIRST_SAMPLE: u16 = 100;
    pub const SAMPLE_STEP: u16 = 7;

    pub struct AdcModel {
        conversion_polls: u32,
        remaining: Option<u32>,
        next_sample: u16,
    }

    impl AdcModel {
        pub fn new(conversion_polls: u32) -> Self {
            Self {
                conversion_polls,
                remaining: None,
                next_sample: FIRST_SAMPLE,
            }
        }

        fn complete(&mut self, registers: &mut RegisterFile) {
            registers.set(adc::DR, self.next_sample as u32);
            registers.set_bits(adc::SR, adc::EOC);
            self.next_sample = self.next_sample.wrapping_add(SAMPLE_STEP);
            self.remaining = if registers.is_set(adc::CR2, adc::CONT) {
                Some(self.conversion_polls)
            } else {
                None
            };
        }
    }

    impl Model for AdcModel {
        fn handles(&self, address: usize) -> bool {
            (adc::BASE..=adc::DR).contains(&address)
        }

        fn on_read(&mut self, registers: &mut RegisterFile, address: usize) {
            match address {
                adc::SR => match self.remaining {
                    Some(0) | Some(1) => self.complete(registers),
                    Some(n) => self.remaining = Some(n - 1),
                    None => {}
                },
                adc::DR => registers.clear_bits(adc::SR, adc::EOC),
                _ => {}
            }
        }

        fn on_write(
            &mut self,
            _registers: &mut RegisterFile,
            address: usize,
            previous: u32,
            value: u32,
        ) -> u32 {
            match address {
                adc::SR => previous & value,
                adc::CR2 => {
                    let software_trigger = adc::EXTTRIG | adc::EXTSEL_SWSTART;
                    let triggered = value & adc::SWSTART != 0
                        && value & software_trigger == software_trigger;
                    let adon_rewrite = previous & adc::ADON != 0 && value == previous;
                    if value & adc::ADON != 0 && (triggered || adon_rewrite) {
                        self.remaining = Some(self.conversion_polls);
                    }
                    // Calibration finishes instantly
                    value & !(adc::SWSTART | adc::CAL | adc::RSTCAL)
                }
                _ => value,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{AdcModel, FIRST_SAMPLE, SAMPLE_STEP};
    use super::*;
    use crate::map::gpio;
    use argon_hal::sim::{self, Simulated};
    use argon_hal_cortex_m::nvic::{NVIC_ICER, NVIC_ISER};

    type Adc = Adc1<Simulated>;

    fn setup() {
        sim::reset();
        sim::attach(AdcModel::new(2));
        Adc::initialize(Prescaler::Div6);
        Adc::set_channel(Channel::PinA1, SampleTime::Cycles55_5);
    }

    #[test]
    fn test_initialize_configures_software_trigger() {
        setup();
        assert!(sim::peek(rcc::APB2ENR) & rcc::ADC1EN != 0);
        assert_eq!(sim::peek(rcc::CFGR), 0b10 << 14);
        assert_eq!(
            sim::peek(adc::CR2),
            adc::ADON | adc::EXTTRIG | adc::EXTSEL_SWSTART
        );
        assert_eq!(Prescaler::Div6.adc_clock_hz(), 12_000_000);
        // Nothing started yet
        assert!(!Adc::is_conversion_finished());
        assert!(!Adc::is_conversion_finished());
    }

    #[test]
    fn test_reinitialize_does_not_start_conversion() {
        setup();
        let writes = sim::writes_to(adc::CR2).len();
        Adc::initialize(Prescaler::Div8);
        Adc::enable_free_running_mode();
        Adc::enable_free_running_mode();

        assert_eq!(sim::writes_to(adc::CR2).len(), writes + 1);
        for _ in 0..4 {
            assert!(!Adc::is_conversion_finished());
        }
        assert_eq!(sim::peek(rcc::CFGR), 0b11 << 14);
    }

    #[test]
    fn test_set_channel() {
        setup();
        assert_eq!(sim::peek(adc::SQR3), 1);
        assert_eq!(sim::peek(adc::SMPR2), 5 << 3);
        assert_eq!(sim::peek(gpio::BASE + gpio::CRL), 0);

        Adc::set_channel(Channel::TemperatureSensor, SampleTime::Cycles239_5);
        assert_eq!(sim::peek(adc::SQR3), 16);
        assert_eq!(sim::peek(adc::SMPR1), 7 << 18);
    }

    #[test]
    fn test_single_conversion() {
        setup();
        Adc::start_conversion();
        assert!(!Adc::is_conversion_finished());
        assert_eq!(Adc::get_value(), FIRST_SAMPLE);
        assert!(!Adc::is_conversion_finished());
    }

    #[test]
    fn test_restart_discards_unread_result() {
        setup();
        Adc::start_conversion();
        while !Adc::is_conversion_finished() {}

        Adc::start_conversion();
        assert!(!Adc::is_conversion_finished());
        assert_eq!(Adc::get_value(), FIRST_SAMPLE + SAMPLE_STEP);
    }

    #[test]
    fn test_free_running_yields_fresh_samples() {
        setup();
        Adc::enable_free_running_mode();
        Adc::start_conversion();

        let first = Adc::get_value();
        let second = Adc::get_value();
        let third = Adc::get_value();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_calibrate_and_internal_channels() {
        setup();
        Adc::calibrate();
        assert_eq!(sim::peek(adc::CR2) & (adc::CAL | adc::RSTCAL), 0);

        Adc::enable_temperature_ref_measurement();
        assert!(sim::peek(adc::CR2) & adc::TSVREFE != 0);
        Adc::disable_temperature_ref_measurement();
        assert_eq!(sim::peek(adc::CR2) & adc::TSVREFE, 0);
    }

    #[test]
    fn test_end_of_conversion_flag_recurs() {
        setup();
        let flag = AdcInterrupt::EndOfConversionRegular;
        for _ in 0..2 {
            Adc::start_conversion();
            while !Adc::is_conversion_finished() {}
            assert!(Adc::get_interrupt_flag(flag));
            assert!(Adc::get_interrupt_flag(flag));
            Adc::acknowledge_interrupt_flag(flag);
            assert!(!Adc::get_interrupt_flag(flag));
        }
    }

    #[test]
    fn test_flags_and_interrupt_routing() {
        setup();
        sim::raise(adc::SR, adc::JEOC);
        let flag = AdcInterrupt::EndOfConversionInjected;
        assert!(Adc::get_interrupt_flag(flag));
        assert!(Adc::get_interrupt_flag(flag));
        Adc::acknowledge_interrupt_flag(flag);
        assert!(!Adc::get_interrupt_flag(flag));

        Adc::enable_interrupt(AdcInterrupt::AnalogWatchdog, 1);
        assert_eq!(sim::writes_to(NVIC_ISER), [1 << 18]);
        assert_eq!(sim::peek(adc::CR1), adc::AWDIE);
        Adc::disable_interrupt(AdcInterrupt::AnalogWatchdog);
        assert_eq!(sim::writes_to(NVIC_ICER), [1 << 18]);
    }

    #[test]
    fn test_left_adjust_and_shutdown() {
        setup();
        Adc::set_left_adjust_result(true);
        assert!(sim::peek(adc::CR2) & adc::ALIGN != 0);
        Adc::shutdown();
        assert_eq!(sim::peek(adc::CR2) & adc::ADON, 0);
        assert_eq!(sim::peek(rcc::APB2ENR) & rcc::ADC1EN, 0);
    }
}
