//! Nested Vectored Interrupt Controller

use core::marker::PhantomData;

use argon_hal::interrupt::{InterruptController, IrqNumber, Priority};
use argon_hal::register::field_mask;
use argon_hal::RegisterAccess;

use crate::Mmio;

/// Interrupt set-enable registers
pub const NVIC_ISER: usize = 0xE000_E100;
/// Interrupt clear-enable registers
pub const NVIC_ICER: usize = 0xE000_E180;
/// Interrupt set-pending registers
pub const NVIC_ISPR: usize = 0xE000_E200;
/// Interrupt priority registers (one byte per vector)
pub const NVIC_IPR: usize = 0xE000_E400;

/// NVIC binding
///
/// `PRIORITY_BITS` is the number of implemented priority bits (4 on
/// STM32F1/F4). Only the low `PRIORITY_BITS` bits of a priority are used;
/// they land in the top bits of the vector's priority byte, so at most 8
/// bits can be implemented:
///
/// ```compile_fail
/// use argon_hal_cortex_m::{Mmio, Nvic};
///
/// let _ = const { Nvic::<Mmio, 9>::encode_priority(1) };
/// ```
pub struct Nvic<A = Mmio, const PRIORITY_BITS: u8 = 4> {
    _registers: PhantomData<A>,
}

impl<A: RegisterAccess, const PRIORITY_BITS: u8> Nvic<A, PRIORITY_BITS> {
    const PRIORITY_BITS_FIT: () = assert!(
        PRIORITY_BITS <= 8,
        "NVIC priority bits must fit in the 8-bit priority field"
    );

    /// Number of distinct priority levels
    pub const LEVELS: u16 = {
        let () = Self::PRIORITY_BITS_FIT;
        1 << PRIORITY_BITS
    };

    /// Word holding the enable/pending bit of `irq`, and the bit itself
    const fn bit_position(base: usize, irq: IrqNumber) -> (usize, u32) {
        let word = (irq / 32) as usize;
        (base + word * 4, 1 << (irq % 32))
    }

    /// Priority byte encoding for `priority`
    pub const fn encode_priority(priority: Priority) -> u32 {
        let () = Self::PRIORITY_BITS_FIT;
        let levels = field_mask(PRIORITY_BITS as u32);
        ((priority as u32 & levels) << (8 - PRIORITY_BITS as u32)) & 0xFF
    }

    /// Set the priority of `irq` without changing its enable state
    pub fn set_priority(irq: IrqNumber, priority: Priority) {
        let address = NVIC_IPR + (irq / 4) as usize * 4;
        let shift = (irq % 4) as u32 * 8;
        A::write_field(address, shift, 8, Self::encode_priority(priority));
    }

    /// Current priority of `irq`
    pub fn priority(irq: IrqNumber) -> Priority {
        let () = Self::PRIORITY_BITS_FIT;
        let address = NVIC_IPR + (irq / 4) as usize * 4;
        let shift = (irq % 4) as u32 * 8;
        let byte = (A::read(address) >> shift) & 0xFF;
        (byte >> (8 - PRIORITY_BITS as u32)) as Priority
    }
}

impl<A: RegisterAccess, const PRIORITY_BITS: u8> InterruptController for Nvic<A, PRIORITY_BITS> {
    fn enable(irq: IrqNumber, priority: Priority) {
        Self::set_priority(irq, priority);
        // ISER is write-one-to-set; zeros are ignored
        let (address, mask) = Self::bit_position(NVIC_ISER, irq);
        A::write(address, mask);

        #[cfg(feature = "defmt")]
        defmt::trace!("NVIC: enable irq {} at priority {}", irq, priority);
    }

    fn disable(irq: IrqNumber) {
        let (address, mask) = Self::bit_position(NVIC_ICER, irq);
        A::write(address, mask);
        A::barrier();

        #[cfg(feature = "defmt")]
        defmt::trace!("NVIC: disable irq {}", irq);
    }

    fn is_enabled(irq: IrqNumber) -> bool {
        let (address, mask) = Self::bit_position(NVIC_ISER, irq);
        A::is_set(address, mask)
    }

    fn is_pending(irq: IrqNumber) -> bool {
        let (address, mask) = Self::bit_position(NVIC_ISPR, irq);
        A::is_set(address, mask)
    }
}

/// Simulated NVIC: ISER/ICER share the enable state like the real hardware
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use argon_hal::sim::{Model, RegisterFile};

    pub struct NvicModel;

    impl Model for NvicModel {
        fn handles(&self, address: usize) -> bool {
            (NVIC_ISER..NVIC_ISER + 0x20).contains(&address)
                || (NVIC_ICER..NVIC_ICER + 0x20).contains(&address)
        }

        fn on_write(
            &mut self,
            registers: &mut RegisterFile,
            address: usize,
            previous: u32,
            value: u32,
        ) -> u32 {
            if address >= NVIC_ICER {
                let enable = address - NVIC_ICER + NVIC_ISER;
                registers.clear_bits(enable, value);
                0
            } else {
                previous | value
            }
        }
    }
}
