//! Memory-mapped register backend

use argon_hal::RegisterAccess;
use voladdress::{Safe, VolAddress};

/// Volatile access to the device's peripheral address space
///
/// Every operation inlines to one `ldr`/`str`. Addresses come from the chip
/// family's register map constants; they are trusted to be valid, aligned
/// peripheral registers.
pub struct Mmio;

impl Mmio {
    #[inline(always)]
    #[allow(unsafe_code)]
    fn register(address: usize) -> VolAddress<u32, Safe, Safe> {
        debug_assert!(address != 0 && address % 4 == 0);
        // SAFETY: callers only pass addresses from the family register maps,
        // which are non-null, word aligned and valid for volatile access for
        // the whole program.
        unsafe { VolAddress::new(address) }
    }
}

impl RegisterAccess for Mmio {
    #[inline(always)]
    fn read(address: usize) -> u32 {
        Self::register(address).read()
    }

    #[inline(always)]
    fn write(address: usize, value: u32) {
        Self::register(address).write(value);
    }

    #[inline(always)]
    fn barrier() {
        cortex_m::asm::dsb();
        cortex_m::asm::isb();
    }
}
