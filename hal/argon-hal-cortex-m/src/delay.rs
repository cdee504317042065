//! Busy-wait delay
//!
//! Device drivers take delays through `embedded_hal::delay::DelayNs`, so
//! tests can pass a recording mock and firmware can pass a timer-backed
//! delay. [`CycleDelay`] is the fallback that needs no timer at all.

use embedded_hal::delay::DelayNs;

/// Delay that spins the core for a computed number of cycles
///
/// `CORE_HZ` is the core clock frequency. Delays are rounded up, never down,
/// and are lengthened by interrupts that fire while spinning.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleDelay<const CORE_HZ: u32>;

impl<const CORE_HZ: u32> CycleDelay<CORE_HZ> {
    /// Create a new delay provider
    pub const fn new() -> Self {
        Self
    }

    /// Core cycles needed to wait at least `ns` nanoseconds
    pub const fn cycles_for_ns(ns: u32) -> u32 {
        let cycles = (ns as u64 * CORE_HZ as u64).div_ceil(1_000_000_000);
        if cycles > u32::MAX as u64 {
            u32::MAX
        } else {
            cycles as u32
        }
    }
}

impl<const CORE_HZ: u32> DelayNs for CycleDelay<CORE_HZ> {
    #[inline]
    fn delay_ns(&mut self, ns: u32) {
        cortex_m::asm::delay(Self::cycles_for_ns(ns));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_round_up() {
        type Delay72 = CycleDelay<72_000_000>;
        assert_eq!(Delay72::cycles_for_ns(0), 0);
        assert_eq!(Delay72::cycles_for_ns(1_000), 72);
        // 1 ns at 72 MHz is 0.072 cycles, rounded up
        assert_eq!(Delay72::cycles_for_ns(1), 1);
        assert_eq!(CycleDelay::<168_000_000>::cycles_for_ns(u32::MAX), 721_554_506);
    }
}
