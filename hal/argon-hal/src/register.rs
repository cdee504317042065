//! Generic register access
//!
//! Register-level peripherals are written against [`RegisterAccess`] rather
//! than raw pointers. On target the backend is a memory-mapped implementation
//! (`argon_hal_cortex_m::Mmio`), which inlines to a single volatile load or
//! store. On the host the backend is [`crate::sim::Simulated`].
//!
//! All registers are 32 bits wide and word aligned.

/// Register access backend
///
/// Implementations are zero-sized; every operation is an associated function.
pub trait RegisterAccess {
    /// Read the register at `address`
    fn read(address: usize) -> u32;

    /// Write `value` to the register at `address`
    fn write(address: usize, value: u32);

    /// Read-modify-write the register at `address`
    ///
    /// Not atomic with respect to interrupts.
    #[inline(always)]
    fn modify(address: usize, f: impl FnOnce(u32) -> u32) {
        Self::write(address, f(Self::read(address)));
    }

    /// Set the bits in `mask`
    #[inline(always)]
    fn set_bits(address: usize, mask: u32) {
        Self::modify(address, |value| value | mask);
    }

    /// Clear the bits in `mask`
    #[inline(always)]
    fn clear_bits(address: usize, mask: u32) {
        Self::modify(address, |value| value & !mask);
    }

    /// Replace the `width`-bit field at `shift` with `field`
    #[inline(always)]
    fn write_field(address: usize, shift: u32, width: u32, field: u32) {
        let mask = field_mask(width) << shift;
        Self::modify(address, |value| (value & !mask) | ((field << shift) & mask));
    }

    /// Check whether any bit in `mask` is set
    #[inline(always)]
    fn is_set(address: usize, mask: u32) -> bool {
        Self::read(address) & mask != 0
    }

    /// Complete all outstanding memory accesses before continuing
    ///
    /// Required after masking an interrupt so that it cannot fire on the
    /// following instruction.
    #[inline(always)]
    fn barrier() {}
}

/// Mask covering the low `width` bits
#[inline(always)]
pub const fn field_mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}

/// Bit mask with only bit `n` set
#[inline(always)]
pub const fn bit(n: u32) -> u32 {
    1 << n
}
