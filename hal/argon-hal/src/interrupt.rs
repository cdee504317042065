//! Interrupt controller contract
//!
//! Peripheral drivers need exactly two things from the interrupt
//! controller: route their vector at a priority, and stop routing it.
//! Vector table wiring (the handler functions themselves) is outside
//! this crate.

/// Interrupt vector number (position in the device vector table)
pub type IrqNumber = u16;

/// Interrupt priority; lower values preempt higher values
pub type Priority = u8;

/// Interrupt controller
pub trait InterruptController {
    /// Set the priority of `irq` and unmask it
    fn enable(irq: IrqNumber, priority: Priority);

    /// Mask `irq`
    ///
    /// When this returns, `irq` can no longer preempt the caller.
    fn disable(irq: IrqNumber);

    /// Check whether `irq` is currently unmasked
    fn is_enabled(irq: IrqNumber) -> bool;

    /// Check whether `irq` is waiting to be serviced
    fn is_pending(irq: IrqNumber) -> bool;
}
