//! Host-side register simulator
//!
//! [`Simulated`] is a [`RegisterAccess`] backend backed by a thread-local
//! register file, so register-level drivers can be exercised with
//! `cargo test` on the host. Every test thread gets its own bus.
//!
//! Plain registers simply remember what was written. Hardware behaviour
//! (status bits that clear on write-zero, conversions that complete after
//! a few polls, ...) is added by attaching a [`Model`] that claims a set of
//! addresses.
//!
//! ```ignore
//! sim::reset();
//! sim::attach(MyAdcModel::default());
//! Adc1::<Simulated>::initialize(Prescaler::Div2);
//! assert!(sim::peek(ADC_CR2) & ADON != 0);
//! ```

use std::boxed::Box;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::vec::Vec;

use crate::register::RegisterAccess;

/// Behavioural model for a simulated peripheral
pub trait Model {
    /// Whether this model owns the register at `address`
    fn handles(&self, address: usize) -> bool;

    /// Called before the register at `address` is read
    fn on_read(&mut self, registers: &mut RegisterFile, address: usize) {
        let _ = (registers, address);
    }

    /// Called when `value` is written to `address`
    ///
    /// Returns the value actually latched by the register. `previous` is the
    /// value held before the write.
    fn on_write(
        &mut self,
        registers: &mut RegisterFile,
        address: usize,
        previous: u32,
        value: u32,
    ) -> u32 {
        let _ = (registers, address, previous);
        value
    }
}

/// Raw register storage; unwritten registers read as zero
#[derive(Debug, Default)]
pub struct RegisterFile {
    values: BTreeMap<usize, u32>,
}

impl RegisterFile {
    /// Current value of a register
    pub fn get(&self, address: usize) -> u32 {
        self.values.get(&address).copied().unwrap_or(0)
    }

    /// Overwrite a register
    pub fn set(&mut self, address: usize, value: u32) {
        self.values.insert(address, value);
    }

    /// Set bits in a register
    pub fn set_bits(&mut self, address: usize, mask: u32) {
        let value = self.get(address) | mask;
        self.set(address, value);
    }

    /// Clear bits in a register
    pub fn clear_bits(&mut self, address: usize, mask: u32) {
        let value = self.get(address) & !mask;
        self.set(address, value);
    }

    /// Whether any bit of `mask` is set
    pub fn is_set(&self, address: usize, mask: u32) -> bool {
        self.get(address) & mask != 0
    }
}

/// One access made through [`Simulated`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Register read and the value returned
    Read(usize, u32),
    /// Register write and the value requested by the driver
    Write(usize, u32),
    /// Memory barrier
    Barrier,
}

#[derive(Default)]
struct Bus {
    registers: RegisterFile,
    models: Vec<Box<dyn Model>>,
    log: Vec<Access>,
}

impl Bus {
    fn read(&mut self, address: usize) -> u32 {
        let Bus {
            registers,
            models,
            log,
        } = self;
        if let Some(model) = models.iter_mut().find(|m| m.handles(address)) {
            model.on_read(registers, address);
        }
        let value = registers.get(address);
        log.push(Access::Read(address, value));
        value
    }

    fn write(&mut self, address: usize, value: u32) {
        let Bus {
            registers,
            models,
            log,
        } = self;
        log.push(Access::Write(address, value));
        let previous = registers.get(address);
        let latched = match models.iter_mut().find(|m| m.handles(address)) {
            Some(model) => model.on_write(registers, address, previous, value),
            None => value,
        };
        registers.set(address, latched);
    }
}

std::thread_local! {
    static BUS: RefCell<Bus> = RefCell::new(Bus::default());
}

/// Simulated register backend
pub struct Simulated;

impl RegisterAccess for Simulated {
    fn read(address: usize) -> u32 {
        BUS.with(|bus| bus.borrow_mut().read(address))
    }

    fn write(address: usize, value: u32) {
        BUS.with(|bus| bus.borrow_mut().write(address, value));
    }

    fn barrier() {
        BUS.with(|bus| bus.borrow_mut().log.push(Access::Barrier));
    }
}

/// Drop all registers, models and the access log for this thread
pub fn reset() {
    BUS.with(|bus| *bus.borrow_mut() = Bus::default());
}

/// Attach a behavioural model
///
/// When two models claim the same address, the first attached wins.
pub fn attach(model: impl Model + 'static) {
    BUS.with(|bus| bus.borrow_mut().models.push(Box::new(model)));
}

/// Read a register without triggering models or logging
pub fn peek(address: usize) -> u32 {
    BUS.with(|bus| bus.borrow().registers.get(address))
}

/// Write a register without triggering models or logging
///
/// Used by tests to inject hardware conditions.
pub fn poke(address: usize, value: u32) {
    BUS.with(|bus| bus.borrow_mut().registers.set(address, value));
}

/// Set bits without triggering models or logging
pub fn raise(address: usize, mask: u32) {
    BUS.with(|bus| bus.borrow_mut().registers.set_bits(address, mask));
}

/// Every access made so far, oldest first
pub fn accesses() -> Vec<Access> {
    BUS.with(|bus| bus.borrow().log.clone())
}

/// Forget the access log but keep register contents and models
pub fn clear_log() {
    BUS.with(|bus| bus.borrow_mut().log.clear());
}

/// Values written to `address`, oldest first
pub fn writes_to(address: usize) -> Vec<u32> {
    accesses()
        .into_iter()
        .filter_map(|access| match access {
            Access::Write(a, value) if a == address => Some(value),
            _ => None,
        })
        .collect()
}

/// Number of reads of `address`
pub fn reads_of(address: usize) -> usize {
    accesses()
        .into_iter()
        .filter(|access| matches!(access, Access::Read(a, _) if *a == address))
        .count()
}
