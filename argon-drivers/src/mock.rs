//! Recording peripherals for driver tests
//!
//! Every operation appends an [`Event`] to a thread-local log, so a test
//! can assert the exact bus traffic a driver produced.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::vec::Vec;

use argon_hal::gpio::{GpioOutput, GpioPort};
use argon_hal::MemoryInterface;
use embedded_hal::delay::DelayNs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    PinOutput(char),
    Pin(char, bool),
    PortOutput,
    PortInput,
    PortWrite(u16),
    PortRead(u16),
    MemoryInit,
    Register(u16),
    Data(u16),
    Delay(u32),
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    pins: BTreeMap<char, bool>,
    port_input: u16,
}

std::thread_local! {
    static STATE: RefCell<State> = RefCell::new(State::default());
}

fn record(event: Event) {
    STATE.with(|state| state.borrow_mut().events.push(event));
}

pub fn reset() {
    STATE.with(|state| *state.borrow_mut() = State::default());
}

/// Drain the event log
pub fn take() -> Vec<Event> {
    STATE.with(|state| core::mem::take(&mut state.borrow_mut().events))
}

/// Value the mock port returns on the next reads
pub fn set_port_input(value: u16) {
    STATE.with(|state| state.borrow_mut().port_input = value);
}

pub struct MockPin<const ID: char>;

impl<const ID: char> GpioOutput for MockPin<ID> {
    fn set_output() {
        record(Event::PinOutput(ID));
    }

    fn set_high() {
        STATE.with(|state| state.borrow_mut().pins.insert(ID, true));
        record(Event::Pin(ID, true));
    }

    fn set_low() {
        STATE.with(|state| state.borrow_mut().pins.insert(ID, false));
        record(Event::Pin(ID, false));
    }

    fn is_set_high() -> bool {
        STATE.with(|state| state.borrow().pins.get(&ID).copied().unwrap_or(false))
    }
}

pub struct MockPort;

impl GpioPort for MockPort {
    fn set_output() {
        record(Event::PortOutput);
    }

    fn set_input() {
        record(Event::PortInput);
    }

    fn write(data: u16) {
        record(Event::PortWrite(data));
    }

    fn read() -> u16 {
        let value = STATE.with(|state| state.borrow().port_input);
        record(Event::PortRead(value));
        value
    }
}

pub struct MockMemory;

impl MemoryInterface for MockMemory {
    fn initialize() {
        record(Event::MemoryInit);
    }

    fn write_register(index: u16) {
        record(Event::Register(index));
    }

    fn write_data(data: u16) {
        record(Event::Data(data));
    }

    fn read_data() -> u16 {
        0
    }
}

pub struct MockDelay;

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        record(Event::Delay(ns));
    }
}
