//! Analog-to-digital converter contract
//!
//! An ADC unit walks a small state machine. None of the states are tracked
//! in software; the caller is responsible for traversing it in order.
//!
//! ```text
//!                initialize()          set_channel()
//! Uninitialized ─────────────▶ Ready ───────────────▶ ChannelArmed
//!                                                       │      ▲
//!                                    start_conversion() │      │ set_channel()
//!                                                       ▼      │
//!                     get_value()                              │
//!          Converting ────────────────────────────▶ ResultReady
//!              ▲  (blocks until is_conversion_finished)   │
//!              └──────────── start_conversion() ──────────┘
//! ```
//!
//! In free-running mode the hardware restarts sampling itself each time a
//! conversion completes, and [`get_value`](AnalogDigitalConverter::get_value)
//! returns the most recent sample.
//!
//! # Preconditions
//!
//! * [`initialize`](AnalogDigitalConverter::initialize) before anything else.
//! * [`set_channel`](AnalogDigitalConverter::set_channel) before the first
//!   [`start_conversion`](AnalogDigitalConverter::start_conversion).
//! * [`start_conversion`](AnalogDigitalConverter::start_conversion) (or
//!   free-running mode) before [`get_value`](AnalogDigitalConverter::get_value),
//!   otherwise it never returns.
//!
//! Violations are undefined at the hardware level and are not detected.
//! There is no cancellation: a running conversion can only be ignored.

use crate::interrupt::Priority;
use crate::Peripheral;

/// Analog-to-digital converter unit
pub trait AnalogDigitalConverter: Peripheral {
    /// Input selection
    type Channel: Copy;
    /// Analog clock divider
    type Prescaler: Copy;
    /// Sampling duration
    type SampleTime: Copy;

    /// Enable the clock, power the analog core and apply `prescaler`
    ///
    /// `Uninitialized → Ready`. Re-initializing is allowed but must not
    /// overlap a running conversion.
    fn initialize(prescaler: Self::Prescaler);

    /// Power the analog core down and gate its clock
    fn shutdown();

    /// Change the analog clock divider
    fn set_prescaler(prescaler: Self::Prescaler);

    /// Select the single channel to convert and its sample time
    ///
    /// Also switches the channel's pin to analog mode. Replaces any
    /// previously selected channel. `Ready | ResultReady → ChannelArmed`.
    fn set_channel(channel: Self::Channel, sample_time: Self::SampleTime);

    /// Clear stale status flags and start a conversion
    ///
    /// `ChannelArmed | ResultReady → Converting`. Starting again before the
    /// previous result was read discards that result.
    fn start_conversion();

    /// Non-blocking check for a completed conversion
    fn is_conversion_finished() -> bool;

    /// Wait for the running conversion and return its result
    ///
    /// **Blocks** (busy-polls) until
    /// [`is_conversion_finished`](AnalogDigitalConverter::is_conversion_finished)
    /// reports `true`. There is no timeout.
    fn get_value() -> u16;

    /// Restart conversions automatically after each completion
    fn enable_free_running_mode();

    /// Stop after the current conversion
    fn disable_free_running_mode();

    /// Left-align (`true`) or right-align the result in the data register
    fn set_left_adjust_result(enable: bool);

    /// Route `interrupt` to the interrupt controller at `priority`
    fn enable_interrupt(interrupt: Self::Interrupt, priority: Priority);

    /// Stop routing `interrupt`
    fn disable_interrupt(interrupt: Self::Interrupt);
}
