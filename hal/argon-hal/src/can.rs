//! CAN bus contract

use heapless::Vec;

use crate::Peripheral;

/// Maximum payload of a classic CAN frame
pub const MAX_DATA_LENGTH: usize = 8;

/// CAN status conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CanInterrupt {
    /// A frame is waiting in a receive mailbox
    MessagePending,
    /// A transmit mailbox became free
    TransmitMailboxEmpty,
    /// A receive FIFO overflowed and a frame was lost
    Overrun,
    /// The controller entered bus-off
    BusOff,
}

/// Frame identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CanId {
    /// 11-bit base identifier
    Standard(u16),
    /// 29-bit extended identifier
    Extended(u32),
}

impl CanId {
    /// Build a standard identifier, rejecting values wider than 11 bits
    pub fn standard(id: u16) -> Option<Self> {
        (id <= 0x7FF).then_some(CanId::Standard(id))
    }

    /// Build an extended identifier, rejecting values wider than 29 bits
    pub fn extended(id: u32) -> Option<Self> {
        (id <= 0x1FFF_FFFF).then_some(CanId::Extended(id))
    }
}

/// One CAN frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CanMessage {
    /// Frame identifier
    pub id: CanId,
    /// Remote transmission request (no payload)
    pub remote: bool,
    /// Payload (0-8 bytes)
    pub data: Vec<u8, MAX_DATA_LENGTH>,
}

impl CanMessage {
    /// Data frame with the given payload
    ///
    /// Returns `None` if `data` is longer than eight bytes.
    pub fn new(id: CanId, data: &[u8]) -> Option<Self> {
        Some(Self {
            id,
            remote: false,
            data: Vec::from_slice(data).ok()?,
        })
    }

    /// Remote frame without payload
    pub fn remote(id: CanId) -> Self {
        Self {
            id,
            remote: true,
            data: Vec::new(),
        }
    }

    /// Data length code
    pub fn length(&self) -> u8 {
        self.data.len() as u8
    }
}

/// CAN controller
///
/// # Preconditions
///
/// [`Can::initialize`] must run first.
pub trait Can: Peripheral<Interrupt = CanInterrupt> {
    /// Leave sleep mode and join the bus at `bitrate` bits per second
    fn initialize(bitrate: u32);

    /// Check whether a received frame is waiting
    fn is_message_available() -> bool;

    /// Take the oldest received frame
    ///
    /// Non-blocking; `None` if nothing is waiting.
    fn get_message() -> Option<CanMessage>;

    /// Check whether a transmit mailbox is free
    fn is_ready_to_send() -> bool;

    /// Queue a frame for transmission
    ///
    /// Non-blocking. Returns `false` if every mailbox is busy.
    fn send_message(message: &CanMessage) -> bool;
}
