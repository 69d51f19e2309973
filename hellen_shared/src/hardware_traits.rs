// Trait-based interfaces for the board hardware capabilities (shared)

use thiserror::Error;

use crate::gpio::Gpio;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HalError {
    #[error("pin {0} is already claimed by another driver")]
    Busy(Gpio),
    #[error("pin {0} is not routable on this board")]
    InvalidPin(Gpio),
    #[error("hardware fault: {0}")]
    Fault(String),
}

/// Digital output acquisition and writes.
///
/// Handles are owned by whoever acquired them; nothing else may drive the
/// same physical pin afterwards.
pub trait PinProvider {
    type Handle;

    fn acquire(&mut self, pin: Gpio, label: &'static str) -> Result<Self::Handle, HalError>;
    fn write_digital(&mut self, handle: &mut Self::Handle, value: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
    Both,
}

/// Wake-from-stop line events.
pub trait WakeSource {
    fn enable_line_event(&mut self, pin: Gpio, edge: Edge) -> Result<(), HalError>;
}

/// Detected hardware revision, readable before board init.
pub trait RevisionSource {
    /// Revision code as reported by the board id detection, `None` if undetected.
    fn revision_code(&self) -> Option<String>;
}
