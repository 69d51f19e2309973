//! Simulated board hardware for the CLI and tests.

use std::collections::{HashMap, HashSet};

use hellen_shared::Gpio;
use hellen_shared::hardware_traits::{Edge, HalError, PinProvider, WakeSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPin {
    pub pin: Gpio,
}

/// Pin provider that records every acquisition and write.
#[derive(Debug, Default)]
pub struct RecordingPinProvider {
    acquisitions: Vec<(Gpio, &'static str)>,
    writes: Vec<(Gpio, bool)>,
    levels: HashMap<Gpio, bool>,
    claimed: HashSet<Gpio>,
    failing: HashSet<Gpio>,
    wake_events: Vec<(Gpio, Edge)>,
}

impl RecordingPinProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every acquisition of `pin` fail as if another driver owned it.
    pub fn failing_on(mut self, pin: Gpio) -> Self {
        self.failing.insert(pin);
        self
    }

    pub fn acquisitions(&self) -> &[(Gpio, &'static str)] {
        &self.acquisitions
    }

    pub fn writes(&self) -> &[(Gpio, bool)] {
        &self.writes
    }

    pub fn wake_events(&self) -> &[(Gpio, Edge)] {
        &self.wake_events
    }

    /// Current output level of `pin`, `None` if never written.
    pub fn level(&self, pin: Gpio) -> Option<bool> {
        self.levels.get(&pin).copied()
    }

    /// Snapshot of every driven pin, for comparing hardware state.
    pub fn levels(&self) -> &HashMap<Gpio, bool> {
        &self.levels
    }
}

impl PinProvider for RecordingPinProvider {
    type Handle = SimPin;

    fn acquire(&mut self, pin: Gpio, label: &'static str) -> Result<SimPin, HalError> {
        if self.failing.contains(&pin) {
            return Err(HalError::Busy(pin));
        }
        if !pin.is_assigned() {
            return Err(HalError::InvalidPin(pin));
        }
        if !self.claimed.insert(pin) {
            return Err(HalError::Busy(pin));
        }
        tracing::trace!("acquire {} as {}", pin, label);
        self.acquisitions.push((pin, label));
        Ok(SimPin { pin })
    }

    fn write_digital(&mut self, handle: &mut SimPin, value: bool) {
        tracing::trace!("write {} = {}", handle.pin, value);
        self.writes.push((handle.pin, value));
        self.levels.insert(handle.pin, value);
    }
}

impl WakeSource for RecordingPinProvider {
    fn enable_line_event(&mut self, pin: Gpio, edge: Edge) -> Result<(), HalError> {
        if self.failing.contains(&pin) {
            return Err(HalError::Busy(pin));
        }
        self.wake_events.push((pin, edge));
        Ok(())
    }
}
