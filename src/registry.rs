//! Pin resource registry for the board's switchable pull resistors.
//!
//! The registry owns one slot per [`PinRole`]. A slot is bound to its physical
//! pin exactly once during hardware init; afterwards only the logical value
//! changes. Slots live as long as the registry, which in firmware is the
//! whole process.

use std::fmt;

use hellen_shared::Gpio;
use hellen_shared::hardware_traits::PinProvider;

use crate::error::BoardError;

/// Logical identity of a board pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PinRole {
    TachPullUp,
    TempPullUp,
    CrankPPullUp,
    CrankNPullUp,
    TwoStepPullDown,
    CamVrPullUp,
    D2PullDown,
    CamPullDown,
    D3PullDown,
    D4PullDown,
    D5PullDown,
}

impl PinRole {
    pub const COUNT: usize = 11;

    /// Every role, in bring-up order.
    pub const ALL: [PinRole; PinRole::COUNT] = [
        PinRole::TachPullUp,
        PinRole::TempPullUp,
        PinRole::CrankPPullUp,
        PinRole::CrankNPullUp,
        PinRole::TwoStepPullDown,
        PinRole::CamVrPullUp,
        PinRole::D2PullDown,
        PinRole::CamPullDown,
        PinRole::D3PullDown,
        PinRole::D4PullDown,
        PinRole::D5PullDown,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Short label handed to the pin provider, shown in pin diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            PinRole::TachPullUp => "a-tach",
            PinRole::TempPullUp => "a-temp",
            PinRole::CrankPPullUp => "a-crank-p",
            PinRole::CrankNPullUp => "a-crank-n",
            PinRole::TwoStepPullDown => "a-2step",
            PinRole::CamVrPullUp => "a-cam-vr",
            PinRole::D2PullDown => "a-d2",
            PinRole::CamPullDown => "a-cam",
            PinRole::D3PullDown => "a-d3",
            PinRole::D4PullDown => "a-d4",
            PinRole::D5PullDown => "a-d5",
        }
    }

    pub fn from_label(label: &str) -> Option<PinRole> {
        PinRole::ALL.into_iter().find(|role| role.label() == label)
    }
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One role bound to its physical pin and hardware handle.
#[derive(Debug)]
pub struct PinResource<H> {
    role: PinRole,
    pin: Gpio,
    /// `None` for unassigned pins, which never touch hardware.
    handle: Option<H>,
    value: Option<bool>,
}

impl<H> PinResource<H> {
    pub fn role(&self) -> PinRole {
        self.role
    }

    pub fn pin(&self) -> Gpio {
        self.pin
    }

    /// Last value set, `None` until the first write.
    pub fn value(&self) -> Option<bool> {
        self.value
    }
}

/// Fixed table of pin resources addressed by role.
pub struct PinRegistry<P: PinProvider> {
    provider: P,
    slots: [Option<PinResource<P::Handle>>; PinRole::COUNT],
}

impl<P: PinProvider> PinRegistry<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Binds `role` to `pin` and acquires the hardware handle.
    ///
    /// Unassigned pins are recorded without calling the provider. Failing to
    /// acquire an assigned pin is fatal for bring-up.
    pub fn initialize(&mut self, role: PinRole, pin: Gpio) -> Result<(), BoardError> {
        let slot = &mut self.slots[role.index()];
        if slot.is_some() {
            return Err(BoardError::AlreadyInitialized { role });
        }

        let handle = if pin.is_assigned() {
            let handle = self.provider.acquire(pin, role.label()).map_err(|source| {
                tracing::error!("Cannot acquire {} for {}: {}", pin, role, source);
                BoardError::PinUnavailable { role, pin, source }
            })?;
            tracing::debug!("Initialized {} on {}", role, pin);
            Some(handle)
        } else {
            tracing::debug!("{} left unassigned", role);
            None
        };

        *slot = Some(PinResource {
            role,
            pin,
            handle,
            value: None,
        });
        Ok(())
    }

    /// Drives an initialized pin. Repeating the current value is harmless.
    ///
    /// Returns `false` when the role has not been initialized; nothing is
    /// written in that case.
    pub fn set_value(&mut self, role: PinRole, value: bool) -> bool {
        let Some(resource) = self.slots[role.index()].as_mut() else {
            tracing::warn!("Ignoring write to uninitialized pin role {}", role);
            return false;
        };
        if let Some(handle) = resource.handle.as_mut() {
            self.provider.write_digital(handle, value);
        }
        resource.value = Some(value);
        true
    }

    pub fn get(&self, role: PinRole) -> Option<&PinResource<P::Handle>> {
        self.slots[role.index()].as_ref()
    }

    pub fn is_initialized(&self, role: PinRole) -> bool {
        self.slots[role.index()].is_some()
    }

    pub fn all_initialized(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn value(&self, role: PinRole) -> Option<bool> {
        self.get(role).and_then(PinResource::value)
    }

    pub fn physical_pin(&self, role: PinRole) -> Option<Gpio> {
        self.get(role).map(PinResource::pin)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}
