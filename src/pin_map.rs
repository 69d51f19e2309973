//! Static pin tables for the alphax-4chan.

use hellen_shared::Gpio;

use crate::registry::PinRole;
use crate::revision::RevisionBand;

/// Physical routing of one pull resistor role per revision band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullResistorPin {
    pub role: PinRole,
    pub legacy: Gpio,
    pub mega_module: Gpio,
}

impl PullResistorPin {
    pub fn pin_for(&self, band: RevisionBand) -> Gpio {
        match band {
            RevisionBand::Legacy => self.legacy,
            RevisionBand::MegaModule => self.mega_module,
        }
    }

    pub fn is_revision_dependent(&self) -> bool {
        self.legacy != self.mega_module
    }
}

const fn fixed(role: PinRole, pin: Gpio) -> PullResistorPin {
    PullResistorPin {
        role,
        legacy: pin,
        mega_module: pin,
    }
}

/// Indexed by [`PinRole::index`].
pub static PULL_RESISTOR_PINS: [PullResistorPin; PinRole::COUNT] = [
    fixed(PinRole::TachPullUp, Gpio::H144_OUT_IO1),
    fixed(PinRole::TempPullUp, Gpio::H144_OUT_IO4),
    fixed(PinRole::CrankPPullUp, Gpio::H144_OUT_IO2),
    fixed(PinRole::CrankNPullUp, Gpio::H144_OUT_IO5),
    fixed(PinRole::TwoStepPullDown, Gpio::H144_OUT_IO7),
    fixed(PinRole::CamVrPullUp, Gpio::H144_OUT_IO9),
    PullResistorPin {
        role: PinRole::D2PullDown,
        legacy: Gpio::H144_LS_5,
        mega_module: Gpio::H144_OUT_IO13,
    },
    PullResistorPin {
        role: PinRole::CamPullDown,
        legacy: Gpio::H144_OUT_IO8,
        mega_module: Gpio::H144_GP4,
    },
    PullResistorPin {
        role: PinRole::D3PullDown,
        legacy: Gpio::H144_LS_6,
        mega_module: Gpio::H144_OUT_IO8,
    },
    fixed(PinRole::D4PullDown, Gpio::H144_LS_7),
    fixed(PinRole::D5PullDown, Gpio::H144_LS_8),
];

pub fn pull_resistor_pin(role: PinRole, band: RevisionBand) -> Gpio {
    PULL_RESISTOR_PINS[role.index()].pin_for(band)
}

/// Outputs reported to diagnostic tooling: the four injectors and both VVT
/// solenoids.
static META_OUTPUTS: [Gpio; 6] = [
    Gpio::H144_LS_1,
    Gpio::H144_LS_2,
    Gpio::H144_LS_3,
    Gpio::H144_LS_4,
    // vvt1
    Gpio::H144_IGN_7,
    // vvt2
    Gpio::H144_IGN_8,
];

pub fn board_meta_outputs() -> &'static [Gpio] {
    &META_OUTPUTS
}

pub fn board_meta_outputs_count() -> usize {
    META_OUTPUTS.len()
}
