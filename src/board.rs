//! Board bring-up and configuration apply.
//!
//! A [`Board`] is built once at startup from a pin provider and the detected
//! revision. [`Board::init_hardware`] consumes it, binds every pull resistor
//! role and returns an [`InitializedBoard`]; only that type can apply
//! configuration changes, so apply-before-init cannot be expressed.

use hellen_shared::hardware_traits::{Edge, HalError, PinProvider, WakeSource};
use hellen_shared::{EngineConfiguration, Gpio};

use crate::error::BoardError;
use crate::pin_map::PULL_RESISTOR_PINS;
use crate::registry::{PinRegistry, PinRole};
use crate::revision::BoardRevision;

/// Line armed to wake the MCU from stop mode.
pub const WAKE_LINE: Gpio = Gpio::H_CAN_RX;

/// Configuration flag controlling `role`.
pub fn requested_state(role: PinRole, config: &EngineConfiguration) -> bool {
    match role {
        PinRole::TachPullUp => config.board_use_tach_pull_up,
        PinRole::TempPullUp => config.board_use_temp_pull_up,
        // both crank legs share one switch
        PinRole::CrankPPullUp | PinRole::CrankNPullUp => config.board_use_crank_pull_up,
        PinRole::TwoStepPullDown => config.board_use_2step_pull_down,
        PinRole::CamPullDown => config.board_use_cam_pull_down,
        PinRole::CamVrPullUp => config.board_use_cam_vr_pull_up,
        PinRole::D2PullDown => config.board_use_d2_pull_down,
        PinRole::D3PullDown => config.board_use_d3_pull_down,
        PinRole::D4PullDown => config.board_use_d4_pull_down,
        PinRole::D5PullDown => config.board_use_d5_pull_down,
    }
}

/// Sets the configuration flag controlling `role`.
pub fn set_requested_state(role: PinRole, config: &mut EngineConfiguration, value: bool) {
    let flag = match role {
        PinRole::TachPullUp => &mut config.board_use_tach_pull_up,
        PinRole::TempPullUp => &mut config.board_use_temp_pull_up,
        PinRole::CrankPPullUp | PinRole::CrankNPullUp => &mut config.board_use_crank_pull_up,
        PinRole::TwoStepPullDown => &mut config.board_use_2step_pull_down,
        PinRole::CamPullDown => &mut config.board_use_cam_pull_down,
        PinRole::CamVrPullUp => &mut config.board_use_cam_vr_pull_up,
        PinRole::D2PullDown => &mut config.board_use_d2_pull_down,
        PinRole::D3PullDown => &mut config.board_use_d3_pull_down,
        PinRole::D4PullDown => &mut config.board_use_d4_pull_down,
        PinRole::D5PullDown => &mut config.board_use_d5_pull_down,
    };
    *flag = value;
}

pub struct Board<P: PinProvider> {
    registry: PinRegistry<P>,
    revision: BoardRevision,
}

impl<P: PinProvider> Board<P> {
    /// The revision must already be known; it selects the physical routing.
    pub fn new(provider: P, revision: BoardRevision) -> Self {
        Self {
            registry: PinRegistry::new(provider),
            revision,
        }
    }

    pub fn revision(&self) -> BoardRevision {
        self.revision
    }

    /// Binds every pull resistor pin, then applies `config` once so the
    /// hardware matches the already loaded configuration.
    pub fn init_hardware(mut self, config: &EngineConfiguration) -> Result<InitializedBoard<P>, BoardError> {
        let band = self.revision.band();
        tracing::info!("Initializing board hardware for {} ({})", self.revision, band);

        for entry in PULL_RESISTOR_PINS.iter() {
            self.registry.initialize(entry.role, entry.pin_for(band))?;
        }

        let mut board = InitializedBoard {
            registry: self.registry,
            revision: self.revision,
        };
        board.on_configuration_change(config, None);
        tracing::info!("Board hardware initialization complete");
        Ok(board)
    }
}

pub struct InitializedBoard<P: PinProvider> {
    registry: PinRegistry<P>,
    revision: BoardRevision,
}

impl<P: PinProvider> InitializedBoard<P> {
    /// Re-applies every pull resistor from `config`.
    ///
    /// Idempotent. `previous` is accepted for symmetry with the other
    /// configuration listeners and is not consulted.
    pub fn on_configuration_change(
        &mut self,
        config: &EngineConfiguration,
        _previous: Option<&EngineConfiguration>,
    ) {
        for role in PinRole::ALL {
            let applied = self.registry.set_value(role, requested_state(role, config));
            debug_assert!(applied, "{role} not initialized");
        }
        tracing::debug!("Applied pull resistor configuration");
    }

    pub fn revision(&self) -> BoardRevision {
        self.revision
    }

    pub fn pull_resistor(&self, role: PinRole) -> Option<bool> {
        self.registry.value(role)
    }

    pub fn registry(&self) -> &PinRegistry<P> {
        &self.registry
    }

    pub fn provider(&self) -> &P {
        self.registry.provider()
    }
}

impl<P: PinProvider + WakeSource> InitializedBoard<P> {
    /// Arms wake-up on the CAN RX line before entering stop mode.
    pub fn prepare_for_stop(&mut self) -> Result<(), HalError> {
        tracing::info!("Arming wake on {}", WAKE_LINE);
        self.registry.provider_mut().enable_line_event(WAKE_LINE, Edge::Rising)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RecordingPinProvider;

    fn config_with(f: impl FnOnce(&mut EngineConfiguration)) -> EngineConfiguration {
        let mut config = EngineConfiguration::default();
        f(&mut config);
        config
    }

    #[test]
    fn test_crank_legs_follow_one_flag() {
        let config = config_with(|c| c.board_use_crank_pull_up = true);
        assert!(requested_state(PinRole::CrankPPullUp, &config));
        assert!(requested_state(PinRole::CrankNPullUp, &config));
        assert!(!requested_state(PinRole::TachPullUp, &config));
    }

    #[test]
    fn test_set_requested_state_round_trips() {
        let mut config = EngineConfiguration::default();
        for role in PinRole::ALL {
            set_requested_state(role, &mut config, true);
            assert!(requested_state(role, &config), "{role}");
        }
        set_requested_state(PinRole::CrankNPullUp, &mut config, false);
        assert!(!requested_state(PinRole::CrankPPullUp, &config));
    }

    #[test]
    fn test_init_binds_every_role_and_applies() {
        let config = config_with(|c| {
            c.board_use_tach_pull_up = true;
            c.board_use_d5_pull_down = true;
        });
        let board = Board::new(RecordingPinProvider::new(), BoardRevision::from_letter('E'))
            .init_hardware(&config)
            .unwrap();

        assert!(board.registry().all_initialized());
        assert_eq!(board.provider().acquisitions().len(), PinRole::COUNT);
        assert_eq!(board.pull_resistor(PinRole::TachPullUp), Some(true));
        assert_eq!(board.pull_resistor(PinRole::D5PullDown), Some(true));
        assert_eq!(board.pull_resistor(PinRole::D3PullDown), Some(false));
        assert_eq!(board.provider().level(Gpio::H144_LS_8), Some(true));
    }

    #[test]
    fn test_init_failure_names_role_and_pin() {
        let provider = RecordingPinProvider::new().failing_on(Gpio::H144_GP4);
        let result = Board::new(provider, BoardRevision::from_letter('G'))
            .init_hardware(&EngineConfiguration::default());

        match result {
            Err(BoardError::PinUnavailable { role, pin, .. }) => {
                assert_eq!(role, PinRole::CamPullDown);
                assert_eq!(pin, Gpio::H144_GP4);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("init should fail"),
        }
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let config = config_with(|c| {
            c.board_use_cam_pull_down = true;
            c.board_use_2step_pull_down = true;
        });
        let mut board = Board::new(RecordingPinProvider::new(), BoardRevision::from_letter('H'))
            .init_hardware(&config)
            .unwrap();
        let after_init = board.provider().levels().clone();

        board.on_configuration_change(&config, Some(&config));
        let after_first = board.provider().levels().clone();
        board.on_configuration_change(&config, None);

        assert_eq!(after_init, after_first);
        assert_eq!(&after_first, board.provider().levels());
    }

    #[test]
    fn test_prepare_for_stop_arms_can_rx() {
        let mut board = Board::new(RecordingPinProvider::new(), BoardRevision::from_letter('F'))
            .init_hardware(&EngineConfiguration::default())
            .unwrap();
        board.prepare_for_stop().unwrap();
        assert_eq!(board.provider().wake_events(), &[(Gpio::H_CAN_RX, Edge::Rising)]);
    }
}
