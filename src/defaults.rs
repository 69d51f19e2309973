//! Default engine configuration for the alphax-4chan.

use std::path::Path;

use hellen_shared::config::{load_config, validate_config};
use hellen_shared::engine_config::{
    BaroSource, FiringOrder, IgnitionMode, LaunchActivationMode, MapSensorType, PinInputMode,
};
use hellen_shared::{AdcChannel, EngineConfiguration, Gpio};

use crate::error::BoardError;
use crate::revision::{BoardRevision, RevisionBand};

fn set_injector_pins(config: &mut EngineConfiguration) {
    config.injection_pins[0] = Gpio::H144_LS_1;
    config.injection_pins[1] = Gpio::H144_LS_2;
    config.injection_pins[2] = Gpio::H144_LS_3;
    config.injection_pins[3] = Gpio::H144_LS_4;

    config.clutch_down_pin = Gpio::Unassigned;
    config.clutch_down_pin_mode = PinInputMode::PullDown;
    config.launch_activation_mode = LaunchActivationMode::ClutchInput;
    config.malfunction_indicator_pin = Gpio::Unassigned;
}

fn set_ignition_pins(config: &mut EngineConfiguration) {
    config.ignition_pins[0] = Gpio::H144_IGN_1;
    config.ignition_pins[1] = Gpio::H144_IGN_2;
    config.ignition_pins[2] = Gpio::H144_IGN_3;
    config.ignition_pins[3] = Gpio::H144_IGN_4;
}

/// TLE9201 H-bridge: PWM enables (coast when low), DIR picks the direction
/// and DIS disables the bridge when high.
fn setup_etb(config: &mut EngineConfiguration) {
    let etb = &mut config.etb_io[0];
    etb.control_pin = Gpio::H144_OUT_PWM2;
    etb.direction_pin1 = Gpio::H144_GP1;
    etb.disable_pin = Gpio::H144_GP2;
    etb.direction_pin2 = Gpio::Unassigned;

    // pwm/dir only, no dira/dirb
    config.etb_use_two_wires = false;
}

/// Tachometer and VVT outputs moved when the board switched to the mega-module.
fn set_revision_outputs(config: &mut EngineConfiguration, band: RevisionBand) {
    match band {
        RevisionBand::Legacy => {
            config.tach_output_pin = Gpio::H144_OUT_IO13;
            config.vvt_pins[0] = Gpio::H144_OUT_PWM7;
            config.vvt_pins[1] = Gpio::H144_OUT_PWM8;
        }
        RevisionBand::MegaModule => {
            config.tach_output_pin = Gpio::H144_GP3;
            config.vvt_pins[0] = Gpio::H144_IGN_7;
            config.vvt_pins[1] = Gpio::H144_IGN_8;
        }
    }
}

fn setup_default_sensor_inputs(config: &mut EngineConfiguration) {
    // hall trigger inputs
    config.trigger_input_pins[0] = Gpio::H144_IN_CRANK;
    config.trigger_input_pins[1] = Gpio::H144_IN_CAM;
    config.cam_inputs[0] = Gpio::Unassigned;

    config.tps1_1_adc_channel = AdcChannel::H144_IN_TPS;
    config.tps1_2_adc_channel = AdcChannel::H144_IN_AUX1;
    config.throttle_pedal_position_adc_channel = AdcChannel::H144_IN_PPS;
    config.throttle_pedal_position_2_adc_channel = AdcChannel::H144_IN_AUX2;

    // placeholder range so the record validates; real values come from calibration
    config.tps1_secondary_min = 1000;
    config.tps1_secondary_max = 0;

    config.maf_adc_channel = AdcChannel::Unassigned;
    config.afr.hw_channel = AdcChannel::EFI_ADC_1;
    config.clt.adc_channel = AdcChannel::H144_IN_CLT;
    config.iat.adc_channel = AdcChannel::H144_IN_IAT;
}

/// Writes this board's defaults into `config`.
///
/// Runs once, before the first configuration apply. Fields left
/// `Unassigned` are intentionally unused on this board: clutch input, MIL,
/// AC switch, second cam input, second ETB direction pin and MAF.
pub fn set_board_default_configuration(config: &mut EngineConfiguration, revision: BoardRevision) {
    let band = revision.band();
    tracing::info!("Applying alphax-4chan defaults for {} ({})", revision, band);

    set_injector_pins(config);
    set_ignition_pins(config);
    setup_etb(config);
    set_revision_outputs(config, band);

    // TODO: pick the baro source per revision band, currently tuned for mega-module boards
    config.baro_sensor.source = BaroSource::MegaModule;
    config.map.hw_channel = AdcChannel::H144_IN_MAP3;
    config.map.sensor_type = MapSensorType::Mpxh6400;

    config.board_use_temp_pull_up = true;

    config.ac_switch = Gpio::Unassigned;
    config.fuel_pump_pin = Gpio::H144_OUT_IO12;
    config.fan_pin = Gpio::H144_OUT_IO11;
    config.main_relay_pin = Gpio::H144_OUT_IO10;
    config.boost_control_pin = Gpio::H144_OUT_PWM3;

    setup_default_sensor_inputs(config);

    config.cylinders_count = 4;
    config.firing_order = FiringOrder::Order1342;
    config.ignition_mode = IgnitionMode::IndividualCoils;
    config.launch_activation_mode = LaunchActivationMode::ClutchInput;

    config.vr_threshold[0].pin = Gpio::H144_OUT_PWM6;
    config.vr_threshold[1].pin = Gpio::H144_OUT_PWM4;
}

/// Fresh record with board defaults and overrides applied.
pub fn build_defaults(revision: BoardRevision) -> EngineConfiguration {
    let mut config = EngineConfiguration::default();
    set_board_default_configuration(&mut config, revision);
    crate::overrides::set_board_config_overrides(&mut config, revision);
    config
}

/// Loads the record from `path`, or builds the board defaults when no file is
/// given. Board overrides are applied in both cases and the result is only
/// validated afterwards, so a file may leave out the fields the board owns.
pub fn load_board_configuration(
    path: Option<&Path>,
    revision: BoardRevision,
) -> Result<EngineConfiguration, BoardError> {
    let mut engine = match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => {
            let mut engine = EngineConfiguration::default();
            set_board_default_configuration(&mut engine, revision);
            engine
        }
    };
    crate::overrides::set_board_config_overrides(&mut engine, revision);

    if let Err(e) = validate_config(&engine) {
        tracing::error!("Configuration rejected for {}: {}", revision, e);
        return Err(e.into());
    }
    Ok(engine)
}
