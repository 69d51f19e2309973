//! The engine configuration record.
//!
//! Board crates only read the pull resistor flags and write the pin
//! assignments and calibration scalars they own. Every field carries a serde
//! default so partial TOML files load cleanly; call `validate` once the
//! record is complete.

use serde::{Deserialize, Serialize};

use crate::gpio::{AdcChannel, Gpio};

pub const MAX_CYLINDER_COUNT: usize = 12;
pub const CAM_INPUTS_COUNT: usize = 4;
pub const VVT_PINS_COUNT: usize = 4;
pub const ETB_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinInputMode {
    #[default]
    Default,
    PullUp,
    PullDown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchActivationMode {
    #[default]
    SwitchInput,
    ClutchInput,
    AlwaysActive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnitionMode {
    #[default]
    OneCoil,
    IndividualCoils,
    WastedSpark,
    TwoCoils,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapSensorType {
    #[default]
    Custom,
    Mpx4100,
    Mpx4250,
    Mpx4250a,
    Mpxh6300,
    Mpxh6400,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpiDevice {
    #[default]
    None,
    Spi1,
    Spi2,
    Spi3,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaroSource {
    #[default]
    None,
    Analog,
    /// Digital pressure sensor on the Hellen mega-module.
    MegaModule,
}

/// Cylinder firing sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiringOrder {
    #[default]
    #[serde(rename = "1")]
    One,
    #[serde(rename = "1-2")]
    Order12,
    #[serde(rename = "1-2-3")]
    Order123,
    #[serde(rename = "1-3-4-2")]
    Order1342,
    #[serde(rename = "1-2-4-3")]
    Order1243,
    #[serde(rename = "1-3-2-4")]
    Order1324,
    #[serde(rename = "1-5-3-6-2-4")]
    Order153624,
    #[serde(rename = "1-8-4-3-6-5-7-2")]
    Order18436572,
}

impl FiringOrder {
    pub fn sequence(&self) -> &'static [u8] {
        match self {
            FiringOrder::One => &[1],
            FiringOrder::Order12 => &[1, 2],
            FiringOrder::Order123 => &[1, 2, 3],
            FiringOrder::Order1342 => &[1, 3, 4, 2],
            FiringOrder::Order1243 => &[1, 2, 4, 3],
            FiringOrder::Order1324 => &[1, 3, 2, 4],
            FiringOrder::Order153624 => &[1, 5, 3, 6, 2, 4],
            FiringOrder::Order18436572 => &[1, 8, 4, 3, 6, 5, 7, 2],
        }
    }

    pub fn cylinder_count(&self) -> usize {
        self.sequence().len()
    }
}

/// Electronic throttle body driver wiring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtbIo {
    pub control_pin: Gpio,
    pub direction_pin1: Gpio,
    pub direction_pin2: Gpio,
    pub disable_pin: Gpio,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermistorConf {
    pub adc_channel: AdcChannel,
    /// Pull-up bias resistor in ohms.
    pub bias_resistor: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSensor {
    pub hw_channel: AdcChannel,
    pub sensor_type: MapSensorType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaroSensor {
    pub source: BaroSource,
    pub hw_channel: AdcChannel,
    pub sensor_type: MapSensorType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AfrSensor {
    pub hw_channel: AdcChannel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VrThreshold {
    pub pin: Gpio,
}

/// Main engine configuration record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfiguration {
    // actuators
    pub injection_pins: [Gpio; MAX_CYLINDER_COUNT],
    pub ignition_pins: [Gpio; MAX_CYLINDER_COUNT],
    pub etb_io: [EtbIo; ETB_COUNT],
    pub etb_use_two_wires: bool,
    pub tach_output_pin: Gpio,
    pub vvt_pins: [Gpio; VVT_PINS_COUNT],
    pub fuel_pump_pin: Gpio,
    pub fan_pin: Gpio,
    pub main_relay_pin: Gpio,
    pub boost_control_pin: Gpio,
    pub malfunction_indicator_pin: Gpio,
    pub vr_threshold: [VrThreshold; 2],

    // digital inputs
    pub trigger_input_pins: [Gpio; 2],
    pub cam_inputs: [Gpio; CAM_INPUTS_COUNT],
    pub ac_switch: Gpio,
    pub clutch_down_pin: Gpio,
    pub clutch_down_pin_mode: PinInputMode,
    pub launch_activation_mode: LaunchActivationMode,

    // analog inputs
    pub tps1_1_adc_channel: AdcChannel,
    pub tps1_2_adc_channel: AdcChannel,
    pub tps1_secondary_min: u16,
    pub tps1_secondary_max: u16,
    pub throttle_pedal_position_adc_channel: AdcChannel,
    pub throttle_pedal_position_2_adc_channel: AdcChannel,
    pub maf_adc_channel: AdcChannel,
    pub afr: AfrSensor,
    pub clt: ThermistorConf,
    pub iat: ThermistorConf,
    pub aux_temp_sensor1: ThermistorConf,
    pub aux_temp_sensor2: ThermistorConf,
    pub map: MapSensor,
    pub baro_sensor: BaroSensor,
    pub vbatt_adc_channel: AdcChannel,

    // calibration
    pub analog_input_divider_coefficient: f32,
    pub vbatt_divider_coeff: f32,
    pub adc_vcc: f32,
    pub cylinders_count: u8,
    pub firing_order: FiringOrder,
    pub ignition_mode: IgnitionMode,

    // board peripherals
    pub board_enable_pin: Gpio,
    pub is_sd_card_enabled: bool,
    pub sd_card_spi_device: SpiDevice,
    pub sd_card_cs_pin: Gpio,
    pub is_enabled_spi_1: bool,
    pub is_enabled_spi_2: bool,
    pub accelerometer_spi_device: SpiDevice,
    pub accelerometer_cs_pin: Gpio,
    pub can_tx_pin: Gpio,
    pub can_rx_pin: Gpio,

    // pull resistors switched by the board
    pub board_use_tach_pull_up: bool,
    pub board_use_temp_pull_up: bool,
    pub board_use_crank_pull_up: bool,
    pub board_use_2step_pull_down: bool,
    pub board_use_cam_pull_down: bool,
    pub board_use_cam_vr_pull_up: bool,
    pub board_use_d2_pull_down: bool,
    pub board_use_d3_pull_down: bool,
    pub board_use_d4_pull_down: bool,
    pub board_use_d5_pull_down: bool,
}

impl EngineConfiguration {
    /// Checks cross-field consistency after loading.
    pub fn validate(&self) -> Result<(), String> {
        let cylinders = self.cylinders_count as usize;
        if cylinders == 0 || cylinders > MAX_CYLINDER_COUNT {
            return Err(format!(
                "cylinders_count must be in 1..={}, got {}",
                MAX_CYLINDER_COUNT, cylinders
            ));
        }
        if self.firing_order.cylinder_count() != cylinders {
            return Err(format!(
                "firing order {:?} is for {} cylinders, configuration has {}",
                self.firing_order,
                self.firing_order.cylinder_count(),
                cylinders
            ));
        }
        if !self.adc_vcc.is_finite() || self.adc_vcc <= 0.0 {
            return Err(format!("adc_vcc must be positive, got {}", self.adc_vcc));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_cylinder() -> EngineConfiguration {
        EngineConfiguration {
            cylinders_count: 4,
            firing_order: FiringOrder::Order1342,
            adc_vcc: 3.3,
            ..Default::default()
        }
    }

    #[test]
    fn test_firing_order_cylinder_count() {
        assert_eq!(FiringOrder::Order1342.cylinder_count(), 4);
        assert_eq!(FiringOrder::Order1342.sequence(), &[1, 3, 4, 2]);
        assert_eq!(FiringOrder::Order18436572.cylinder_count(), 8);
    }

    #[test]
    fn test_validate_accepts_consistent_record() {
        assert!(four_cylinder().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatched_firing_order() {
        let config = EngineConfiguration {
            firing_order: FiringOrder::Order153624,
            ..four_cylinder()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("6 cylinders"));
    }

    #[test]
    fn test_validate_rejects_zero_cylinders() {
        let config = EngineConfiguration {
            cylinders_count: 0,
            ..four_cylinder()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_record_has_no_pull_resistors() {
        let config = EngineConfiguration::default();
        assert!(!config.board_use_tach_pull_up);
        assert!(!config.board_use_d5_pull_down);
        assert_eq!(config.tach_output_pin, Gpio::Unassigned);
    }
}
