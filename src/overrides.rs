//! Board overrides applied on every configuration load.
//!
//! Unlike the defaults, these values are not user-tunable: they describe how
//! the board is wired and are re-asserted whenever a configuration is loaded.

use hellen_shared::engine_config::{SpiDevice, ThermistorConf};
use hellen_shared::{AdcChannel, EngineConfiguration, Gpio};

use crate::revision::{BoardRevision, RevisionBand};

/// Hellen analog temperature inputs use a 4.7k pull-up.
pub const HELLEN_AT_BIAS_RESISTOR: f32 = 4700.0;

fn setup_vbatt(config: &mut EngineConfiguration) {
    // 4.7k high side / 4.7k low side
    config.analog_input_divider_coefficient = 2.0;

    // 33k / 6.8k
    config.vbatt_divider_coeff = (33.0 + 6.8) / 6.8;

    config.vbatt_adc_channel = AdcChannel::H144_IN_VBATT;
    config.adc_vcc = 3.29;
}

fn set_sd_card(config: &mut EngineConfiguration, device: SpiDevice) {
    config.is_sd_card_enabled = true;
    config.sd_card_spi_device = device;
    match device {
        SpiDevice::Spi1 => {
            config.sd_card_cs_pin = Gpio::H_SPI1_CS1;
            config.is_enabled_spi_1 = true;
        }
        SpiDevice::Spi2 => {
            config.sd_card_cs_pin = Gpio::H_SPI2_CS;
            config.is_enabled_spi_2 = true;
        }
        SpiDevice::Spi3 | SpiDevice::None => {
            config.is_sd_card_enabled = false;
            config.sd_card_cs_pin = Gpio::Unassigned;
        }
    }
}

fn configure_mega_accelerometer(config: &mut EngineConfiguration) {
    config.accelerometer_spi_device = SpiDevice::Spi1;
    config.accelerometer_cs_pin = Gpio::H_SPI1_CS2;
    config.is_enabled_spi_1 = true;
}

fn set_default_at_pull_ups(config: &mut EngineConfiguration) {
    let sensors: [&mut ThermistorConf; 4] = [
        &mut config.clt,
        &mut config.iat,
        &mut config.aux_temp_sensor1,
        &mut config.aux_temp_sensor2,
    ];
    for sensor in sensors {
        sensor.bias_resistor = HELLEN_AT_BIAS_RESISTOR;
    }
}

fn set_can(config: &mut EngineConfiguration) {
    config.can_tx_pin = Gpio::H_CAN_TX;
    config.can_rx_pin = Gpio::H_CAN_RX;
}

pub fn set_board_config_overrides(config: &mut EngineConfiguration, revision: BoardRevision) {
    setup_vbatt(config);

    match revision.band() {
        RevisionBand::Legacy => {
            config.board_enable_pin = Gpio::H144_OUT_IO3;
            set_sd_card(config, SpiDevice::Spi2);
        }
        RevisionBand::MegaModule => {
            config.board_enable_pin = Gpio::MM176_EN;
            set_sd_card(config, SpiDevice::Spi1);
            configure_mega_accelerometer(config);
        }
    }

    set_default_at_pull_ups(config);
    set_can(config);
    tracing::debug!("Board overrides applied for {}", revision);
}
