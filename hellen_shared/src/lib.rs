// hellen_shared: types shared between the board crates and the rest of the firmware

pub mod gpio;
pub mod engine_config;
pub mod config;
pub mod hardware_traits;
pub mod event_interface;

pub use engine_config::EngineConfiguration;
pub use gpio::{AdcChannel, Gpio};
