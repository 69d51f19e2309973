//! Errors raised by board bring-up.

use hellen_shared::Gpio;
use hellen_shared::config::ConfigError;
use hellen_shared::hardware_traits::HalError;
use thiserror::Error;

use crate::registry::PinRole;

#[derive(Debug, Error)]
pub enum BoardError {
    /// A required pin could not be acquired. The board cannot run.
    #[error("failed to acquire {pin} for {role}: {source}")]
    PinUnavailable {
        role: PinRole,
        pin: Gpio,
        #[source]
        source: HalError,
    },
    #[error("pin role {role} was already initialized")]
    AlreadyInitialized { role: PinRole },
    #[error("configuration event bus closed")]
    EventBusClosed,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
