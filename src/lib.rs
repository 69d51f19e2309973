// hellen-board: alphax-4chan board support for the Hellen ECU family

pub mod board;
pub mod defaults;
pub mod error;
pub mod events;
pub mod overrides;
pub mod pin_map;
pub mod registry;
pub mod revision;
pub mod sim;

pub use board::{Board, InitializedBoard};
pub use defaults::{build_defaults, load_board_configuration, set_board_default_configuration};
pub use error::BoardError;
pub use overrides::set_board_config_overrides;
pub use pin_map::{board_meta_outputs, board_meta_outputs_count};
pub use registry::{PinRegistry, PinRole};
pub use revision::{BoardRevision, RevisionBand, classify};
