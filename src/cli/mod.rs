pub mod commands;
pub mod session;

pub use commands::{Cli, Commands, SettingsCommand};
pub use session::SessionInput;
