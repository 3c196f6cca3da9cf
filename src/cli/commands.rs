use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "technews")]
#[command(about = "Technology headlines from The Guardian in your terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and list articles using the saved settings
    List {
        /// Print articles as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse articles interactively and open them in a browser
    Read,

    /// Show or change search settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show all settings
    Show,

    /// Change a setting (keyword, order-by, page-size)
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },

    /// Restore defaults (all settings if no key is given)
    Reset {
        /// Setting name
        key: Option<String>,
    },
}
