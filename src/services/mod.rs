pub mod browser;
pub mod connectivity;
pub mod load_service;
pub mod settings_service;

pub use browser::{SystemBrowser, UrlOpener};
pub use connectivity::{ConnectivityProbe, TcpConnectivityProbe};
pub use load_service::{Delivery, LoadOutcome, LoadService, LoadState, PendingLoad};
pub use settings_service::{SettingEntry, SettingsService};
