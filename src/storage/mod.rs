pub mod traits;
pub mod sqlite;

pub use traits::PreferenceRepository;
pub use sqlite::{SqlitePreferenceRepository, SqliteStorage};
