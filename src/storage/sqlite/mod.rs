mod connection;
mod preference_repository;

pub use connection::SqliteStorage;
pub use preference_repository::SqlitePreferenceRepository;
