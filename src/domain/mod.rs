pub mod article;
pub mod preferences;

pub use article::Article;
pub use preferences::{PreferenceKey, Preferences, SortOrder};
