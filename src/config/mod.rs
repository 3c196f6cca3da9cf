use crate::errors::{NewsError, NewsResult};

pub const DEFAULT_API_URL: &str = "https://content.guardianapis.com/search";
pub const DEFAULT_SECTION_TAG: &str = "technology/technology";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub section_tag: String,
    pub db_path: String,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> NewsResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        let api_key = std::env::var("GUARDIAN_API_KEY")
            .map_err(|_| NewsError::MissingEnvVar("GUARDIAN_API_KEY".to_string()))?;

        if api_key.trim().is_empty() {
            return Err(NewsError::Config(
                "GUARDIAN_API_KEY must not be empty".to_string(),
            ));
        }

        let api_url =
            std::env::var("NEWS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let section_tag = std::env::var("NEWS_SECTION_TAG")
            .unwrap_or_else(|_| DEFAULT_SECTION_TAG.to_string());

        // Default db_path is relative to executable directory
        let db_path = std::env::var("NEWS_DB_PATH").unwrap_or_else(|_| {
            exe_dir
                .map(|d| d.join("technews.db").to_string_lossy().into_owned())
                .unwrap_or_else(|| "./technews.db".to_string())
        });

        Ok(Self {
            api_key,
            api_url,
            section_tag,
            db_path,
        })
    }
}
