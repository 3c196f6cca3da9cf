use crate::errors::{NewsError, NewsResult};
use crate::storage::traits::PreferenceRepository;

pub const DEFAULT_KEYWORD: &str = "android";
pub const DEFAULT_ORDER_BY: &str = "newest";
pub const DEFAULT_PAGE_SIZE: &str = "10";

pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    Keyword,
    OrderBy,
    PageSize,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 3] = [
        PreferenceKey::Keyword,
        PreferenceKey::OrderBy,
        PreferenceKey::PageSize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::Keyword => "keyword",
            PreferenceKey::OrderBy => "order-by",
            PreferenceKey::PageSize => "page-size",
        }
    }

    pub fn default_value(&self) -> &'static str {
        match self {
            PreferenceKey::Keyword => DEFAULT_KEYWORD,
            PreferenceKey::OrderBy => DEFAULT_ORDER_BY,
            PreferenceKey::PageSize => DEFAULT_PAGE_SIZE,
        }
    }

    /// Check a value before it is written by the settings screen.
    ///
    /// Page size only has to be an integer; its range is not enforced.
    pub fn validate(&self, value: &str) -> NewsResult<()> {
        let valid = match self {
            PreferenceKey::Keyword => true,
            PreferenceKey::OrderBy => value.parse::<SortOrder>().is_ok(),
            PreferenceKey::PageSize => value.trim().parse::<i64>().is_ok(),
        };

        if valid {
            Ok(())
        } else {
            Err(NewsError::InvalidPreference {
                key: self.as_str().to_string(),
                value: value.to_string(),
            })
        }
    }

    /// Text shown next to the value on the settings screen
    pub fn summary(&self, value: &str) -> String {
        match self {
            PreferenceKey::Keyword => value.to_string(),
            PreferenceKey::OrderBy => value
                .parse::<SortOrder>()
                .map(|order| order.label().to_string())
                .unwrap_or_else(|_| value.to_string()),
            PreferenceKey::PageSize => page_size_summary(value),
        }
    }
}

impl std::str::FromStr for PreferenceKey {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyword" | "q" => Ok(PreferenceKey::Keyword),
            "order-by" | "order_by" | "order" => Ok(PreferenceKey::OrderBy),
            "page-size" | "page_size" | "count" => Ok(PreferenceKey::PageSize),
            _ => Err(NewsError::InvalidInput(format!("Unknown setting: {}", s))),
        }
    }
}

impl std::fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    Oldest,
    Relevance,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Relevance => "relevance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest first",
            SortOrder::Oldest => "Oldest first",
            SortOrder::Relevance => "Most relevant",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "relevance" => Ok(SortOrder::Relevance),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Clamp the displayed article count to 1..=50.
///
/// Only the summary is clamped, the stored value reaches the request as-is.
pub fn page_size_summary(value: &str) -> String {
    match value.trim().parse::<i64>() {
        Ok(n) if n < MIN_PAGE_SIZE => MIN_PAGE_SIZE.to_string(),
        Ok(n) if n > MAX_PAGE_SIZE => MAX_PAGE_SIZE.to_string(),
        Ok(n) => n.to_string(),
        Err(_) => value.to_string(),
    }
}

/// The three user-editable query parameters, as raw strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub keyword: String,
    pub order_by: String,
    pub page_size: String,
}

impl Preferences {
    pub fn load<R: PreferenceRepository + ?Sized>(repository: &R) -> NewsResult<Self> {
        let read = |key: PreferenceKey| -> NewsResult<String> {
            Ok(repository
                .get(key.as_str())?
                .unwrap_or_else(|| key.default_value().to_string()))
        };

        Ok(Self {
            keyword: read(PreferenceKey::Keyword)?,
            order_by: read(PreferenceKey::OrderBy)?,
            page_size: read(PreferenceKey::PageSize)?,
        })
    }

    pub fn value(&self, key: PreferenceKey) -> &str {
        match key {
            PreferenceKey::Keyword => &self.keyword,
            PreferenceKey::OrderBy => &self.order_by,
            PreferenceKey::PageSize => &self.page_size,
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD.to_string(),
            order_by: DEFAULT_ORDER_BY.to_string(),
            page_size: DEFAULT_PAGE_SIZE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::MockPreferenceRepository;
    use mockall::predicate::eq;

    #[test]
    fn test_load_uses_defaults_when_unset() {
        let mut repo = MockPreferenceRepository::new();
        repo.expect_get().returning(|_| Ok(None));

        let prefs = Preferences::load(&repo).unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_load_reads_stored_values() {
        let mut repo = MockPreferenceRepository::new();
        repo.expect_get()
            .with(eq("keyword"))
            .returning(|_| Ok(Some("rust".to_string())));
        repo.expect_get()
            .with(eq("order-by"))
            .returning(|_| Ok(Some("oldest".to_string())));
        repo.expect_get()
            .with(eq("page-size"))
            .returning(|_| Ok(Some("25".to_string())));

        let prefs = Preferences::load(&repo).unwrap();
        assert_eq!(prefs.keyword, "rust");
        assert_eq!(prefs.order_by, "oldest");
        assert_eq!(prefs.page_size, "25");
    }

    #[test]
    fn test_load_propagates_storage_errors() {
        let mut repo = MockPreferenceRepository::new();
        repo.expect_get()
            .returning(|_| Err(NewsError::Database(rusqlite::Error::InvalidQuery)));

        assert!(matches!(
            Preferences::load(&repo),
            Err(NewsError::Database(_))
        ));
    }

    #[test]
    fn test_page_size_summary_clamps_display_only() {
        assert_eq!(page_size_summary("10"), "10");
        assert_eq!(page_size_summary("0"), "1");
        assert_eq!(page_size_summary("-4"), "1");
        assert_eq!(page_size_summary("50"), "50");
        assert_eq!(page_size_summary("80"), "50");
        assert_eq!(page_size_summary("many"), "many");
    }

    #[test]
    fn test_order_by_validation() {
        assert!(PreferenceKey::OrderBy.validate("newest").is_ok());
        assert!(PreferenceKey::OrderBy.validate("relevance").is_ok());
        assert!(matches!(
            PreferenceKey::OrderBy.validate("popular"),
            Err(NewsError::InvalidPreference { .. })
        ));
    }

    #[test]
    fn test_page_size_validation_accepts_out_of_range_integers() {
        assert!(PreferenceKey::PageSize.validate("80").is_ok());
        assert!(PreferenceKey::PageSize.validate("0").is_ok());
        assert!(PreferenceKey::PageSize.validate("ten").is_err());
    }

    #[test]
    fn test_order_by_summary_uses_label() {
        assert_eq!(PreferenceKey::OrderBy.summary("oldest"), "Oldest first");
        assert_eq!(PreferenceKey::OrderBy.summary("weird"), "weird");
    }

    #[test]
    fn test_preference_key_parsing() {
        assert_eq!("keyword".parse::<PreferenceKey>().unwrap(), PreferenceKey::Keyword);
        assert_eq!("order_by".parse::<PreferenceKey>().unwrap(), PreferenceKey::OrderBy);
        assert_eq!("Page-Size".parse::<PreferenceKey>().unwrap(), PreferenceKey::PageSize);
        assert!("colour".parse::<PreferenceKey>().is_err());
    }
}
