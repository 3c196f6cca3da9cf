use url::Url;

use crate::config::Config;
use crate::domain::preferences::DEFAULT_KEYWORD;
use crate::domain::Preferences;
use crate::errors::{NewsError, NewsResult};

const API_KEY_PARAM: &str = "api-key";

/// Assembles search URLs for the Guardian content API.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base_url: Url,
    section_tag: String,
    api_key: String,
}

impl QueryBuilder {
    pub fn new(base_url: &str, section_tag: &str, api_key: &str) -> NewsResult<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| NewsError::InvalidUrl(e.to_string()))?;
        // Built URLs carry exactly the six search parameters
        base_url.set_query(None);
        base_url.set_fragment(None);

        Ok(Self {
            base_url,
            section_tag: section_tag.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> NewsResult<Self> {
        Self::new(&config.api_url, &config.section_tag, &config.api_key)
    }

    /// Build the request URL. Order-by and page-size are passed through unchecked.
    pub fn build(&self, keyword: &str, order_by: &str, page_size: &str) -> String {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", effective_keyword(keyword))
            .append_pair("tag", &self.section_tag)
            .append_pair("order-by", order_by)
            .append_pair("page-size", page_size)
            .append_pair("show-tags", "contributor")
            .append_pair(API_KEY_PARAM, &self.api_key);

        url.into()
    }

    pub fn build_for(&self, preferences: &Preferences) -> String {
        self.build(
            &preferences.keyword,
            &preferences.order_by,
            &preferences.page_size,
        )
    }
}

/// Keyword to search for; the default topic when it is nothing but spaces.
pub fn effective_keyword(keyword: &str) -> &str {
    if keyword.chars().all(|c| c == ' ') {
        DEFAULT_KEYWORD
    } else {
        keyword
    }
}

/// Copy of `url` with the API key masked, for log output.
pub fn redact_api_key(url: &str) -> String {
    let mut parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return url.to_string(),
    };

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == API_KEY_PARAM {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    if pairs.is_empty() {
        return parsed.into();
    }

    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    parsed.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://content.guardianapis.com/search";

    fn builder() -> QueryBuilder {
        QueryBuilder::new(BASE, "technology/technology", "secret").unwrap()
    }

    fn params(url: &str) -> Vec<(String, String)> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_build_appends_parameters_in_order() {
        let url = builder().build("rust", "newest", "10");

        assert!(url.starts_with(BASE));
        assert_eq!(
            params(&url),
            vec![
                ("q".to_string(), "rust".to_string()),
                ("tag".to_string(), "technology/technology".to_string()),
                ("order-by".to_string(), "newest".to_string()),
                ("page-size".to_string(), "10".to_string()),
                ("show-tags".to_string(), "contributor".to_string()),
                ("api-key".to_string(), "secret".to_string()),
            ]
        );
    }

    #[test]
    fn test_each_parameter_appears_exactly_once() {
        let url = builder().build("open source", "relevance", "3");
        let keys: Vec<String> = params(&url).into_iter().map(|(k, _)| k).collect();

        assert_eq!(keys.len(), 6);
        for expected in ["q", "tag", "order-by", "page-size", "show-tags", "api-key"] {
            assert_eq!(
                keys.iter().filter(|k| k.as_str() == expected).count(),
                1,
                "parameter {} should appear once",
                expected
            );
        }
    }

    #[test]
    fn test_blank_keyword_uses_default_topic() {
        let builder = builder();
        let spaces = builder.build("   ", "newest", "10");
        let empty = builder.build("", "newest", "10");

        assert_eq!(spaces, empty);
        assert_eq!(params(&empty)[0].1, DEFAULT_KEYWORD);
    }

    #[test]
    fn test_keyword_is_not_trimmed() {
        let url = builder().build(" rust ", "newest", "10");
        assert_eq!(params(&url)[0].1, " rust ");
    }

    #[test]
    fn test_tab_only_keyword_is_kept() {
        // Only space characters count as blank
        assert_eq!(effective_keyword("\t"), "\t");
    }

    #[test]
    fn test_out_of_range_page_size_passes_through() {
        let url = builder().build("rust", "newest", "80");
        assert_eq!(params(&url)[3].1, "80");
    }

    #[test]
    fn test_unvalidated_order_by_passes_through() {
        let url = builder().build("rust", "popular", "10");
        assert_eq!(params(&url)[2].1, "popular");
    }

    #[test]
    fn test_build_for_preferences() {
        let prefs = Preferences {
            keyword: "linux".to_string(),
            order_by: "oldest".to_string(),
            page_size: "5".to_string(),
        };

        let builder = builder();
        assert_eq!(
            builder.build_for(&prefs),
            builder.build("linux", "oldest", "5")
        );
    }

    #[test]
    fn test_base_url_query_is_dropped() {
        let base = format!("{}?q=other&format=xml#top", BASE);
        let with_query = QueryBuilder::new(&base, "technology/technology", "secret").unwrap();
        let url = with_query.build("rust", "newest", "10");

        assert!(url.starts_with(&format!("{}?q=rust&", BASE)));
        assert!(!url.contains('#'));
        assert_eq!(url, builder().build("rust", "newest", "10"));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = QueryBuilder::new("not a url", "technology/technology", "secret");
        assert!(matches!(result, Err(NewsError::InvalidUrl(_))));
    }

    #[test]
    fn test_redact_api_key() {
        let url = builder().build("rust", "newest", "10");
        let redacted = redact_api_key(&url);

        assert!(!redacted.contains("secret"));
        assert_eq!(params(&redacted)[5], ("api-key".to_string(), "***".to_string()));
        assert_eq!(params(&redacted)[0], ("q".to_string(), "rust".to_string()));
    }

    #[test]
    fn test_redact_leaves_other_urls_alone() {
        assert_eq!(redact_api_key("https://example.com/a"), "https://example.com/a");
        assert_eq!(redact_api_key("::bad::"), "::bad::");
    }
}
