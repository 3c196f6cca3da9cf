use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::Article;
use crate::errors::{NewsError, NewsResult};
use crate::sources::http::HttpFetcher;
use crate::sources::query::redact_api_key;
use crate::sources::traits::{ArticleSource, BodyFetcher};

/// One entry of `response.results`
#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(rename = "sectionName")]
    section_name: String,
    #[serde(rename = "webTitle")]
    web_title: String,
    #[serde(rename = "webPublicationDate")]
    web_publication_date: String,
    #[serde(rename = "webUrl")]
    web_url: String,
    tags: Vec<ContributorTag>,
}

#[derive(Debug, Deserialize)]
struct ContributorTag {
    #[serde(rename = "webTitle")]
    web_title: String,
}

impl From<SearchResult> for Article {
    fn from(result: SearchResult) -> Self {
        let author = result
            .tags
            .into_iter()
            .next()
            .map(|tag| tag.web_title)
            .unwrap_or_default();

        Article::new(
            result.section_name,
            result.web_title,
            result.web_publication_date,
            author,
            result.web_url,
        )
    }
}

/// Parse a search response into articles, preserving result order.
///
/// Parsing stops at the first malformed result; the articles read before it
/// are returned and the fault is logged. Empty input yields no articles.
pub fn parse_articles(body: &str) -> Vec<Article> {
    let mut articles = Vec::new();

    if body.trim().is_empty() {
        return articles;
    }

    if let Err(e) = extract_articles(body, &mut articles) {
        warn!(error = %e, parsed = articles.len(), "Problem parsing the news JSON results");
    }

    articles
}

fn extract_articles(body: &str, articles: &mut Vec<Article>) -> NewsResult<()> {
    let root: Value = serde_json::from_str(body)?;

    let results = root
        .get("response")
        .and_then(|response| response.get("results"))
        .and_then(Value::as_array)
        .ok_or_else(|| NewsError::ResponseShape("missing response.results array".to_string()))?;

    for (index, item) in results.iter().enumerate() {
        let result = SearchResult::deserialize(item)
            .map_err(|e| NewsError::ResponseShape(format!("result {}: {}", index, e)))?;
        articles.push(result.into());
    }

    Ok(())
}

/// Articles from the Guardian search endpoint
pub struct GuardianSource<F: BodyFetcher = HttpFetcher> {
    fetcher: F,
}

impl GuardianSource<HttpFetcher> {
    pub fn new() -> Self {
        Self::with_fetcher(HttpFetcher::new())
    }
}

impl Default for GuardianSource<HttpFetcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: BodyFetcher> GuardianSource<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }
}

impl<F: BodyFetcher> ArticleSource for GuardianSource<F> {
    fn fetch_articles(&self, url: &str) -> Vec<Article> {
        let body = self.fetcher.fetch(url);
        let articles = parse_articles(&body);

        debug!(url = %redact_api_key(url), count = articles.len(), "Fetch cycle parsed");
        articles
    }
}
