use crate::domain::Article;

/// Blocking retrieval of a response body.
///
/// Failures are logged by the implementation and reported as an empty body.
#[cfg_attr(test, mockall::automock)]
pub trait BodyFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> String;
}

#[cfg_attr(test, mockall::automock)]
pub trait ArticleSource: Send + Sync {
    /// Run one fetch and parse. Never fails, an unusable response yields no articles.
    fn fetch_articles(&self, url: &str) -> Vec<Article>;
}
