pub mod traits;
pub mod query;
pub mod http;
pub mod guardian;

pub use traits::{ArticleSource, BodyFetcher};
pub use query::QueryBuilder;
pub use http::HttpFetcher;
pub use guardian::{parse_articles, GuardianSource};
