pub mod terminal;

pub use terminal::TerminalPresenter;

use crate::domain::Article;
use crate::errors::NewsResult;

/// Receives the outcome of a fetch cycle
pub trait ArticlePresenter {
    fn show_loading(&mut self) -> NewsResult<()>;

    /// Replace whatever is shown with `articles`. An empty slice means nothing was found.
    fn show_articles(&mut self, articles: &[Article]) -> NewsResult<()>;

    fn show_no_connectivity(&mut self) -> NewsResult<()>;
}
