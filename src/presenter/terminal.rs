use std::io::Write;

use tracing::debug;

use crate::domain::Article;
use crate::errors::NewsResult;
use crate::presenter::ArticlePresenter;

pub const NO_NEWS_MESSAGE: &str = "No news found.";
pub const NO_CONNECTION_MESSAGE: &str = "No internet connection.";

/// Renders articles as a numbered list and remembers them for selection
pub struct TerminalPresenter<W: Write> {
    out: W,
    articles: Vec<Article>,
    json: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            articles: Vec::new(),
            json: false,
        }
    }

    /// Print delivered articles as a JSON array instead of rows
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Article at 1-based `number` in the last delivered list
    pub fn select(&self, number: usize) -> Option<&Article> {
        number.checked_sub(1).and_then(|i| self.articles.get(i))
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_row(&mut self, number: usize, article: &Article) -> NewsResult<()> {
        let date = article.display_date().unwrap_or_else(|| {
            debug!(timestamp = article.published_at(), "Problem parsing the date string");
            article.published_at().to_string()
        });

        writeln!(self.out, "{:>3}. {}", number, article.title())?;

        let mut details = vec![article.section(), article.author(), date.as_str()];
        details.retain(|d| !d.is_empty());
        writeln!(self.out, "     {}", details.join(" | "))?;

        Ok(())
    }
}

impl<W: Write> ArticlePresenter for TerminalPresenter<W> {
    fn show_loading(&mut self) -> NewsResult<()> {
        if !self.json {
            writeln!(self.out, "Loading news...")?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn show_articles(&mut self, articles: &[Article]) -> NewsResult<()> {
        self.articles = articles.to_vec();

        if self.json {
            let json = serde_json::to_string_pretty(&self.articles)?;
            writeln!(self.out, "{}", json)?;
            return Ok(());
        }

        if self.articles.is_empty() {
            writeln!(self.out, "{}", NO_NEWS_MESSAGE)?;
            return Ok(());
        }

        writeln!(self.out)?;
        let articles = std::mem::take(&mut self.articles);
        for (i, article) in articles.iter().enumerate() {
            self.write_row(i + 1, article)?;
        }
        self.articles = articles;

        Ok(())
    }

    fn show_no_connectivity(&mut self) -> NewsResult<()> {
        self.articles.clear();
        writeln!(self.out, "{}", NO_CONNECTION_MESSAGE)?;
        Ok(())
    }
}
