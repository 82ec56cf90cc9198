//! Article content fetching
//!
//! Fetches the pages behind search result URLs so the answer generator sees
//! real article text instead of snippets.
//!
//! ## Architecture
//!
//! ```text
//! Article URL → ContentFetcher → HTML → extract_article_text → "## heading\n\nparagraph..."
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let fetcher = ContentFetcher::new(ContentFetchConfig::from_env())?;
//! let text = fetcher.fetch("https://example.com/article").await?;
//! ```

pub mod config;
pub mod extractor;
pub mod fetcher;

pub use config::ContentFetchConfig;
pub use extractor::extract_article_text;
pub use fetcher::{ContentFetcher, FetchError, PageFetcher};
