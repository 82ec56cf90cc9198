// Version information for the Fabstir RAG search service

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-rag-search-2026-10-17";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-17";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "web-search",
    "article-aggregation",
    "conversation-memory",
    "multi-session",
    "session-expiry",
    "error-codes",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir RAG Search {} ({})", VERSION_NUMBER, BUILD_DATE)
}
