// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Domain denylist for search results
//!
//! Social-media pages rarely carry article text that survives scraping, so
//! their links are dropped before any content is fetched.

use url::Url;

/// Domains excluded from search results by default
pub const DEFAULT_EXCLUDED_DOMAINS: &[&str] =
    &["tiktok.com", "linkedin.com", "facebook.com", "x.com"];

/// Filters URLs whose host belongs to an excluded domain
#[derive(Debug, Clone)]
pub struct DomainFilter {
    excluded: Vec<String>,
}

impl DomainFilter {
    /// Create a filter from a list of domains
    ///
    /// Domains are normalized to lowercase without a leading `www.` or dot.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded = domains
            .into_iter()
            .map(|d| normalize_domain(d.as_ref()))
            .filter(|d| !d.is_empty())
            .collect();

        Self { excluded }
    }

    /// Check whether a URL points at an excluded host
    ///
    /// A host matches a domain when it equals it or is a subdomain of it, so
    /// `www.linkedin.com` matches `linkedin.com` but `box.com` does not match
    /// `x.com`. URLs without a parsable host are treated as excluded.
    pub fn is_excluded(&self, url: &str) -> bool {
        let host = match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_lowercase)) {
            Some(host) => host,
            None => return true,
        };

        self.excluded.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    /// Keep only the URLs that are not excluded, preserving order
    pub fn retain_allowed<I>(&self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        urls.into_iter().filter(|u| !self.is_excluded(u)).collect()
    }

    /// The normalized excluded domains
    pub fn domains(&self) -> &[String] {
        &self.excluded
    }
}

impl Default for DomainFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_DOMAINS)
    }
}

fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim().trim_start_matches('.').to_lowercase();
    domain
        .strip_prefix("www.")
        .map(str::to_string)
        .unwrap_or(domain)
}
