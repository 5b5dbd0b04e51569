//! User input classification
//!
//! Turns whatever was typed into the search box into a fully qualified
//! target URL:
//! - `http://…` / `https://…` is used as-is
//! - anything containing a `.` is treated as a host and gets `https://`
//! - everything else becomes a search-provider query

use crate::config::SearchProvider;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use thiserror::Error;

/// Characters left alone by the browser's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a string the way `encodeURIComponent` does
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Input errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("input is empty")]
    Empty,
}

/// How an input was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Already carried an http(s) scheme
    Url,
    /// Looked like a host name; `https://` was added
    Host,
    /// Wrapped into a search-provider query
    Search,
}

/// A classified input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    /// The trimmed input
    pub input: String,
    /// Fully qualified URL to open through the proxy
    pub url: String,
    pub kind: TargetKind,
}

impl Target {
    /// Classify raw input using the given search provider
    pub fn resolve(raw: &str, provider: SearchProvider) -> Result<Self, InputError> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(InputError::Empty);
        }

        let (url, kind) = if input.starts_with("http://") || input.starts_with("https://") {
            (input.to_string(), TargetKind::Url)
        } else if input.contains('.') {
            (format!("https://{}", input), TargetKind::Host)
        } else {
            (
                format!("{}{}", provider.query_prefix(), encode_component(input)),
                TargetKind::Search,
            )
        };

        Ok(Self {
            input: input.to_string(),
            url,
            kind,
        })
    }

    /// Wrap a literal URL without classification (quick links)
    pub fn literal(url: &str) -> Self {
        Self {
            input: url.to_string(),
            url: url.to_string(),
            kind: TargetKind::Url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(raw: &str) -> Result<Target, InputError> {
        Target::resolve(raw, SearchProvider::Google)
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(resolve(""), Err(InputError::Empty));
        assert_eq!(resolve("   "), Err(InputError::Empty));
        assert_eq!(resolve("\t\n"), Err(InputError::Empty));
    }

    #[test]
    fn test_scheme_kept() {
        let target = resolve("http://plain.test").unwrap();
        assert_eq!(target.url, "http://plain.test");
        assert_eq!(target.kind, TargetKind::Url);

        let target = resolve("  https://example.com/a?b=c  ").unwrap();
        assert_eq!(target.url, "https://example.com/a?b=c");
    }

    #[test]
    fn test_host_gets_https() {
        let target = resolve("example.com").unwrap();
        assert_eq!(target.url, "https://example.com");
        assert_eq!(target.kind, TargetKind::Host);
    }

    #[test]
    fn test_search_wrapped() {
        let target = resolve("hello world").unwrap();
        assert_eq!(target.url, "https://www.google.com/search?q=hello%20world");
        assert_eq!(target.kind, TargetKind::Search);
        assert_eq!(target.input, "hello world");
    }

    #[test]
    fn test_search_provider() {
        let target = Target::resolve("rust", SearchProvider::DuckDuckGo).unwrap();
        assert_eq!(target.url, "https://duckduckgo.com/?q=rust");
    }

    #[test]
    fn test_scheme_only_matches_prefix() {
        // Only http(s) counts as a scheme
        let target = resolve("ftp://host").unwrap();
        assert_eq!(target.kind, TargetKind::Search);
        assert_eq!(target.url, "https://www.google.com/search?q=ftp%3A%2F%2Fhost");
    }

    #[test]
    fn test_encode_component_matches_browser() {
        assert_eq!(encode_component("a b"), "a%20b");
        assert_eq!(encode_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_component("?&=#/:+"), "%3F%26%3D%23%2F%3A%2B");
        assert_eq!(encode_component("%20"), "%2520");
        assert_eq!(encode_component("é"), "%C3%A9");
    }
}
