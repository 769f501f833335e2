// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical URL features used by the heuristic classifier.

use serde::Serialize;
use url::{Host, Url};

/// Features of one URL. Extraction fails for unparsable or host-less input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlFeatures {
    /// Length of the input string in characters.
    pub length: usize,
    pub is_https: bool,
    /// Count of `.` in the input string.
    pub dot_count: usize,
    /// Host is a literal IPv4 address (including non-canonical forms such as
    /// `0x7f.1`, which the parser normalises).
    pub ipv4_host: bool,
    /// Length of the path component.
    pub path_length: usize,
}

impl UrlFeatures {
    pub fn extract(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let parsed = Url::parse(trimmed).ok()?;
        let host = parsed.host()?;
        if matches!(&host, Host::Domain(domain) if domain.is_empty()) {
            return None;
        }

        Some(Self {
            length: trimmed.chars().count(),
            is_https: parsed.scheme() == "https",
            dot_count: trimmed.matches('.').count(),
            ipv4_host: matches!(host, Host::Ipv4(_)),
            path_length: parsed.path().len(),
        })
    }
}

/// True when `raw` parses as a URL with the `https` scheme.
pub fn is_https(raw: &str) -> bool {
    Url::parse(raw.trim()).is_ok_and(|u| u.scheme() == "https")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_basic_features() {
        let f = UrlFeatures::extract("https://www.example.com/login").unwrap();
        assert!(f.is_https);
        assert!(!f.ipv4_host);
        assert_eq!(f.dot_count, 2);
        assert_eq!(f.path_length, "/login".len());
        assert_eq!(f.length, "https://www.example.com/login".len());
    }

    #[test]
    fn detects_ipv4_literal_hosts() {
        assert!(UrlFeatures::extract("http://192.168.0.1/admin").unwrap().ipv4_host);
        assert!(UrlFeatures::extract("http://0x7f.1/").unwrap().ipv4_host);
        assert!(!UrlFeatures::extract("http://[::1]/").unwrap().ipv4_host);
    }

    #[test]
    fn unparsable_or_hostless_input_yields_none() {
        assert_eq!(UrlFeatures::extract("not a url"), None);
        assert_eq!(UrlFeatures::extract("example.com/no-scheme"), None);
        assert_eq!(UrlFeatures::extract("mailto:someone@example.com"), None);
        assert_eq!(UrlFeatures::extract(""), None);
    }

    #[test]
    fn https_detection() {
        assert!(is_https("https://example.com"));
        assert!(is_https("  HTTPS://example.com  "));
        assert!(!is_https("http://example.com"));
        assert!(!is_https("garbage"));
    }
}
