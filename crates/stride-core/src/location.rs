//! Navigable addresses

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::Result;

/// An immutable, absolute address that a visit or form submission can target.
///
/// Two locations are equal when their serialized URLs are equal, fragment included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(Url);

impl Location {
    pub fn parse(input: &str) -> Result<Self> {
        Ok(Self(Url::parse(input.trim())?))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Fragment without the leading `#`, if any
    pub fn anchor(&self) -> Option<&str> {
        self.0.fragment()
    }

    /// The address actually sent over the wire: the same location without its fragment.
    pub fn request_location(&self) -> Location {
        let mut url = self.0.clone();
        url.set_fragment(None);
        Self(url)
    }

    /// Copy of this location whose query string is replaced by the encoded pairs.
    ///
    /// An empty iterator clears the query entirely.
    pub fn with_query_pairs<I, K, V>(&self, pairs: I) -> Location
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.0.clone();
        url.set_query(None);
        {
            let mut serializer = url.query_pairs_mut();
            serializer.extend_pairs(pairs);
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Self(url)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for Location {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Url> for Location {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_compare() {
        let a = Location::parse("https://example.com/path").unwrap();
        let b: Location = "https://example.com/path".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "https://example.com/path");
        assert_eq!(a.to_string(), "https://example.com/path");

        assert!(Location::parse("not a url").is_err());
    }

    #[test]
    fn test_anchor_and_request_location() {
        let location = Location::parse("https://example.com/docs#intro").unwrap();
        assert_eq!(location.anchor(), Some("intro"));

        let request = location.request_location();
        assert_eq!(request.as_str(), "https://example.com/docs");
        assert!(request.anchor().is_none());
        assert_ne!(request, location);
    }

    #[test]
    fn test_with_query_pairs() {
        let action = Location::parse("https://example.com/search?old=1").unwrap();

        let location = action.with_query_pairs([("q", "rust lang"), ("page", "2")]);
        assert_eq!(location.as_str(), "https://example.com/search?q=rust+lang&page=2");

        let cleared = action.with_query_pairs(Vec::<(String, String)>::new());
        assert_eq!(cleared.as_str(), "https://example.com/search");
    }

    #[test]
    fn test_serde_as_string() {
        let location = Location::parse("https://example.com/a").unwrap();
        let json = serde_json::to_string(&location).unwrap();
        assert_eq!(json, "\"https://example.com/a\"");

        let back: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(back, location);
    }
}
