//! Outgoing requests

use serde::{Deserialize, Serialize};
use std::fmt;

use stride_core::Location;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMethod {
    Get,
    Post,
}

impl FetchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMethod::Get => "GET",
            FetchMethod::Post => "POST",
        }
    }
}

impl fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: FetchMethod,
    pub location: Location,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    /// GET for the location, fragment stripped
    pub fn get(location: &Location) -> Self {
        Self {
            method: FetchMethod::Get,
            location: location.request_location(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// POST with the pairs url-encoded as the body
    pub fn post_form<I, K, V>(location: &Location, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();

        Self {
            method: FetchMethod::Post,
            location: location.request_location(),
            body: Some(body),
            headers: vec![("Content-Type".to_string(), FORM_URLENCODED.to_string())],
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
