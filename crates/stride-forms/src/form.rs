//! Form description

use serde::{Deserialize, Serialize};

use stride_core::Location;
use stride_fetch::FetchRequest;

use crate::error::FormError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMethod {
    #[default]
    Get,
    Post,
}

impl FormMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormMethod::Get => "get",
            FormMethod::Post => "post",
        }
    }
}

impl std::str::FromStr for FormMethod {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "get" => Ok(FormMethod::Get),
            "post" => Ok(FormMethod::Post),
            _ => Err(FormError::UnknownMethod(s.to_string())),
        }
    }
}

/// The originating form: where it submits, how, and with which fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub name: Option<String>,
    pub action: Location,
    pub method: FormMethod,
    /// Field name/value pairs in document order; names may repeat
    pub fields: Vec<(String, String)>,
}

impl Form {
    pub fn new(action: Location) -> Self {
        Self {
            name: None,
            action,
            method: FormMethod::default(),
            fields: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_method(mut self, method: FormMethod) -> Self {
        self.method = method;
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Name for logs: the form name, or its action
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.action.as_str())
    }

    /// GET encodes the fields into the action's query, POST into the body.
    pub fn to_fetch_request(&self) -> FetchRequest {
        let pairs = self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        match self.method {
            FormMethod::Get => FetchRequest::get(&self.action.with_query_pairs(pairs)),
            FormMethod::Post => FetchRequest::post_form(&self.action, pairs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_fetch::FetchMethod;

    fn action(path: &str) -> Location {
        Location::parse(&format!("https://example.com{}", path)).unwrap()
    }

    #[test]
    fn test_parse_method() {
        assert_eq!("POST".parse::<FormMethod>().unwrap(), FormMethod::Post);
        assert_eq!(" get ".parse::<FormMethod>().unwrap(), FormMethod::Get);
        assert_eq!(
            "dialog".parse::<FormMethod>(),
            Err(FormError::UnknownMethod("dialog".to_string()))
        );
        assert_eq!(FormMethod::default(), FormMethod::Get);
    }

    #[test]
    fn test_get_form_replaces_query() {
        let form = Form::new(action("/search?stale=1"))
            .field("q", "rust")
            .field("tag", "a")
            .field("tag", "b");
        let request = form.to_fetch_request();

        assert_eq!(request.method, FetchMethod::Get);
        assert_eq!(
            request.location.as_str(),
            "https://example.com/search?q=rust&tag=a&tag=b"
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn test_post_form_sends_body() {
        let form = Form::new(action("/comments"))
            .with_name("comment")
            .with_method(FormMethod::Post)
            .field("text", "hello world");
        let request = form.to_fetch_request();

        assert_eq!(request.method, FetchMethod::Post);
        assert_eq!(request.location.as_str(), "https://example.com/comments");
        assert_eq!(request.body.as_deref(), Some("text=hello+world"));
        assert_eq!(form.label(), "comment");
    }

    #[test]
    fn test_deserialize_form() {
        let json = r#"{
            "name": null,
            "action": "https://example.com/login",
            "method": "post",
            "fields": [["user", "ada"]]
        }"#;
        let form: Form = serde_json::from_str(json).unwrap();
        assert_eq!(form.method, FormMethod::Post);
        assert_eq!(form.label(), "https://example.com/login");
        assert_eq!(form.fields, vec![("user".to_string(), "ada".to_string())]);
    }
}
