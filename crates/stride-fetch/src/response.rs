//! Completed responses

use stride_core::Location;

/// A response whose body has already been read.
///
/// `location` is the final address after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub location: Location,
    pub status: u16,
    pub redirected: bool,
    pub content_type: Option<String>,
    pub body: Option<String>,
}

impl FetchResponse {
    pub fn new(location: Location, status: u16) -> Self {
        Self {
            location,
            status,
            redirected: false,
            content_type: None,
            body: None,
        }
    }

    /// 200 response carrying an HTML body
    pub fn html(location: Location, body: impl Into<String>) -> Self {
        Self::new(location, 200)
            .with_content_type("text/html; charset=utf-8")
            .with_body(body)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_redirected(mut self, redirected: bool) -> Self {
        self.redirected = redirected;
        self
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn succeeded(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn failed(&self) -> bool {
        !self.succeeded()
    }

    pub fn client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    pub fn is_html(&self) -> bool {
        self.content_type.as_deref().is_some_and(|content_type| {
            let mime = content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            mime == "text/html" || mime == "application/xhtml+xml"
        })
    }

    /// Renderable content, if any. `None` for non-HTML or empty responses.
    pub fn response_html(&self) -> Option<&str> {
        if self.is_html() {
            self.body.as_deref().filter(|body| !body.is_empty())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> Location {
        Location::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_status_classes() {
        assert!(FetchResponse::new(location(), 204).succeeded());
        assert!(FetchResponse::new(location(), 302).failed());

        let not_found = FetchResponse::new(location(), 404);
        assert!(not_found.failed() && not_found.client_error() && !not_found.server_error());

        let unavailable = FetchResponse::new(location(), 503);
        assert!(unavailable.server_error() && !unavailable.client_error());
    }

    #[test]
    fn test_response_html_requires_html_content_type() {
        let html = FetchResponse::html(location(), "<p>ok</p>");
        assert_eq!(html.response_html(), Some("<p>ok</p>"));

        let xhtml = FetchResponse::new(location(), 200)
            .with_content_type("Application/XHTML+XML")
            .with_body("<p/>");
        assert_eq!(xhtml.response_html(), Some("<p/>"));

        let json = FetchResponse::new(location(), 200)
            .with_content_type("application/json")
            .with_body("{}");
        assert!(json.response_html().is_none());

        let untyped = FetchResponse::new(location(), 200).with_body("<p>?</p>");
        assert!(untyped.response_html().is_none());

        let missing = FetchResponse::new(location(), 200).with_content_type("text/html");
        assert!(missing.response_html().is_none());

        let empty = FetchResponse::html(location(), "");
        assert!(empty.is_html());
        assert!(empty.response_html().is_none());
    }
}
