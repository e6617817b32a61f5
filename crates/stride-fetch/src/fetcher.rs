//! Fetchers

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use stride_core::{Config, Location};

use crate::error::FetchError;
use crate::request::{FetchMethod, FetchRequest};
use crate::response::FetchResponse;
use crate::Result;

/// Performs one network exchange on behalf of a visit or form submission.
///
/// Dropping the returned future is how a cancelled caller gives up on the
/// exchange; implementations need no other cancellation hook.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse>;
}

/// [`Fetcher`] backed by a shared reqwest client
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    accept: String,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            accept: config.accept.clone(),
        })
    }

    /// Translate a [`FetchRequest`] into the request reqwest will send.
    pub fn build_request(&self, request: &FetchRequest) -> Result<reqwest::Request> {
        let method = match request.method {
            FetchMethod::Get => reqwest::Method::GET,
            FetchMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .client
            .request(method, request.location.as_url().clone())
            .header(ACCEPT, self.accept.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        Ok(builder.build()?)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        let outgoing = self.build_request(&request)?;

        tracing::debug!(
            method = %request.method,
            location = %request.location,
            "Sending request"
        );

        let response = self.client.execute(outgoing).await?;

        let location = Location::from(response.url().clone());
        let redirected = location.as_url() != request.location.as_url();
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        tracing::debug!(
            location = %location,
            status,
            redirected,
            "Received response"
        );

        Ok(FetchResponse {
            location,
            status,
            redirected,
            content_type,
            body: Some(body).filter(|b| !b.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_build_get_request() {
        let location = Location::parse("https://example.com/page?x=1#top").unwrap();
        let request = fetcher().build_request(&FetchRequest::get(&location)).unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().as_str(), "https://example.com/page?x=1");
        assert_eq!(
            request.headers().get(ACCEPT).unwrap(),
            "text/html, application/xhtml+xml"
        );
        assert!(request.body().is_none());
    }

    #[test]
    fn test_build_post_request() {
        let location = Location::parse("https://example.com/comments").unwrap();
        let request = FetchRequest::post_form(&location, [("body", "hi there")])
            .with_header("X-Requested-With", "stride");
        let request = fetcher().build_request(&request).unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(request.headers().get("x-requested-with").unwrap(), "stride");
        assert_eq!(
            request.body().and_then(|b| b.as_bytes()),
            Some("body=hi+there".as_bytes())
        );
    }
}
