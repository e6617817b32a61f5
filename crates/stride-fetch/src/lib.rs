//! Stride Fetch
//!
//! The boundary between the navigation core and the network. Visits and form
//! submissions describe what they need as a [`FetchRequest`] and hand it to a
//! [`Fetcher`]; the answer comes back as a fully read [`FetchResponse`].

mod error;
mod fetcher;
mod request;
mod response;

pub use error::FetchError;
pub use fetcher::{Fetcher, HttpFetcher};
pub use request::{FetchMethod, FetchRequest};
pub use response::FetchResponse;

pub type Result<T> = std::result::Result<T, FetchError>;
