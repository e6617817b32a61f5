//! Stride Core
//!
//! Value types shared by every layer of the navigation core: the navigable
//! [`Location`], the [`RestorationIdentifier`] minted per navigation, and the
//! ambient configuration and logging setup.

mod config;
mod error;
mod identifier;
mod location;

pub use config::Config;
pub use error::CoreError;
pub use identifier::RestorationIdentifier;
pub use location::Location;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// `RUST_LOG` wins over `Config::log_filter`. Calling this more than once is harmless.
pub fn init_logging(config: &Config) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));

    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
