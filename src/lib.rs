//! ScreenshotOne API client
//!
//! Builds canonical, HMAC-SHA256 signed request URLs for the ScreenshotOne
//! `take` endpoint and optionally performs the request, returning the raw
//! image bytes.
//!
//! # Features
//!
//! - **Options builder**: one typed setter per API parameter, chained freely
//! - **Signed URLs**: deterministic query serialization signed with the
//!   secret key, usable directly in `<img>` tags or from any HTTP client
//! - **Pluggable transport**: `reqwest` by default (`reqwest-transport`
//!   feature), or any [`Transport`] implementation
//!
//! # Example
//!
//! ```no_run
//! use screenshotone::{Client, TakeOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("IVmt2ghj9TG_jQ", "Sxt94yAj9aQSgg")?;
//!
//! let options = TakeOptions::url("https://scalabledeveloper.com")
//!     .format("png")
//!     .full_page(true)
//!     .device_scale_factor(2)
//!     .block_ads(true)
//!     .block_trackers(true);
//!
//! println!("{}", client.generate_take_url(&options)?);
//!
//! let image = client.take(&options).await?;
//! std::fs::write("screenshot.png", image)?;
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;

pub mod error;
pub use error::{Error, Result};

pub mod params;
pub use params::{Param, ParameterSet, UnknownParam};

pub mod options;
pub use options::TakeOptions;

pub mod signer;

pub mod transport;
pub use transport::{Transport, TransportResponse};
#[cfg(feature = "reqwest-transport")]
pub use transport::ReqwestTransport;

pub mod client;
pub use client::Client;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.screenshotone.com";

/// Path of the screenshot endpoint, relative to the base URL
pub const TAKE_PATH: &str = "/take";

/// Client configuration
///
/// Only `access_key` is required. The defaults target the public API:
/// - `secret_key` empty, which restricts the client to unsigned URLs
/// - `base_url` is [`DEFAULT_BASE_URL`]
/// - `timeout_ms` bounds a whole request on the default transport
///
/// # Examples
///
/// ```
/// let cfg = screenshotone::ClientConfig::default();
/// assert_eq!(cfg.base_url, "https://api.screenshotone.com");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Access key identifying the account
    pub access_key: String,
    /// Secret key used to sign requests
    pub secret_key: String,
    /// Base endpoint, without the `/take` path
    pub base_url: String,
    /// Request timeout in milliseconds (default transport only)
    pub timeout_ms: u64,
    /// User agent sent to the API (default transport only)
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            secret_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 60000,
            user_agent: concat!("screenshotone-rust/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub const ACCESS_KEY_ENV: &'static str = "SCREENSHOTONE_ACCESS_KEY";
    pub const SECRET_KEY_ENV: &'static str = "SCREENSHOTONE_SECRET_KEY";
    pub const BASE_URL_ENV: &'static str = "SCREENSHOTONE_BASE_URL";

    /// Read credentials from the environment. The access key is required;
    /// the secret key and base URL are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key = lookup(Self::ACCESS_KEY_ENV)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::ConfigError(format!("{} is not set", Self::ACCESS_KEY_ENV)))?;

        let mut config = Self {
            access_key,
            ..Default::default()
        };
        if let Some(secret) = lookup(Self::SECRET_KEY_ENV) {
            config.secret_key = secret;
        }
        if let Some(base) = lookup(Self::BASE_URL_ENV).filter(|v| !v.is_empty()) {
            config.base_url = base;
        }
        Ok(config)
    }

    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        if config.access_key.is_empty() {
            return Err(Error::ConfigError("access_key is required".into()));
        }
        Ok(config)
    }
}
