//! The API client: URL generation, signing and the `take` round trip.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use url::Url;

use crate::options::TakeOptions;
use crate::params::Param;
use crate::signer::QuerySigner;
use crate::transport::Transport;
use crate::{ClientConfig, Error, Result, TAKE_PATH};

/// Client for the ScreenshotOne API.
///
/// Immutable once built; clone it or share it behind an `Arc` to issue
/// concurrent requests.
#[derive(Clone)]
pub struct Client {
    access_key: String,
    signer: Option<QuerySigner>,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Create a client with the default `reqwest` transport.
    ///
    /// An empty `secret_key` yields a client that can only produce unsigned
    /// URLs.
    #[cfg(feature = "reqwest-transport")]
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            ..Default::default()
        })
    }

    /// Create a client that sends requests through `transport`.
    pub fn with_transport(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self::from_config_with_transport(
            ClientConfig {
                access_key: access_key.into(),
                secret_key: secret_key.into(),
                ..Default::default()
            },
            transport,
        )
    }

    /// Create a client from a full configuration with the default transport.
    #[cfg(feature = "reqwest-transport")]
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = crate::transport::ReqwestTransport::new(&config)?;
        Ok(Self::from_config_with_transport(config, Arc::new(transport)))
    }

    /// Create a client from the `SCREENSHOTONE_*` environment variables.
    #[cfg(feature = "reqwest-transport")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    pub fn from_config_with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let signer = if config.secret_key.is_empty() {
            None
        } else {
            Some(QuerySigner::new(config.secret_key))
        };

        Self {
            access_key: config.access_key,
            signer,
            base_url: config.base_url,
            transport,
        }
    }

    /// Access key sent with every request.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Whether the client can produce signed URLs.
    pub fn has_secret(&self) -> bool {
        self.signer.is_some()
    }

    /// Canonical query for `options` with the client's access key set.
    fn canonical_query(&self, options: &TakeOptions) -> String {
        let mut query = options.parameters().clone();
        query.set(Param::AccessKey, self.access_key.clone());
        query.encode()
    }

    /// `<base_url>/take?<query>`. A base URL carrying its own query or
    /// fragment is rejected rather than silently rewritten.
    fn take_url(&self, query: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        if url.query().is_some() || url.fragment().is_some() {
            return Err(Error::UrlConstruction(format!(
                "base URL must not have a query or fragment: {}",
                self.base_url
            )));
        }

        url.path_segments_mut()
            .map_err(|_| Error::UrlConstruction(format!("base URL cannot have a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(TAKE_PATH.trim_start_matches('/'));
        url.set_query(Some(query));
        Ok(url)
    }

    /// Generate a signed URL for `options` without sending any request.
    ///
    /// Fails with [`Error::MissingSecret`] when the client has no secret key.
    pub fn generate_take_url(&self, options: &TakeOptions) -> Result<Url> {
        let signer = self.signer.as_ref().ok_or(Error::MissingSecret)?;
        let query = signer.sign(&self.canonical_query(options));
        self.take_url(&query)
    }

    /// Generate a URL for `options` without a signature.
    pub fn generate_unsigned_take_url(&self, options: &TakeOptions) -> Result<Url> {
        self.take_url(&self.canonical_query(options))
    }

    /// Take a screenshot and return the image bytes.
    ///
    /// Status 200 and 201 are successes; any other status yields
    /// [`Error::Remote`] and no body.
    pub async fn take(&self, options: &TakeOptions) -> Result<Vec<u8>> {
        let url = self.generate_take_url(options)?;
        debug!("taking screenshot via {}{}", url.host_str().unwrap_or(""), url.path());

        let response = self.transport.get(&url).await?;
        match response.status {
            200 | 201 => response.bytes().await,
            status => Err(Error::Remote {
                status,
                status_text: response.status_text,
            }),
        }
    }

    /// Like [`take`](Self::take), but abort with [`Error::Cancelled`] as soon
    /// as `cancel` completes.
    pub async fn take_with_cancel<F>(&self, options: &TakeOptions, cancel: F) -> Result<Vec<u8>>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.take(options) => result,
            _ = cancel => {
                debug!("screenshot request cancelled by caller");
                Err(Error::Cancelled)
            }
        }
    }

    /// Like [`take`](Self::take), but give up with [`Error::Timeout`] after
    /// `timeout`.
    pub async fn take_with_timeout(&self, options: &TakeOptions, timeout: Duration) -> Result<Vec<u8>> {
        tokio::time::timeout(timeout, self.take(options))
            .await
            .map_err(|_| Error::Timeout(whole_millis(timeout)))?
    }
}

/// Milliseconds in `duration`, saturating at `u64::MAX`.
fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("access_key", &self.access_key)
            .field("signed", &self.signer.is_some())
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedTransport {
        status: u16,
        status_text: &'static str,
        body: &'static [u8],
        seen: Mutex<Vec<String>>,
    }

    impl FixedTransport {
        fn new(status: u16, status_text: &'static str, body: &'static [u8]) -> Arc<Self> {
            Arc::new(Self {
                status,
                status_text,
                body,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn get(&self, url: &Url) -> Result<TransportResponse> {
            self.seen.lock().unwrap().push(url.to_string());
            Ok(TransportResponse::from_bytes(self.status, self.status_text, self.body))
        }
    }

    fn client(secret: &str) -> Client {
        Client::with_transport("IVmt2ghj9TG_jQ", secret, FixedTransport::new(200, "OK", b""))
    }

    #[test]
    fn access_key_overrides_caller_value() {
        let options = TakeOptions::url("https://example.com")
            .set(Param::AccessKey, "forged")
            .set(Param::AccessKey, "forged-again");
        let url = client("").generate_unsigned_take_url(&options).unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.screenshotone.com/take?access_key=IVmt2ghj9TG_jQ&url=https%3A%2F%2Fexample.com"
        );
    }

    #[test]
    fn generation_leaves_options_untouched() {
        let options = TakeOptions::url("https://example.com");
        let before = options.clone();
        client("secret").generate_take_url(&options).unwrap();
        assert_eq!(options, before);
        assert!(!options.parameters().contains(Param::AccessKey));
    }

    #[test]
    fn missing_secret_is_reported() {
        let err = client("")
            .generate_take_url(&TakeOptions::url("https://example.com"))
            .unwrap_err();
        assert!(matches!(err, Error::MissingSecret));
        assert!(err.to_string().contains("secret key is required"));
    }

    #[test]
    fn invalid_base_url_is_a_construction_error() {
        let client = Client::from_config_with_transport(
            ClientConfig {
                access_key: "key".into(),
                secret_key: "secret".into(),
                base_url: "not a url".into(),
                ..Default::default()
            },
            FixedTransport::new(200, "OK", b""),
        );
        let err = client
            .generate_take_url(&TakeOptions::url("https://example.com"))
            .unwrap_err();
        assert!(matches!(err, Error::UrlConstruction(_)));
    }

    #[test]
    fn trailing_slash_on_base_url_is_ignored() {
        let client = Client::from_config_with_transport(
            ClientConfig {
                access_key: "key".into(),
                base_url: "http://127.0.0.1:8080/".into(),
                ..Default::default()
            },
            FixedTransport::new(200, "OK", b""),
        );
        let url = client
            .generate_unsigned_take_url(&TakeOptions::url("u"))
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/take?access_key=key&url=u");
    }

    #[test]
    fn base_url_with_query_or_fragment_is_rejected() {
        for base_url in ["http://h?x=1", "http://h/#frag", "mailto:ops@example.com"] {
            let client = Client::from_config_with_transport(
                ClientConfig {
                    access_key: "k".into(),
                    base_url: base_url.into(),
                    ..Default::default()
                },
                FixedTransport::new(200, "OK", b""),
            );
            let err = client
                .generate_unsigned_take_url(&TakeOptions::url("u"))
                .unwrap_err();
            assert!(matches!(err, Error::UrlConstruction(_)), "{} gave {:?}", base_url, err);
        }
    }

    #[test]
    fn base_url_path_prefix_is_kept() {
        let client = Client::from_config_with_transport(
            ClientConfig {
                access_key: "key".into(),
                base_url: "http://127.0.0.1:8080/v1".into(),
                ..Default::default()
            },
            FixedTransport::new(200, "OK", b""),
        );
        let url = client
            .generate_unsigned_take_url(&TakeOptions::url("u"))
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/v1/take?access_key=key&url=u");
    }

    #[test]
    fn timeout_millis_saturate() {
        assert_eq!(whole_millis(Duration::from_millis(20)), 20);
        assert_eq!(whole_millis(Duration::from_micros(1500)), 1);
        assert_eq!(whole_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn credentials_are_exposed_read_only() {
        let signed = client("secret");
        assert_eq!(signed.access_key(), "IVmt2ghj9TG_jQ");
        assert!(signed.has_secret());

        let unsigned = client("");
        assert_eq!(unsigned.access_key(), "IVmt2ghj9TG_jQ");
        assert!(!unsigned.has_secret());
    }

    #[tokio::test]
    async fn take_sends_the_signed_url() {
        let transport = FixedTransport::new(200, "OK", b"png");
        let client = Client::with_transport("key", "secret", transport.clone());
        let options = TakeOptions::url("https://example.com");

        let image = client.take(&options).await.unwrap();
        assert_eq!(image, b"png");

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], client.generate_take_url(&options).unwrap().as_str());
    }

    #[tokio::test]
    async fn take_maps_status_codes() {
        let options = TakeOptions::url("https://example.com");

        let created = Client::with_transport("key", "secret", FixedTransport::new(201, "Created", b""));
        assert!(created.take(&options).await.unwrap().is_empty());

        let created_with_body =
            Client::with_transport("key", "secret", FixedTransport::new(201, "Created", b"png"));
        assert_eq!(created_with_body.take(&options).await.unwrap(), b"png");

        let rejected =
            Client::with_transport("key", "secret", FixedTransport::new(400, "Bad Request", b"bad request"));
        let err = rejected.take(&options).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("400 Bad Request"));

        let redirected = Client::with_transport("key", "secret", FixedTransport::new(302, "Found", b""));
        assert!(matches!(
            redirected.take(&options).await,
            Err(Error::Remote { status: 302, .. })
        ));
    }

    #[tokio::test]
    async fn take_without_secret_never_reaches_the_transport() {
        let transport = FixedTransport::new(200, "OK", b"png");
        let client = Client::with_transport("key", "", transport.clone());

        let err = client.take(&TakeOptions::url("u")).await.unwrap_err();
        assert!(matches!(err, Error::MissingSecret));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancellation_wins_over_a_stalled_transport() {
        struct Stalled;

        #[async_trait]
        impl Transport for Stalled {
            async fn get(&self, _url: &Url) -> Result<TransportResponse> {
                futures::future::pending().await
            }
        }

        let client = Client::with_transport("key", "secret", Arc::new(Stalled));
        let options = TakeOptions::url("u");

        let err = client
            .take_with_cancel(&options, async {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));

        let err = client
            .take_with_timeout(&options, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(20)));
    }

    #[test]
    fn client_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }
}
