//! HMAC-SHA256 query signing.
//!
//! The API recomputes the HMAC over the query string it received (without
//! the trailing `signature` term), so the digest must cover the exact bytes
//! produced by [`ParameterSet::encode`](crate::params::ParameterSet::encode).

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs canonical query strings with a secret key.
#[derive(Clone)]
pub struct QuerySigner {
    secret_key: String,
}

impl QuerySigner {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
        }
    }

    /// Lowercase hex HMAC-SHA256 of `query`.
    pub fn signature(&self, query: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .expect("HMAC can take any key size");
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// `query` followed by the literal `&signature=<hex>` term.
    pub fn sign(&self, query: &str) -> String {
        let signature = self.signature(query);
        format!("{}&signature={}", query, signature)
    }
}

impl std::fmt::Debug for QuerySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySigner")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
