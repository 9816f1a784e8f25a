use crate::{
    auth::{service_account::ServiceAccountKey, token::TokenSource},
    error::{Error, Result},
    transport::Transport,
};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::{Request, Response, header::AUTHORIZATION};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

pub mod service_account;
pub mod token;

/// View your Google Analytics data
pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

/// Token endpoint used when the key file does not name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime requested for each signed assertion
pub(crate) const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Configuration for the two-legged JWT bearer flow of a service account
#[derive(Clone)]
pub struct JwtConfig {
    pub email: String,
    pub private_key_id: Option<String>,
    pub scopes: Vec<String>,
    pub token_uri: String,
    key: EncodingKey,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("email", &self.email)
            .field("private_key_id", &self.private_key_id)
            .field("scopes", &self.scopes)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

impl JwtConfig {
    /// Parse a service account JSON key into a JWT config for the given scopes
    ///
    /// No network request is made here; the private key is only parsed so
    /// that a broken key file fails before anything is sent.
    pub fn from_json(data: &[u8], scopes: &[&str]) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_slice(data)
            .map_err(|e| Error::InvalidKey(format!("malformed JSON: {e}")))?;

        if let Some(key_type) = key.key_type.as_deref() {
            if key_type != "service_account" {
                return Err(Error::InvalidKey(format!(
                    "'type' field is {key_type:?} (expected \"service_account\")"
                )));
            }
        }

        if key.client_email.is_empty() {
            return Err(Error::InvalidKey("missing 'client_email'".to_string()));
        }

        if key.private_key.is_empty() {
            return Err(Error::InvalidKey("missing 'private_key'".to_string()));
        }

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| Error::InvalidKey(format!("unable to parse 'private_key': {e}")))?;

        let token_uri = if key.token_uri.is_empty() {
            DEFAULT_TOKEN_URI.to_string()
        } else {
            key.token_uri
        };

        Ok(Self {
            email: key.client_email,
            private_key_id: key.private_key_id.filter(|id| !id.is_empty()),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            token_uri,
            key: encoding_key,
        })
    }

    /// Sign a fresh assertion to trade for an access token
    pub fn assertion(&self) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let claims = Claims {
            iss: &self.email,
            scope: self.scopes.join(" "),
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        Ok(encode(&header, &claims, &self.key)?)
    }

    /// Wrap `inner` so every request carries a bearer token for this account
    pub fn client<T: Transport>(self, inner: T) -> AuthorizedTransport<T> {
        AuthorizedTransport {
            inner,
            tokens: TokenSource::new(self),
        }
    }
}

/// Attaches an access token to each request before handing it to the inner transport
pub struct AuthorizedTransport<T> {
    inner: T,
    tokens: TokenSource,
}

impl<T: Transport> AuthorizedTransport<T> {
    pub fn config(&self) -> &JwtConfig {
        self.tokens.config()
    }
}

#[async_trait]
impl<T: Transport> Transport for AuthorizedTransport<T> {
    async fn execute(&self, mut request: Request) -> Result<Response> {
        let token = self.tokens.token(&self.inner).await?;
        request
            .headers_mut()
            .insert(AUTHORIZATION, token.header_value()?);

        self.inner.execute(request).await
    }
}
