use crate::{
    auth::{ASSERTION_LIFETIME_SECS, JwtConfig},
    error::{Error, Result},
    transport::Transport,
};
use reqwest::{
    Method, Request, Url,
    header::{CONTENT_TYPE, HeaderValue},
};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::form_urlencoded;

pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Tokens this close to expiry are refreshed before use
const EXPIRY_SKEW: Duration = Duration::from_secs(10);

/// An OAuth2 access token and when it stops being valid
#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: Instant,
}

impl Token {
    pub fn is_valid(&self) -> bool {
        Instant::now() + EXPIRY_SKEW < self.expires_at
    }

    /// Value for the Authorization header
    pub fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("{} {}", self.token_type, self.access_token))
            .map_err(|_| Error::MalformedToken)?;
        value.set_sensitive(true);

        Ok(value)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchanges signed assertions for access tokens and caches the result
pub struct TokenSource {
    config: JwtConfig,
    cached: Mutex<Option<Token>>,
}

impl TokenSource {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            config,
            cached: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Return a valid token, fetching a new one over `transport` when needed
    pub async fn token(&self, transport: &dyn Transport) -> Result<Token> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.clone());
        }

        let token = self.fetch(transport).await?;
        *cached = Some(token.clone());

        Ok(token)
    }

    #[tracing::instrument(skip_all, fields(token_uri = %self.config.token_uri))]
    async fn fetch(&self, transport: &dyn Transport) -> Result<Token> {
        tracing::debug!("Requesting access token");

        let assertion = self.config.assertion()?;
        let url = Url::parse(&self.config.token_uri)
            .map_err(|_| Error::InvalidUrl(self.config.token_uri.clone()))?;

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", JWT_BEARER_GRANT_TYPE)
            .append_pair("assertion", &assertion)
            .finish();

        let mut request = Request::new(Method::POST, url);
        request.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        *request.body_mut() = Some(body.into());

        let response = transport.execute(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<TokenErrorResponse>(&bytes) {
                Ok(e) => match e.error_description {
                    Some(description) => format!("{}: {}", e.error, description),
                    None => e.error,
                },
                Err(_) => String::from_utf8_lossy(&bytes).trim().to_string(),
            };

            tracing::error!("Token endpoint refused the assertion: {}", message);
            return Err(Error::TokenExchange { status, message });
        }

        let response: TokenResponse = serde_json::from_slice(&bytes)?;

        if response.access_token.is_empty() {
            return Err(Error::TokenExchange {
                status,
                message: "response did not contain an access token".to_string(),
            });
        }

        let token_type = match response.token_type.as_str() {
            "" | "bearer" => "Bearer".to_string(),
            other => other.to_string(),
        };

        // Tokens never outlive the assertion they were issued for
        let expires_in = response
            .expires_in
            .unwrap_or(ASSERTION_LIFETIME_SECS)
            .min(ASSERTION_LIFETIME_SECS);
        tracing::debug!(expires_in, "Obtained access token");

        Ok(Token {
            access_token: response.access_token,
            token_type,
            expires_at: Instant::now() + Duration::from_secs(expires_in),
        })
    }
}
