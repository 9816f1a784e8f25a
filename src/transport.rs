use crate::error::Result;
use async_trait::async_trait;
use reqwest::{Client, Request, Response, header::HeaderMap};
use std::time::Instant;

/// Something that can execute an HTTP request
///
/// Decorators wrap another transport to add behaviour such as logging or
/// authorization, so the chain is picked once at construction time.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl Transport for Client {
    async fn execute(&self, request: Request) -> Result<Response> {
        Ok(Client::execute(self, request).await?)
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn execute(&self, request: Request) -> Result<Response> {
        (**self).execute(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn execute(&self, request: Request) -> Result<Response> {
        (**self).execute(request).await
    }
}

/// Create the base HTTP transport, wrapped with request logging in debug mode
pub fn http_transport(debug: bool) -> Result<Box<dyn Transport>> {
    let client = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    if debug {
        tracing::debug!("Wrapping HTTP transport with request logging");
        Ok(Box::new(LoggingTransport::new(client)))
    } else {
        Ok(Box::new(client))
    }
}

/// Logs every request and response passing through the inner transport
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T: Transport> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for LoggingTransport<T> {
    async fn execute(&self, request: Request) -> Result<Response> {
        let body = request
            .body()
            .and_then(|body| body.as_bytes())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            headers = %redacted(request.headers()),
            body = %body,
            "Sending HTTP request"
        );

        let start = Instant::now();
        let response = self.inner.execute(request).await?;

        // Buffer the body so it can be logged and still handed back to the caller
        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;

        tracing::debug!(
            status = %status,
            elapsed = ?start.elapsed(),
            headers = %redacted(&headers),
            body = %String::from_utf8_lossy(&bytes),
            "Received HTTP response"
        );

        let mut rebuilt = http::Response::new(bytes);
        *rebuilt.status_mut() = status;
        *rebuilt.version_mut() = version;
        *rebuilt.headers_mut() = headers;

        Ok(Response::from(rebuilt))
    }
}

/// Render headers for logging with credentials masked
fn redacted(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if value.is_sensitive() || name == reqwest::header::AUTHORIZATION {
                "<redacted>"
            } else {
                value.to_str().unwrap_or("<binary>")
            };

            format!("{name}: {value}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "../tests/common/stub.rs"]
pub(crate) mod stub;
