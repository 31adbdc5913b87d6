//! The wire client every console request passes through.
//!
//! Call sites describe a request symbolically (method, route fragment, query
//! parameters, JSON body); the client assembles the URL, applies the active
//! transport mode and normalizes every outcome into the `{success, message}`
//! envelope so controllers never branch on transport-level failures.

use crate::core::config::{AppConfig, TransportMode};
use crate::services::codec::{CodecError, PayloadCodec};
use crate::services::log_failure;
use mauzo_api_models::{Envelope, Method, params};
use serde_json::Value;
use std::future::Future;

/// Errors raised below the envelope: transport, sealing, or decoding.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// Sealing or opening a payload failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The response body was not an envelope.
    #[error("unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// A fully assembled request, ready for a [`Transport`] to issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the rendered query string.
    pub url: String,
    /// JSON (or sealed) body text, when the method carries one.
    pub body: Option<String>,
    /// Value of the `token` header; empty when unauthenticated.
    pub token: String,
}

/// The seam between the client and the browser's fetch machinery. Native
/// tests drive the client through a recording implementation.
pub trait Transport {
    /// Issue the request and return the raw response body text.
    fn execute(&self, request: WireRequest) -> impl Future<Output = Result<String, ApiError>>;
}

/// Ordered query parameters with per-parameter rendering.
///
/// Structured parameters are JSON-serialized before encoding; in sealed mode
/// the whole set collapses into one `payload` parameter instead.
#[derive(Clone, Debug, Default)]
pub struct QueryBuilder {
    pairs: Vec<(&'static str, String)>,
}

impl QueryBuilder {
    /// Append a plain text parameter.
    #[must_use]
    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.pairs.push((name, value.into()));
        self
    }

    /// Append a JSON-valued parameter as its serialized text.
    #[must_use]
    pub fn value(mut self, name: &'static str, value: &Value) -> Self {
        self.pairs.push((name, value.to_string()));
        self
    }

    fn render_plain(&self) -> String {
        self.pairs
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn render_sealed(&self, codec: &PayloadCodec) -> Result<String, CodecError> {
        if self.pairs.is_empty() {
            return Ok(String::new());
        }
        let mut object = serde_json::Map::new();
        for (name, value) in &self.pairs {
            object.insert((*name).to_string(), Value::String(value.clone()));
        }
        let sealed = codec.seal(&Value::Object(object).to_string())?;
        Ok(format!("{}={}", params::PAYLOAD, urlencoding::encode(&sealed)))
    }
}

/// The console's API client. Generic over the transport so controller logic
/// is testable off-browser.
#[derive(Clone)]
pub struct ApiClient<T> {
    config: AppConfig,
    codec: PayloadCodec,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    /// Build a client; the sealing codec is derived from the config secret.
    #[must_use]
    pub fn new(config: AppConfig, transport: T) -> Self {
        let codec = PayloadCodec::new(&config.secret);
        Self {
            config,
            codec,
            transport,
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The `token` header value for a request: the sealed user id, or empty
    /// when nobody is signed in.
    #[must_use]
    pub fn token_for(&self, user_id: Option<&str>) -> String {
        user_id
            .and_then(|id| self.codec.seal(id).ok())
            .unwrap_or_default()
    }

    /// Issue a request and interpret the response as an envelope. Every
    /// failure below the envelope is folded into a failure envelope, so the
    /// caller sees exactly one shape.
    pub async fn call(
        &self,
        method: Method,
        route: &str,
        query: QueryBuilder,
        body: Option<&Value>,
        user_id: Option<&str>,
    ) -> Envelope {
        match self.dispatch(method, route, query, body, user_id).await {
            Ok(envelope) => envelope,
            Err(err) => {
                log_failure(route, &err.to_string());
                Envelope::failure(err.to_string())
            }
        }
    }

    async fn dispatch(
        &self,
        method: Method,
        route: &str,
        query: QueryBuilder,
        body: Option<&Value>,
        user_id: Option<&str>,
    ) -> Result<Envelope, ApiError> {
        let mut url = self.config.route_url(route);
        let rendered = match self.config.transport_mode {
            TransportMode::Plain => query.render_plain(),
            TransportMode::Sealed => query.render_sealed(&self.codec)?,
        };
        if !rendered.is_empty() {
            url = format!("{url}?{rendered}");
        }
        let body = match body {
            None => None,
            Some(value) => Some(match self.config.transport_mode {
                TransportMode::Plain => value.to_string(),
                TransportMode::Sealed => serde_json::json!({
                    params::PAYLOAD: self.codec.seal(&value.to_string())?
                })
                .to_string(),
            }),
        };
        let request = WireRequest {
            method,
            url,
            body,
            token: self.token_for(user_id),
        };
        let raw = self.transport.execute(request).await?;
        let text = match self.config.transport_mode {
            TransportMode::Plain => raw,
            // Proxies and error middlewares reply in the clear, so fall back
            // to the raw text when the body does not open.
            TransportMode::Sealed => self.codec.open(&raw).unwrap_or(raw),
        };
        Ok(serde_json::from_str(&text)?)
    }
}

/// Browser transport backed by `gloo-net`.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[cfg(target_arch = "wasm32")]
impl Transport for GlooTransport {
    fn execute(&self, request: WireRequest) -> impl Future<Output = Result<String, ApiError>> {
        async move {
            let builder = match request.method {
                Method::Get => gloo_net::http::Request::get(&request.url),
                Method::Post => gloo_net::http::Request::post(&request.url),
                Method::Put => gloo_net::http::Request::put(&request.url),
                Method::Delete => gloo_net::http::Request::delete(&request.url),
            };
            let mut builder = builder.header("token", &request.token);
            if let Some(body) = request.body {
                builder = builder
                    .header("content-type", "application/json")
                    .body(body);
            }
            let response = builder
                .send()
                .await
                .map_err(|err| ApiError::Network(err.to_string()))?;
            response
                .text()
                .await
                .map_err(|err| ApiError::Network(err.to_string()))
        }
    }
}
