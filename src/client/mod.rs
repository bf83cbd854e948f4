//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};
use url::Url;

use crate::domain::{
    ApiKey, CheckVerification, ErrorBody, IdempotencyKey, Message, MessageId, SendSms,
    SendVerification, ValidationError, Verification, VerificationCheck,
};

const DEFAULT_BASE_URL: &str = "https://api.textgate.io/v1";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
struct HttpRequest {
    method: HttpMethod,
    url: String,
    headers: Vec<(&'static str, String)>,
    body: Option<String>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(request.url.as_str()),
                HttpMethod::Post => self.client.post(request.url.as_str()),
            };
            for (name, value) in request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = request.body {
                builder = builder
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`TextGateClient`].
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status with the decoded error body, or transport failures),
/// - encode/parse failures,
/// - validation failures.
pub enum TextGateError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus {
        status: u16,
        body: Option<ErrorBody>,
    },

    /// Request body could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[source] Box<dyn StdError + Send + Sync>),

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The configured base URL does not parse or cannot carry path segments.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[source] url::ParseError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl TextGateError {
    /// HTTP status for [`TextGateError::HttpStatus`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Decoded error body for [`TextGateError::HttpStatus`], if the server sent one.
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::HttpStatus { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Returns `true` for `401 Unauthorized` and `403 Forbidden`.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Returns `true` for `429 Too Many Requests`.
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Returns `true` when the server signalled a transient condition (429 or 5xx).
    ///
    /// The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self.status(), Some(429 | 500..=599))
    }
}

#[derive(Debug, Clone)]
/// Builder for [`TextGateClient`].
///
/// Use this when you need to customize the base URL, timeout, or user-agent.
pub struct TextGateClientBuilder {
    api_key: ApiKey,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TextGateClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent override.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API base URL (for example a sandbox or a local mock server).
    ///
    /// Endpoint paths are appended to it, so `https://host/v1` yields `https://host/v1/messages`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`TextGateClient`].
    ///
    /// Fails with [`TextGateError::InvalidBaseUrl`] when the base URL does not parse or
    /// cannot carry path segments.
    pub fn build(self) -> Result<TextGateClient, TextGateError> {
        let parsed = Url::parse(&self.base_url).map_err(TextGateError::InvalidBaseUrl)?;
        if parsed.cannot_be_a_base() {
            return Err(TextGateError::InvalidBaseUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| TextGateError::Transport(Box::new(err)))?;

        Ok(TextGateClient {
            api_key: self.api_key,
            base_url: self.base_url,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level TextGate client.
///
/// This type orchestrates request encoding, authentication headers, and response parsing.
/// By default it talks to `https://api.textgate.io/v1`:
/// - `POST /messages` and `GET /messages/{id}` for SMS,
/// - `POST /verify` and `POST /verify/{id}/check` for phone verification.
///
/// Every request carries the `X-API-Key` header. Non-2xx responses become
/// [`TextGateError::HttpStatus`] with the decoded error body.
pub struct TextGateClient {
    api_key: ApiKey,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl TextGateClient {
    /// Create a client using the default base URL.
    ///
    /// For more customization, use [`TextGateClient::builder`].
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(api_key: ApiKey) -> TextGateClientBuilder {
        TextGateClientBuilder::new(api_key)
    }

    /// Send an SMS message.
    ///
    /// When `SendOptions.idempotency_key` is set it is forwarded as `Idempotency-Key`, so the
    /// same request can be repeated safely after a network failure.
    ///
    /// Errors:
    /// - [`TextGateError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`TextGateError::Parse`] when the response body is not a message object.
    #[instrument(skip_all)]
    pub async fn send_sms(&self, request: SendSms) -> Result<Message, TextGateError> {
        let url = self.endpoint(&["messages"])?;
        let body = crate::transport::encode_send_sms_body(&request)
            .map_err(|err| TextGateError::Encode(Box::new(err)))?;

        let response = self
            .dispatch(
                HttpMethod::Post,
                url,
                request.options().idempotency_key.as_ref(),
                Some(body),
            )
            .await?;

        let message = crate::transport::decode_message_json_response(&response)
            .map_err(|err| TextGateError::Parse(Box::new(err)))?;
        debug!(id = message.id.as_str(), status = ?message.status, "message accepted");
        Ok(message)
    }

    /// Fetch the current state of a previously sent message.
    #[instrument(skip(self))]
    pub async fn get_message(&self, id: &MessageId) -> Result<Message, TextGateError> {
        let url = self.endpoint(&["messages", id.as_str()])?;
        let response = self.dispatch(HttpMethod::Get, url, None, None).await?;

        crate::transport::decode_message_json_response(&response)
            .map_err(|err| TextGateError::Parse(Box::new(err)))
    }

    /// Send a verification code to a phone number.
    ///
    /// The code itself is generated and delivered by the server; keep the returned
    /// [`Verification::id`] to check the code later.
    #[instrument(skip_all)]
    pub async fn send_verification(
        &self,
        request: SendVerification,
    ) -> Result<Verification, TextGateError> {
        let url = self.endpoint(&["verify"])?;
        let body = crate::transport::encode_send_verification_body(&request)
            .map_err(|err| TextGateError::Encode(Box::new(err)))?;

        let response = self
            .dispatch(
                HttpMethod::Post,
                url,
                request.options().idempotency_key.as_ref(),
                Some(body),
            )
            .await?;

        let verification = crate::transport::decode_verification_json_response(&response)
            .map_err(|err| TextGateError::Parse(Box::new(err)))?;
        debug!(id = verification.id.as_str(), "verification started");
        Ok(verification)
    }

    /// Check a code entered by the end user.
    ///
    /// A wrong code is not an error: inspect [`VerificationCheck::status`] (or call
    /// [`VerificationCheck::is_verified`]).
    #[instrument(skip_all, fields(id = request.id().as_str()))]
    pub async fn check_verification(
        &self,
        request: CheckVerification,
    ) -> Result<VerificationCheck, TextGateError> {
        let url = self.endpoint(&["verify", request.id().as_str(), "check"])?;
        let body = crate::transport::encode_check_verification_body(&request)
            .map_err(|err| TextGateError::Encode(Box::new(err)))?;

        let response = self
            .dispatch(HttpMethod::Post, url, None, Some(body))
            .await?;

        crate::transport::decode_verification_check_json_response(&response)
            .map_err(|err| TextGateError::Parse(Box::new(err)))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<String, TextGateError> {
        let mut url = Url::parse(&self.base_url).map_err(TextGateError::InvalidBaseUrl)?;
        url.path_segments_mut()
            .map_err(|()| {
                TextGateError::InvalidBaseUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase)
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        url: String,
        idempotency_key: Option<&IdempotencyKey>,
        body: Option<String>,
    ) -> Result<String, TextGateError> {
        let mut headers = vec![
            (ApiKey::HEADER, self.api_key.as_str().to_owned()),
            ("Accept", "application/json".to_owned()),
        ];
        if let Some(key) = idempotency_key {
            headers.push((IdempotencyKey::HEADER, key.as_str().to_owned()));
        }

        let response = self
            .http
            .execute(HttpRequest {
                method,
                url,
                headers,
                body,
            })
            .await
            .map_err(TextGateError::Transport)?;

        if !(200..=299).contains(&response.status) {
            warn!(status = response.status, "request rejected by server");
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(crate::transport::decode_error_body(response.body))
            };
            return Err(TextGateError::HttpStatus {
                status: response.status,
                body,
            });
        }

        debug!(status = response.status, "request succeeded");
        Ok(response.body)
    }
}
