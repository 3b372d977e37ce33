//! Client layer: builds gateway requests from messages and classifies the replies.

mod dispatch;

pub use dispatch::SendResult;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::domain::{
    ApiResponse, ErrorCause, MaxSmsPerMessage, Message, Password, SendOptions, StatusCode,
    Username, ValidationError,
};

const DEFAULT_HOST: &str = "api.websms.com";
const DEFAULT_PORT: u16 = 443;
const DEFAULT_BASE_PATH: &str = "/json/smsmessaging";
const DEFAULT_TEXT_PATH: &str = "/text";
const DEFAULT_BINARY_PATH: &str = "/binary";
const DEFAULT_CONTENT_TYPE: &str = "application/json;charset=UTF-8";
const DEFAULT_TEXT_ENDPOINT: &str = "https://api.websms.com/json/smsmessaging/text";
const DEFAULT_BINARY_ENDPOINT: &str = "https://api.websms.com/json/smsmessaging/binary";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpRequest {
    url: String,
    credentials: Credentials,
    headers: Vec<(&'static str, String)>,
    body: String,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    content_type: Option<String>,
    body: String,
}

#[derive(Debug)]
enum HttpError {
    /// No response was received.
    Request(Box<dyn StdError + Send + Sync>),
    /// The response started but its body could not be read to the end.
    ResponseBody(Box<dyn StdError + Send + Sync>),
}

trait HttpTransport: Send + Sync {
    fn post<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, HttpError>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, HttpError>> {
        Box::pin(async move {
            let mut builder = self.client.post(&request.url).basic_auth(
                request.credentials.username.as_str(),
                Some(request.credentials.password.as_str()),
            );
            for (name, value) in &request.headers {
                builder = builder.header(*name, value);
            }

            let response = builder
                .body(request.body)
                .send()
                .await
                .map_err(|err| HttpError::Request(Box::new(err)))?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response
                .text()
                .await
                .map_err(|err| HttpError::ResponseBody(Box::new(err)))?;
            Ok(HttpResponse {
                status,
                content_type,
                body,
            })
        })
    }
}

#[derive(Debug, Clone)]
/// websms account credentials, sent as HTTP Basic authentication.
pub struct Credentials {
    username: Username,
    password: Password,
}

impl Credentials {
    /// Validate that both parts are non-empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`WebSmsClient`].
///
/// Every variant maps to an [`ErrorCause`] through [`WebSmsError::cause`], so callers can
/// branch on the category and still show the descriptive message.
pub enum WebSmsError {
    /// The message failed validation when it was built, or a send option is out of range.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The client was used incorrectly (unsupported message type, no async runtime).
    #[error("{0}")]
    Parameter(&'static str),

    /// The request body could not be serialized.
    #[error("could not encode request body: {0}")]
    Encode(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-200 HTTP status other than 400 and 401.
    #[error("HTTP Connection failed, Server returned HTTP Status: {status}")]
    HttpStatus { status: u16 },

    /// HTTP 401: credentials were rejected.
    #[error("HTTP Authentication failed, check username and password. HTTP Status: {status}")]
    Authorization { status: u16 },

    /// HTTP 400, with the response body as returned by the gateway.
    #[error("HTTP Status 400 - Bad Request. Server couldnot understand Request/Content. {body}")]
    BadRequest { body: String },

    /// HTTP 200 without a JSON content type.
    #[error(
        "HTTP Response is of unknown content-type '{}', Response body was: {}",
        .content_type.as_deref().unwrap_or_default(),
        .body
    )]
    UnexpectedContentType {
        content_type: Option<String>,
        body: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("could not set up HTTP client: {0}")]
    ClientSetup(#[source] Box<dyn StdError + Send + Sync>),

    /// No response was received (DNS, TLS, refused connection, timeout).
    #[error("HTTPS request error: {0}")]
    Request(#[source] Box<dyn StdError + Send + Sync>),

    /// The response body broke off or could not be read.
    #[error("HTTPS response error: {0}")]
    ResponseStream(#[source] Box<dyn StdError + Send + Sync>),

    /// HTTP 200 with a JSON content type, but the body is not the expected JSON.
    #[error("no valid json response: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The gateway answered with a `statusCode` outside `2000..=2001`.
    #[error(
        "API statusCode: {}, statusMessage: {}",
        .status_code,
        .status_message.as_deref().unwrap_or_default()
    )]
    Api {
        status_code: StatusCode,
        status_message: Option<String>,
    },

    /// Host, port or paths do not form a valid URL.
    #[error("invalid gateway endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl WebSmsError {
    /// Category of this error.
    pub fn cause(&self) -> ErrorCause {
        match self {
            Self::Validation(err) => err.cause(),
            Self::Parameter(_)
            | Self::Encode(_)
            | Self::HttpStatus { .. }
            | Self::ClientSetup(_)
            | Self::InvalidEndpoint(_) => ErrorCause::Parameter,
            Self::Authorization { .. } => ErrorCause::Authorization,
            Self::BadRequest { .. } | Self::UnexpectedContentType { .. } => ErrorCause::Unknown,
            Self::Request(_) | Self::ResponseStream(_) => ErrorCause::Connection,
            Self::Parse(_) => ErrorCause::JsonParse,
            Self::Api { .. } => ErrorCause::Api,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Gateway location and request headers used by [`WebSmsClient`].
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub base_path: String,
    pub text_path: String,
    pub binary_path: String,
    pub content_type: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            base_path: DEFAULT_BASE_PATH.to_owned(),
            text_path: DEFAULT_TEXT_PATH.to_owned(),
            binary_path: DEFAULT_BINARY_PATH.to_owned(),
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Text and binary endpoint URLs. `origin` replaces `https://{host}:{port}` when set.
    fn endpoints(&self, origin: Option<&str>) -> Result<(String, String), url::ParseError> {
        let origin = match origin {
            Some(origin) => Url::parse(origin)?,
            None => Url::parse(&format!("https://{}:{}", self.host, self.port))?,
        };

        let mut text = origin.clone();
        text.set_path(&format!("{}{}", self.base_path, self.text_path));
        let mut binary = origin;
        binary.set_path(&format!("{}{}", self.base_path, self.binary_path));
        Ok((text.into(), binary.into()))
    }
}

fn default_user_agent() -> String {
    format!(
        "Rust SDK Client (v{}, {}, {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

#[derive(Debug, Clone)]
/// Builder for [`WebSmsClient`].
///
/// Use this when you need a different gateway host, paths, timeout or user-agent.
pub struct WebSmsClientBuilder {
    credentials: Credentials,
    config: ClientConfig,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl WebSmsClientBuilder {
    /// Create a builder with [`ClientConfig::default`] and no timeout.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            config: ClientConfig::default(),
            base_url: None,
            timeout: None,
        }
    }

    /// Replace the whole configuration at once.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.config.base_path = base_path.into();
        self
    }

    pub fn text_path(mut self, text_path: impl Into<String>) -> Self {
        self.config.text_path = text_path.into();
        self
    }

    pub fn binary_path(mut self, binary_path: impl Into<String>) -> Self {
        self.config.binary_path = binary_path.into();
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.config.content_type = content_type.into();
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Override scheme, host and port together, e.g. `http://127.0.0.1:8080` for a local
    /// gateway stub. Base and message paths still apply.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a [`WebSmsClient`].
    pub fn build(self) -> Result<WebSmsClient, WebSmsError> {
        let (text_endpoint, binary_endpoint) = self.config.endpoints(self.base_url.as_deref())?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| WebSmsError::ClientSetup(Box::new(err)))?;

        Ok(WebSmsClient {
            credentials: self.credentials,
            text_endpoint,
            binary_endpoint,
            content_type: self.config.content_type,
            user_agent: self.config.user_agent,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level websms gateway client.
///
/// Each call to [`WebSmsClient::send`] validates the message, issues exactly one
/// `POST` and classifies the reply. There is no retry, rate limiting or shared
/// per-call state, so one client can serve concurrent sends.
pub struct WebSmsClient {
    credentials: Credentials,
    text_endpoint: String,
    binary_endpoint: String,
    content_type: String,
    user_agent: String,
    http: Arc<dyn HttpTransport>,
}

impl WebSmsClient {
    /// Create a client for `https://api.websms.com` with default settings.
    ///
    /// For more customization, use [`WebSmsClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            text_endpoint: DEFAULT_TEXT_ENDPOINT.to_owned(),
            binary_endpoint: DEFAULT_BINARY_ENDPOINT.to_owned(),
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            user_agent: default_user_agent(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> WebSmsClientBuilder {
        WebSmsClientBuilder::new(credentials)
    }

    pub fn text_endpoint(&self) -> &str {
        &self.text_endpoint
    }

    pub fn binary_endpoint(&self) -> &str {
        &self.binary_endpoint
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Send a text or binary message.
    ///
    /// Checks run before any network I/O, in this order: the message's own
    /// validation error, the message kind, then `max_sms_per_message` (text only).
    ///
    /// Errors:
    /// - [`WebSmsError::Validation`] for invalid messages or an out-of-range segment limit,
    /// - [`WebSmsError::Parameter`] for message types other than text or binary,
    /// - [`WebSmsError::Request`] / [`WebSmsError::ResponseStream`] for connection failures,
    /// - [`WebSmsError::Authorization`], [`WebSmsError::BadRequest`],
    ///   [`WebSmsError::HttpStatus`] and [`WebSmsError::UnexpectedContentType`] for HTTP-level
    ///   failures,
    /// - [`WebSmsError::Parse`] for unreadable JSON and [`WebSmsError::Api`] when the gateway
    ///   rejects the message.
    pub async fn send<M>(
        &self,
        message: &M,
        options: SendOptions,
    ) -> Result<ApiResponse, WebSmsError>
    where
        M: Message + ?Sized,
    {
        let request = self.prepare(message, options)?;
        exchange(self.http.as_ref(), request).await
    }

    fn prepare<M>(&self, message: &M, options: SendOptions) -> Result<HttpRequest, WebSmsError>
    where
        M: Message + ?Sized,
    {
        if let Some(err) = message.error() {
            return Err(err.clone().into());
        }

        let (endpoint, max_sms_per_message) = if message.as_text().is_some() {
            let max_sms_per_message = options
                .max_sms_per_message
                .map(MaxSmsPerMessage::new)
                .transpose()?;
            (&self.text_endpoint, max_sms_per_message)
        } else if message.as_binary().is_some() {
            (&self.binary_endpoint, None)
        } else {
            return Err(WebSmsError::Parameter("unknown type of message object"));
        };

        let data = message.data();
        let body =
            crate::transport::encode_send_message_json(&data, options.test, max_sms_per_message)
                .map_err(|err| WebSmsError::Encode(Box::new(err)))?;

        debug!(
            endpoint = %endpoint,
            fields = ?data.field_names(),
            test = ?options.test,
            "issuing websms request"
        );

        Ok(HttpRequest {
            url: endpoint.clone(),
            credentials: self.credentials.clone(),
            headers: vec![
                ("Content-Type", self.content_type.clone()),
                ("Content-Length", body.len().to_string()),
                ("User-Agent", self.user_agent.clone()),
            ],
            body,
        })
    }
}

async fn exchange(
    http: &dyn HttpTransport,
    request: HttpRequest,
) -> Result<ApiResponse, WebSmsError> {
    let result = match http.post(request).await {
        Ok(response) => classify_response(response),
        Err(HttpError::Request(err)) => Err(WebSmsError::Request(err)),
        Err(HttpError::ResponseBody(err)) => Err(WebSmsError::ResponseStream(err)),
    };

    if let Err(err) = &result {
        warn!(cause = %err.cause(), error = %err, "websms request failed");
    }
    result
}

fn classify_response(response: HttpResponse) -> Result<ApiResponse, WebSmsError> {
    let is_json = response
        .content_type
        .as_deref()
        .is_some_and(|content_type| content_type.contains("json"));

    if response.status != 200 || !is_json {
        return Err(match response.status {
            401 => WebSmsError::Authorization { status: 401 },
            400 => WebSmsError::BadRequest {
                body: response.body,
            },
            200 => WebSmsError::UnexpectedContentType {
                content_type: response.content_type,
                body: response.body,
            },
            status => WebSmsError::HttpStatus { status },
        });
    }

    let parsed = crate::transport::decode_send_message_json_response(&response.body)
        .map_err(|err| WebSmsError::Parse(Box::new(err)))?;

    match parsed.status_code {
        Some(status_code) if !status_code.is_success() => Err(WebSmsError::Api {
            status_code,
            status_message: parsed.status_message,
        }),
        _ => Ok(parsed),
    }
}
