//! Client layer: builds authenticated requests, dispatches them, and maps wire ↔ domain.

mod http;
mod pager;

#[cfg(test)]
mod fake;

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{
    ACCEPT, ACCEPT_CHARSET, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT,
};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::{
    AccountSid, AuthToken, Message, MessageDetails, MessagePage, MessageSid, PageSize,
    PhoneNumber, PhoneNumberLookup, SendMessage, ValidationError,
};
use crate::transport::{ApiVariant, Endpoints, FormParams, Page};

pub use http::{
    BodyError, BoxError, BoxFuture, BufferedBody, HttpResponse, HttpTransport, ResponseBody,
};
pub use pager::ListIter;

use http::ReqwestTransport;

/// How long to wait for the response header block before giving up.
pub const DEFAULT_HEADER_TIMEOUT: Duration = Duration::from_millis(3050);
/// Largest response body the dispatcher will buffer.
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

const DEFAULT_USER_AGENT: &str = concat!("twilio-rs/", env!("CARGO_PKG_VERSION"));
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const MESSAGES_PATH: &str = "Messages";
const PHONE_NUMBERS_PATH: &str = "PhoneNumbers";

#[derive(Debug, Clone)]
/// Account sid + auth token pair sent as HTTP basic auth on every request.
pub struct Credential {
    account_sid: AccountSid,
    auth_token: AuthToken,
}

impl Credential {
    /// Validate that both parts are non-empty.
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            account_sid: AccountSid::new(account_sid)?,
            auth_token: AuthToken::new(auth_token)?,
        })
    }

    pub fn account_sid(&self) -> &AccountSid {
        &self.account_sid
    }

    fn authorization(&self) -> Result<HeaderValue, TwilioError> {
        let encoded = STANDARD.encode(format!(
            "{}:{}",
            self.account_sid.as_str(),
            self.auth_token.as_str()
        ));
        let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|err| TwilioError::RequestConstruction(Box::new(err)))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`TwilioClient`].
///
/// No variant is retried or recovered from inside the client.
pub enum TwilioError {
    /// The request URI or headers could not be assembled.
    #[error("failed to construct request: {0}")]
    RequestConstruction(#[source] BoxError),

    /// HTTP client / transport failure (DNS, TLS, connection refused, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The response header block did not arrive within the configured ceiling.
    #[error("no response headers within {timeout:?}")]
    Timeout { timeout: Duration },

    /// The response body could not be fully read.
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] BoxError),

    /// The response body exceeded the configured maximum size.
    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The body is not valid JSON or does not match the requested shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A page's `next_page_uri` could not be parsed.
    #[error("invalid next page uri {uri:?}: {source}")]
    InvalidNextPage {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    /// Non-2xx status returned where the call requires success.
    #[error("request not successful: {status_line}")]
    RemoteService {
        status: u16,
        status_line: String,
        code: Option<i64>,
        message: Option<String>,
        body: Option<String>,
    },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl TwilioError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Decoded response together with the status and headers it arrived with.
#[derive(Debug, Clone)]
pub struct Dispatched<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub resource: T,
}

impl<T> Dispatched<T> {
    pub fn into_resource(self) -> T {
        self.resource
    }
}

/// Fully buffered response before decoding.
struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

#[derive(Clone)]
/// Builder for [`TwilioClient`].
///
/// Use this when you need to customize endpoints, timeouts, the user-agent, or the transport.
pub struct TwilioClientBuilder {
    credential: Credential,
    endpoints: Endpoints,
    header_timeout: Duration,
    max_body_size: usize,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl TwilioClientBuilder {
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            endpoints: Endpoints::default(),
            header_timeout: DEFAULT_HEADER_TIMEOUT,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            user_agent: None,
            transport: None,
        }
    }

    /// Override the regular (account-scoped) API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.endpoints.base_url = base_url.into();
        self
    }

    /// Override the regular API version segment.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.endpoints.api_version = version.into();
        self
    }

    /// Override the lookup API base URL.
    pub fn lookup_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.endpoints.lookup_base_url = base_url.into();
        self
    }

    /// Override the lookup API version segment.
    pub fn lookup_version(mut self, version: impl Into<String>) -> Self {
        self.endpoints.lookup_version = version.into();
        self
    }

    /// Maximum wait for the response header block.
    pub fn header_timeout(mut self, timeout: Duration) -> Self {
        self.header_timeout = timeout;
        self
    }

    /// Maximum response body size in bytes.
    pub fn max_body_size(mut self, limit: usize) -> Self {
        self.max_body_size = limit;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Send requests through a custom transport instead of the default `reqwest` client.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build a [`TwilioClient`].
    pub fn build(self) -> Result<TwilioClient, TwilioError> {
        for base in [&self.endpoints.base_url, &self.endpoints.lookup_base_url] {
            url::Url::parse(base).map_err(|err| TwilioError::RequestConstruction(Box::new(err)))?;
        }

        let user_agent = HeaderValue::from_str(
            self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT),
        )
        .map_err(|err| TwilioError::RequestConstruction(Box::new(err)))?;

        let http: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                let client = reqwest::Client::builder()
                    .build()
                    .map_err(|err| TwilioError::Transport(Box::new(err)))?;
                Arc::new(ReqwestTransport { client })
            }
        };

        Ok(TwilioClient {
            credential: self.credential,
            endpoints: self.endpoints,
            header_timeout: self.header_timeout,
            max_body_size: self.max_body_size,
            user_agent,
            http,
        })
    }
}

#[derive(Clone)]
/// Twilio REST client.
///
/// Cheap to clone and safe to share between tasks: each call builds its own request and owns
/// its own response. Convenience handles for specific resources are available through
/// [`TwilioClient::messages`] and [`TwilioClient::lookup`].
pub struct TwilioClient {
    credential: Credential,
    endpoints: Endpoints,
    header_timeout: Duration,
    max_body_size: usize,
    user_agent: HeaderValue,
    http: Arc<dyn HttpTransport>,
}

impl TwilioClient {
    /// Create a client using the default endpoints and transport.
    ///
    /// For more customization, use [`TwilioClient::builder`].
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            endpoints: Endpoints::default(),
            header_timeout: DEFAULT_HEADER_TIMEOUT,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            user_agent: HeaderValue::from_static(DEFAULT_USER_AGENT),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(credential: Credential) -> TwilioClientBuilder {
        TwilioClientBuilder::new(credential)
    }

    pub fn account_sid(&self) -> &AccountSid {
        self.credential.account_sid()
    }

    pub fn messages(&self) -> Messages<'_> {
        Messages { client: self }
    }

    pub fn lookup(&self) -> Lookup<'_> {
        Lookup { client: self }
    }

    /// Build an authenticated request.
    ///
    /// GET requests carry non-empty `form` as the query string; POST and PUT carry it as a
    /// form-urlencoded body. Every request gets basic auth, `Accept-Charset: utf-8`,
    /// `Accept: application/json`, and the configured `User-Agent`.
    pub fn create_request(
        &self,
        method: Method,
        variant: ApiVariant,
        resource_path: &str,
        resource_id: Option<&str>,
        form: &[(String, String)],
    ) -> Result<reqwest::Request, TwilioError> {
        let mut url = self
            .endpoints
            .build_uri(
                variant,
                self.credential.account_sid.as_str(),
                resource_path,
                resource_id,
            )
            .map_err(|err| TwilioError::RequestConstruction(Box::new(err)))?;

        let has_form = !form.is_empty();
        let form_in_body = has_form && (method == Method::POST || method == Method::PUT);
        if has_form && method == Method::GET {
            url.set_query(Some(&crate::transport::encode_form(form)));
        }

        let mut request = reqwest::Request::new(method, url);
        let headers = request.headers_mut();
        headers.insert(AUTHORIZATION, self.credential.authorization()?);
        headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("utf-8"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, self.user_agent.clone());

        if form_in_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
            *request.body_mut() = Some(crate::transport::encode_form(form).into());
        }

        Ok(request)
    }

    /// Send `request` and decode the JSON body into `T`.
    ///
    /// Non-2xx statuses are not treated as errors here; inspect [`Dispatched::status`].
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::Request,
    ) -> Result<Dispatched<T>, TwilioError> {
        let raw = self.dispatch(request).await?;
        decode(raw)
    }

    /// Like [`TwilioClient::execute`], but fails with [`TwilioError::RemoteService`] on any
    /// status outside `200..=299` before decoding.
    async fn execute_checked<T: DeserializeOwned>(
        &self,
        request: reqwest::Request,
    ) -> Result<Dispatched<T>, TwilioError> {
        let raw = self.dispatch(request).await?;
        ensure_success(&raw)?;
        decode(raw)
    }

    async fn dispatch(&self, request: reqwest::Request) -> Result<RawResponse, TwilioError> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending request");

        let response = match tokio::time::timeout(self.header_timeout, self.http.execute(request))
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!(%method, %url, error = %err, "transport failure");
                return Err(TwilioError::Transport(err));
            }
            Err(_) => {
                warn!(%method, %url, timeout = ?self.header_timeout, "timed out waiting for response headers");
                return Err(TwilioError::Timeout {
                    timeout: self.header_timeout,
                });
            }
        };

        let HttpResponse {
            status,
            headers,
            body,
        } = response;
        debug!(%method, %url, status = status.as_u16(), "received response headers");

        let body = body
            .read_to_end(self.max_body_size)
            .await
            .map_err(|err| {
                warn!(%method, %url, error = %err, "failed to read response body");
                match err {
                    BodyError::Read(source) => TwilioError::BodyRead(source),
                    BodyError::TooLarge { limit } => TwilioError::BodyTooLarge { limit },
                }
            })?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// GET `{path}/{id}` on the regular API.
    pub async fn fetch_resource<T: DeserializeOwned>(
        &self,
        resource_path: &str,
        resource_id: &str,
    ) -> Result<Dispatched<T>, TwilioError> {
        self.execute(self.fetch_request(resource_path, resource_id)?).await
    }

    async fn fetch_resource_checked<T: DeserializeOwned>(
        &self,
        resource_path: &str,
        resource_id: &str,
    ) -> Result<Dispatched<T>, TwilioError> {
        self.execute_checked(self.fetch_request(resource_path, resource_id)?).await
    }

    fn fetch_request(
        &self,
        resource_path: &str,
        resource_id: &str,
    ) -> Result<reqwest::Request, TwilioError> {
        self.create_request(
            Method::GET,
            ApiVariant::Regular,
            resource_path,
            Some(resource_id),
            &[],
        )
    }

    /// POST `form` to `{path}` on the regular API; non-2xx is a [`TwilioError::RemoteService`].
    pub async fn create_resource<T: DeserializeOwned>(
        &self,
        resource_path: &str,
        form: &[(String, String)],
    ) -> Result<Dispatched<T>, TwilioError> {
        let request =
            self.create_request(Method::POST, ApiVariant::Regular, resource_path, None, form)?;
        self.execute_checked(request).await
    }

    /// POST `form` to `{path}/{id}` on the regular API; non-2xx is a
    /// [`TwilioError::RemoteService`].
    pub async fn update_resource<T: DeserializeOwned>(
        &self,
        resource_path: &str,
        resource_id: &str,
        form: &[(String, String)],
    ) -> Result<Dispatched<T>, TwilioError> {
        let request = self.create_request(
            Method::POST,
            ApiVariant::Regular,
            resource_path,
            Some(resource_id),
            form,
        )?;
        self.execute_checked(request).await
    }

    /// GET `{path}` with `params` as the query string on the regular API.
    pub async fn list_resource<T: DeserializeOwned>(
        &self,
        resource_path: &str,
        params: &[(String, String)],
    ) -> Result<Dispatched<T>, TwilioError> {
        let request =
            self.create_request(Method::GET, ApiVariant::Regular, resource_path, None, params)?;
        self.execute(request).await
    }

    /// GET `{path}/{id}` with `params` on the lookup API.
    pub async fn lookup_resource<T: DeserializeOwned>(
        &self,
        resource_path: &str,
        resource_id: &str,
        params: &[(String, String)],
    ) -> Result<Dispatched<T>, TwilioError> {
        self.execute(self.lookup_request(resource_path, resource_id, params)?).await
    }

    async fn lookup_resource_checked<T: DeserializeOwned>(
        &self,
        resource_path: &str,
        resource_id: &str,
        params: &[(String, String)],
    ) -> Result<Dispatched<T>, TwilioError> {
        self.execute_checked(self.lookup_request(resource_path, resource_id, params)?).await
    }

    fn lookup_request(
        &self,
        resource_path: &str,
        resource_id: &str,
        params: &[(String, String)],
    ) -> Result<reqwest::Request, TwilioError> {
        self.create_request(
            Method::GET,
            ApiVariant::Lookup,
            resource_path,
            Some(resource_id),
            params,
        )
    }

    /// Walk a paginated collection lazily, starting from `params`.
    pub fn paginate<P: Page>(
        &self,
        resource_path: impl Into<String>,
        params: FormParams,
    ) -> ListIter<'_, P> {
        ListIter::new(self, resource_path.into(), params)
    }

    /// Fetch one page for [`ListIter`]; non-2xx is an error so an error body is never
    /// mistaken for an empty page.
    async fn fetch_page<P: Page>(
        &self,
        resource_path: &str,
        params: &[(String, String)],
    ) -> Result<P, TwilioError> {
        let request =
            self.create_request(Method::GET, ApiVariant::Regular, resource_path, None, params)?;
        Ok(self.execute_checked::<P>(request).await?.resource)
    }

    fn next_page_params(&self, next_page_uri: &str) -> Result<FormParams, TwilioError> {
        let invalid = |source| TwilioError::InvalidNextPage {
            uri: next_page_uri.to_owned(),
            source,
        };
        let base = self.endpoints.regular_base().map_err(invalid)?;
        crate::transport::next_page_params(&base, next_page_uri).map_err(invalid)
    }
}

fn ensure_success(raw: &RawResponse) -> Result<(), TwilioError> {
    let code = raw.status.as_u16();
    if !(200..=299).contains(&code) {
        let (remote_code, message) = crate::transport::decode_remote_error(&raw.body);
        let body = String::from_utf8_lossy(&raw.body);
        let body = if body.trim().is_empty() {
            None
        } else {
            Some(body.into_owned())
        };
        warn!(status = code, ?remote_code, "request not successful");
        return Err(TwilioError::RemoteService {
            status: code,
            status_line: raw.status.to_string(),
            code: remote_code,
            message,
            body,
        });
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(raw: RawResponse) -> Result<Dispatched<T>, TwilioError> {
    let resource = serde_json::from_slice(&raw.body).map_err(|err| {
        warn!(status = raw.status.as_u16(), error = %err, "failed to decode response body");
        TwilioError::Decode(err)
    })?;
    Ok(Dispatched {
        status: raw.status,
        headers: raw.headers,
        resource,
    })
}

/// Message resource operations (`Accounts/{sid}/Messages`).
#[derive(Clone, Copy)]
pub struct Messages<'a> {
    client: &'a TwilioClient,
}

impl<'a> Messages<'a> {
    /// Create a message from raw form fields (`Body`, `From`, `To`, `MediaUrl`, ...).
    pub async fn create(&self, form: &[(String, String)]) -> Result<Message, TwilioError> {
        Ok(self
            .client
            .create_resource::<Message>(MESSAGES_PATH, form)
            .await?
            .resource)
    }

    /// Send a validated message.
    pub async fn send(&self, request: &SendMessage) -> Result<Message, TwilioError> {
        let form = crate::transport::encode_send_message_form(request);
        self.create(&form).await
    }

    /// Update a message (for example `Body=` to redact it).
    pub async fn update(
        &self,
        sid: &MessageSid,
        form: &[(String, String)],
    ) -> Result<MessageDetails, TwilioError> {
        Ok(self
            .client
            .update_resource::<MessageDetails>(MESSAGES_PATH, sid.as_str(), form)
            .await?
            .resource)
    }

    /// Fetch a single message; non-2xx is a [`TwilioError::RemoteService`].
    pub async fn get(&self, sid: &MessageSid) -> Result<MessageDetails, TwilioError> {
        Ok(self
            .client
            .fetch_resource_checked::<MessageDetails>(MESSAGES_PATH, sid.as_str())
            .await?
            .resource)
    }

    /// Iterate over all messages, `page_size` records per request.
    pub fn list(&self, page_size: PageSize) -> ListIter<'a, MessagePage> {
        let params = vec![(PageSize::FIELD.to_owned(), page_size.value().to_string())];
        self.client.paginate(MESSAGES_PATH, params)
    }
}

/// Lookup API operations.
#[derive(Clone, Copy)]
pub struct Lookup<'a> {
    client: &'a TwilioClient,
}

impl Lookup<'_> {
    /// Carrier lookup for a phone number (`CountryCode=US`, `Type=carrier`); non-2xx is a
    /// [`TwilioError::RemoteService`].
    pub async fn phone_number(
        &self,
        number: &PhoneNumber,
    ) -> Result<PhoneNumberLookup, TwilioError> {
        Ok(self
            .client
            .lookup_resource_checked::<PhoneNumberLookup>(
                PHONE_NUMBERS_PATH,
                number.e164(),
                &crate::transport::encode_lookup_form(),
            )
            .await?
            .resource)
    }
}
