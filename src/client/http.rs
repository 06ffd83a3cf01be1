//! Transport boundary: anything that can execute a prepared request and hand back status,
//! headers, and a body to be read under a size limit.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;

pub type BoxError = Box<dyn StdError + Send + Sync>;
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Response envelope produced by a transport. The body is read separately so the header wait
/// can be bounded on its own.
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Box<dyn ResponseBody>,
}

impl HttpResponse {
    /// Build a response whose body is already in memory.
    pub fn buffered(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: Box::new(BufferedBody(body.into())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("failed to read response body: {0}")]
    Read(#[source] BoxError),

    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

pub trait ResponseBody: Send {
    /// Read the whole body, failing with [`BodyError::TooLarge`] once more than `limit` bytes
    /// have arrived.
    fn read_to_end(self: Box<Self>, limit: usize) -> BoxFuture<'static, Result<Vec<u8>, BodyError>>;
}

pub trait HttpTransport: Send + Sync {
    /// Send `request`; resolves as soon as the response headers are available.
    fn execute<'a>(
        &'a self,
        request: reqwest::Request,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;
}

/// Body that is already fully buffered.
#[derive(Debug, Clone)]
pub struct BufferedBody(pub Vec<u8>);

impl ResponseBody for BufferedBody {
    fn read_to_end(self: Box<Self>, limit: usize) -> BoxFuture<'static, Result<Vec<u8>, BodyError>> {
        let bytes = self.0;
        Box::pin(async move {
            if bytes.len() > limit {
                return Err(BodyError::TooLarge { limit });
            }
            Ok(bytes)
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    pub(crate) client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: reqwest::Request,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let response = self.client.execute(request).await?;
            Ok::<_, BoxError>(HttpResponse {
                status: response.status(),
                headers: response.headers().clone(),
                body: Box::new(ReqwestBody(response)),
            })
        })
    }
}

struct ReqwestBody(reqwest::Response);

impl ResponseBody for ReqwestBody {
    fn read_to_end(self: Box<Self>, limit: usize) -> BoxFuture<'static, Result<Vec<u8>, BodyError>> {
        let mut response = self.0;
        Box::pin(async move {
            if response
                .content_length()
                .is_some_and(|len| len > limit as u64)
            {
                return Err(BodyError::TooLarge { limit });
            }

            let mut bytes = Vec::new();
            while let Some(chunk) = response
                .chunk()
                .await
                .map_err(|err| BodyError::Read(Box::new(err)))?
            {
                if bytes.len() + chunk.len() > limit {
                    return Err(BodyError::TooLarge { limit });
                }
                bytes.extend_from_slice(&chunk);
            }
            Ok(bytes)
        })
    }
}
