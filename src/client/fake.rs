//! In-process transport used by the unit tests; replays scripted responses and records
//! every request it receives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use url::Url;

use super::http::{
    BodyError, BoxError, BoxFuture, BufferedBody, HttpResponse, HttpTransport, ResponseBody,
};
use super::{Credential, TwilioClient};

#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Respond { status: u16, body: String },
    Delayed { delay: Duration, status: u16, body: String },
    TransportFailure(String),
    BrokenBody { status: u16 },
    /// Decode the request's form body and answer with the same fields as a JSON object.
    EchoForm,
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug, Default)]
struct FakeTransportState {
    script: VecDeque<Scripted>,
    requests: Vec<RecordedRequest>,
}

impl FakeTransport {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeTransportState {
                script: script.into_iter().collect(),
                requests: Vec::new(),
            })),
        }
    }

    pub fn respond(status: u16, body: impl Into<String>) -> Self {
        Self::new([Scripted::Respond {
            status,
            body: body.into(),
        }])
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request was sent")
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn client(&self) -> TwilioClient {
        TwilioClient::builder(Credential::new("AC123", "token").unwrap())
            .base_url("https://api.example.test")
            .lookup_base_url("https://lookups.example.test")
            .transport(Arc::new(self.clone()))
            .build()
            .unwrap()
    }
}

struct BrokenBody;

impl ResponseBody for BrokenBody {
    fn read_to_end(self: Box<Self>, _limit: usize) -> BoxFuture<'static, Result<Vec<u8>, BodyError>> {
        Box::pin(async { Err::<Vec<u8>, _>(BodyError::Read("connection reset mid-body".into())) })
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

impl HttpTransport for FakeTransport {
    fn execute<'a>(
        &'a self,
        request: reqwest::Request,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let recorded = RecordedRequest {
                method: request.method().clone(),
                url: request.url().clone(),
                headers: request.headers().clone(),
                body: request
                    .body()
                    .and_then(|body| body.as_bytes())
                    .map(<[u8]>::to_vec),
            };
            let next = {
                let mut state = self.state.lock().unwrap();
                state.requests.push(recorded.clone());
                state.script.pop_front()
            };

            let response: Result<HttpResponse, BoxError> = match next
                .expect("fake transport ran out of scripted responses")
            {
                Scripted::Respond { status: code, body } => {
                    Ok(HttpResponse::buffered(status(code), HeaderMap::new(), body))
                }
                Scripted::Delayed {
                    delay,
                    status: code,
                    body,
                } => {
                    tokio::time::sleep(delay).await;
                    Ok(HttpResponse::buffered(status(code), HeaderMap::new(), body))
                }
                Scripted::TransportFailure(message) => Err(message.into()),
                Scripted::BrokenBody { status: code } => Ok(HttpResponse {
                    status: status(code),
                    headers: HeaderMap::new(),
                    body: Box::new(BrokenBody),
                }),
                Scripted::EchoForm => {
                    let form = recorded.body.unwrap_or_default();
                    let echoed = url::form_urlencoded::parse(&form)
                        .into_owned()
                        .map(|(key, value)| (key, serde_json::Value::String(value)))
                        .collect::<serde_json::Map<_, _>>();
                    Ok(HttpResponse {
                        status: status(201),
                        headers: HeaderMap::new(),
                        body: Box::new(BufferedBody(
                            serde_json::to_vec(&echoed).unwrap_or_default(),
                        )),
                    })
                }
            };
            response
        })
    }
}
