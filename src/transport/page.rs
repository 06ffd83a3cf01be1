use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::{MessageDetails, MessagePage};
use crate::transport::form::FormParams;

/// A decoded collection envelope: an ordered batch of records plus the reference to the next page.
pub trait Page: DeserializeOwned {
    type Item;

    /// Split into the page's records and its `next_page_uri`, if any.
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

impl Page for MessagePage {
    type Item = MessageDetails;

    fn into_parts(self) -> (Vec<MessageDetails>, Option<String>) {
        (self.messages, self.next_page_uri)
    }
}

/// Resolve a next-page reference (absolute, or relative to `base`) and return its query
/// pairs as the cursor for the following list call.
pub fn next_page_params(base: &Url, next_page_uri: &str) -> Result<FormParams, url::ParseError> {
    let url = base.join(next_page_uri)?;
    Ok(url.query_pairs().into_owned().collect())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RemoteErrorJson {
    code: Option<i64>,
    message: Option<String>,
}

/// Best-effort extraction of Twilio's `{"code": .., "message": ..}` error body.
pub fn decode_remote_error(body: &[u8]) -> (Option<i64>, Option<String>) {
    match serde_json::from_slice::<RemoteErrorJson>(body) {
        Ok(parsed) => (parsed.code, parsed.message),
        Err(_) => (None, None),
    }
}
