use url::Url;

use crate::domain::validation::ValidationError;
use crate::domain::value::{MessageBody, RawPhoneNumber};

/// Outbound message request (`POST Messages.json`).
#[derive(Debug, Clone)]
pub struct SendMessage {
    from: RawPhoneNumber,
    to: RawPhoneNumber,
    body: MessageBody,
    media_urls: Vec<Url>,
}

impl SendMessage {
    pub fn new(from: RawPhoneNumber, to: RawPhoneNumber, body: MessageBody) -> Self {
        Self {
            from,
            to,
            body,
            media_urls: Vec::new(),
        }
    }

    /// Attach a media URL (`MediaUrl`); may be called repeatedly.
    pub fn media_url(mut self, url: &str) -> Result<Self, ValidationError> {
        let parsed = Url::parse(url.trim()).map_err(|_| ValidationError::InvalidMediaUrl {
            input: url.to_owned(),
        })?;
        self.media_urls.push(parsed);
        Ok(self)
    }

    pub fn from(&self) -> &RawPhoneNumber {
        &self.from
    }

    pub fn to(&self) -> &RawPhoneNumber {
        &self.to
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    pub fn media_urls(&self) -> &[Url] {
        &self.media_urls
    }
}
