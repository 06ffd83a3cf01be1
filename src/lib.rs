//! Typed async Rust client for the Twilio REST API.
//!
//! The crate is split into a domain layer of validated types and response records, a
//! transport layer for URI composition and wire-format details, and a client layer that
//! authenticates, dispatches, and decodes requests and walks paginated collections.
//!
//! ```rust,no_run
//! use twilio::{Credential, MessageBody, PageSize, RawPhoneNumber, SendMessage, TwilioClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), twilio::TwilioError> {
//!     let client = TwilioClient::new(Credential::new("AC...", "...")?);
//!     let request = SendMessage::new(
//!         RawPhoneNumber::new("+15005550006")?,
//!         RawPhoneNumber::new("+14155552671")?,
//!         MessageBody::new("hello")?,
//!     );
//!     let _sent = client.messages().send(&request).await?;
//!
//!     let mut messages = client.messages().list(PageSize::new(20)?);
//!     while let Some(message) = messages.next().await? {
//!         println!("{} {}", message.sid, message.status);
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod transport;

pub use client::{
    Credential, Dispatched, HttpResponse, HttpTransport, ListIter, Lookup, Messages,
    TwilioClient, TwilioClientBuilder, TwilioError,
};
pub use domain::{
    AccountSid, AuthToken, Carrier, Message, MessageBody, MessageDetails, MessagePage,
    MessageSid, PageSize, PhoneNumber, PhoneNumberLookup, RawPhoneNumber, SendMessage,
    ValidationError,
};
pub use transport::{ApiVariant, Endpoints, FormParams, Page};
