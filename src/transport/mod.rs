//! Transport layer: URI composition and wire-format details (form encoding, JSON envelopes).

mod form;
mod page;
mod uri;

pub use form::{FormParams, encode_form, encode_lookup_form, encode_send_message_form};
pub use page::{Page, decode_remote_error, next_page_params};
pub use uri::{
    ApiVariant, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_LOOKUP_BASE_URL,
    DEFAULT_LOOKUP_VERSION, Endpoints,
};
