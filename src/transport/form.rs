use crate::domain::{MessageBody, SendMessage};

/// Ordered form/query parameters; repeated keys are allowed.
pub type FormParams = Vec<(String, String)>;

const FROM_FIELD: &str = "From";
const TO_FIELD: &str = "To";
const MEDIA_URL_FIELD: &str = "MediaUrl";

/// `application/x-www-form-urlencoded` serialization used for both POST bodies and GET queries.
pub fn encode_form(params: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

pub fn encode_send_message_form(request: &SendMessage) -> FormParams {
    let mut params = vec![
        (MessageBody::FIELD.to_owned(), request.body().as_str().to_owned()),
        (FROM_FIELD.to_owned(), request.from().raw().to_owned()),
        (TO_FIELD.to_owned(), request.to().raw().to_owned()),
    ];
    for url in request.media_urls() {
        params.push((MEDIA_URL_FIELD.to_owned(), url.as_str().to_owned()));
    }
    params
}

pub fn encode_lookup_form() -> FormParams {
    vec![
        ("CountryCode".to_owned(), "US".to_owned()),
        ("Type".to_owned(), "carrier".to_owned()),
    ]
}
