use serde::Deserialize;

/// Summary of a message returned by `POST Messages.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Message {
    pub sid: String,
    pub body: String,
    pub from: String,
    pub to: String,
    pub price: Option<String>,
    pub status: String,
}

/// Full message record as returned by fetch and list calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageDetails {
    pub sid: String,
    pub date_created: Option<String>,
    pub date_updated: Option<String>,
    pub date_sent: Option<String>,
    pub account_sid: String,
    pub to: String,
    pub from: String,
    pub body: String,
    pub status: String,
    pub num_segments: Option<String>,
    pub num_media: Option<String>,
    pub direction: Option<String>,
    pub api_version: Option<String>,
    pub price: Option<String>,
    pub price_unit: Option<String>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
    pub uri: Option<String>,
}

/// One page of the `Messages` collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessagePage {
    pub messages: Vec<MessageDetails>,
    pub uri: Option<String>,
    pub page: u32,
    pub page_size: u32,
    pub start: u32,
    pub end: u32,
    /// Only present on older API responses.
    pub num_pages: Option<u32>,
    /// Only present on older API responses.
    pub total: Option<u32>,
    pub first_page_uri: Option<String>,
    pub next_page_uri: Option<String>,
    pub previous_page_uri: Option<String>,
    pub last_page_uri: Option<String>,
}

/// Carrier information attached to a [`PhoneNumberLookup`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Carrier {
    pub mobile_country_code: Option<String>,
    pub mobile_network_code: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Result of `GET /v1/PhoneNumbers/{number}` on the lookup API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PhoneNumberLookup {
    pub country_code: String,
    pub phone_number: String,
    pub national_format: String,
    pub carrier: Option<Carrier>,
}
