use std::fmt;

use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Twilio account identifier (`AccountSid`), used as the basic-auth user name and as the
/// account segment of regular API URIs.
///
/// Invariant: non-empty after trimming.
pub struct AccountSid(String);

impl AccountSid {
    /// Field name used by Twilio (`AccountSid`).
    pub const FIELD: &'static str = "AccountSid";

    /// Create a validated [`AccountSid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sid.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Twilio auth token, used as the basic-auth password.
///
/// Invariant: must not be empty (whitespace is preserved). `Debug` output is redacted.
pub struct AuthToken(String);

impl AuthToken {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "AuthToken";

    /// Create a validated [`AuthToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the token as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Message identifier (`Sid`) returned when a message is created.
///
/// Invariant: non-empty after trimming.
pub struct MessageSid(String);

impl MessageSid {
    /// Field name used by Twilio (`Sid`).
    pub const FIELD: &'static str = "Sid";

    /// Create a validated [`MessageSid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sid.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Message text (`Body`).
///
/// Invariant: non-empty after trimming. Whitespace is kept as written.
pub struct MessageBody(String);

impl MessageBody {
    /// Form field name used by Twilio (`Body`).
    pub const FIELD: &'static str = "Body";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated phone number as sent to Twilio (`From` / `To`).
///
/// Invariant: non-empty after trimming. This type does not normalize; if you want E.164
/// normalization, parse into [`PhoneNumber`] and convert it into [`RawPhoneNumber`].
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "PhoneNumber";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to Twilio.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    fn from(value: PhoneNumber) -> Self {
        Self(value.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number normalized to E.164 (`+14155552671`).
///
/// This is the identifier the lookup API expects. Numbers written in national format are
/// resolved against `default_region`.
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Field name used in validation errors.
    pub const FIELD: &'static str = "PhoneNumber";

    pub fn parse(default_region: Option<country::Id>, input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, input).map_err(|_| {
            ValidationError::InvalidPhoneNumber {
                input: input.to_owned(),
            }
        })?;
        Ok(Self(
            phonenumber::format(&parsed)
                .mode(phonenumber::Mode::E164)
                .to_string(),
        ))
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Number of records requested per page (`PageSize`).
///
/// Invariant: `1..=1000`.
pub struct PageSize(u32);

impl PageSize {
    /// Query parameter name used by Twilio (`PageSize`).
    pub const FIELD: &'static str = "PageSize";

    /// Minimum allowed page size.
    pub const MIN: u32 = 1;
    /// Maximum page size the API honours.
    pub const MAX: u32 = 1000;

    /// Create a validated page size.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::PageSizeOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_newtypes_trim_or_validate() {
        let sid = AccountSid::new("  AC123 ").unwrap();
        assert_eq!(sid.as_str(), "AC123");
        assert!(AccountSid::new("  ").is_err());

        let token = AuthToken::new(" secret ").unwrap();
        assert_eq!(token.as_str(), " secret ");
        assert!(AuthToken::new("").is_err());

        let msg_sid = MessageSid::new(" SM1 ").unwrap();
        assert_eq!(msg_sid.as_str(), "SM1");
        assert!(MessageSid::new("").is_err());

        let body = MessageBody::new(" hi ").unwrap();
        assert_eq!(body.as_str(), " hi ");
        assert!(MessageBody::new("  ").is_err());
    }

    #[test]
    fn auth_token_debug_is_redacted() {
        let token = AuthToken::new("super-secret").unwrap();
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn raw_phone_number_trims_and_exposes_raw() {
        let raw = RawPhoneNumber::new(" +14155552671 ").unwrap();
        assert_eq!(raw.raw(), "+14155552671");
        assert!(RawPhoneNumber::new("").is_err());
    }

    #[test]
    fn phone_number_normalizes_to_e164() {
        let international = PhoneNumber::parse(None, "+1 415-555-2671").unwrap();
        let national = PhoneNumber::parse(Some(country::Id::US), "(415) 555-2671").unwrap();
        assert_eq!(international, national);
        assert_eq!(national.e164(), "+14155552671");
        assert_eq!(national.to_string(), "+14155552671");

        let raw: RawPhoneNumber = national.into();
        assert_eq!(raw.raw(), "+14155552671");

        assert!(matches!(
            PhoneNumber::parse(None, "  "),
            Err(ValidationError::Empty { .. })
        ));
        assert!(matches!(
            PhoneNumber::parse(None, "415#555"),
            Err(ValidationError::InvalidPhoneNumber { .. })
        ));
    }

    #[test]
    fn page_size_enforces_range() {
        assert!(PageSize::new(PageSize::MIN).is_ok());
        assert!(PageSize::new(PageSize::MAX).is_ok());
        assert!(PageSize::new(0).is_err());
        assert!(PageSize::new(PageSize::MAX + 1).is_err());
        assert_eq!(PageSize::default().value(), 50);
    }
}
