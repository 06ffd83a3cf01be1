use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";
pub const DEFAULT_API_VERSION: &str = "2010-04-01";
pub const DEFAULT_LOOKUP_BASE_URL: &str = "https://lookups.twilio.com";
pub const DEFAULT_LOOKUP_VERSION: &str = "v1";

const ACCOUNTS_SEGMENT: &str = "Accounts";
const JSON_SUFFIX: &str = ".json";

/// Which of the two Twilio API surfaces a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiVariant {
    /// Transactional, account-scoped API (`api.twilio.com`).
    #[default]
    Regular,
    /// Read-only lookup API (`lookups.twilio.com`), not account-scoped.
    Lookup,
}

/// Base URL and version pairs for both API variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub api_version: String,
    pub lookup_base_url: String,
    pub lookup_version: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            lookup_base_url: DEFAULT_LOOKUP_BASE_URL.to_owned(),
            lookup_version: DEFAULT_LOOKUP_VERSION.to_owned(),
        }
    }
}

impl Endpoints {
    /// Compose the full resource URI.
    ///
    /// Regular: `{base}/{version}/Accounts/{account}/{path}[/{id}].json`, the suffix going on the
    /// terminal segment exactly once. Lookup: `{base}/{version}/{path}[/{id}]` with no suffix.
    /// Empty segments are dropped, so separators are never doubled.
    ///
    /// The account sid and the identifier are each pushed as a single percent-encoded segment,
    /// so `/`, `?` or `#` inside them can never change the shape of the URI.
    pub fn build_uri(
        &self,
        variant: ApiVariant,
        account_sid: &str,
        resource_path: &str,
        resource_id: Option<&str>,
    ) -> Result<Url, url::ParseError> {
        let (base, version) = match variant {
            ApiVariant::Regular => (self.base_url.as_str(), self.api_version.as_str()),
            ApiVariant::Lookup => (self.lookup_base_url.as_str(), self.lookup_version.as_str()),
        };

        let mut segments = split_path(version);
        if variant == ApiVariant::Regular {
            segments.push(ACCOUNTS_SEGMENT.to_owned());
            segments.extend(single_segment(account_sid));
        }
        segments.extend(split_path(resource_path));
        segments.extend(resource_id.and_then(single_segment));
        if variant == ApiVariant::Regular {
            if let Some(last) = segments.last_mut() {
                last.push_str(JSON_SUFFIX);
            }
        }

        let mut url = Url::parse(base)?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Parsed regular-variant base, used to resolve relative next-page references.
    pub fn regular_base(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)
    }
}

/// Configured paths (`version`, resource path) may span several segments.
fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

fn single_segment(value: &str) -> Option<String> {
    let value = value.trim_matches('/');
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_list_uri_has_account_segment_and_suffix() {
        let uri = Endpoints::default()
            .build_uri(ApiVariant::Regular, "AC123", "Messages", None)
            .unwrap();
        assert_eq!(
            uri.as_str(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn regular_uri_with_id_puts_suffix_on_id_segment_only() {
        let uri = Endpoints::default()
            .build_uri(ApiVariant::Regular, "AC123", "Messages", Some("SM456"))
            .unwrap();
        assert_eq!(
            uri.as_str(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages/SM456.json"
        );
        assert_eq!(uri.as_str().matches(".json").count(), 1);
    }

    #[test]
    fn lookup_uri_has_no_account_segment_or_suffix() {
        let uri = Endpoints::default()
            .build_uri(ApiVariant::Lookup, "AC123", "PhoneNumbers", Some("+14155552671"))
            .unwrap();
        assert_eq!(
            uri.as_str(),
            "https://lookups.twilio.com/v1/PhoneNumbers/+14155552671"
        );
        assert!(!uri.path().contains("Accounts"));
        assert!(!uri.path().contains("AC123"));
    }

    #[test]
    fn empty_and_slashed_segments_never_double_separators() {
        let endpoints = Endpoints {
            base_url: "https://api.example.test/".to_owned(),
            api_version: "/2010-04-01/".to_owned(),
            ..Endpoints::default()
        };

        let cases = [
            (ApiVariant::Regular, "/Messages/", None),
            (ApiVariant::Regular, "Messages", Some("")),
            (ApiVariant::Lookup, "PhoneNumbers", None),
            (ApiVariant::Lookup, "PhoneNumbers/", Some("/123/")),
        ];
        for (variant, path, id) in cases {
            let uri = endpoints.build_uri(variant, "AC1", path, id).unwrap();
            assert!(!uri.path().contains("//"), "doubled separator in {uri}");
            assert!(!uri.path().ends_with('/'), "trailing separator in {uri}");
        }

        let uri = endpoints
            .build_uri(ApiVariant::Regular, "AC1", "/Messages/", Some(""))
            .unwrap();
        assert_eq!(
            uri.as_str(),
            "https://api.example.test/2010-04-01/Accounts/AC1/Messages.json"
        );
    }

    #[test]
    fn segments_appear_in_order() {
        let uri = Endpoints::default()
            .build_uri(ApiVariant::Regular, "AC9", "Calls", Some("CA1"))
            .unwrap();
        let segments = uri.path_segments().unwrap().collect::<Vec<_>>();
        assert_eq!(
            segments,
            vec!["2010-04-01", "Accounts", "AC9", "Calls", "CA1.json"]
        );
    }

    #[test]
    fn invalid_base_is_reported_not_panicked() {
        let endpoints = Endpoints {
            base_url: "not a url".to_owned(),
            ..Endpoints::default()
        };
        assert!(
            endpoints
                .build_uri(ApiVariant::Regular, "AC1", "Messages", None)
                .is_err()
        );
    }

    #[test]
    fn identifier_syntax_is_escaped_into_one_segment() {
        let endpoints = Endpoints::default();

        let uri = endpoints
            .build_uri(
                ApiVariant::Regular,
                "AC123",
                "Messages",
                Some("../../AC999/Messages/SM1"),
            )
            .unwrap();
        let segments = uri.path_segments().unwrap().collect::<Vec<_>>();
        assert_eq!(&segments[..4], &["2010-04-01", "Accounts", "AC123", "Messages"]);
        assert_eq!(segments.len(), 5);
        assert!(segments[4].ends_with(".json"));

        let uri = endpoints
            .build_uri(ApiVariant::Regular, "AC123", "Messages", Some("SM1?Body=x"))
            .unwrap();
        assert_eq!(uri.query(), None);
        assert_eq!(
            uri.path(),
            "/2010-04-01/Accounts/AC123/Messages/SM1%3FBody=x.json"
        );

        let uri = endpoints
            .build_uri(ApiVariant::Lookup, "AC123", "PhoneNumbers", Some("415#555"))
            .unwrap();
        assert_eq!(uri.fragment(), None);
        assert_eq!(uri.path(), "/v1/PhoneNumbers/415%23555");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let endpoints = Endpoints {
            base_url: "https://proxy.example.test/twilio/".to_owned(),
            ..Endpoints::default()
        };
        let uri = endpoints
            .build_uri(ApiVariant::Regular, "AC1", "Messages", None)
            .unwrap();
        assert_eq!(
            uri.as_str(),
            "https://proxy.example.test/twilio/2010-04-01/Accounts/AC1/Messages.json"
        );
    }
}
