use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use assess_core::validation::{PostalDetails, Rule};

use crate::error::PostalLookupError;

pub const DEFAULT_POSTAL_API: &str = "https://api.postalpincode.in";

#[derive(Clone, Debug)]
pub struct PostalLookupConfig {
    pub base_url: String,
}

/// Resolves a six digit postal code to district, state and country.
#[derive(Clone)]
pub struct PostalLookupService {
    client: Client,
    config: PostalLookupConfig,
}

impl PostalLookupService {
    #[must_use]
    pub fn new(config: PostalLookupConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Look up `code`. Failures are logged and returned; callers clear the
    /// dependent fields and keep the form usable.
    ///
    /// # Errors
    ///
    /// Returns `PostalLookupError::InvalidCode` without a request for
    /// malformed codes, and other variants for HTTP or lookup failures.
    pub async fn lookup(&self, code: &str) -> Result<PostalDetails, PostalLookupError> {
        let code = code.trim();
        if !Rule::PostalCode.accepts(code) {
            return Err(PostalLookupError::InvalidCode(code.to_owned()));
        }

        let result = self.request(code).await;
        if let Err(err) = &result {
            warn!(%code, error = %err, "postal code lookup failed");
        }
        result
    }

    async fn request(&self, code: &str) -> Result<PostalDetails, PostalLookupError> {
        let url = format!(
            "{}/pincode/{code}",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(PostalLookupError::HttpStatus(response.status()));
        }
        let body: Vec<PincodeEntry> = response.json().await?;
        details_from_entries(code, body)
    }
}

/// Pick the first post office of a successful lookup.
///
/// # Errors
///
/// Returns `PostalLookupError::NotFound` unless the first entry reports
/// `Success` with at least one post office.
pub fn details_from_entries(
    code: &str,
    entries: Vec<PincodeEntry>,
) -> Result<PostalDetails, PostalLookupError> {
    entries
        .into_iter()
        .next()
        .filter(|entry| entry.status == "Success")
        .and_then(|entry| entry.post_office.unwrap_or_default().into_iter().next())
        .map(|office| PostalDetails {
            district: office.district,
            state: office.state,
            country: office.country,
        })
        .ok_or_else(|| PostalLookupError::NotFound(code.to_owned()))
}

#[derive(Debug, Deserialize)]
pub struct PincodeEntry {
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "PostOffice", default)]
    pub post_office: Option<Vec<PostOffice>>,
}

#[derive(Debug, Deserialize)]
pub struct PostOffice {
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Country")]
    pub country: String,
}

#[cfg(test)]
mod tests {
    use assess_core::validation::AddressFields;

    use super::*;

    fn parse(raw: &str) -> Vec<PincodeEntry> {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn success_uses_first_post_office() {
        let entries = parse(
            r#"[{"Status":"Success","PostOffice":[
                {"Name":"Connaught Place","District":"Central Delhi","State":"Delhi","Country":"India"},
                {"Name":"Janpath","District":"New Delhi","State":"Delhi","Country":"India"}
            ]}]"#,
        );
        let details = details_from_entries("110001", entries).unwrap();
        assert_eq!(details.district, "Central Delhi");
        assert_eq!(details.state, "Delhi");
        assert_eq!(details.country, "India");
    }

    #[test]
    fn error_status_and_null_offices_are_not_found() {
        let entries = parse(r#"[{"Status":"Error","PostOffice":null}]"#);
        assert!(matches!(
            details_from_entries("999999", entries),
            Err(PostalLookupError::NotFound(_))
        ));
        assert!(matches!(
            details_from_entries("999999", Vec::new()),
            Err(PostalLookupError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_api_clears_dependent_fields() {
        let service = PostalLookupService::new(PostalLookupConfig {
            base_url: "http://127.0.0.1:9".into(),
        });
        let result = service.lookup("110001").await;
        assert!(matches!(result, Err(PostalLookupError::Http(_))), "{result:?}");

        let mut address = AddressFields {
            postal_code: "110001".into(),
            district: "Central Delhi".into(),
            state: "Delhi".into(),
            country: "India".into(),
            ..AddressFields::default()
        };
        assert!(address.apply_lookup("110001", result));
        assert!(address.district.is_empty());
        assert!(address.state.is_empty());
        assert!(address.country.is_empty());
        assert!(!address.postal_code_valid);
    }

    #[tokio::test]
    async fn malformed_codes_skip_the_network() {
        let service = PostalLookupService::new(PostalLookupConfig {
            base_url: "http://127.0.0.1:9".into(),
        });
        for code in ["012345", "12345", "abcdef"] {
            assert!(matches!(
                service.lookup(code).await,
                Err(PostalLookupError::InvalidCode(_))
            ));
        }
    }
}
