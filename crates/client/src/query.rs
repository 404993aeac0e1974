//! PIXm query inputs, validation and defaulting

use std::time::Duration;

use pixm_core::Resolver;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::PixmError;

/// Length of a bare national (NHS) number
const NATIONAL_ID_LEN: usize = 10;

/// Caller-supplied inputs for one PIXm lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub patient_id: String,
    /// Issuer OID of `patient_id`. Optional for 10-character national IDs.
    #[serde(default)]
    pub patient_id_issuer: String,
    /// OID of the regional identifier system
    pub regional_issuer: String,
    #[serde(default)]
    pub national_issuer_oid: String,
    pub endpoint: String,
    /// Zero means the configured default
    #[serde(default)]
    pub timeout_secs: u64,
}

impl QueryRequest {
    pub fn new(
        patient_id: impl Into<String>,
        regional_issuer: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            regional_issuer: regional_issuer.into(),
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_patient_id_issuer(mut self, oid: impl Into<String>) -> Self {
        self.patient_id_issuer = oid.into();
        self
    }

    pub fn with_national_issuer_oid(mut self, oid: impl Into<String>) -> Self {
        self.national_issuer_oid = oid.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Validate the request and apply defaults.
    ///
    /// Defaults apply in order: timeout, national issuer, then the patient ID
    /// issuer. Any 10-character `patient_id` without an issuer is taken to be
    /// a national ID; its content is not checked.
    pub fn prepare(&self, config: &ClientConfig) -> Result<PreparedQuery, PixmError> {
        let missing: Vec<&str> = [
            ("patient_id", &self.patient_id),
            ("regional_issuer", &self.regional_issuer),
            ("endpoint", &self.endpoint),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();
        if !missing.is_empty() {
            return Err(PixmError::Validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }

        let timeout_secs = if self.timeout_secs == 0 {
            config.default_timeout_secs
        } else {
            self.timeout_secs
        };

        let national_issuer_oid = if self.national_issuer_oid.is_empty() {
            config.national_issuer_oid.clone()
        } else {
            self.national_issuer_oid.clone()
        };

        let patient_id_issuer = if self.patient_id_issuer.is_empty()
            && self.patient_id.chars().count() == NATIONAL_ID_LEN
        {
            national_issuer_oid.clone()
        } else {
            self.patient_id_issuer.clone()
        };

        let url = query_url(&self.endpoint, &patient_id_issuer, &self.patient_id)?;

        Ok(PreparedQuery {
            patient_id: self.patient_id.clone(),
            patient_id_issuer,
            regional_issuer: self.regional_issuer.clone(),
            national_issuer_oid,
            timeout_secs,
            url,
        })
    }
}

/// A validated request with every default applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    pub patient_id: String,
    pub patient_id_issuer: String,
    pub regional_issuer: String,
    pub national_issuer_oid: String,
    pub timeout_secs: u64,
    pub url: Url,
}

impl PreparedQuery {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolver matching this query's regional and national issuers
    pub fn resolver(&self) -> Resolver {
        Resolver::new(&self.regional_issuer, &self.national_issuer_oid)
    }
}

/// `<endpoint>?identifier=<issuer>%7C<id>&_format=json&_pretty=true`
fn query_url(endpoint: &str, issuer: &str, patient_id: &str) -> Result<Url, PixmError> {
    let mut url = Url::parse(endpoint.trim())
        .map_err(|e| PixmError::Validation(format!("invalid endpoint '{}': {}", endpoint, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(PixmError::Validation(format!(
            "endpoint '{}' is not an http(s) URL",
            endpoint
        )));
    }

    url.query_pairs_mut()
        .append_pair("identifier", &format!("{}|{}", issuer, patient_id))
        .append_pair("_format", "json")
        .append_pair("_pretty", "true");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGION_OID: &str = "2.16.840.1.113883.2.1.3.31.2.1.1";
    const ENDPOINT: &str = "http://pix.example:8081/SpiritPIXFhir/r4/Patient";

    fn prepare(request: QueryRequest) -> Result<PreparedQuery, PixmError> {
        request.prepare(&ClientConfig::default())
    }

    #[test]
    fn ten_character_id_defaults_to_national_issuer() {
        let prepared = prepare(QueryRequest::new("9999999468", REGION_OID, ENDPOINT)).unwrap();

        assert_eq!(prepared.national_issuer_oid, "2.16.840.1.113883.2.1.4.1");
        assert_eq!(prepared.patient_id_issuer, "2.16.840.1.113883.2.1.4.1");
        assert_eq!(prepared.timeout_secs, 5);
        assert_eq!(
            prepared.url.as_str(),
            "http://pix.example:8081/SpiritPIXFhir/r4/Patient\
             ?identifier=2.16.840.1.113883.2.1.4.1%7C9999999468&_format=json&_pretty=true"
        );
    }

    #[test]
    fn any_ten_characters_trigger_the_national_default() {
        let prepared = prepare(
            QueryRequest::new("ABCDEFGHIJ", REGION_OID, ENDPOINT).with_national_issuer_oid("1.2.3"),
        )
        .unwrap();
        assert_eq!(prepared.patient_id_issuer, "1.2.3");
    }

    #[test]
    fn blank_ten_character_id_still_defaults_to_national_issuer() {
        let prepared = prepare(QueryRequest::new("          ", "1.2", "http://x/Patient")).unwrap();
        assert_eq!(prepared.patient_id, "          ");
        assert_eq!(prepared.patient_id_issuer, "2.16.840.1.113883.2.1.4.1");
    }

    #[test]
    fn explicit_issuer_is_kept() {
        let prepared = prepare(
            QueryRequest::new("9999999468", REGION_OID, ENDPOINT)
                .with_patient_id_issuer("2.16.840.1.113883.2.1.3.31.2.1.1.1.3.1.1")
                .with_timeout_secs(30),
        )
        .unwrap();
        assert_eq!(
            prepared.patient_id_issuer,
            "2.16.840.1.113883.2.1.3.31.2.1.1.1.3.1.1"
        );
        assert_eq!(prepared.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn other_lengths_leave_issuer_empty() {
        let prepared = prepare(QueryRequest::new("REG.1MWU5C92M2", REGION_OID, ENDPOINT)).unwrap();
        assert!(prepared.patient_id_issuer.is_empty());
        assert!(prepared.url.as_str().contains("identifier=%7CREG.1MWU5C92M2"));
    }

    #[test]
    fn missing_fields_are_named() {
        let err = prepare(QueryRequest::new("", REGION_OID, "")).unwrap_err();
        match err {
            PixmError::Validation(msg) => {
                assert!(msg.contains("patient_id"));
                assert!(msg.contains("endpoint"));
                assert!(!msg.contains("regional_issuer"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn endpoint_must_be_http_url() {
        for endpoint in ["not a url", "ftp://pix.example/Patient"] {
            let err = prepare(QueryRequest::new("9999999468", REGION_OID, endpoint)).unwrap_err();
            assert!(matches!(err, PixmError::Validation(_)), "endpoint {endpoint}");
        }
    }

    #[test]
    fn resolver_uses_prepared_issuers() {
        let prepared = prepare(QueryRequest::new("9999999468", REGION_OID, ENDPOINT)).unwrap();
        let resolver = prepared.resolver();
        assert_eq!(resolver.regional_issuer(), REGION_OID);
        assert_eq!(resolver.national_issuer(), "2.16.840.1.113883.2.1.4.1");
    }
}
