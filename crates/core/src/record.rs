use serde::{Deserialize, Serialize};

/// Flattened patient record mapped from one Bundle entry.
///
/// Fields the response did not supply stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub regional_id: String,
    pub regional_issuer: String,
    pub national_id: String,
    pub national_issuer: String,
    /// Identifier with `use == "usual"`
    pub local_id: String,
    /// OID taken from the usual identifier's `urn:oid:` system
    pub local_issuer: String,
    pub given_name: String,
    pub family_name: String,
    pub gender: String,
    /// `YYYYMMDD`
    pub birth_date: String,
    pub street: String,
    pub town: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
}

/// Status and body captured from one PIXm round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResult {
    pub status_code: u16,
    pub body: Vec<u8>,
}

impl RawResult {
    pub fn new(status_code: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
