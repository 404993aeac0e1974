use serde::{Deserialize, Deserializer, Serialize};

/// Read an explicit JSON `null` as the field's empty value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// FHIR Bundle types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Searchset,
    History,
    Collection,
    Document,
    Message,
    Transaction,
    TransactionResponse,
    Batch,
    BatchResponse,
    #[serde(other)]
    Unknown,
}

/// FHIR Bundle as returned by a PIXm `Patient` search (simplified).
///
/// Every field is optional on the wire. Missing or `null` values fall back
/// to their empty defaults so a sparse server response still deserializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub bundle_type: Option<BundleType>,

    /// Number of matches reported by the server. Missing means zero.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u32,

    /// Paging links. Parsed for completeness, never followed.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<BundleLink>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

/// Bundle link (self, next, previous)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleLink {
    #[serde(default, deserialize_with = "null_as_default")]
    pub relation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// Bundle entry wrapping one Patient resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource: PatientResource,
}

/// The subset of a FHIR Patient resource the lookup maps from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub identifier: Vec<Identifier>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: Vec<HumanName>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub birth_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: Vec<Address>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    /// Identifier system, `urn:oid:<OID>` for PIXm
    #[serde(default, deserialize_with = "null_as_default")]
    pub system: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(rename = "use", default, deserialize_with = "null_as_default")]
    pub use_: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub family: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub given: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "use", default, deserialize_with = "null_as_default")]
    pub use_: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sparse_bundle_defaults_missing_fields() {
        let bundle: Bundle = serde_json::from_value(json!({
            "resourceType": "Bundle",
            "entry": [{ "resource": { "identifier": [{ "value": "X1" }] } }]
        }))
        .unwrap();

        assert_eq!(bundle.total, 0);
        assert!(bundle.bundle_type.is_none());
        assert_eq!(bundle.entry.len(), 1);
        let id = &bundle.entry[0].resource.identifier[0];
        assert_eq!(id.value, "X1");
        assert!(id.use_.is_none());
        assert!(id.system.is_empty());
    }

    #[test]
    fn explicit_nulls_read_as_empty() {
        let bundle: Bundle = serde_json::from_value(json!({
            "resourceType": "Bundle",
            "total": null,
            "entry": [{
                "resource": {
                    "identifier": null,
                    "name": [{ "family": null, "given": null }],
                    "birthDate": null,
                    "address": [{ "line": null, "city": null, "postalCode": "PR1 1PR" }]
                }
            }]
        }))
        .unwrap();

        assert_eq!(bundle.total, 0);
        let resource = &bundle.entry[0].resource;
        assert!(resource.identifier.is_empty());
        assert_eq!(resource.name[0].family, "");
        assert!(resource.name[0].given.is_empty());
        assert_eq!(resource.birth_date, "");
        assert!(resource.address[0].line.is_empty());
        assert_eq!(resource.address[0].postal_code, "PR1 1PR");
    }

    #[test]
    fn unknown_bundle_type_does_not_fail() {
        let bundle: Bundle =
            serde_json::from_value(json!({ "type": "subscription-notification", "total": 2 }))
                .unwrap();
        assert_eq!(bundle.bundle_type, Some(BundleType::Unknown));
        assert_eq!(bundle.total, 2);
    }

    #[test]
    fn searchset_links_are_parsed() {
        let bundle: Bundle = serde_json::from_value(json!({
            "resourceType": "Bundle",
            "type": "searchset",
            "total": 0,
            "link": [{ "relation": "self", "url": "http://pix.example/Patient" }]
        }))
        .unwrap();
        assert_eq!(bundle.bundle_type, Some(BundleType::Searchset));
        assert_eq!(bundle.link[0].relation, "self");
    }
}
