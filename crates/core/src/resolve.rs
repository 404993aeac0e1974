//! Resolution of PIXm `Patient` search responses into [`PatientRecord`]s.
//!
//! The engine is pure: it takes the captured [`RawResult`] and the two issuer
//! OIDs the lookup cares about, and either yields every entry mapped in order
//! or fails the whole response.

use crate::bundle::{Address, Bundle, HumanName, Identifier, PatientResource};
use crate::error::ResolveError;
use crate::outcome::OperationOutcome;
use crate::record::{PatientRecord, RawResult};

/// Prefix of every PIXm identifier system
pub const URN_OID_PREFIX: &str = "urn:oid:";

/// Substring the PIXm service places in error bodies
const ERROR_MARKER: &str = "Error";

const USUAL_USE: &str = "usual";

/// Build the `urn:oid:` system URI for an OID
pub fn oid_urn(oid: &str) -> String {
    format!("{}{}", URN_OID_PREFIX, oid)
}

/// Extract the OID from a `urn:oid:<OID>` system URI.
///
/// Returns `None` when the prefix is missing or nothing follows it.
pub fn strip_oid_urn(system: &str) -> Option<&str> {
    system
        .strip_prefix(URN_OID_PREFIX)
        .filter(|oid| !oid.is_empty())
}

/// Maps PIXm responses for one regional/national issuer pair
#[derive(Debug, Clone)]
pub struct Resolver {
    regional_issuer: String,
    regional_system: String,
    national_issuer: String,
    national_system: String,
}

impl Resolver {
    pub fn new(regional_issuer: impl Into<String>, national_issuer: impl Into<String>) -> Self {
        let regional_issuer = regional_issuer.into();
        let national_issuer = national_issuer.into();
        Self {
            regional_system: oid_urn(&regional_issuer),
            national_system: oid_urn(&national_issuer),
            regional_issuer,
            national_issuer,
        }
    }

    pub fn regional_issuer(&self) -> &str {
        &self.regional_issuer
    }

    pub fn national_issuer(&self) -> &str {
        &self.national_issuer
    }

    /// Resolve a raw response into zero or more patient records.
    ///
    /// An empty vector means the server found no match.
    pub fn resolve(&self, raw: RawResult) -> Result<Vec<PatientRecord>, ResolveError> {
        let bundle = Self::parse(&raw)?;
        self.map_bundle(&bundle)
    }

    /// Check the body for the server's error marker, then deserialize it.
    pub fn parse(raw: &RawResult) -> Result<Bundle, ResolveError> {
        let text = raw.body_text();
        if text.contains(ERROR_MARKER) {
            match OperationOutcome::from_body(&raw.body) {
                Some(outcome) => tracing::warn!(
                    status = raw.status_code,
                    diagnostics = %outcome.summary(),
                    "PIXm server returned an OperationOutcome"
                ),
                None => tracing::warn!(status = raw.status_code, "PIXm server reported an error"),
            }
            return Err(ResolveError::ServerReported {
                body: text.into_owned(),
            });
        }

        let bundle: Bundle = serde_json::from_slice(&raw.body)?;
        tracing::info!(
            total = bundle.total,
            entries = bundle.entry.len(),
            "{} Patient Entries in Response",
            bundle.total
        );
        Ok(bundle)
    }

    /// Map every entry of a parsed bundle, preserving entry order
    pub fn map_bundle(&self, bundle: &Bundle) -> Result<Vec<PatientRecord>, ResolveError> {
        if bundle.total == 0 {
            tracing::info!("patient is not registered");
            return Ok(Vec::new());
        }

        let mut patients = Vec::with_capacity(bundle.entry.len());
        for (index, entry) in bundle.entry.iter().enumerate() {
            let record = self.map_entry(index, &entry.resource)?;
            tracing::info!(
                entry = index,
                national_id = %record.national_id,
                "Added Patient to response"
            );
            patients.push(record);
        }
        Ok(patients)
    }

    fn map_entry(
        &self,
        index: usize,
        resource: &PatientResource,
    ) -> Result<PatientRecord, ResolveError> {
        let mut record = PatientRecord::default();

        for identifier in &resource.identifier {
            self.apply_identifier(index, identifier, &mut record)?;
        }

        let first_name = resource
            .name
            .first()
            .ok_or_else(|| ResolveError::entry(index, "patient resource has no name"))?;
        record.given_name = joined_given_names(&resource.name);
        record.family_name = first_name.family.clone();
        record.gender = resource.gender.clone();
        record.birth_date = compact_birth_date(&resource.birth_date);

        if let Some(address) = resource.address.first() {
            apply_address(address, &mut record);
        }

        Ok(record)
    }

    // Rules are independent; a later identifier under the same rule overwrites.
    fn apply_identifier(
        &self,
        index: usize,
        identifier: &Identifier,
        record: &mut PatientRecord,
    ) -> Result<(), ResolveError> {
        if identifier.system == self.regional_system {
            record.regional_id = identifier.value.clone();
            record.regional_issuer = self.regional_issuer.clone();
            tracing::debug!(
                id = %record.regional_id,
                oid = %record.regional_issuer,
                "Set Reg ID"
            );
        }

        if identifier.use_.as_deref() == Some(USUAL_USE) {
            let oid = strip_oid_urn(&identifier.system).ok_or_else(|| {
                ResolveError::entry(
                    index,
                    format!(
                        "usual identifier system '{}' is not a urn:oid URI",
                        identifier.system
                    ),
                )
            })?;
            record.local_id = identifier.value.clone();
            record.local_issuer = oid.to_string();
            tracing::debug!(id = %record.local_id, oid = %record.local_issuer, "Set PID");
        }

        if identifier.system == self.national_system {
            record.national_id = identifier.value.clone();
            record.national_issuer = self.national_issuer.clone();
            tracing::debug!(
                id = %record.national_id,
                oid = %record.national_issuer,
                "Set NHS ID"
            );
        }

        Ok(())
    }
}

/// Given-name tokens of every name entry, space separated
fn joined_given_names(names: &[HumanName]) -> String {
    names
        .iter()
        .flat_map(|name| name.given.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `1962-04-04` -> `19620404`
fn compact_birth_date(birth_date: &str) -> String {
    birth_date.replace('-', "")
}

fn apply_address(address: &Address, record: &mut PatientRecord) {
    record.zip = address.postal_code.clone();
    if let Some(street) = address.line.first() {
        record.street = street.clone();
    }
    if let Some(town) = address.line.get(1) {
        record.town = town.clone();
    }
    record.city = address.city.clone();
    record.state = address.state.clone();
    record.country = address.country.clone();
}
