//! pixm-core: FHIR wire shapes and the PIXm response resolution engine
//!
//! This crate has no I/O. It turns the captured body of a PIXm `Patient`
//! search into flat [`PatientRecord`]s.

pub mod bundle;
pub mod error;
pub mod outcome;
pub mod record;
pub mod resolve;

pub use bundle::{
    Address, Bundle, BundleEntry, BundleLink, BundleType, HumanName, Identifier, PatientResource,
};
pub use error::ResolveError;
pub use outcome::{IssueSeverity, OperationOutcome, OperationOutcomeIssue};
pub use record::{PatientRecord, RawResult};
pub use resolve::{Resolver, URN_OID_PREFIX, oid_urn, strip_oid_urn};
