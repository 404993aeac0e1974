//! pixm-client: IHE PIXm patient lookup over HTTP
//!
//! Wraps the transport and the `pixm-core` resolver behind [`PixmClient`].
//! The binary entrypoint is in `main.rs`.

pub mod config;
pub mod error;
pub mod query;
pub mod transport;

use pixm_core::{PatientRecord, RawResult, Resolver};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

pub use config::ClientConfig;
pub use error::{PixmError, TransportError};
pub use pixm_core::ResolveError;
pub use query::{PreparedQuery, QueryRequest};
pub use transport::QueryTransport;

/// Result of a full lookup
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdqResponse {
    /// HTTP status returned by the PIXm server
    pub status_code: u16,
    /// Match count reported by the bundle
    pub count: u32,
    pub patients: Vec<PatientRecord>,
}

/// Client for a PIXm `Patient` endpoint.
///
/// Holds only immutable configuration and a pooled HTTP client, so clones
/// can be used concurrently.
#[derive(Clone)]
pub struct PixmClient {
    config: ClientConfig,
    transport: QueryTransport,
}

impl PixmClient {
    pub fn new(config: ClientConfig) -> Result<Self, PixmError> {
        let transport = QueryTransport::new(&config)?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Validate a request and apply this client's defaults
    pub fn prepare(&self, request: &QueryRequest) -> Result<PreparedQuery, PixmError> {
        request.prepare(&self.config)
    }

    /// Send the query and return the raw response without interpreting it
    pub async fn execute(&self, request: &QueryRequest) -> Result<RawResult, PixmError> {
        let query = self.prepare(request)?;
        Ok(self.transport.execute(&query).await?)
    }

    /// Look up a patient and map every match.
    ///
    /// An empty vector means no match; failures are errors.
    pub async fn lookup(&self, request: &QueryRequest) -> Result<Vec<PatientRecord>, PixmError> {
        Ok(self.pdq(request).await?.patients)
    }

    /// Look up a patient, keeping the HTTP status and reported match count
    pub async fn pdq(&self, request: &QueryRequest) -> Result<PdqResponse, PixmError> {
        let query = self.prepare(request)?;
        let span = tracing::info_span!(
            "pixm_query",
            query_id = %Uuid::new_v4(),
            pid = %query.patient_id,
            pid_oid = %query.patient_id_issuer
        );

        async move {
            let raw = self.transport.execute(&query).await?;
            let status_code = raw.status_code;

            let bundle = Resolver::parse(&raw)?;
            let patients = query.resolver().map_bundle(&bundle)?;

            Ok::<_, PixmError>(PdqResponse {
                status_code,
                count: bundle.total,
                patients,
            })
        }
        .instrument(span)
        .await
    }
}
