//! pixm-query: run one PIXm patient lookup and print the result as JSON.

use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixm_client::{ClientConfig, PixmClient, QueryRequest};

/// Query a PIXm endpoint for a patient identifier
#[derive(Debug, Parser)]
#[command(name = "pixm-query", version)]
struct Args {
    /// Patient identifier (MRN, NHS number or regional ID)
    #[arg(long, env = "PIXM_PID")]
    pid: String,

    /// Issuer OID of the identifier; optional for 10-character NHS numbers
    #[arg(long, env = "PIXM_PID_OID", default_value = "")]
    pid_oid: String,

    /// Regional (XDS) identifier OID
    #[arg(long, env = "PIXM_REGION_OID")]
    region_oid: String,

    /// PIXm Patient endpoint URL
    #[arg(long, env = "PIXM_URL")]
    url: String,

    /// Request timeout in seconds; 0 uses the configured default
    #[arg(long, env = "PIXM_TIMEOUT", default_value_t = 0)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the JSON result
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();
    let config = ClientConfig::from_env();

    let client = match PixmClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create PIXm client");
            return ExitCode::FAILURE;
        }
    };

    let request = QueryRequest::new(args.pid, args.region_oid, args.url)
        .with_patient_id_issuer(args.pid_oid)
        .with_timeout_secs(args.timeout);

    match client.pdq(&request).await {
        Ok(response) => {
            if response.patients.is_empty() {
                tracing::info!("No matching patient registered");
            }
            println!("{}", json!(response));
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "PIXm lookup failed");
            println!("{}", json!({ "statusCode": 500, "error": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}
