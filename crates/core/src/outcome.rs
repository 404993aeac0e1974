//! FHIR OperationOutcome, read from server error bodies for diagnostics.

use serde::Deserialize;

/// Severity of the issue
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

/// FHIR OperationOutcome resource (simplified)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    pub resource_type: String,
    #[serde(default)]
    pub issue: Vec<OperationOutcomeIssue>,
}

/// Single issue within an OperationOutcome
#[derive(Debug, Clone, Deserialize)]
pub struct OperationOutcomeIssue {
    pub severity: IssueSeverity,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub diagnostics: Option<String>,
}

impl OperationOutcome {
    /// Parse a response body as an OperationOutcome.
    ///
    /// Returns `None` for anything that is not JSON with
    /// `resourceType == "OperationOutcome"`.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Self>(body)
            .ok()
            .filter(|outcome| outcome.resource_type == "OperationOutcome")
    }

    /// One line per issue, `severity code: diagnostics`, joined with `; `
    pub fn summary(&self) -> String {
        self.issue
            .iter()
            .map(|issue| {
                let severity = format!("{:?}", issue.severity).to_lowercase();
                match &issue.diagnostics {
                    Some(diag) => format!("{} {}: {}", severity, issue.code, diag),
                    None => format!("{} {}", severity, issue.code),
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_outcome_and_summarizes_issues() {
        let body = br#"{
            "resourceType": "OperationOutcome",
            "issue": [
                { "severity": "error", "code": "processing", "diagnostics": "Error: unknown domain" },
                { "severity": "warning", "code": "informational" }
            ]
        }"#;

        let outcome = OperationOutcome::from_body(body).unwrap();
        assert_eq!(outcome.issue.len(), 2);
        assert_eq!(outcome.issue[0].severity, IssueSeverity::Error);
        assert_eq!(
            outcome.summary(),
            "error processing: Error: unknown domain; warning informational"
        );
    }

    #[test]
    fn other_resources_are_not_outcomes() {
        assert!(OperationOutcome::from_body(br#"{"resourceType":"Bundle","issue":[]}"#).is_none());
        assert!(OperationOutcome::from_body(b"Internal Server Error").is_none());
    }
}
