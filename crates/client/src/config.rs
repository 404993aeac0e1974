//! Client configuration

/// Official NHS number OID, the default national issuer
pub const DEFAULT_NATIONAL_OID: &str = "2.16.840.1.113883.2.1.4.1";

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration shared by every lookup a [`crate::PixmClient`] makes
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Used when a request leaves `national_issuer_oid` empty
    pub national_issuer_oid: String,
    /// Used when a request leaves `timeout_secs` at zero
    pub default_timeout_secs: u64,
    /// Headers sent with every PIXm GET
    pub request_headers: Vec<(String, String)>,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            national_issuer_oid: lookup("PIXM_NATIONAL_OID")
                .filter(|oid| !oid.trim().is_empty())
                .unwrap_or(defaults.national_issuer_oid),
            default_timeout_secs: lookup("PIXM_TIMEOUT_SECS")
                .and_then(|secs| secs.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.default_timeout_secs),
            request_headers: defaults.request_headers,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            national_issuer_oid: DEFAULT_NATIONAL_OID.to_string(),
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            request_headers: vec![
                ("Accept".to_string(), "*/*".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Connection".to_string(), "keep-alive".to_string()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.national_issuer_oid, DEFAULT_NATIONAL_OID);
        assert_eq!(config.default_timeout_secs, 5);
        assert_eq!(config.request_headers.len(), 3);
    }

    #[test]
    fn reads_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("PIXM_NATIONAL_OID", "1.2.3.4"),
            ("PIXM_TIMEOUT_SECS", "12"),
        ]));
        assert_eq!(config.national_issuer_oid, "1.2.3.4");
        assert_eq!(config.default_timeout_secs, 12);
    }

    #[test]
    fn bad_timeout_falls_back() {
        for raw in ["soon", "0", "-3"] {
            let config = ClientConfig::from_lookup(lookup_from(&[("PIXM_TIMEOUT_SECS", raw)]));
            assert_eq!(config.default_timeout_secs, DEFAULT_TIMEOUT_SECS, "input {raw}");
        }
    }
}
