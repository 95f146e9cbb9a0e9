//! Process configuration, read once from the environment at startup.

use leadsync_ghl::DEFAULT_BASE_URL;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

/// LeadConnector credentials and scoping.
#[derive(Clone, Default)]
pub struct GhlConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub location_id: String,
}

impl GhlConfig {
    /// Names of required settings that are empty.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.is_empty() {
            missing.push("GHL_API_KEY");
        }
        if self.client_secret.is_empty() {
            missing.push("GHL_PRIVATE_KEY");
        }
        if self.location_id.is_empty() {
            missing.push("GHL_LOCATION_ID");
        }
        missing
    }
}

impl std::fmt::Debug for GhlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GhlConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("location_id", &self.location_id)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` allows any origin.
    pub allowed_origins: Option<Vec<String>>,
    pub ghl: GhlConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Values are trimmed and empty
    /// values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!("Invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().trim_end_matches('/').to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty());

        Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            allowed_origins,
            ghl: GhlConfig {
                base_url: get("GHL_API_BASE_URL")
                    .map(|v| v.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                client_id: get("GHL_API_KEY").unwrap_or_default(),
                client_secret: get("GHL_PRIVATE_KEY").unwrap_or_default(),
                location_id: get("GHL_LOCATION_ID").unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert!(config.allowed_origins.is_none());
        assert_eq!(config.ghl.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            config.ghl.missing_settings(),
            vec!["GHL_API_KEY", "GHL_PRIVATE_KEY", "GHL_LOCATION_ID"]
        );
    }

    #[test]
    fn reads_credentials_and_origins() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("GHL_API_KEY", " client "),
            ("GHL_PRIVATE_KEY", "secret"),
            ("GHL_LOCATION_ID", "loc-1"),
            (
                "ALLOWED_ORIGINS",
                "https://app.example.com/, http://localhost:3000,,",
            ),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.ghl.client_id, "client");
        assert!(config.ghl.missing_settings().is_empty());
        assert_eq!(
            config.allowed_origins,
            Some(vec![
                "https://app.example.com".to_string(),
                "http://localhost:3000".to_string()
            ])
        );
    }

    #[test]
    fn blank_values_fall_back() {
        let config = config_from(&[("PORT", "not-a-port"), ("ALLOWED_ORIGINS", " , ")]);
        assert_eq!(config.port, 3001);
        assert!(config.allowed_origins.is_none());
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = config_from(&[("GHL_PRIVATE_KEY", "hunter2")]);
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
