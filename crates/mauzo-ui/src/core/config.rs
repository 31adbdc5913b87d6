//! Console configuration.

use serde::Deserialize;

/// How request and response payloads travel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Plain JSON bodies and individually encoded query parameters.
    #[default]
    Plain,
    /// Whole-body sealing; query parameters collapse into one `payload`
    /// parameter.
    Sealed,
}

/// Deploy-time settings for the console.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend origin, no trailing slash required.
    pub server_url: String,
    /// Versioned API prefix appended between origin and route.
    pub api_version: String,
    /// Payload transport mode.
    pub transport_mode: TransportMode,
    /// Key material for payload sealing and the `token` header.
    pub secret: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:9001".to_string(),
            api_version: "api/v1/".to_string(),
            transport_mode: TransportMode::Plain,
            secret: "mauzo-console".to_string(),
        }
    }
}

impl AppConfig {
    /// Full URL for an API route: `{serverURL}/{apiV1}{route}`.
    #[must_use]
    pub fn route_url(&self, route: &str) -> String {
        format!(
            "{}/{}{route}",
            self.server_url.trim_end_matches('/'),
            self.api_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_url_joins_origin_version_and_route() {
        let config = AppConfig {
            server_url: "https://api.mauzo.example/".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.route_url("bulk-update"),
            "https://api.mauzo.example/api/v1/bulk-update"
        );
    }

    #[test]
    fn transport_mode_parses_from_config_text() {
        let config: AppConfig =
            serde_json::from_str(r#"{"transport_mode": "sealed"}"#).unwrap();
        assert_eq!(config.transport_mode, TransportMode::Sealed);
    }
}
