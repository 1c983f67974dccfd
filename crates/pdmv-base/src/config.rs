//! Client configuration for the PdmV applications.
//!
//! Holds the connection settings shared by every application client:
//! credential mode, target environment, credentials and transport tuning.
//! Configuration is built from defaults or loaded from environment variables.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Server root for the development deployment.
pub const DEV_SERVER_ROOT: &str = "https://cms-pdmv-dev.web.cern.ch";

/// Server root for the production deployment.
pub const PROD_SERVER_ROOT: &str = "https://cms-pdmv-prod.web.cern.ch";

/// How the client authenticates against the applications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialMode {
    /// CERN single sign-on session, carried by a cookie.
    #[default]
    Sso,
    /// OAuth client credentials (application id and secret).
    ClientCredentials,
}

impl CredentialMode {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialMode::Sso => "sso",
            CredentialMode::ClientCredentials => "client_credentials",
        }
    }
}

impl fmt::Display for CredentialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sso" => Ok(CredentialMode::Sso),
            "client_credentials" | "client" | "oidc" => Ok(CredentialMode::ClientCredentials),
            other => Err(ConfigError::InvalidValue {
                key: "credential_mode".to_string(),
                message: format!("unknown credential mode '{}'", other),
            }),
        }
    }
}

/// Connection configuration for a PdmV application client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Credential mode.
    pub credential_mode: CredentialMode,

    /// Target the development deployment instead of production.
    pub dev: bool,

    /// Log every request and response at info level.
    pub debug: bool,

    /// SSO session cookie.
    pub cookie: Option<String>,

    /// OAuth client id.
    pub client_id: String,

    /// OAuth client secret.
    #[serde(skip_serializing)]
    pub client_secret: String,

    /// Pre-issued bearer token for client-credentials mode.
    #[serde(skip_serializing)]
    pub access_token: Option<String>,

    /// Override for the server root (scheme and host, no application path).
    pub server_root: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Whether to verify TLS certificates (disable only for testing).
    pub verify_tls: bool,
}

impl Default for ClientConfig {
    /// SSO against the development deployment.
    fn default() -> Self {
        Self {
            credential_mode: CredentialMode::Sso,
            dev: true,
            debug: false,
            cookie: None,
            client_id: String::new(),
            client_secret: String::new(),
            access_token: None,
            server_root: None,
            timeout_secs: 30,
            verify_tls: true,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PDMV_CREDENTIAL_MODE`: `sso` or `client_credentials` (default: sso)
    /// - `PDMV_DEV`: target the development deployment (default: true)
    /// - `PDMV_DEBUG`: verbose request logging (default: false)
    /// - `PDMV_COOKIE`: SSO session cookie
    /// - `PDMV_CLIENT_ID`: OAuth client id
    /// - `PDMV_CLIENT_SECRET`: OAuth client secret
    /// - `PDMV_ACCESS_TOKEN`: bearer token for client-credentials mode
    /// - `PDMV_SERVER_ROOT`: server root override
    /// - `PDMV_TIMEOUT_SECS`: request timeout in seconds (default: 30)
    /// - `PDMV_VERIFY_TLS`: whether to verify TLS (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();

        let credential_mode = match std::env::var("PDMV_CREDENTIAL_MODE") {
            Ok(s) => s.parse()?,
            Err(_) => default.credential_mode,
        };

        Ok(Self {
            credential_mode,
            dev: env_flag("PDMV_DEV").unwrap_or(default.dev),
            debug: env_flag("PDMV_DEBUG").unwrap_or(default.debug),
            cookie: std::env::var("PDMV_COOKIE").ok(),
            client_id: std::env::var("PDMV_CLIENT_ID").unwrap_or(default.client_id),
            client_secret: std::env::var("PDMV_CLIENT_SECRET").unwrap_or(default.client_secret),
            access_token: std::env::var("PDMV_ACCESS_TOKEN").ok(),
            server_root: std::env::var("PDMV_SERVER_ROOT").ok(),
            timeout_secs: std::env::var("PDMV_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
            verify_tls: env_flag("PDMV_VERIFY_TLS").unwrap_or(default.verify_tls),
        })
    }

    /// Target the production deployment.
    pub fn production(mut self) -> Self {
        self.dev = false;
        self
    }

    /// Enable or disable verbose request logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the SSO session cookie.
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    /// Switch to client-credentials mode with the given application id and secret.
    pub fn with_client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.credential_mode = CredentialMode::ClientCredentials;
        self.client_id = client_id.into();
        self.client_secret = client_secret.into();
        self
    }

    /// Set the bearer token sent in client-credentials mode.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Point the client at a different server root.
    pub fn with_server_root(mut self, root: impl Into<String>) -> Self {
        self.server_root = Some(root.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Server root in effect, without trailing slash.
    pub fn server_root(&self) -> &str {
        let root = match self.server_root.as_deref() {
            Some(root) => root,
            None if self.dev => DEV_SERVER_ROOT,
            None => PROD_SERVER_ROOT,
        };
        root.trim_end_matches('/')
    }

    /// Build a full URL for a path under an application.
    pub fn app_url(&self, app: &str, path: &str) -> String {
        let app = app.trim_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}/{}", self.server_root(), app, path)
    }

    /// Check that the selected credential mode has what it needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credential_mode == CredentialMode::ClientCredentials {
            if self.client_id.is_empty() {
                return Err(ConfigError::MissingValue("client_id".to_string()));
            }
            if self.client_secret.is_empty() {
                return Err(ConfigError::MissingValue("client_secret".to_string()));
            }
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|s| !matches!(s.trim().to_lowercase().as_str(), "false" | "0" | "no" | ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.credential_mode, CredentialMode::Sso);
        assert!(config.dev);
        assert!(!config.debug);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.verify_tls);
        assert_eq!(config.server_root(), DEV_SERVER_ROOT);
    }

    #[test]
    fn test_production_root() {
        let config = ClientConfig::default().production();
        assert_eq!(config.server_root(), PROD_SERVER_ROOT);
    }

    #[test]
    fn test_app_url() {
        let config = ClientConfig::default();
        assert_eq!(
            config.app_url("relval", "api/relvals/get/ABC-1"),
            "https://cms-pdmv-dev.web.cern.ch/relval/api/relvals/get/ABC-1"
        );
        assert_eq!(
            config.app_url("/relmonservice/", "/api/tick"),
            "https://cms-pdmv-dev.web.cern.ch/relmonservice/api/tick"
        );
    }

    #[test]
    fn test_app_url_trailing_slash_root() {
        let config = ClientConfig::default().with_server_root("http://127.0.0.1:8000/");
        assert_eq!(
            config.app_url("relval", "api/search?db_name=relvals"),
            "http://127.0.0.1:8000/relval/api/search?db_name=relvals"
        );
    }

    #[test]
    fn test_credential_mode_parse() {
        assert_eq!("sso".parse::<CredentialMode>().unwrap(), CredentialMode::Sso);
        assert_eq!(
            "Client_Credentials".parse::<CredentialMode>().unwrap(),
            CredentialMode::ClientCredentials
        );
        assert!("kerberos".parse::<CredentialMode>().is_err());
        assert_eq!(CredentialMode::ClientCredentials.to_string(), "client_credentials");
    }

    #[test]
    fn test_validate_client_credentials() {
        let mut config = ClientConfig::default().with_client_credentials("", "secret");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingValue(ref key)) if key == "client_id"
        ));

        config.client_id = "app-id".to_string();
        config.client_secret = String::new();
        assert!(config.validate().is_err());

        config.client_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_sso_needs_nothing() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = ClientConfig::default().with_timeout_secs(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_secrets_not_serialized() {
        let config = ClientConfig::default()
            .with_client_credentials("app-id", "top-secret")
            .with_access_token("token-value");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("app-id"));
        assert!(!json.contains("top-secret"));
        assert!(!json.contains("token-value"));
    }
}
