use super::ConfigError;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";

/// Credentials for the managed identity provider, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCredentials {
    pub project_id: String,
    pub api_key: String,
    /// Bearer token for privileged calls such as returning sign-in links
    /// instead of having the provider mail them.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl ProviderCredentials {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::CredentialsUnreadable {
                path: display.clone(),
                source,
            }
        })?;

        let credentials: Self = serde_json::from_str(&raw).map_err(|source| {
            ConfigError::CredentialsMalformed {
                path: display.clone(),
                source,
            }
        })?;

        if credentials.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "credentials",
                format!("{} has an empty api_key", display),
            ));
        }

        Ok(credentials)
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .map(|e| e.trim_end_matches('/'))
            .unwrap_or(DEFAULT_IDENTITY_ENDPOINT)
    }
}
