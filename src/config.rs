use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

/// Client-side configuration: where the deployment API lives and how to
/// authenticate against it. The descriptor itself comes from the service
/// manifest, not from here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub workspace_fqn: Option<String>,
    #[serde(default)]
    pub structured_logging: bool,
}

fn default_api_endpoint() -> String {
    "http://localhost:8900".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_endpoint: default_api_endpoint(),
            api_token: None,
            workspace_fqn: None,
            structured_logging: false,
        }
    }
}

impl ClientConfig {
    pub fn from_path(path: &Path) -> Result<ClientConfig> {
        let config_str = std::fs::read_to_string(path)?;
        let config: ClientConfig = Figment::new().merge(Yaml::string(&config_str)).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if Url::parse(&self.api_endpoint).is_err() {
            return Err(anyhow::anyhow!(
                "invalid api endpoint: {}",
                self.api_endpoint
            ));
        }
        Ok(())
    }

    pub fn structured_logging(&self) -> bool {
        self.structured_logging
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::ClientConfig;

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api_endpoint: https://deploy.usea1.example.dev\napi_token: secret\nworkspace_fqn: usea1-devtest:fallback-devtest"
        )
        .unwrap();
        let config = ClientConfig::from_path(file.path()).unwrap();
        assert_eq!(config.api_endpoint, "https://deploy.usea1.example.dev");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(
            config.workspace_fqn.as_deref(),
            Some("usea1-devtest:fallback-devtest")
        );
        assert!(!config.structured_logging());
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "structured_logging: true").unwrap();
        let config = ClientConfig::from_path(file.path()).unwrap();
        assert_eq!(config.api_endpoint, "http://localhost:8900");
        assert!(config.api_token.is_none());
        assert!(config.structured_logging());
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let config = ClientConfig {
            api_endpoint: "not an endpoint".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
