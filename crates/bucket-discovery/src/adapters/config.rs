use crate::domain::{ConfigError, RegistryConfiguration};
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - Fixed config for testing/embedding
// ============================================================================

/// Configuration provider returning a fixed, already validated configuration.
///
/// Useful for testing and embedding. For deployments, use `TomlConfigProvider`.
#[derive(Debug, Clone)]
pub struct StaticConfigProvider {
    config: RegistryConfiguration,
}

impl StaticConfigProvider {
    #[must_use]
    pub fn new(config: RegistryConfiguration) -> Self {
        Self { config }
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn load(&self) -> Result<RegistryConfiguration, ConfigError> {
        Ok(self.config.clone())
    }
}

// ============================================================================
// TomlConfigProvider - Property file loading (requires "config-file" feature)
// ============================================================================

#[cfg(feature = "config-file")]
mod toml_config {
    use super::*;
    use crate::domain::RegistryProperties;
    use serde::Deserialize;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};
    use tracing::debug;

    /// Flat property file structure. Unknown keys are ignored.
    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    struct PropertyFile {
        s3_bucket_name: Option<String>,
        s3_bucket_region: Option<String>,
        file_prefix: Option<String>,
        file_expiration: Option<i64>,
        update_interval: Option<i64>,
        s3_endpoint: Option<String>,
        s3_endpoint_region: Option<String>,
        s3_path_style_access: Option<bool>,
        credentials_type: Option<String>,
        credentials_access_key_id: Option<String>,
        credentials_secret_access_key: Option<String>,
        credentials_session_token: Option<String>,
    }

    impl From<PropertyFile> for RegistryProperties {
        fn from(file: PropertyFile) -> Self {
            Self {
                bucket_name: file.s3_bucket_name,
                bucket_region: file.s3_bucket_region,
                file_prefix: file.file_prefix,
                file_expiration_secs: file.file_expiration,
                update_interval_secs: file.update_interval,
                endpoint: file.s3_endpoint,
                endpoint_region: file.s3_endpoint_region,
                path_style_access: file.s3_path_style_access,
                credentials_type: file.credentials_type,
                access_key_id: file.credentials_access_key_id,
                secret_access_key: file.credentials_secret_access_key,
                session_token: file.credentials_session_token,
            }
        }
    }

    /// TOML-based configuration provider.
    ///
    /// The file is read again on every [`load`](ConfigProvider::load), so
    /// edits take effect on the next discovery cycle.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// s3-bucket-name = "cluster-discovery"
    /// s3-bucket-region = "us-east-1"
    /// file-prefix = "cluster/"
    /// file-expiration = 360
    /// update-interval = 180
    /// credentials-type = "default"
    /// ```
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        path: PathBuf,
    }

    impl TomlConfigProvider {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Parse and validate configuration from a TOML string.
        pub fn parse(content: &str) -> Result<RegistryConfiguration, ConfigError> {
            let file: PropertyFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
            RegistryProperties::from(file).validate()
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn load(&self) -> Result<RegistryConfiguration, ConfigError> {
            let path = self.path.display().to_string();
            let content = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
                ErrorKind::NotFound => ConfigError::NotFound { path: path.clone() },
                _ => ConfigError::Io {
                    path: path.clone(),
                    error: e.to_string(),
                },
            })?;
            let config = Self::parse(&content)?;
            debug!(path = %path, bucket = %config.bucket_name, "Loaded configuration");
            Ok(config)
        }
    }
}

#[cfg(feature = "config-file")]
pub use toml_config::TomlConfigProvider;
