//! Registry configuration and its validation rules.
//!
//! Configuration arrives as a flat key-value property set
//! ([`RegistryProperties`]) and is only accepted once every rule holds,
//! producing an immutable [`RegistryConfiguration`] snapshot.
//!
//! ## Property Keys
//!
//! | Key | Required | Default |
//! |-----|----------|---------|
//! | `s3-bucket-name` | yes | |
//! | `s3-bucket-region` | yes | |
//! | `file-prefix` | no | `""` |
//! | `file-expiration` | yes | |
//! | `update-interval` | yes | |
//! | `s3-endpoint` | no | `s3.amazonaws.com` |
//! | `s3-endpoint-region` | no | |
//! | `s3-path-style-access` | no | |
//! | `credentials-type` | yes | |
//! | `credentials-access-key-id` | for `access_key`, `temporary_session` | |
//! | `credentials-secret-access-key` | for `access_key`, `temporary_session` | |
//! | `credentials-session-token` | for `temporary_session` | |

use std::fmt;

use super::errors::ConfigError;

/// Public endpoint used when no override is configured.
pub const DEFAULT_ENDPOINT: &str = "s3.amazonaws.com";

/// Region identifiers accepted for `s3-bucket-region`.
pub const KNOWN_REGIONS: &[&str] = &[
    "af-south-1",
    "ap-east-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ap-southeast-5",
    "ap-southeast-7",
    "aws-global",
    "ca-central-1",
    "ca-west-1",
    "cn-north-1",
    "cn-northwest-1",
    "eu-central-1",
    "eu-central-2",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "il-central-1",
    "me-central-1",
    "me-south-1",
    "mx-central-1",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-gov-east-1",
    "us-gov-west-1",
    "us-iso-east-1",
    "us-iso-west-1",
    "us-isob-east-1",
    "us-west-1",
    "us-west-2",
];

/// Whether `region` is a recognized region identifier.
pub fn is_known_region(region: &str) -> bool {
    KNOWN_REGIONS.contains(&region)
}

/// Credential strategy discriminator (`credentials-type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialsType {
    /// Ambient chain: environment, credentials file, instance metadata.
    Default,
    /// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`.
    EnvironmentVariables,
    /// Process-level `aws.accessKeyId` / `aws.secretAccessKey` properties.
    SystemProperties,
    /// Shared credentials file (`~/.aws/credentials`).
    UserCredentialsFile,
    /// Instance metadata service role credentials.
    InstanceProfile,
    /// Static access key and secret from the configuration.
    AccessKey,
    /// Static access key, secret and session token from the configuration.
    TemporarySession,
}

impl CredentialsType {
    /// All strategies, in discriminator order.
    pub const ALL: [CredentialsType; 7] = [
        Self::Default,
        Self::EnvironmentVariables,
        Self::SystemProperties,
        Self::UserCredentialsFile,
        Self::InstanceProfile,
        Self::AccessKey,
        Self::TemporarySession,
    ];

    /// Discriminator string as it appears in the property file.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::EnvironmentVariables => "environment_variables",
            Self::SystemProperties => "java_system_properties",
            Self::UserCredentialsFile => "user_credentials_file",
            Self::InstanceProfile => "instance_profile_credentials",
            Self::AccessKey => "access_key",
            Self::TemporarySession => "temporary_session",
        }
    }

    /// Look up a strategy by its exact discriminator string.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for CredentialsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// String whose value never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Validated credential descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CredentialsConfig {
    Default,
    EnvironmentVariables,
    SystemProperties,
    UserCredentialsFile,
    InstanceProfile,
    AccessKey {
        access_key_id: String,
        secret_access_key: Secret,
    },
    TemporarySession {
        access_key_id: String,
        secret_access_key: Secret,
        session_token: Secret,
    },
}

impl CredentialsConfig {
    /// The discriminator this descriptor was built from.
    pub fn credentials_type(&self) -> CredentialsType {
        match self {
            Self::Default => CredentialsType::Default,
            Self::EnvironmentVariables => CredentialsType::EnvironmentVariables,
            Self::SystemProperties => CredentialsType::SystemProperties,
            Self::UserCredentialsFile => CredentialsType::UserCredentialsFile,
            Self::InstanceProfile => CredentialsType::InstanceProfile,
            Self::AccessKey { .. } => CredentialsType::AccessKey,
            Self::TemporarySession { .. } => CredentialsType::TemporarySession,
        }
    }
}

/// Raw, unvalidated property set.
///
/// Every field mirrors one property key; `None` means the key is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryProperties {
    pub bucket_name: Option<String>,
    pub bucket_region: Option<String>,
    pub file_prefix: Option<String>,
    pub file_expiration_secs: Option<i64>,
    pub update_interval_secs: Option<i64>,
    pub endpoint: Option<String>,
    pub endpoint_region: Option<String>,
    pub path_style_access: Option<bool>,
    pub credentials_type: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl RegistryProperties {
    /// Check every rule and build the configuration snapshot.
    ///
    /// Rules are checked in a fixed order and the first violation is returned.
    pub fn validate(self) -> Result<RegistryConfiguration, ConfigError> {
        let bucket_name = non_blank(&self.bucket_name)
            .ok_or(ConfigError::MissingBucketName)?
            .to_string();

        let bucket_region = non_blank(&self.bucket_region)
            .ok_or(ConfigError::MissingBucketRegion)?
            .to_string();
        if !is_known_region(&bucket_region) {
            return Err(ConfigError::UnknownRegion(bucket_region));
        }

        let type_name = non_blank(&self.credentials_type).ok_or(ConfigError::MissingCredentialsType)?;
        let credentials_type = CredentialsType::from_name(type_name)
            .ok_or_else(|| ConfigError::UnknownCredentialsType(type_name.to_string()))?;
        let credentials = self.credentials(credentials_type)?;

        let expiration = self.file_expiration_secs.ok_or(ConfigError::MissingExpiration)?;
        if expiration < 0 {
            return Err(ConfigError::NegativeExpiration(expiration));
        }
        let interval = self.update_interval_secs.ok_or(ConfigError::MissingUpdateInterval)?;
        if interval < 0 {
            return Err(ConfigError::NegativeUpdateInterval(interval));
        }
        let (expiration, interval) = (expiration as u64, interval as u64);
        check_intervals(expiration, interval)?;

        Ok(RegistryConfiguration {
            bucket_name,
            bucket_region,
            key_prefix: self.file_prefix.unwrap_or_default(),
            expiration_secs: expiration,
            republish_interval_secs: interval,
            endpoint: non_blank(&self.endpoint)
                .unwrap_or(DEFAULT_ENDPOINT)
                .to_string(),
            endpoint_region: non_blank(&self.endpoint_region).map(str::to_string),
            path_style_access: self.path_style_access,
            credentials,
        })
    }

    fn credentials(&self, credentials_type: CredentialsType) -> Result<CredentialsConfig, ConfigError> {
        let config = match credentials_type {
            CredentialsType::Default => CredentialsConfig::Default,
            CredentialsType::EnvironmentVariables => CredentialsConfig::EnvironmentVariables,
            CredentialsType::SystemProperties => CredentialsConfig::SystemProperties,
            CredentialsType::UserCredentialsFile => CredentialsConfig::UserCredentialsFile,
            CredentialsType::InstanceProfile => CredentialsConfig::InstanceProfile,
            CredentialsType::AccessKey | CredentialsType::TemporarySession => {
                let access_key_id = non_blank(&self.access_key_id)
                    .ok_or(ConfigError::MissingAccessKeyId)?
                    .to_string();
                let secret_access_key = Secret::new(
                    non_blank(&self.secret_access_key).ok_or(ConfigError::MissingSecretAccessKey)?,
                );
                if credentials_type == CredentialsType::AccessKey {
                    CredentialsConfig::AccessKey {
                        access_key_id,
                        secret_access_key,
                    }
                } else {
                    let session_token = Secret::new(
                        non_blank(&self.session_token).ok_or(ConfigError::MissingSessionToken)?,
                    );
                    CredentialsConfig::TemporarySession {
                        access_key_id,
                        secret_access_key,
                        session_token,
                    }
                }
            }
        };
        Ok(config)
    }
}

/// Expiration/republish coupling: both zero, or both set with interval < expiration.
fn check_intervals(expiration: u64, interval: u64) -> Result<(), ConfigError> {
    if expiration == 0 && interval == 0 {
        return Ok(());
    }
    if interval == expiration {
        return Err(ConfigError::IntervalEqualsExpiration(interval));
    }
    if interval == 0 {
        return Err(ConfigError::UpdateIntervalDisabled);
    }
    if expiration == 0 {
        return Err(ConfigError::ExpirationDisabled);
    }
    if interval >= expiration {
        return Err(ConfigError::IntervalNotBelowExpiration {
            interval,
            expiration,
        });
    }
    Ok(())
}

/// Immutable snapshot of validated operating parameters.
///
/// Compared by value to decide whether the store client must be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryConfiguration {
    /// Bucket holding the membership records.
    pub bucket_name: String,
    /// Region the bucket lives in.
    pub bucket_region: String,
    /// Key prefix shared by every record.
    pub key_prefix: String,
    /// Record expiration in seconds (0 = records never expire).
    pub expiration_secs: u64,
    /// Own-record republish interval in seconds (0 = never republish).
    pub republish_interval_secs: u64,
    /// Endpoint host or URL; [`DEFAULT_ENDPOINT`] for the public service.
    pub endpoint: String,
    /// Signing region for a custom endpoint.
    pub endpoint_region: Option<String>,
    /// Force path-style bucket addressing.
    pub path_style_access: Option<bool>,
    /// How to obtain credentials.
    pub credentials: CredentialsConfig,
}

impl RegistryConfiguration {
    /// Object key of the record published by `node_id`.
    pub fn object_key(&self, node_id: &str) -> String {
        format!("{}{}", self.key_prefix, node_id)
    }

    /// Whether the configured endpoint is the public default.
    pub fn uses_default_endpoint(&self) -> bool {
        self.endpoint == DEFAULT_ENDPOINT
    }

    /// Region used to sign requests.
    pub fn signing_region(&self) -> &str {
        if self.uses_default_endpoint() {
            &self.bucket_region
        } else {
            self.endpoint_region.as_deref().unwrap_or(&self.bucket_region)
        }
    }

    /// A minimal valid configuration for tests and embedding.
    pub fn for_testing(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            bucket_region: "us-east-1".to_string(),
            key_prefix: "cluster/".to_string(),
            expiration_secs: 360,
            republish_interval_secs: 180,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            endpoint_region: None,
            path_style_access: None,
            credentials: CredentialsConfig::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_properties() -> RegistryProperties {
        RegistryProperties {
            bucket_name: Some("cluster-discovery".into()),
            bucket_region: Some("eu-central-1".into()),
            file_prefix: Some("nodes/".into()),
            file_expiration_secs: Some(360),
            update_interval_secs: Some(180),
            credentials_type: Some("default".into()),
            ..Default::default()
        }
    }

    fn with_intervals(expiration: i64, interval: i64) -> Result<RegistryConfiguration, ConfigError> {
        RegistryProperties {
            file_expiration_secs: Some(expiration),
            update_interval_secs: Some(interval),
            ..valid_properties()
        }
        .validate()
    }

    #[test]
    fn test_validate_accepts_complete_properties() {
        let config = valid_properties().validate().unwrap();
        assert_eq!(config.bucket_name, "cluster-discovery");
        assert_eq!(config.key_prefix, "nodes/");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.credentials, CredentialsConfig::Default);
        assert_eq!(config.object_key("A1"), "nodes/A1");
    }

    #[test]
    fn test_prefix_defaults_to_empty() {
        let config = RegistryProperties {
            file_prefix: None,
            ..valid_properties()
        }
        .validate()
        .unwrap();
        assert_eq!(config.object_key("A1"), "A1");
    }

    #[test]
    fn test_interval_rules() {
        assert_eq!(with_intervals(180, 180), Err(ConfigError::IntervalEqualsExpiration(180)));
        assert_eq!(
            with_intervals(150, 300),
            Err(ConfigError::IntervalNotBelowExpiration {
                interval: 300,
                expiration: 150
            })
        );
        assert_eq!(with_intervals(0, 180), Err(ConfigError::ExpirationDisabled));
        assert_eq!(with_intervals(180, 0), Err(ConfigError::UpdateIntervalDisabled));
        assert!(with_intervals(0, 0).is_ok());
        assert!(with_intervals(300, 150).is_ok());
    }

    #[test]
    fn test_negative_and_missing_intervals_rejected() {
        assert_eq!(with_intervals(-1, 0), Err(ConfigError::NegativeExpiration(-1)));
        assert_eq!(with_intervals(10, -1), Err(ConfigError::NegativeUpdateInterval(-1)));

        let missing = RegistryProperties {
            file_expiration_secs: None,
            ..valid_properties()
        };
        assert_eq!(missing.validate(), Err(ConfigError::MissingExpiration));

        let missing = RegistryProperties {
            update_interval_secs: None,
            ..valid_properties()
        };
        assert_eq!(missing.validate(), Err(ConfigError::MissingUpdateInterval));
    }

    #[test]
    fn test_bucket_rules() {
        let blank = RegistryProperties {
            bucket_name: Some("  ".into()),
            ..valid_properties()
        };
        assert_eq!(blank.validate(), Err(ConfigError::MissingBucketName));

        let no_region = RegistryProperties {
            bucket_region: None,
            ..valid_properties()
        };
        assert_eq!(no_region.validate(), Err(ConfigError::MissingBucketRegion));

        let bad_region = RegistryProperties {
            bucket_region: Some("moon-base-1".into()),
            ..valid_properties()
        };
        assert_eq!(
            bad_region.validate(),
            Err(ConfigError::UnknownRegion("moon-base-1".into()))
        );
    }

    #[test]
    fn test_credentials_type_rules() {
        let missing = RegistryProperties {
            credentials_type: None,
            ..valid_properties()
        };
        assert_eq!(missing.validate(), Err(ConfigError::MissingCredentialsType));

        let unknown = RegistryProperties {
            credentials_type: Some("vault".into()),
            ..valid_properties()
        };
        assert_eq!(
            unknown.validate(),
            Err(ConfigError::UnknownCredentialsType("vault".into()))
        );
    }

    #[test]
    fn test_access_key_requires_key_and_secret() {
        let no_key = RegistryProperties {
            credentials_type: Some("access_key".into()),
            secret_access_key: Some("secret".into()),
            ..valid_properties()
        };
        assert_eq!(no_key.validate(), Err(ConfigError::MissingAccessKeyId));

        let no_secret = RegistryProperties {
            credentials_type: Some("access_key".into()),
            access_key_id: Some("AKIA".into()),
            ..valid_properties()
        };
        assert_eq!(no_secret.validate(), Err(ConfigError::MissingSecretAccessKey));

        let ok = RegistryProperties {
            credentials_type: Some("access_key".into()),
            access_key_id: Some("AKIA".into()),
            secret_access_key: Some("secret".into()),
            ..valid_properties()
        }
        .validate()
        .unwrap();
        assert_eq!(ok.credentials.credentials_type(), CredentialsType::AccessKey);
    }

    #[test]
    fn test_temporary_session_requires_token() {
        let props = RegistryProperties {
            credentials_type: Some("temporary_session".into()),
            access_key_id: Some("AKIA".into()),
            secret_access_key: Some("secret".into()),
            ..valid_properties()
        };
        assert_eq!(props.clone().validate(), Err(ConfigError::MissingSessionToken));

        let ok = RegistryProperties {
            session_token: Some("token".into()),
            ..props
        }
        .validate()
        .unwrap();
        assert_eq!(ok.credentials.credentials_type(), CredentialsType::TemporarySession);
    }

    #[test]
    fn test_credentials_type_names_round_trip() {
        for t in CredentialsType::ALL {
            assert_eq!(CredentialsType::from_name(t.name()), Some(t));
        }
        assert_eq!(CredentialsType::from_name("Default"), None);
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let creds = CredentialsConfig::AccessKey {
            access_key_id: "AKIA".into(),
            secret_access_key: Secret::new("hunter2"),
        };
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn test_signing_region_prefers_endpoint_region_for_custom_endpoint() {
        let mut config = RegistryConfiguration::for_testing("bucket");
        assert_eq!(config.signing_region(), "us-east-1");

        config.endpoint = "http://localhost:9000".into();
        config.endpoint_region = Some("eu-west-1".into());
        assert_eq!(config.signing_region(), "eu-west-1");

        config.endpoint_region = None;
        assert_eq!(config.signing_region(), "us-east-1");
    }
}
