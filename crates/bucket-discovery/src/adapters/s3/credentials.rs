//! Credential providers, one per `credentials-type`.
//!
//! | Strategy | Provider |
//! |----------|----------|
//! | `default` | SDK default chain |
//! | `environment_variables` | `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN` |
//! | `java_system_properties` | `aws.accessKeyId` / `aws.secretAccessKey` / `aws.sessionToken` |
//! | `user_credentials_file` | shared credentials file, `AWS_PROFILE` selects the profile |
//! | `instance_profile_credentials` | instance metadata service (IMDSv2) |
//! | `access_key`, `temporary_session` | static keys from the configuration |
//!
//! The SDK caches and refreshes rotating credentials itself, so a provider
//! is resolved once per client.

use std::sync::Arc;

use aws_config::default_provider::credentials::DefaultCredentialsChain;
use aws_config::environment::credentials::EnvironmentVariableCredentialsProvider;
use aws_config::imds::credentials::ImdsCredentialsProvider;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_sdk_s3::config::{Credentials, Region, SharedCredentialsProvider};

use crate::domain::{CredentialsConfig, ObjectStoreError};

const STATIC_PROVIDER: &str = "DiscoveryStaticKeys";
const SYSTEM_PROPERTIES_PROVIDER: &str = "DiscoverySystemProperties";

/// Variable lookup, injectable so tests never touch the real environment.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Lookup backed by the process environment. Empty values count as unset.
pub fn process_env() -> EnvLookup {
    Arc::new(|name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
}

/// Credentials under the dotted property names.
///
/// A host passes these as environment variables, since there is no
/// process-wide property table outside the environment.
pub fn system_properties(env: &EnvLookup) -> Result<Credentials, ObjectStoreError> {
    let access_key_id = env("aws.accessKeyId").ok_or_else(|| {
        ObjectStoreError::Credentials("aws.accessKeyId is not set".to_string())
    })?;
    let secret_access_key = env("aws.secretAccessKey")
        .or_else(|| env("aws.secretKey"))
        .ok_or_else(|| {
            ObjectStoreError::Credentials("aws.secretAccessKey is not set".to_string())
        })?;

    Ok(Credentials::new(
        access_key_id,
        secret_access_key,
        env("aws.sessionToken"),
        None,
        SYSTEM_PROPERTIES_PROVIDER,
    ))
}

fn static_keys(access_key_id: &str, secret_access_key: &str, session_token: Option<&str>) -> Credentials {
    Credentials::new(
        access_key_id,
        secret_access_key,
        session_token.map(str::to_string),
        None,
        STATIC_PROVIDER,
    )
}

/// Resolve the provider for `config`.
///
/// Only `java_system_properties` can fail here; every other strategy fails
/// on first use when nothing is available.
pub async fn provider_for(
    config: &CredentialsConfig,
    region: &Region,
    env: &EnvLookup,
) -> Result<SharedCredentialsProvider, ObjectStoreError> {
    let provider = match config {
        CredentialsConfig::Default => SharedCredentialsProvider::new(
            DefaultCredentialsChain::builder()
                .region(region.clone())
                .build()
                .await,
        ),
        CredentialsConfig::EnvironmentVariables => {
            SharedCredentialsProvider::new(EnvironmentVariableCredentialsProvider::new())
        }
        CredentialsConfig::SystemProperties => SharedCredentialsProvider::new(system_properties(env)?),
        CredentialsConfig::UserCredentialsFile => {
            SharedCredentialsProvider::new(ProfileFileCredentialsProvider::builder().build())
        }
        CredentialsConfig::InstanceProfile => {
            SharedCredentialsProvider::new(ImdsCredentialsProvider::builder().build())
        }
        CredentialsConfig::AccessKey {
            access_key_id,
            secret_access_key,
        } => SharedCredentialsProvider::new(static_keys(
            access_key_id,
            secret_access_key.expose(),
            None,
        )),
        CredentialsConfig::TemporarySession {
            access_key_id,
            secret_access_key,
            session_token,
        } => SharedCredentialsProvider::new(static_keys(
            access_key_id,
            secret_access_key.expose(),
            Some(session_token.expose()),
        )),
    };
    Ok(provider)
}
