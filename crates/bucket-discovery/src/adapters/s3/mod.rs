//! # S3 Object Store Adapter
//!
//! Wraps the AWS SDK client behind the blocking [`ObjectStore`] port. Each
//! store owns a current-thread runtime and blocks on it, so the lifecycle
//! stays synchronous. Callers inside an async host must go through
//! `spawn_blocking`.
//!
//! ## Operations
//!
//! | Port call | SDK call | Success |
//! |-----------|----------|---------|
//! | `check_bucket_health` | `HeadBucket` | 200 |
//! | `put_object` | `PutObject` | 200 |
//! | `get_object` | `GetObject` | 200 |
//! | `delete_object` | `DeleteObject` | 204 / 200, or 404 `NoSuchKey` |
//! | `list_objects` | `ListObjectsV2` | 200 |

pub mod credentials;
pub mod endpoint;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Region, RequestChecksumCalculation};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};
use tracing::{debug, trace};

use crate::domain::{BucketHealth, ObjectStoreError, RegistryConfiguration};
use crate::ports::{ObjectListing, ObjectStore, ObjectStoreFactory};

pub use credentials::{process_env, EnvLookup};
pub use endpoint::ClientEndpoint;

/// TCP connect timeout for bucket requests.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Overall timeout for one bucket request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Object store backed by one S3 bucket.
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    endpoint: ClientEndpoint,
    /// Always `Some` until drop.
    runtime: Option<Runtime>,
}

impl S3ObjectStore {
    /// Build a client for `config`, resolving its credential strategy.
    pub fn new(config: &RegistryConfiguration) -> Result<Self, ObjectStoreError> {
        Self::with_env(config, process_env())
    }

    /// Build a client reading credential variables through `env`.
    pub fn with_env(config: &RegistryConfiguration, env: EnvLookup) -> Result<Self, ObjectStoreError> {
        let endpoint = ClientEndpoint::resolve(config)?;
        let runtime = RuntimeBuilder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ObjectStoreError::Transport(format!("failed to start runtime: {e}")))?;
        let client = runtime.block_on(build_client(config, &endpoint, &env))?;

        debug!(
            bucket = %config.bucket_name,
            region = %endpoint.region,
            endpoint = endpoint.endpoint_url.as_deref().unwrap_or("default"),
            path_style = endpoint.force_path_style,
            credentials = ?config.credentials.credentials_type(),
            "Created S3 client"
        );

        Ok(Self {
            client,
            bucket: config.bucket_name.clone(),
            endpoint,
            runtime: Some(runtime),
        })
    }

    pub fn endpoint(&self) -> &ClientEndpoint {
        &self.endpoint
    }

    fn block_on<F: Future>(&self, future: F) -> Result<F::Output, ObjectStoreError> {
        match &self.runtime {
            Some(runtime) => Ok(runtime.block_on(future)),
            None => Err(ObjectStoreError::NotConfigured),
        }
    }
}

impl Drop for S3ObjectStore {
    fn drop(&mut self) {
        // A blocking shutdown panics when the last handle is released on an
        // async worker thread.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

async fn build_client(
    config: &RegistryConfiguration,
    endpoint: &ClientEndpoint,
    env: &EnvLookup,
) -> Result<Client, ObjectStoreError> {
    let region = Region::new(endpoint.region.clone());
    let credentials = credentials::provider_for(&config.credentials, &region, env).await?;

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region)
        .credentials_provider(credentials)
        .retry_config(RetryConfig::disabled())
        .timeout_config(
            TimeoutConfig::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .operation_attempt_timeout(REQUEST_TIMEOUT)
                .build(),
        )
        .load()
        .await;

    let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(endpoint.force_path_style)
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired);
    if let Some(url) = &endpoint.endpoint_url {
        s3_config = s3_config.endpoint_url(url);
    }
    Ok(Client::from_conf(s3_config.build()))
}

/// `"Code: Message"`, whatever part is present, or the bare status.
fn describe(status: u16, code: Option<&str>, message: Option<&str>) -> String {
    match (code, message) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_string(),
        (None, Some(message)) => message.to_string(),
        (None, None) => format!("status {status}"),
    }
}

/// Map a failed response to an error.
///
/// A 404 for `key` is `NotFound`; a missing bucket is a store fault and keeps
/// its status.
fn response_error(key: &str, status: u16, code: Option<&str>, message: Option<&str>) -> ObjectStoreError {
    match (status, code) {
        (404, Some("NoSuchBucket")) => ObjectStoreError::Status {
            status,
            message: describe(status, code, message),
        },
        (404, _) => ObjectStoreError::NotFound {
            key: key.to_string(),
        },
        (403, _) => ObjectStoreError::AccessDenied(describe(status, code, message)),
        _ => ObjectStoreError::Status {
            status,
            message: describe(status, code, message),
        },
    }
}

/// Whether a failed delete still leaves the object absent.
fn is_missing_object(status: u16, code: Option<&str>) -> bool {
    status == 404 && matches!(code, None | Some("NoSuchKey"))
}

fn status_of<E>(error: &SdkError<E>) -> Option<u16> {
    error.raw_response().map(|response| response.status().as_u16())
}

fn sdk_error<E>(key: &str, error: SdkError<E>) -> ObjectStoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    match status_of(&error) {
        Some(status) => response_error(key, status, error.code(), error.message()),
        None => ObjectStoreError::Transport(DisplayErrorContext(&error).to_string()),
    }
}

impl ObjectStore for S3ObjectStore {
    fn check_bucket_health(&self) -> BucketHealth {
        let result = self.block_on(self.client.head_bucket().bucket(&self.bucket).send());
        let error = match result {
            Ok(Ok(_)) => return BucketHealth::Reachable,
            Ok(Err(error)) => error,
            Err(e) => return BucketHealth::Other(e.to_string()),
        };

        let Some(response) = error.raw_response() else {
            return BucketHealth::Other(DisplayErrorContext(&error).to_string());
        };
        let status = response.status().as_u16();
        // HEAD carries no body, the region hint is the only cause available.
        let cause = response
            .headers()
            .get("x-amz-bucket-region")
            .map(|region| format!("status {status}, bucket is in region '{region}'"));
        BucketHealth::from_status(status, cause)
    }

    fn put_object(&self, key: &str, content: &str) -> Result<(), ObjectStoreError> {
        trace!(bucket = %self.bucket, key = %key, "Putting object");
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("text/plain; charset=utf-8")
            .body(ByteStream::from(content.as_bytes().to_vec()))
            .send();
        self.block_on(request)?
            .map(|_| ())
            .map_err(|e| sdk_error(key, e))
    }

    fn get_object(&self, key: &str) -> Result<String, ObjectStoreError> {
        let not_retrievable = |reason: String| ObjectStoreError::NotRetrievable {
            key: key.to_string(),
            reason,
        };

        let body = self.block_on(async {
            let output = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| match sdk_error(key, e) {
                    ObjectStoreError::Transport(reason) => not_retrievable(reason),
                    other => other,
                })?;
            let body = output
                .body
                .collect()
                .await
                .map_err(|e| not_retrievable(e.to_string()))?;
            Ok::<_, ObjectStoreError>(body)
        })??;

        String::from_utf8(body.into_bytes().to_vec()).map_err(|e| not_retrievable(e.to_string()))
    }

    fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError> {
        let request = self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send();
        match self.block_on(request)? {
            Ok(_) => Ok(()),
            Err(error) => match status_of(&error) {
                Some(status) if is_missing_object(status, error.code()) => {
                    trace!(key = %key, "Object already absent");
                    Ok(())
                }
                _ => Err(sdk_error(key, error)),
            },
        }
    }

    fn list_objects(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> Result<ObjectListing, ObjectStoreError> {
        let request = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .set_continuation_token(continuation_token.map(str::to_string))
            .send();
        let output = self
            .block_on(request)?
            .map_err(|e| sdk_error(&self.bucket, e))?;

        Ok(ObjectListing {
            keys: output
                .contents()
                .iter()
                .filter_map(|object| object.key())
                .map(str::to_string)
                .collect(),
            is_truncated: output.is_truncated().unwrap_or(false),
            next_continuation_token: output
                .next_continuation_token()
                .filter(|token| !token.is_empty())
                .map(str::to_string),
        })
    }
}

/// Builds [`S3ObjectStore`] clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct S3StoreFactory;

impl S3StoreFactory {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ObjectStoreFactory for S3StoreFactory {
    fn create(&self, config: &RegistryConfiguration) -> Result<Arc<dyn ObjectStore>, ObjectStoreError> {
        Ok(Arc::new(S3ObjectStore::new(config)?))
    }
}
