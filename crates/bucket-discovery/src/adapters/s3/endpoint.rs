//! Endpoint and region selection for the SDK client.
//!
//! | Endpoint | Client endpoint | Region |
//! |----------|-----------------|--------|
//! | default | resolved by the SDK from the region | bucket region, `aws-global` as `us-east-1` |
//! | custom | as configured, `https://` when no scheme is given | endpoint region, else bucket region |
//!
//! Partition hosts (`.amazonaws.com.cn` for `cn-` regions) come from the
//! SDK's endpoint rules.

use crate::domain::{ObjectStoreError, RegistryConfiguration};

/// Where the client sends requests and which region it signs for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEndpoint {
    /// Override for the SDK endpoint; `None` for the public service.
    pub endpoint_url: Option<String>,
    /// Region used for endpoint rules and the signature scope.
    pub region: String,
    /// Address the bucket in the path instead of the host name.
    pub force_path_style: bool,
}

/// Split `http://host:port/ignored` into scheme and authority.
fn parse_endpoint(endpoint: &str) -> Result<(String, String), ObjectStoreError> {
    let (scheme, rest) = match endpoint.split_once("://") {
        Some((scheme, rest)) => (scheme.to_ascii_lowercase(), rest),
        None => ("https".to_string(), endpoint),
    };
    if scheme != "http" && scheme != "https" {
        return Err(ObjectStoreError::InvalidResponse(format!(
            "unsupported endpoint scheme '{scheme}'"
        )));
    }

    let authority = rest.split('/').next().unwrap_or_default().trim();
    if authority.is_empty() {
        return Err(ObjectStoreError::InvalidResponse(format!(
            "endpoint '{endpoint}' has no host"
        )));
    }
    Ok((scheme, authority.to_string()))
}

impl ClientEndpoint {
    pub fn resolve(config: &RegistryConfiguration) -> Result<Self, ObjectStoreError> {
        let force_path_style = config.path_style_access.unwrap_or(false);

        if config.uses_default_endpoint() {
            let region = match config.bucket_region.as_str() {
                "aws-global" => "us-east-1",
                region => region,
            };
            return Ok(Self {
                endpoint_url: None,
                region: region.to_string(),
                force_path_style,
            });
        }

        let (scheme, authority) = parse_endpoint(&config.endpoint)?;
        Ok(Self {
            endpoint_url: Some(format!("{scheme}://{authority}")),
            region: config.signing_region().to_string(),
            force_path_style,
        })
    }
}
