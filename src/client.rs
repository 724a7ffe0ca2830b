use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use data_model::{Service, WorkspaceFqn};
use reqwest::Client as HttpClient;

use crate::{
    config::ClientConfig,
    http_objects::{DeployRequest, DeploymentAck},
};

/// Operations the remote deployment API exposes to this tool.
#[async_trait]
pub trait DeployApi {
    /// Submit a service descriptor for deployment into `target`.
    ///
    /// With `wait = false` the call returns as soon as the platform accepts
    /// the request, without observing the rollout. Failures are whatever the
    /// platform reports, propagated unmodified: no retry, no backoff.
    async fn deploy(
        &self,
        service: &Service,
        target: &WorkspaceFqn,
        wait: bool,
    ) -> Result<DeploymentAck>;
}

/// `PlatformClient` talks to the deployment API over HTTP.
#[derive(Debug)]
pub struct PlatformClient {
    /// Base address of the deployment API, e.g. `https://deploy.example.dev`.
    endpoint: String,

    /// Bearer token attached to every request when configured.
    api_token: Option<String>,

    http_client: HttpClient,
}

impl PlatformClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            http_client: HttpClient::new(),
        }
    }

    /// Build a complete endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }
}

#[async_trait]
impl DeployApi for PlatformClient {
    async fn deploy(
        &self,
        service: &Service,
        target: &WorkspaceFqn,
        wait: bool,
    ) -> Result<DeploymentAck> {
        let endpoint = self.endpoint("api/v1/deployments");
        let request = DeployRequest::new(service, target, wait);

        let mut http_request = self.http_client.post(endpoint).json(&request);
        if let Some(token) = &self.api_token {
            http_request = http_request.bearer_auth(token);
        }

        let response = http_request
            .send()
            .await
            .context("failed to reach the deployment API")?;
        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read the deployment API response")?;
        if !status.is_success() {
            return Err(anyhow!(
                "deployment API rejected the request: {} - {}",
                status,
                body
            ));
        }

        let ack: DeploymentAck = serde_json::from_str(&body)
            .context("failed to deserialize the deployment acknowledgment")?;
        Ok(ack)
    }
}
