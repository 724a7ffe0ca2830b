use data_model::{Service, WorkspaceFqn};
use serde::{Deserialize, Serialize};

/// Request body for the deploy endpoint. The descriptor is embedded as-is,
/// no field is transformed on the way out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeployRequest {
    pub workspace_fqn: String,
    pub service: Service,
    pub wait: bool,
}

impl DeployRequest {
    pub fn new(service: &Service, target: &WorkspaceFqn, wait: bool) -> Self {
        Self {
            workspace_fqn: target.get().to_string(),
            service: service.clone(),
            wait,
        }
    }
}

/// Opaque acknowledgment returned by the platform once the request is
/// accepted. Logged and otherwise not inspected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentAck {
    pub deployment_id: String,
    #[serde(default)]
    pub status: String,
}
