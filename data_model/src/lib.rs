pub mod test_objects;

use std::{
    collections::HashMap,
    fmt::{self, Display},
};

use anyhow::{anyhow, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

/// Fully-qualified name of the workspace a service is deployed into,
/// in the form `<cluster>:<workspace>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspaceFqn(String);

impl WorkspaceFqn {
    pub fn new(fqn: impl Into<String>) -> Result<Self> {
        let fqn = fqn.into();
        match fqn.split_once(':') {
            Some((cluster, workspace)) if !cluster.is_empty() && !workspace.is_empty() => {
                Ok(Self(fqn))
            }
            _ => Err(anyhow!(
                "workspace fqn must be of the form <cluster>:<workspace>, got {:?}",
                fqn
            )),
        }
    }

    pub fn get(&self) -> &str {
        &self.0
    }

    pub fn cluster(&self) -> &str {
        self.0.split_once(':').map(|(c, _)| c).unwrap_or_default()
    }

    pub fn workspace(&self) -> &str {
        self.0.split_once(':').map(|(_, w)| w).unwrap_or_default()
    }
}

impl Display for WorkspaceFqn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WorkspaceFqn {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<WorkspaceFqn> for String {
    fn from(value: WorkspaceFqn) -> String {
        value.0
    }
}

/// Node capacity the platform should place the service on. The fallback
/// variant asks for spot capacity and lets the platform fall back to
/// on-demand nodes when none is available.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CapacityType {
    Spot,
    #[default]
    OnDemand,
    SpotFallbackOnDemand,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NodeSelector {
    pub capacity_type: CapacityType,
}

/// Resource envelope requested for each replica. Values are carried to the
/// platform verbatim; request/limit consistency is enforced remotely, not
/// here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resources {
    pub cpu_request: f64,
    pub cpu_limit: f64,
    pub memory_request: u64,
    pub memory_limit: u64,
    pub ephemeral_storage_request: u64,
    pub ephemeral_storage_limit: u64,
    #[serde(default)]
    pub node: NodeSelector,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            cpu_request: 0.5,
            cpu_limit: 0.5,
            memory_request: 1000,
            memory_limit: 1000,
            ephemeral_storage_request: 500,
            ephemeral_storage_limit: 500,
            node: NodeSelector::default(),
        }
    }
}

/// Where the build context comes from. `Local` uploads the invocation
/// directory to the platform's build backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildSource {
    Local {
        #[serde(default = "local_project_root")]
        project_root_path: String,
    },
}

fn local_project_root() -> String {
    "./".to_string()
}

impl Default for BuildSource {
    fn default() -> Self {
        BuildSource::Local {
            project_root_path: local_project_root(),
        }
    }
}

/// File-based build instructions. Paths are resolved by the build backend
/// relative to the uploaded build context, not checked locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DockerfileBuild {
    pub dockerfile_path: String,
    pub build_context_path: String,
}

impl Default for DockerfileBuild {
    fn default() -> Self {
        Self {
            dockerfile_path: "./Dockerfile".to_string(),
            build_context_path: "./".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Build {
    #[serde(default)]
    pub build_source: BuildSource,
    #[serde(default)]
    pub build_spec: DockerfileBuild,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, AsRefStr)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum PortProtocol {
    #[default]
    Tcp,
    Udp,
}

/// Authentication gate the platform places in front of an exposed port.
/// `Oauth` is the platform-managed OAuth flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PortAuth {
    #[default]
    None,
    Oauth,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Builder)]
#[builder(build_fn(skip))]
pub struct Port {
    pub port: u16,
    #[serde(default)]
    pub protocol: PortProtocol,
    #[serde(default = "default_expose")]
    pub expose: bool,
    #[serde(default = "default_app_protocol")]
    pub app_protocol: String,
    pub host: String,
    #[serde(default)]
    pub auth: PortAuth,
}

fn default_expose() -> bool {
    true
}

fn default_app_protocol() -> String {
    "http".to_string()
}

impl PortBuilder {
    pub fn build(&mut self) -> Result<Port> {
        let port = self.port.ok_or(anyhow!("port is required"))?;
        let host = self.host.clone().ok_or(anyhow!("host is required"))?;
        let protocol = self.protocol.unwrap_or_default();
        let expose = self.expose.unwrap_or(true);
        let app_protocol = self
            .app_protocol
            .clone()
            .unwrap_or_else(default_app_protocol);
        let auth = self.auth.clone().unwrap_or_default();
        Ok(Port {
            port,
            protocol,
            expose,
            app_protocol,
            host,
            auth,
        })
    }
}

/// The full description of a deployable service: how to build its image,
/// what resources each replica gets, which ports it exposes and how many
/// replicas to run. Construction is deterministic, two descriptors built
/// from the same literals compare equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Builder)]
#[builder(build_fn(skip))]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub image: Build,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub env: HashMap<String, String>,
    pub ports: Vec<Port>,
    #[serde(default = "default_replicas")]
    pub replicas: f64,
}

fn default_replicas() -> f64 {
    1.0
}

impl ServiceBuilder {
    pub fn build(&mut self) -> Result<Service> {
        let name = self.name.clone().ok_or(anyhow!("name is required"))?;
        let image = self.image.clone().unwrap_or_default();
        let resources = self.resources.clone().unwrap_or_default();
        let env = self.env.clone().unwrap_or_default();
        let ports = self.ports.clone().unwrap_or_default();
        if ports.is_empty() {
            return Err(anyhow!("at least one port is required"));
        }
        let replicas = self.replicas.unwrap_or_else(default_replicas);
        Ok(Service {
            name,
            image,
            resources,
            env,
            ports,
            replicas,
        })
    }
}
