use std::{fs::File, path::Path};

use data_model::{Service, WorkspaceFqn};
use serde::{Deserialize, Serialize};

/// On-disk description of a deployment: the service descriptor plus,
/// optionally, the workspace it is destined for. The manifest carries the
/// literal values verbatim; nothing beyond deserialization is checked here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    #[serde(default)]
    pub workspace_fqn: Option<WorkspaceFqn>,
    pub service: Service,
}

/// Manifest related errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unable to read the manifest file. Details : {0}")]
    ReadFile(std::io::Error),
    #[error("Failed to deserialize the manifest. Details : {0}")]
    Deserialization(serde_yaml::Error),
}

impl TryFrom<&Path> for Manifest {
    type Error = Error;

    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        let file = File::open(value).map_err(Error::ReadFile)?;
        serde_yaml::from_reader::<File, Manifest>(file).map_err(Error::Deserialization)
    }
}

impl TryFrom<&str> for Manifest {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        serde_yaml::from_str::<Manifest>(value).map_err(Error::Deserialization)
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write, path::Path};

    use data_model::{CapacityType, PortAuth, PortProtocol};

    use super::{Error, Manifest};

    const MANIFEST: &str = r#"
workspace_fqn: "usea1-devtest:fallback-devtest"
service:
  name: spark-job-fallback-management
  image:
    build_source:
      type: local
      project_root_path: ./
    build_spec:
      dockerfile_path: ./Dockerfile
      build_context_path: ./
  resources:
    cpu_request: 0.5
    cpu_limit: 0.5
    memory_request: 1000
    memory_limit: 1000
    ephemeral_storage_request: 500
    ephemeral_storage_limit: 500
    node:
      capacity_type: spot_fallback_on_demand
  env:
    PORT: "8000"
  ports:
    - port: 8000
      protocol: TCP
      expose: true
      app_protocol: http
      host: spark-job-fallback-management-devtest-8000.apps.usea1.devtest.example.dev
      auth:
        type: oauth
  replicas: 1.0
"#;

    #[test]
    fn test_load_manifest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();

        let manifest = Manifest::try_from(file.path()).unwrap();
        let fqn = manifest.workspace_fqn.unwrap();
        assert_eq!(fqn.cluster(), "usea1-devtest");
        assert_eq!(fqn.workspace(), "fallback-devtest");

        let service = manifest.service;
        assert_eq!(service.name, "spark-job-fallback-management");
        assert_eq!(service.replicas, 1.0);
        assert_eq!(service.env.get("PORT").map(String::as_str), Some("8000"));
        assert_eq!(
            service.resources.node.capacity_type,
            CapacityType::SpotFallbackOnDemand
        );
        assert_eq!(service.ports.len(), 1);
        assert_eq!(service.ports[0].port, 8000);
        assert_eq!(service.ports[0].protocol, PortProtocol::Tcp);
        assert_eq!(service.ports[0].auth, PortAuth::Oauth);
    }

    #[test]
    fn test_manifest_defaults() {
        let manifest = Manifest::try_from(
            r#"
service:
  name: minimal
  ports:
    - port: 8000
      host: minimal-8000.apps.usea1.devtest.example.dev
"#,
        )
        .unwrap();
        assert!(manifest.workspace_fqn.is_none());
        let service = manifest.service;
        assert_eq!(service.replicas, 1.0);
        assert!(service.env.is_empty());
        assert_eq!(service.image.build_spec.dockerfile_path, "./Dockerfile");
        assert!(service.ports[0].expose);
        assert_eq!(service.ports[0].app_protocol, "http");
        assert_eq!(service.ports[0].auth, PortAuth::None);
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = Manifest::try_from(Path::new("/does/not/exist.yaml")).unwrap_err();
        assert!(matches!(err, Error::ReadFile(_)));
    }

    #[test]
    fn test_invalid_yaml_is_a_deserialization_error() {
        let err = Manifest::try_from("service: [not a descriptor").unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }

    #[test]
    fn test_malformed_workspace_fqn_is_rejected() {
        let err = Manifest::try_from(
            r#"
workspace_fqn: "no-separator"
service:
  name: minimal
  ports:
    - port: 8000
      host: minimal-8000.apps.usea1.devtest.example.dev
"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }
}
