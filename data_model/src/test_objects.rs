pub mod tests {
    use std::collections::HashMap;

    use crate::{
        Build,
        CapacityType,
        NodeSelector,
        Port,
        PortAuth,
        PortBuilder,
        PortProtocol,
        Resources,
        Service,
        ServiceBuilder,
        WorkspaceFqn,
    };

    pub const TEST_SERVICE_NAME: &str = "spark-job-fallback-management";
    pub const TEST_WORKSPACE_FQN: &str = "usea1-devtest:fallback-devtest";
    pub const TEST_HOST: &str = "spark-job-fallback-management-devtest-8000.apps.usea1.devtest.example.dev";

    pub fn test_port(port: u16) -> Port {
        PortBuilder::default()
            .port(port)
            .protocol(PortProtocol::Tcp)
            .expose(true)
            .app_protocol("http".to_string())
            .host(TEST_HOST.to_string())
            .auth(PortAuth::Oauth)
            .build()
            .unwrap()
    }

    pub fn test_resources() -> Resources {
        Resources {
            cpu_request: 0.5,
            cpu_limit: 0.5,
            memory_request: 1000,
            memory_limit: 1000,
            ephemeral_storage_request: 500,
            ephemeral_storage_limit: 500,
            node: NodeSelector {
                capacity_type: CapacityType::SpotFallbackOnDemand,
            },
        }
    }

    pub fn test_service() -> Service {
        ServiceBuilder::default()
            .name(TEST_SERVICE_NAME.to_string())
            .image(Build::default())
            .resources(test_resources())
            .env(HashMap::from([(
                "PORT".to_string(),
                "8000".to_string(),
            )]))
            .ports(vec![test_port(8000)])
            .replicas(1.0)
            .build()
            .unwrap()
    }

    pub fn test_workspace() -> WorkspaceFqn {
        WorkspaceFqn::new(TEST_WORKSPACE_FQN).unwrap()
    }
}
