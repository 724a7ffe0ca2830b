use std::path::PathBuf;

use ::tracing::info;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use data_model::WorkspaceFqn;

mod client;
mod config;
mod http_objects;
mod manifest;
mod tracing;

use client::{DeployApi, PlatformClient};
use config::ClientConfig;
use http_objects::DeployRequest;
use manifest::Manifest;
use tracing::setup_tracing;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "config file", help = "Path to config file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the service descriptor and submit it to the deployment API.
    Deploy {
        #[arg(
            short,
            long,
            value_name = "manifest file",
            default_value = "service.yaml"
        )]
        file: PathBuf,

        #[arg(short, long, help = "Target workspace fqn, overrides the manifest")]
        workspace: Option<String>,

        #[arg(long, help = "Block until the platform reports the rollout finished")]
        wait: bool,

        #[arg(long, help = "Print the deploy request instead of submitting it")]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ClientConfig::from_path(path)?,
        None => ClientConfig::default(),
    };
    setup_tracing(&config)?;

    match cli.command {
        Command::Deploy {
            file,
            workspace,
            wait,
            dry_run,
        } => deploy(config, file, workspace, wait, dry_run).await,
    }
}

async fn deploy(
    config: ClientConfig,
    file: PathBuf,
    workspace: Option<String>,
    wait: bool,
    dry_run: bool,
) -> Result<()> {
    let manifest = Manifest::try_from(file.as_path())
        .with_context(|| format!("loading manifest {}", file.display()))?;
    let service = manifest.service;

    let target = if let Some(fqn) = workspace {
        WorkspaceFqn::new(fqn)?
    } else if let Some(fqn) = manifest.workspace_fqn {
        fqn
    } else if let Some(fqn) = &config.workspace_fqn {
        WorkspaceFqn::new(fqn.clone())?
    } else {
        bail!("no target workspace: pass --workspace or set workspace_fqn in the manifest or config");
    };

    if dry_run {
        let request = DeployRequest::new(&service, &target, wait);
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    info!(
        service = %service.name,
        cluster = target.cluster(),
        workspace = target.workspace(),
        replicas = service.replicas,
        capacity_type = service.resources.node.capacity_type.as_ref(),
        "submitting deployment"
    );

    let client = PlatformClient::new(&config);
    let ack = client.deploy(&service, &target, wait).await?;

    if wait {
        info!(
            deployment_id = %ack.deployment_id,
            status = %ack.status,
            "deployment finished"
        );
    } else {
        info!(
            deployment_id = %ack.deployment_id,
            "deployment request accepted, not waiting for the rollout"
        );
    }
    Ok(())
}
