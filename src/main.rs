//! # auth0ctl
//!
//! Command-line interface for declarative Auth0 log streams and hooks.
//!
//! ## Usage
//!
//! ```bash
//! # Create or update the resource declared in a manifest
//! auth0ctl apply -f hook.yaml --state hook.state.yaml
//!
//! # Adopt an existing resource
//! auth0ctl import hook 01GZ8V3Q0X0000000000000000 --state hook.state.yaml
//!
//! # Delete a resource (succeeds if it is already gone)
//! auth0ctl delete log-stream lst_0000000000000001
//!
//! # Print the JSON schema of a manifest spec
//! auth0ctl schema log-stream
//! ```
//!
//! Connection settings come from the environment: `AUTH0_DOMAIN` plus either
//! `AUTH0_API_TOKEN` or `AUTH0_CLIENT_ID` and `AUTH0_CLIENT_SECRET`.

use anyhow::{bail, Context, Result};
use auth0_resources::config::ProviderConfig;
use auth0_resources::controller::{
    apply, destroy, import, ApplyOutcome, HookController, LogStreamController,
    ResourceController, ResourceData,
};
use auth0_resources::management::{HookApi, LogStreamApi, ManagementClient};
use auth0_resources::manifest::{remove_state, Manifest, StateFile};
use auth0_resources::observability::{init_tracing, metrics};
use auth0_resources::schema::{HookSpec, LogStreamSpec, ResourceSpec};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Auth0 resource CLI
#[derive(Parser)]
#[command(name = "auth0ctl")]
#[command(
    about = "Declarative log streams and hooks for the Auth0 Management API",
    long_about = None,
    after_help = "\
Available resource types:
  log-stream (or 'logstream') - Log stream
  hook                        - Hook

Examples:
  auth0ctl apply -f stream.yaml --state stream.state.yaml
  auth0ctl import hook 01GZ8V3Q0X0000000000000000
  auth0ctl schema hook
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write Prometheus metrics to this file when the command finishes
    #[arg(long, global = true, value_name = "PATH")]
    metrics_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, update or replace the resource declared in a manifest
    Apply {
        /// Manifest file ({kind: LogStream|Hook, spec: {...}})
        #[arg(short = 'f', long = "file", value_name = "MANIFEST")]
        file: PathBuf,

        /// State file recording the remote ID and last known state
        #[arg(long, value_name = "PATH")]
        state: Option<PathBuf>,
    },
    /// Read an existing resource and print its state
    Import {
        #[arg(value_enum, value_name = "RESOURCE_TYPE")]
        resource_type: ResourceType,

        /// Remote ID of the resource
        #[arg(value_name = "ID")]
        id: String,

        /// Write the imported state to this file
        #[arg(long, value_name = "PATH")]
        state: Option<PathBuf>,
    },
    /// Delete a resource; succeeds if it is already gone
    Delete {
        #[arg(value_enum, value_name = "RESOURCE_TYPE")]
        resource_type: ResourceType,

        /// Remote ID of the resource
        #[arg(value_name = "ID")]
        id: String,

        /// State file to remove once the resource is deleted
        #[arg(long, value_name = "PATH")]
        state: Option<PathBuf>,
    },
    /// Print the JSON schema of a manifest spec
    Schema {
        #[arg(value_enum, value_name = "RESOURCE_TYPE")]
        resource_type: ResourceType,
    },
}

/// Resource types supported by auth0ctl
#[derive(Clone, Copy, ValueEnum)]
enum ResourceType {
    #[value(name = "log-stream", alias = "logstream")]
    LogStream,
    #[value(name = "hook")]
    Hook,
}

impl ResourceType {
    /// Manifest kind of the resource type
    fn kind(self) -> &'static str {
        match self {
            ResourceType::LogStream => "LogStream",
            ResourceType::Hook => "Hook",
        }
    }
}

/// Resource state as printed to stdout
#[derive(Serialize)]
struct Printed<'a, S> {
    kind: &'a str,
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'static str>,
    state: S,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configure rustls crypto provider before any TLS connection is made
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        bail!("Failed to install rustls crypto provider");
    }

    let cli = Cli::parse();
    let config = ProviderConfig::from_env();

    init_tracing(&config.log_level, &config.log_format)?;

    if config.enable_metrics {
        metrics::register_metrics()?;
    }

    let result = run(cli.command, &config).await;

    if let Some(path) = &cli.metrics_file {
        if config.enable_metrics {
            std::fs::write(path, metrics::render()?)
                .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
        } else {
            warn!("Metrics are disabled; not writing {}", path.display());
        }
    }

    result
}

async fn run(command: Commands, config: &ProviderConfig) -> Result<()> {
    if let Commands::Schema { resource_type } = command {
        return schema_command(resource_type);
    }

    config
        .validate()
        .context("Management API connection is not configured")?;
    let client = ManagementClient::new(config)
        .await
        .context("Failed to create Management API client")?;
    let log_streams: &(dyn LogStreamApi + 'static) = &client;
    let hooks: &(dyn HookApi + 'static) = &client;

    match command {
        Commands::Apply { file, state } => {
            let manifest = Manifest::load(&file)?;
            info!("Applying {} from {}", manifest.kind(), file.display());
            match manifest {
                Manifest::LogStream(spec) => {
                    let state = state.as_deref();
                    apply_command(&LogStreamController, log_streams, spec, "LogStream", state).await
                }
                Manifest::Hook(spec) => {
                    apply_command(&HookController, hooks, spec, "Hook", state.as_deref()).await
                }
            }
        }
        Commands::Import {
            resource_type,
            id,
            state,
        } => match resource_type {
            ResourceType::LogStream => {
                let state = state.as_deref();
                import_command(&LogStreamController, log_streams, &id, "LogStream", state).await
            }
            ResourceType::Hook => {
                import_command(&HookController, hooks, &id, "Hook", state.as_deref()).await
            }
        },
        Commands::Delete {
            resource_type,
            id,
            state,
        } => {
            match resource_type {
                ResourceType::LogStream => {
                    let mut d = ResourceData::<LogStreamSpec>::import(&id);
                    destroy(&LogStreamController, log_streams, &mut d).await?;
                }
                ResourceType::Hook => {
                    let mut d = ResourceData::<HookSpec>::import(&id);
                    destroy(&HookController, hooks, &mut d).await?;
                }
            }
            if let Some(path) = state.as_deref() {
                remove_state(path)?;
            }
            println!("Deleted {} {}", resource_type.kind(), id);
            Ok(())
        }
        Commands::Schema { .. } => Ok(()),
    }
}

async fn apply_command<C>(
    controller: &C,
    api: &C::Api,
    spec: C::Spec,
    kind: &str,
    state_path: Option<&Path>,
) -> Result<()>
where
    C: ResourceController,
{
    let previous = match state_path {
        Some(path) => StateFile::<C::Spec>::load(path, kind)?,
        None => None,
    };
    let mut d = match previous {
        Some(previous) => previous.resume(spec),
        None => ResourceData::new(spec),
    };

    let result = apply(controller, api, &mut d).await;

    // Keep the ID of a resource that exists remotely even when the apply failed
    if let (Some(path), Some(snapshot)) = (state_path, StateFile::capture(kind, &d)) {
        match (&result, snapshot.save(path)) {
            (_, Ok(())) => {}
            (Ok(_), Err(e)) => return Err(e),
            (Err(_), Err(e)) => warn!("Failed to record {} {}: {:#}", kind, snapshot.id, e),
        }
    }

    let outcome = result?;
    info!("{} {}", kind, outcome);

    let (Some(id), Some(state)) = d.into_parts() else {
        bail!("{kind} is absent after apply");
    };
    print_state(kind, &id, &state, Some(outcome))
}

async fn import_command<C>(
    controller: &C,
    api: &C::Api,
    id: &str,
    kind: &str,
    state_path: Option<&Path>,
) -> Result<()>
where
    C: ResourceController,
{
    let d = import(controller, api, id).await?;
    let (Some(id), Some(state)) = d.into_parts() else {
        bail!("{kind} {id} does not exist");
    };
    if let Some(path) = state_path {
        StateFile {
            kind: kind.to_string(),
            id: id.clone(),
            state: Some(state.clone()),
        }
        .save(path)?;
    }
    print_state(kind, &id, &state, None)
}

fn print_state<S: ResourceSpec>(
    kind: &str,
    id: &str,
    state: &S,
    outcome: Option<ApplyOutcome>,
) -> Result<()> {
    let printed = Printed {
        kind,
        id,
        outcome: outcome.map(|o| o.as_str()),
        state: state.redacted(),
    };
    print!(
        "{}",
        serde_yaml::to_string(&printed).context("Failed to render state")?
    );
    Ok(())
}

fn schema_command(resource_type: ResourceType) -> Result<()> {
    let schema = match resource_type {
        ResourceType::LogStream => schemars::schema_for!(LogStreamSpec),
        ResourceType::Hook => schemars::schema_for!(HookSpec),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&schema).context("Failed to render schema")?
    );
    Ok(())
}
