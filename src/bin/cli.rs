//! Dependency-Track provider CLI
//!
//! Drives resources and data sources by hand, with state kept in JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dtrack_provider::{
    Provider,
    error::{AppError, Result},
    models::ProviderConfig,
    schema::Schema,
};
use serde_json::Value;

/// Manage Dependency-Track objects from desired-state files
#[derive(Parser, Debug)]
#[command(name = "dtrack-provider", version, about = "Dependency-Track provider")]
struct Cli {
    /// Path to the provider configuration file
    #[arg(short, long, default_value = "dtrack.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print sensitive attribute values instead of redacting them
    #[arg(long, global = true)]
    show_sensitive: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print attribute schemas (all types, or one)
    Schema { type_name: Option<String> },

    /// Create a resource from a desired-state file
    Create {
        type_name: String,
        #[arg(long)]
        plan: PathBuf,
        /// Write the resulting state here
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Refresh a resource's state from the server
    Read {
        type_name: String,
        #[arg(long)]
        state: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Update a resource in place
    Update {
        type_name: String,
        #[arg(long)]
        plan: PathBuf,
        #[arg(long)]
        state: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete a resource
    Delete {
        type_name: String,
        #[arg(long)]
        state: PathBuf,
    },

    /// Build state for an existing remote object
    Import {
        type_name: String,
        id: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Create, update, replace or delete to reach the plan
    Apply {
        type_name: String,
        /// Desired state; omit to destroy
        #[arg(long)]
        plan: Option<PathBuf>,
        /// State file, read if present and rewritten afterwards
        #[arg(long)]
        state: PathBuf,
    },

    /// Read a data source
    Data {
        type_name: String,
        /// JSON file with the lookup arguments
        #[arg(long)]
        input: PathBuf,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    log::info!("State written to {}", path.display());
    Ok(())
}

struct Output {
    schema: Schema,
    show_sensitive: bool,
}

impl Output {
    /// Print `state`, and save it unredacted to `out` when given.
    fn emit(&self, state: &Value, out: Option<&Path>) -> Result<()> {
        if let Some(path) = out {
            write_json(path, state)?;
        }
        let mut shown = state.clone();
        if !self.show_sensitive {
            self.schema.redact(&mut shown);
        }
        println!("{}", serde_json::to_string_pretty(&shown)?);
        Ok(())
    }
}

fn print_warnings(warnings: &[dtrack_provider::resources::Warning]) {
    for warning in warnings {
        log::warn!("{}: {}", warning.summary, warning.detail);
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ProviderConfig::load_or_default(&cli.config).with_env();
    let provider = Provider::new(&config)?;
    log::debug!("Loaded configuration from {}", cli.config.display());

    let output = |type_name: &str| -> Result<Output> {
        Ok(Output {
            schema: provider.resource(type_name)?.schema(),
            show_sensitive: cli.show_sensitive,
        })
    };

    match &cli.command {
        Command::Schema { type_name } => {
            let mut schemas = serde_json::Map::new();
            for name in provider.resource_types() {
                let schema = provider.resource(name)?.schema();
                schemas.insert(name.to_string(), serde_json::to_value(schema)?);
            }
            let mut data_schemas = serde_json::Map::new();
            for name in provider.data_source_types() {
                let schema = provider.data_source(name)?.schema();
                data_schemas.insert(name.to_string(), serde_json::to_value(schema)?);
            }

            let rendered = match type_name {
                Some(name) => schemas
                    .get(name)
                    .or_else(|| data_schemas.get(name))
                    .cloned()
                    .ok_or_else(|| AppError::UnknownType(name.clone()))?,
                None => serde_json::json!({
                    "resources": schemas,
                    "data_sources": data_schemas,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }

        Command::Create {
            type_name,
            plan,
            out,
        } => {
            let state = provider.resource(type_name)?.create(read_json(plan)?).await?;
            log::info!("Created {type_name}");
            output(type_name)?.emit(&state, out.as_deref())?;
        }

        Command::Read {
            type_name,
            state,
            out,
        } => match provider.resource(type_name)?.read(read_json(state)?).await? {
            Some(refreshed) => output(type_name)?.emit(&refreshed, out.as_deref())?,
            None => log::warn!("{type_name} no longer exists remotely"),
        },

        Command::Update {
            type_name,
            plan,
            state,
            out,
        } => {
            let updated = provider
                .resource(type_name)?
                .update(read_json(plan)?, read_json(state)?)
                .await?;
            log::info!("Updated {type_name}");
            output(type_name)?.emit(&updated, out.as_deref())?;
        }

        Command::Delete { type_name, state } => {
            let warnings = provider
                .resource(type_name)?
                .delete(read_json(state)?)
                .await?;
            print_warnings(&warnings);
            log::info!("Deleted {type_name}");
        }

        Command::Import { type_name, id, out } => {
            let state = provider.resource(type_name)?.import(id).await?;
            log::info!("Imported {type_name} [{id}]");
            output(type_name)?.emit(&state, out.as_deref())?;
        }

        Command::Apply {
            type_name,
            plan,
            state,
        } => {
            let prior = if state.exists() {
                Some(read_json(state)?)
            } else {
                None
            };
            let plan = plan.as_deref().map(read_json).transpose()?;

            let outcome = provider.apply(type_name, prior, plan).await?;
            print_warnings(&outcome.warnings);
            log::info!("{type_name}: {:?}", outcome.action);

            match &outcome.state {
                Some(new_state) => output(type_name)?.emit(new_state, Some(state.as_path()))?,
                None if state.exists() => {
                    fs::remove_file(state)?;
                    log::info!("Removed {}", state.display());
                }
                None => {}
            }
        }

        Command::Data { type_name, input } => {
            let source = provider.data_source(type_name)?;
            let mut model = source.read(read_json(input)?).await?;
            if !cli.show_sensitive {
                source.schema().redact(&mut model);
            }
            println!("{}", serde_json::to_string_pretty(&model)?);
        }
    }

    Ok(())
}
