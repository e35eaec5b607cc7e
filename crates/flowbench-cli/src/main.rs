use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flowbench_bundle::{
    resolve_parameters, table_identifier, BundleConfig, LocatedTask, Locator, ParameterSet,
    ResolutionContext, TempJobEmitter,
};
use flowbench_core::{FlowbenchConfig, RepoLayout};
use flowbench_ingest::{
    connector_list_lines, connector_schema_lines, dump, dump_raw, dump_state, fetch_schema_config,
    list_connectors, resolve_connector_id, table_column_lines, HttpIngestionClient,
};
use flowbench_template::{render_preview_file, PreviewOptions};
use flowbench_workspace::{Profile, WorkspaceApi, WorkspaceClient};

const DEFAULT_CONFIG_FILE: &str = "flowbench.toml";

/// Flowbench - developer tooling for bundle SQL tasks and ingestion metadata
#[derive(Parser)]
#[command(name = "flowbench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: flowbench.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the job task that runs a SQL file
    Sql {
        #[command(subcommand)]
        command: SqlCommands,
    },

    /// Orchestration platform jobs
    Jobs {
        #[command(subcommand)]
        command: JobsCommands,
    },

    /// Ingestion connectors, destinations and schemas
    Ingest {
        #[command(subcommand)]
        command: IngestCommands,
    },
}

/// A SQL file and the region whose personal target it resolves against
#[derive(Args)]
struct SqlTarget {
    /// Region suffix of the personal target (e.g. eu, us)
    region: String,

    /// SQL file, absolute or relative to the repository root
    sql_file: String,
}

#[derive(Subcommand)]
enum SqlCommands {
    /// Print the SQL file with task parameters substituted
    Render {
        #[command(flatten)]
        target: SqlTarget,

        /// Omit the %sql notebook header
        #[arg(long)]
        plain: bool,
    },

    /// Print the resolved task parameters as JSON
    Params {
        #[command(flatten)]
        target: SqlTarget,
    },

    /// Print catalog.schema.table of the SQL file's output
    Identifier {
        #[command(flatten)]
        target: SqlTarget,
    },

    /// Write a single-task job for the SQL file
    TempJob {
        #[command(flatten)]
        target: SqlTarget,
    },
}

#[derive(Subcommand)]
enum JobsCommands {
    /// List jobs visible to the profile
    List,
}

#[derive(Subcommand)]
enum IngestCommands {
    /// Dump connectors with schemas and destinations (all/ and enabled/)
    Dump {
        /// Output directory (default: ingest.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dump API responses unmodified
    DumpRaw {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dump the sync state of every connector
    DumpState {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List connectors
    Connectors,

    /// Show source to destination table mapping of a connector
    Schema {
        /// Connector schema name or id
        connector: String,
    },

    /// Show column mapping of a table
    Columns {
        /// Connector schema name or id
        connector: String,

        /// Source or destination table name (case-insensitive)
        table: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Sql { command } => sql_command(&config, command).await,
        Commands::Jobs { command } => match command {
            JobsCommands::List => jobs_list_command(&config).await,
        },
        Commands::Ingest { command } => ingest_command(&config, command).await,
    }
}

/// Log to stderr; RUST_LOG overrides the level chosen by --verbose
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<FlowbenchConfig> {
    if let Some(path) = path {
        return Ok(FlowbenchConfig::from_file(path)?);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        return Ok(FlowbenchConfig::from_file(default_path)?);
    }

    if verbose {
        eprintln!("{}", "No config file found, using defaults".yellow());
    }
    Ok(FlowbenchConfig::default())
}

fn workspace_client(config: &FlowbenchConfig) -> Result<WorkspaceClient> {
    let settings = &config.workspace;
    let path = match &settings.config_file {
        Some(path) => path.clone(),
        None => Profile::default_path()?,
    };

    let profile = Profile::load(&path, &settings.profile)
        .with_context(|| format!("Loading profile '{}'", settings.profile))?;
    Ok(WorkspaceClient::from_profile(&profile, settings.timeout_secs)?)
}

fn ingestion_client(config: &FlowbenchConfig) -> Result<HttpIngestionClient> {
    let settings = &config.ingest;
    Ok(HttpIngestionClient::from_env(
        &settings.base_url,
        &settings.credential_env,
        settings.timeout_secs,
    )?)
}

/// A located SQL task with its parameters resolved
struct ResolvedTask {
    layout: RepoLayout,
    sql_path: PathBuf,
    located: LocatedTask,
    params: ParameterSet,
}

async fn resolve_task(config: &FlowbenchConfig, target: &SqlTarget) -> Result<ResolvedTask> {
    let layout = RepoLayout::discover(config)?;
    let sql_path = layout.sql_path(&target.sql_file);

    let locator = Locator::from_layout(&layout, &config.bundle);
    let located = locator.require(&sql_path.to_string_lossy())?;
    tracing::debug!(
        "{} is run by job '{}' ({})",
        target.sql_file,
        located.job_name,
        located.source_file.display()
    );

    let bundle = BundleConfig::from_file(&layout.bundle_config)?;
    let workspace = workspace_client(config)?;
    let context =
        ResolutionContext::build(&bundle, &config.bundle.target_prefix, &target.region, &workspace)
            .await?;

    let params = resolve_parameters(&located.job, &located.task, &context)?;

    Ok(ResolvedTask {
        layout,
        sql_path,
        located,
        params,
    })
}

async fn sql_command(config: &FlowbenchConfig, command: SqlCommands) -> Result<()> {
    match command {
        SqlCommands::Render { target, plain } => {
            let resolved = resolve_task(config, &target).await?;
            let options = PreviewOptions {
                notebook_header: !plain,
            };
            let preview = render_preview_file(&resolved.sql_path, &resolved.params, options)?;
            print!("{preview}");
        }

        SqlCommands::Params { target } => {
            let resolved = resolve_task(config, &target).await?;
            println!("{}", serde_json::to_string_pretty(&resolved.params)?);
        }

        SqlCommands::Identifier { target } => {
            let resolved = resolve_task(config, &target).await?;
            println!("{}", table_identifier(&resolved.params, &resolved.sql_path));
        }

        SqlCommands::TempJob { target } => {
            let resolved = resolve_task(config, &target).await?;
            let emitter = TempJobEmitter::new(
                config.bundle.temp_job.clone(),
                &resolved.layout.temp_job_path,
            );

            let document = emitter.emit(&resolved.located, &resolved.params)?;
            println!("{}", serde_json::to_string_pretty(&document)?);
            eprintln!(
                "{} {}",
                "Temp job written to:".green(),
                emitter.output_path().display()
            );
        }
    }

    Ok(())
}

async fn jobs_list_command(config: &FlowbenchConfig) -> Result<()> {
    let workspace = workspace_client(config)?;
    let mut jobs = workspace.list_jobs().await?;
    jobs.sort_by(|a, b| a.settings.name.cmp(&b.settings.name));

    for job in &jobs {
        println!(
            "{} - {} - {}",
            job.settings.name.as_deref().unwrap_or("?").bold(),
            job.job_id,
            job.creator_user_name.as_deref().unwrap_or("?")
        );
    }
    eprintln!("{} jobs", jobs.len());
    Ok(())
}

async fn ingest_command(config: &FlowbenchConfig, command: IngestCommands) -> Result<()> {
    let api = ingestion_client(config)?;
    let output_dir = |output: Option<PathBuf>| output.unwrap_or_else(|| config.ingest.output_dir.clone());

    match command {
        IngestCommands::Dump { output } => {
            let dir = output_dir(output);
            let summary = dump(&api, &dir).await?;
            print_skipped(&summary.skipped);
            eprintln!(
                "{} {} files to {}",
                "Dumped".green(),
                summary.written.len(),
                dir.display()
            );
        }

        IngestCommands::DumpRaw { output } => {
            let dir = output_dir(output);
            let summary = dump_raw(&api, &dir).await?;
            print_skipped(&summary.skipped);
            eprintln!(
                "{} {} files to {}",
                "Dumped".green(),
                summary.written.len(),
                dir.display()
            );
        }

        IngestCommands::DumpState { output } => {
            let path = dump_state(&api, &output_dir(output)).await?;
            eprintln!("{} {}", "State saved to:".green(), path.display());
        }

        IngestCommands::Connectors => {
            for line in connector_list_lines(&list_connectors(&api).await?) {
                println!("{line}");
            }
        }

        IngestCommands::Schema { connector } => {
            let id = resolve_connector_id(&api, &connector).await?;
            let schema = fetch_schema_config(&api, &id)
                .await?
                .with_context(|| format!("No schema available for connector {id}"))?;

            for line in connector_schema_lines(&schema) {
                println!("{line}");
            }
        }

        IngestCommands::Columns { connector, table } => {
            let id = resolve_connector_id(&api, &connector).await?;
            let schema = fetch_schema_config(&api, &id)
                .await?
                .with_context(|| format!("No schema available for connector {id}"))?;

            let lines = table_column_lines(&schema, &table);
            if lines.is_empty() {
                eprintln!("{} {}", "No columns found for table".yellow(), table);
            }
            for line in lines {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn print_skipped(skipped: &[String]) {
    for record in skipped {
        eprintln!("  {} {}", "skipped".yellow(), record);
    }
}
