use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use clusterbar::config::{DashboardConfig, LocalOptions};
use clusterbar::connect::check_host;
use clusterbar::dashboard::{build_local_dashboard, Aggregator};
use clusterbar::render::{render, SelfInvocation};
use clusterbar::runner::ProcessRunner;
use clusterbar::scheduler::QueueFormat;

#[derive(Parser, Debug)]
#[command(name = "clusterbar")]
#[command(version)]
#[command(about = "Cluster job queue and recent experiments, for the menu bar")]
#[command(propagate_version = true)]
struct Args {
    /// Path to the hosts configuration (YAML)
    #[arg(long, global = true, env = "CLUSTERBAR_CONFIG")]
    config_file: Option<PathBuf>,

    // Defaults to `bar` so the binary can be dropped into a SwiftBar plugin folder.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print this host's dashboard as JSON (run on the cluster over ssh)
    Local(LocalArgs),

    /// Query every configured host and print SwiftBar markup
    Bar,

    /// Query every configured host and print the merged dashboards as JSON
    Aggregate,

    /// Check ssh connectivity to every configured host
    Connect,
}

// =============================================================================
// Local Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct LocalArgs {
    /// The path to the experiments folder
    #[arg(long, default_value = "~/experiments")]
    experiments_path: PathBuf,

    /// A date or a natural language string (e.g. '1 week') indicating the earliest date on
    /// which an experiment must be created to count as recent
    #[arg(long, default_value = "1 week")]
    recent_creation_cutoff: String,

    /// A date or a natural language string (e.g. '2 months') indicating the earliest date on
    /// which an experiment must have had activity to count as recent
    #[arg(long, default_value = "1 day")]
    recent_activity_cutoff: String,

    /// Columns requested from squeue
    #[arg(long, default_value = "extended")]
    format: FormatArg,

    /// Only emit the queue, without recent experiments
    #[arg(long)]
    no_recent: bool,

    /// Scheduler user (defaults to $USER)
    #[arg(long)]
    user: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
enum FormatArg {
    Minimal,
    Extended,
}

impl From<FormatArg> for QueueFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Minimal => QueueFormat::Minimal,
            FormatArg::Extended => QueueFormat::Extended,
        }
    }
}

impl From<LocalArgs> for LocalOptions {
    fn from(args: LocalArgs) -> Self {
        LocalOptions {
            experiments_path: args.experiments_path,
            creation_cutoff: args.recent_creation_cutoff,
            activity_cutoff: args.recent_activity_cutoff,
            format: args.format.into(),
            include_recent: !args.no_recent,
            user: args.user,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn init_logging() {
    // stdout carries the payload, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn config_path(args: &Args) -> PathBuf {
    match &args.config_file {
        Some(path) => path.clone(),
        None => dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clusterbar")
            .join("config.yaml"),
    }
}

fn fail(error: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", error);
    std::process::exit(1);
}

// =============================================================================
// Command Handlers
// =============================================================================

async fn handle_local(args: LocalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = LocalOptions::from(args);
    let now = Local::now().naive_local();

    match build_local_dashboard(&ProcessRunner::new(), &options, now).await {
        Ok(dashboard) => {
            println!("{}", dashboard.to_json_pretty()?);
            Ok(())
        }
        Err(e) => fail(e),
    }
}

async fn handle_bar(config_file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = DashboardConfig::load(&config_file).unwrap_or_else(|e| fail(e));
    let aggregator = Aggregator::new(config, Arc::new(ProcessRunner::new()));
    let dashboards = aggregator.collect().await;

    let invocation = SelfInvocation {
        executable: std::env::current_exe()?.to_string_lossy().into_owned(),
        config_file: config_file.to_string_lossy().into_owned(),
    };
    print!(
        "{}",
        render(aggregator.config(), &dashboards, &invocation, Local::now().naive_local())
    );
    Ok(())
}

async fn handle_aggregate(config_file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = DashboardConfig::load(&config_file).unwrap_or_else(|e| fail(e));
    let aggregator = Aggregator::new(config, Arc::new(ProcessRunner::new()));
    let dashboards = aggregator.collect().await;
    println!("{}", serde_json::to_string_pretty(&dashboards)?);
    Ok(())
}

async fn handle_connect(config_file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = DashboardConfig::load(&config_file).unwrap_or_else(|e| fail(e));
    let runner = ProcessRunner::new();

    let mut failed = 0;
    for (key, host) in config.hosts() {
        println!("Connecting: {}", key);
        if let Err(e) = check_host(&runner, key, host).await.result {
            println!("Error: {}", e);
            failed += 1;
        }
    }

    let total = config.hosts().count();
    println!();
    println!("{} of {} hosts reachable", total - failed, total);
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging();

    let config_file = config_path(&args);
    match args.command.unwrap_or(Commands::Bar) {
        Commands::Local(local_args) => handle_local(local_args).await?,
        Commands::Bar => handle_bar(config_file).await?,
        Commands::Aggregate => handle_aggregate(config_file).await?,
        Commands::Connect => handle_connect(config_file).await?,
    }

    Ok(())
}
