//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{communication, customer, menu, report, task};
use crate::storage::{Config, CrmStore};

#[derive(Parser)]
#[command(name = "crm")]
#[command(author, version, about = "Customer relationship management from the command line")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Directory holding the CSV data files
    #[arg(long, global = true, env = "CRM_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file to use instead of the global one
    #[arg(long, global = true, env = "CRM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory, empty tables and a default config file
    Init,

    /// Start the interactive menu (the default)
    Menu,

    /// Manage customers
    #[command(subcommand)]
    Customer(customer::CustomerCommands),

    /// Track communications
    #[command(subcommand)]
    Comm(communication::CommunicationCommands),

    /// Manage tasks
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Print reports
    #[command(subcommand)]
    Report(report::ReportCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let format = cli.format.unwrap_or(config.default_format);
    let output = Output::new(format, cli.verbose);

    init_logging(cli.verbose);
    output.verbose("CRM CLI starting");

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    output.verbose_ctx("store", &format!("Opening data directory: {}", data_dir.display()));

    let mut store = CrmStore::open(&data_dir)?;
    output.verbose_ctx(
        "store",
        &format!(
            "Loaded {} customers, {} communications, {} tasks",
            store.customers().len(),
            store.communications().len(),
            store.tasks().len()
        ),
    );

    if config.notifications {
        let sink = output;
        store.set_listener(move |event| sink.notice(event));
    }

    match cli.command {
        None | Some(Commands::Menu) => menu::run(&mut store, &config, &output)?,

        Some(Commands::Init) => {
            let config_path = cli.config.clone().or_else(Config::global_config_path);
            if let Some(path) = config_path.filter(|p| !p.exists()) {
                config.save(&path)?;
                output.verbose_ctx("init", &format!("Wrote default config: {}", path.display()));
            }
            output.success(&format!(
                "Initialized CRM data at {}",
                store.data_dir().display()
            ));
        }

        Some(Commands::Customer(cmd)) => customer::run(cmd, &mut store, &output)?,
        Some(Commands::Comm(cmd)) => communication::run(cmd, &mut store, &output)?,
        Some(Commands::Task(cmd)) => task::run(cmd, &mut store, &config, &output)?,
        Some(Commands::Report(cmd)) => report::run(cmd, &store, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Routes `log` diagnostics to stderr; `RUST_LOG` overrides the level
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}
