use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fintrack::core::log::init_logging;
use fintrack::core::{RecordDraft, RecordKind, RecordPatch};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display totals, balance and the most recent transactions
    Summary,
    /// Manage income records
    Income {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Manage expense records
    Expense {
        #[command(subcommand)]
        action: RecordAction,
    },
}

#[derive(Subcommand)]
enum RecordAction {
    /// List all records
    List,
    /// Add a new record
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change fields of an existing record
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a record
    Delete { id: String },
}

impl RecordAction {
    fn into_command(self, kind: RecordKind) -> fintrack::AppCommand {
        match self {
            RecordAction::List => fintrack::AppCommand::List(kind),
            RecordAction::Add {
                title,
                amount,
                category,
                description,
            } => fintrack::AppCommand::Add(
                kind,
                RecordDraft {
                    title,
                    amount,
                    category,
                    description,
                },
            ),
            RecordAction::Update {
                id,
                title,
                amount,
                category,
                description,
            } => fintrack::AppCommand::Update {
                kind,
                id,
                patch: RecordPatch {
                    title,
                    amount,
                    category,
                    description,
                },
            },
            RecordAction::Delete { id } => fintrack::AppCommand::Delete { kind, id },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => fintrack::cli::setup::setup(),
        Some(Commands::Summary) => {
            fintrack::run_command(fintrack::AppCommand::Summary, config_path).await
        }
        Some(Commands::Income { action }) => {
            fintrack::run_command(action.into_command(RecordKind::Income), config_path).await
        }
        Some(Commands::Expense { action }) => {
            fintrack::run_command(action.into_command(RecordKind::Expense), config_path).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
