use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use splitkro::cli::{
    handle_audit_command, handle_balance_command, handle_expense_command, handle_export_command,
    handle_group_command, handle_import_command, handle_settle_command,
    handle_settle_history_command, handle_simplify_command, ExportFormat, SettleArgs,
};
use splitkro::config::{paths::SplitPaths, settings::Settings};
use splitkro::storage::Storage;

/// Environment variable overriding the log filter
const LOG_ENV: &str = "SPLITKRO_LOG";

#[derive(Parser)]
#[command(
    name = "splitkro",
    version,
    about = "Split group expenses and settle up with as few payments as possible",
    long_about = "splitkro tracks shared expenses inside groups, works out who owes \
                  whom, and suggests a short list of payments that settles everyone."
)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Group and member management
    #[command(subcommand)]
    Group(splitkro::cli::GroupCommands),

    /// Expense management
    #[command(subcommand)]
    Expense(splitkro::cli::ExpenseCommands),

    /// Show balances and suggested settlements for a group
    Balance {
        /// Group name or ID
        group: String,
    },

    /// Simplify debts from a JSON balance file
    Simplify {
        /// JSON array of {memberId, displayName, netBalance}
        file: PathBuf,
        /// Print transactions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a payment between members
    Settle(SettleArgs),

    /// Show recorded settlements for a group
    SettleHistory {
        /// Group name or ID
        group: String,
    },

    /// Export a group to a file
    Export {
        /// Group name or ID
        group: String,
        /// Output file path
        output: PathBuf,
        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// CSV only: export the suggested settlement plan instead of the ledger
        #[arg(long)]
        plan: bool,
    },

    /// Import a group from a JSON or YAML export
    Import {
        /// Export file path
        file: PathBuf,
        /// Export format (inferred from the file extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = SplitPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    init_tracing(cli.verbose, &settings.log_level);

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Group(cmd)) => handle_group_command(&storage, &settings, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Balance { group }) => handle_balance_command(&storage, &settings, &group)?,
        Some(Commands::Simplify { file, json }) => handle_simplify_command(&settings, &file, json)?,
        Some(Commands::Settle(args)) => handle_settle_command(&storage, &settings, args)?,
        Some(Commands::SettleHistory { group }) => {
            handle_settle_history_command(&storage, &settings, &group)?
        }
        Some(Commands::Export {
            group,
            output,
            format,
            plan,
        }) => handle_export_command(&storage, &settings, &group, &output, format, plan)?,
        Some(Commands::Import { file, format }) => handle_import_command(&storage, &file, format)?,
        Some(Commands::Audit { limit }) => handle_audit_command(&storage, limit)?,
        Some(Commands::Init) => {
            println!("Initializing splitkro at: {}", paths.base_dir().display());
            splitkro::storage::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  splitkro group create \"Goa Trip\" --members Asha,Ravi,Meera");
            println!("  splitkro expense add \"Goa Trip\" Dinner 90 --paid-by Asha");
            println!("  splitkro balance \"Goa Trip\"");
        }
        Some(Commands::Config) => {
            println!("splitkro Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Date format:       {}", settings.date_format);
            println!(
                "  Settle tolerance:  {}",
                settings.settle_tolerance().format_with_symbol(&settings.currency_symbol)
            );
            println!("  Default split:     {}", settings.default_split);
            println!("  Log level:         {}", settings.log_level);
        }
        None => {
            println!("splitkro - group expense splitting");
            println!();
            println!("Run 'splitkro --help' for usage information.");
        }
    }

    Ok(())
}

/// Log to stderr so table output on stdout stays clean
///
/// `SPLITKRO_LOG` wins over `-v`, which wins over the configured level.
fn init_tracing(verbose: bool, configured: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { configured };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
