use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use vuesweep::commands::{clean::CleanOptions, config_cmd::ConfigOptions, scan::ScanOptions};
use vuesweep::commands::{execute_clean, execute_config, execute_scan};
use vuesweep::error::AppError;
use vuesweep::index::SortKey;
use vuesweep::logging;
use vuesweep::path::resolve_root;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => {
            logging::init(args.verbose);
            let options = ScanOptions {
                root: resolve_root(args.path),
                threshold_days: args.days,
                show_all: args.all,
                sort: args.sort,
                reverse: args.reverse,
                json: args.json,
            };
            execute_scan(options)?;
        }
        Commands::Clean(args) => {
            logging::init(args.verbose);
            let options = CleanOptions {
                root: resolve_root(args.path),
                threshold_days: args.days,
                show_all: args.all,
                permanent: args.permanent,
                assume_yes: args.yes,
                verbose: args.verbose,
            };
            execute_clean(options)?;
        }
        Commands::Config(args) => {
            logging::init(false);
            let options =
                ConfigOptions { show_path: args.path, edit: args.edit, add_exclude: args.add_exclude };
            execute_config(options)?;
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "vuesweep",
    version,
    about = "Find idle Vue projects and reclaim their node_modules and dist directories."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List Vue projects and how much space their artifacts use.
    #[command(visible_alias = "sc")]
    Scan(ScanArgs),
    /// Remove node_modules and dist from selected projects.
    #[command(visible_alias = "cl")]
    Clean(CleanArgs),
    /// Manage vuesweep configuration.
    #[command(visible_alias = "cfg")]
    Config(ConfigArgs),
}

#[derive(Args)]
struct ScanArgs {
    /// Only show projects idle for at least this many days.
    #[arg(short = 'd', long = "days", value_name = "DAYS")]
    days: Option<u64>,

    /// Show every project regardless of activity.
    #[arg(short = 'a', long = "all", action = ArgAction::SetTrue)]
    all: bool,

    /// Column to sort by (name, days, dependencies, build, reclaimable, path).
    #[arg(short = 's', long = "sort", value_name = "KEY", default_value = "days")]
    sort: SortKey,

    /// Flip the sort direction.
    #[arg(short = 'r', long = "reverse", action = ArgAction::SetTrue)]
    reverse: bool,

    /// Print results as JSON.
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,

    /// Log skipped entries and per-project details to stderr.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Directory to scan (defaults to the home directory).
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,
}

#[derive(Args)]
struct CleanArgs {
    /// Only offer projects idle for at least this many days.
    #[arg(short = 'd', long = "days", value_name = "DAYS")]
    days: Option<u64>,

    /// Offer every project regardless of activity.
    #[arg(short = 'a', long = "all", action = ArgAction::SetTrue)]
    all: bool,

    /// Delete outright instead of moving to the trash.
    #[arg(long = "permanent", action = ArgAction::SetTrue)]
    permanent: bool,

    /// Clean every listed project without prompting.
    #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
    yes: bool,

    /// Show each directory in the cleanup plan.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Directory to scan (defaults to the home directory).
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,
}

#[derive(Args)]
struct ConfigArgs {
    /// Show the configuration file path.
    #[arg(long = "path", action = ArgAction::SetTrue)]
    path: bool,

    /// Open the configuration file in $EDITOR.
    #[arg(long = "edit", action = ArgAction::SetTrue)]
    edit: bool,

    /// Add a glob pattern for directories the scan should skip.
    #[arg(long = "add-exclude", value_name = "PATTERN")]
    add_exclude: Option<String>,
}
