use clap::{ArgAction, Parser, Subcommand};
use commands::{config, daemon, lists, run};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "chartsync")]
#[command(about = "chartsync - Mirror daily streaming top-10 charts into Trakt lists")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scrape-resolve-reconcile pass over all configured charts
    #[command(
        long_about = "Scrape every configured chart section, resolve each ranked title to its catalog id, and replace the corresponding Trakt list contents. Credentials are validated (and refreshed if expired) for all accounts before any list is written."
    )]
    Run {
        /// Print each scraped chart as a table before syncing
        #[arg(long, action = ArgAction::SetTrue)]
        print_lists: bool,
    },
    /// Run as a foreground scheduler that re-runs on a cron schedule
    #[command(
        long_about = "Keep the process alive and re-run the full pipeline on the configured cron schedule. Logs go to a daily-rotated file under the chartsync log directory."
    )]
    Daemon {
        /// Cron schedule expression (e.g. '0 0 6 * * *' for 06:00 daily)
        #[arg(long, value_name = "SCHEDULE")]
        schedule: Option<String>,

        /// Skip the initial run on startup
        #[arg(long, action = ArgAction::SetTrue)]
        no_startup_run: bool,
    },
    /// Show configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Inspect or manage the remote lists
    Lists {
        #[command(subcommand)]
        cmd: ListsCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration (masks client secrets)
    Show {
        /// Show full configuration including secrets
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
}

#[derive(Subcommand)]
enum ListsCommands {
    /// Show the configured lists and whether they exist remotely
    Show,
    /// Delete a remote list by slug
    Delete {
        /// Owning account: netflix, prime, or others
        account: String,
        /// Slug of the list to delete
        slug: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Daemon runs log to a rotated file; everything else logs to stderr.
    let log_file = match cli.command {
        Commands::Daemon { .. } => {
            let paths = chartsync_config::PathManager::default();
            Some(paths.daemon_log_file())
        }
        _ => None,
    };
    logging::init_logging(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Run { print_lists } => run::run_once(print_lists, &output).await,
        Commands::Daemon {
            schedule,
            no_startup_run,
        } => daemon::run_daemon(schedule, no_startup_run, &output).await,
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show { full } => config::show_config(full, &output),
        },
        Commands::Lists { cmd } => match cmd {
            ListsCommands::Show => lists::show_lists(&output).await,
            ListsCommands::Delete { account, slug } => {
                lists::delete_list(&account, &slug, &output).await
            }
        },
    }
}
