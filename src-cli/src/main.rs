mod commands;
mod output;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{
    AnalyzeCommands, AuthArgs, CliError, DevCommands, EnrollCommands, FarmCommands,
    FarmerCommands, MapArgs,
};
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "coffeefarm")]
#[command(about = "Farm attendance and crop inspection from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to the per-user config directory)
    #[arg(long, global = true, env = "COFFEEFARM_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and remember the session
    Login(AuthArgs),
    /// Sign out and forget the saved session
    Logout,
    /// Show the signed-in account
    Profile,
    /// Farm overview with today's attendance
    Dashboard {
        /// Drop cached statistics before loading
        #[arg(long)]
        refresh: bool,
    },
    /// Manage farmers
    #[command(subcommand)]
    Farmers(FarmerCommands),
    /// Manage farms
    #[command(subcommand)]
    Farms(FarmCommands),
    /// Check a farmer in or out from a face photo
    Checkin {
        /// Photo of the farmer's face
        image: PathBuf,
        /// Record a check-out instead of a check-in
        #[arg(long)]
        out: bool,
    },
    /// Face enrollment
    #[command(subcommand)]
    Enroll(EnrollCommands),
    /// Coffee beans and leaves analysis
    #[command(subcommand)]
    Analyze(AnalyzeCommands),
    /// Farms with today's attendance and distances
    Map(MapArgs),
    /// Development-only seed and reset endpoints
    #[command(subcommand)]
    Dev(DevCommands),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Library code logs through the `log` facade.
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to bridge log records: {}", e);
    }

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbose > 1),
    );
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install log subscriber: {}", e);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let state = AppState::load(cli.config.as_deref())?;
    debug!("Using API at {}", state.client.base_url());

    match cli.command {
        Commands::Login(args) => commands::auth::login(&state, args).await,
        Commands::Logout => commands::auth::logout(&state),
        Commands::Profile => commands::auth::profile(&state),
        Commands::Dashboard { refresh } => commands::dashboard::show(&state, refresh).await,
        Commands::Farmers(cmd) => commands::farmers::handle(&state, cmd).await,
        Commands::Farms(cmd) => commands::farms::handle(&state, cmd).await,
        Commands::Checkin { image, out } => commands::checkin::run(&state, &image, out).await,
        Commands::Enroll(cmd) => commands::enroll::handle(&state, cmd).await,
        Commands::Analyze(cmd) => commands::analyze::handle(&state, cmd).await,
        Commands::Map(args) => commands::map::show(&state, args).await,
        Commands::Dev(cmd) => commands::dev::handle(&state, cmd).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
