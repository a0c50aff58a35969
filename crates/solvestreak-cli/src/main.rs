use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(
    name = "solvestreak",
    version,
    about = "Track a LeetCode/GeeksforGeeks solving streak for a desktop widget"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Defaults to `update`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (default: config.toml next to the executable)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage directory for history, snapshot and log files (overrides `base_dir`)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch counts, advance the streak and refresh the widget
    Update,
    /// Re-emit the last-known snapshot without network access
    Show {
        /// Print the structured payload instead of the widget line
        #[arg(long)]
        json: bool,
    },
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let ctx = commands::AppContext::resolve(&cli.global);
    let _log_guard = logging::init(&ctx.paths.dir);
    ctx.report_config_problem();

    let result = match cli.command.unwrap_or(Commands::Update) {
        Commands::Update => commands::update::run(&ctx),
        Commands::Show { json } => commands::show::run(&ctx, json),
        Commands::Config { action } => commands::config::run(&ctx, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
