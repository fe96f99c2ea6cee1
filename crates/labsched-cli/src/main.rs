use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "labsched", version, about = "Assign students to lab sessions and sub-groups")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    meta: commands::BundleMeta,

    /// Enable debug logging (otherwise RUST_LOG, default "warn")
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a schedule from a roster file
    Schedule(commands::schedule::ScheduleArgs),
    /// Retrieve or delete stored schedules
    #[command(alias = "dbaccess")]
    Db(commands::db::DbArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Schedule(args) => commands::schedule::run(args, &cli.meta),
        Commands::Db(args) => commands::db::run(args, &cli.meta),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
