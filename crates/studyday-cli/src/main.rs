use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyday", version, about = "Plan today's study time around your lectures")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fixed lectures for a day
    Lecture {
        #[command(subcommand)]
        action: commands::lecture::LectureAction,
    },
    /// Weekly task catalog
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Plan a day
    Plan(commands::plan::PlanArgs),
    /// Export a stored plan as iCalendar
    Export(commands::export::ExportArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Lecture { action } => commands::lecture::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
