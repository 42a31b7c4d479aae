use clap::{CommandFactory, Parser, Subcommand};
use taskwise_core::Config;
use tracing_subscriber::{prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "taskwise", version, about = "Context-aware task manager")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Context notes and recommendations
    Context {
        #[command(subcommand)]
        action: commands::context::ContextAction,
    },
    /// Category management
    Category {
        #[command(subcommand)]
        action: commands::category::CategoryAction,
    },
    /// Task dashboard and context statistics
    Stats,
    /// Print the built-in word lists
    Lexicon,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Task { .. } => "task",
            Commands::Context { .. } => "context",
            Commands::Category { .. } => "category",
            Commands::Stats => "stats",
            Commands::Lexicon => "lexicon",
            Commands::Config { .. } => "config",
            Commands::Completions { .. } => "completions",
        }
    }
}

fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    let command = cli.command.name();
    match taskwise_core::storage::data_dir() {
        Ok(dir) => tracing::debug!(command, data_dir = %dir.display(), "dispatching"),
        Err(e) => tracing::debug!(command, error = %e, "data dir unresolved"),
    }

    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action, &config),
        Commands::Context { action } => commands::context::run(action, &config),
        Commands::Category { action } => commands::category::run(action),
        Commands::Stats => commands::stats::run(&config),
        Commands::Lexicon => commands::lexicon::run(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "taskwise", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
