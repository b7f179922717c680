//! Folio CLI
//!
//! Renders the portfolio page to HTML, runs headless scenarios and manages
//! the persisted theme preference.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line interface for the Folio portfolio
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Render the portfolio, run headless scenarios and manage the theme")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./folio.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the settled page as an HTML document
    Render {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Force a scheme instead of the stored preference
        #[arg(long)]
        theme: Option<String>,
    },

    /// Run a headless scenario and print its JSON report
    Scenario {
        /// Scenario JSON file
        file: PathBuf,

        /// Also write the report to this relative path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Inspect or change the persisted theme preference
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand, Debug)]
enum ThemeAction {
    /// Print the scheme the next page load will use
    Get,
    /// Persist a scheme
    Set {
        /// light or dark
        scheme: String,
    },
    /// Flip the resolved scheme and persist it
    Toggle,
    /// Forget the stored preference and follow the system again
    Clear,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("folio error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = commands::load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Render { out, theme } => {
            commands::render(&config, out.as_deref(), theme.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Scenario { file, report } => {
            let passed = commands::scenario(config, &file, report.as_deref())?;
            Ok(if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Theme { action } => {
            let action = match action {
                ThemeAction::Get => commands::ThemeCommand::Get,
                ThemeAction::Set { scheme } => commands::ThemeCommand::Set(scheme.parse()?),
                ThemeAction::Toggle => commands::ThemeCommand::Toggle,
                ThemeAction::Clear => commands::ThemeCommand::Clear,
            };
            let line = commands::theme(&config, action)?;
            println!("{line}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `RUST_LOG` wins; `info` otherwise. Logs go to stderr so rendered HTML and
/// reports on stdout stay clean.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
