use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aidiag::cli::{DisplayFormat, OutputFormat};
use aidiag::cli::commands::diagnose::DiagnoseOptions;

#[derive(Parser)]
#[command(name = "aidiag")]
#[command(
    version,
    about = "AI-capability diagnosis: scoring, benchmarks and quality-gated reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Diagnose a submission file (JSON or YAML)
    Diagnose {
        #[arg(help = "Submission file")]
        file: PathBuf,
        #[arg(long, help = "Skip orchestration and the quality gate")]
        quick: bool,
        #[arg(long, help = "Quality gate threshold override (0-100)")]
        threshold: Option<f64>,
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
        #[arg(long, short, help = "Write output to a file instead of stdout")]
        output: Option<PathBuf>,
        #[arg(long, help = "Give up waiting after this many seconds")]
        timeout_secs: Option<u64>,
    },

    /// Run the rich and legacy pipelines in parallel
    Parallel {
        #[arg(help = "Submission file")]
        file: PathBuf,
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
        #[arg(long, short, help = "Write output to a file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Process a historic submission record through the compatibility bridge
    Legacy {
        #[arg(help = "Legacy record file (JSON or YAML)")]
        file: PathBuf,
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
        #[arg(long, short, help = "Write output to a file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// List the industry table
    Industries {
        #[arg(short = 'f', long, value_enum, default_value_t = DisplayFormat::Text)]
        format: DisplayFormat,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(short = 'f', long, value_enum, default_value_t = DisplayFormat::Text)]
        format: DisplayFormat,
    },
    /// Show configuration file paths
    Path,
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = aidiag::types::panic_message(panic_info.payload());

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31maidiag encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Ok(false) when a pipeline ran but did not produce a successful result
fn run_cli() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let succeeded = match cli.command {
        Commands::Diagnose {
            file,
            quick,
            threshold,
            format,
            output,
            timeout_secs,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(aidiag::cli::commands::diagnose::run(DiagnoseOptions {
                input: file,
                quick,
                threshold,
                format,
                output,
                timeout_secs,
            }))?
        }
        Commands::Parallel {
            file,
            format,
            output,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(aidiag::cli::commands::parallel::run(&file, format, output))?
        }
        Commands::Legacy {
            file,
            format,
            output,
        } => aidiag::cli::commands::legacy::run(&file, format, output)?,
        Commands::Industries { format } => {
            aidiag::cli::commands::industries::run(format)?;
            true
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show { global, format } => {
                    aidiag::cli::commands::config::show(global, format)?;
                }
                ConfigAction::Path => {
                    aidiag::cli::commands::config::path()?;
                }
            }
            true
        }
    };

    Ok(succeeded)
}
