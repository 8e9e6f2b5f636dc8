use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use portal_probe::report::RunResults;
use portal_probe::{report, runner, HarnessConfig, HeaderStyle};

#[derive(Parser)]
#[command(name = "portal-probe")]
#[command(version)]
#[command(about = "Acceptance-test CLI for the job portal HTTP API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full acceptance scenario against a backend
    Run {
        /// Backend base URL (falls back to PORTAL_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,

        /// Auth header convention of the target backend
        #[arg(long, value_enum, default_value = "bearer")]
        header_style: HeaderStyle,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "10")]
        timeout: u64,

        /// Skip the chat steps
        #[arg(long, default_value = "false")]
        no_chat: bool,

        /// Skip the text-suggestions step
        #[arg(long, default_value = "false")]
        no_suggestions: bool,

        /// Chat participant id (defaults to the registered user's own id)
        #[arg(long)]
        participant: Option<String>,

        /// Write results.json to the output directory
        #[arg(long, default_value = "false")]
        report: bool,

        /// Output directory for results
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },

    /// Generate a report from saved run results
    Report {
        /// Path to results.json
        results: PathBuf,

        /// Output format (json, junit)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            base_url,
            header_style,
            timeout,
            no_chat,
            no_suggestions,
            participant,
            report: write_report,
            output,
        } => {
            // Missing base URL is a configuration error, not a step
            // failure: abort before any step runs, with its own exit code.
            let base_url = match HarnessConfig::resolve_base_url(base_url) {
                Ok(url) => url,
                Err(err) => {
                    eprintln!("{} Configuration error: {}", "❌".red(), err);
                    std::process::exit(2);
                }
            };

            let config = HarnessConfig {
                base_url,
                header_style,
                timeout_secs: timeout,
                chat_enabled: !no_chat,
                suggestions_enabled: !no_suggestions,
                participant_id: participant,
            };

            let run = runner::run_scenario(&config).await?;

            if write_report {
                let results = RunResults::from_report(&run, &config.base_url);
                let path = report::write_results(&results, &output)?;
                println!("Results saved to: {}", path.display().to_string().cyan());
            }

            std::process::exit(if run.all_passed() { 0 } else { 1 });
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "📊".blue(),
                format.cyan(),
                results.display()
            );
            report::generate_report(&results, &format, output.as_deref())?;
        }
    }

    Ok(())
}
