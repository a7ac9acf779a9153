//! CLI definition, argument validation, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::Parser;
use clap::error::ErrorKind;
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use vetdischarge_completion::{CompletionConfig, OpenAiClient};
use vetdischarge_core::pipeline::{
    DischargeOutcome, DischargeRequest, ProgressReporter, Stage, generate_discharge_note,
    render_prompt,
};
use vetdischarge_shared::{
    AppConfig, ConsultationRecord, DischargeError, load_config, load_config_from,
    resolve_credential,
};

/// Example invocation printed after every usage error.
const USAGE_EXAMPLE: &str = "ex: vetdischarge path/to/input.json";

/// Printed to stdout when no API key is configured.
const MISSING_KEY_MESSAGE: &str = "ERROR: Missing API KEY";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// vetdischarge: write a pet owner's discharge note from a consultation record.
#[derive(Parser)]
#[command(
    name = "vetdischarge",
    version,
    about = "Generate a plain-language discharge note from a veterinary consultation record.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file (defaults to ~/.vetdischarge/vetdischarge.toml if present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the rendered prompt and exit without calling the completion service.
    #[arg(long)]
    pub print_prompt: bool,

    /// Consultation record (JSON). Exactly one is required.
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Parse arguments, exiting with status 1 and a usage example on any usage error.
pub(crate) fn parse_args() -> Cli {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => usage_exit(&e.to_string()),
    };

    match cli.inputs.len() {
        1 => cli,
        0 => usage_exit("ERROR: Missing input file"),
        _ => usage_exit("ERROR: Too many arguments"),
    }
}

fn usage_exit(message: &str) -> ! {
    eprintln!("{}\n{USAGE_EXAMPLE}", message.trim_end());
    std::process::exit(1);
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout is for progress.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose)));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Filter used when `RUST_LOG` is unset.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "vetdischarge=info",
        1 => "vetdischarge=debug",
        _ => "vetdischarge=trace",
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let input = cli
        .inputs
        .first()
        .cloned()
        .ok_or_else(|| eyre!("missing input file"))?;

    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if cli.print_prompt {
        println!("{}", render_prompt(&input)?);
        return Ok(());
    }

    cmd_generate(&config, input).await
}

async fn cmd_generate(config: &AppConfig, input: PathBuf) -> Result<()> {
    // Checked before anything touches the network.
    let credential = match resolve_credential(config) {
        Ok(credential) => credential,
        Err(e) if e.is_missing_credential() => {
            tracing::debug!(error = %e, "no API key");
            println!("{MISSING_KEY_MESSAGE}");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let client = OpenAiClient::new(CompletionConfig::from_app_config(config, credential)?)?;

    let request = DischargeRequest {
        input_path: input,
        output_dir: PathBuf::from(&config.defaults.output_dir),
    };

    info!(
        input = %request.input_path.display(),
        output_dir = %request.output_dir.display(),
        model = %config.openai.model,
        "generating discharge note"
    );

    let reporter = CliProgress::new();
    generate_discharge_note(&request, &client, &reporter).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Prints stage messages to stdout and shows a spinner on stderr while the
/// completion request is in flight.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn loaded(&self, record: &ConsultationRecord) {
        let data = serde_json::to_string(record).unwrap_or_else(|_| format!("{record:?}"));
        println!("Loading the data {data}");
    }

    fn prompt_built(&self, _prompt: &str) {
        println!("Generating prompt for LLM...");
        self.spinner.set_message("Waiting for the completion service");
        self.spinner
            .enable_steady_tick(std::time::Duration::from_millis(80));
    }

    fn completed(&self, _text: &str) {
        self.spinner.finish_and_clear();
    }

    fn saving(&self, output_path: &Path) {
        println!("Saving discharge note to: {}", output_path.display());
    }

    fn done(&self, _outcome: &DischargeOutcome) {
        println!("Discharge note has been generated!");
    }

    fn aborted(&self, _reached: Stage, _error: &DischargeError) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_filter() {
        assert_eq!(default_filter(0), "vetdischarge=info");
        assert_eq!(default_filter(1), "vetdischarge=debug");
        assert_eq!(default_filter(2), "vetdischarge=trace");
        assert_eq!(default_filter(5), "vetdischarge=trace");
    }
}
