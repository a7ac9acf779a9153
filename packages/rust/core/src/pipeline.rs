//! End-to-end pipeline: record file → prompt → completion → discharge note file.
//!
//! Stages run strictly in order: `Start → Loaded → PromptBuilt → Completed → Saved`.
//! A failure at any stage aborts the rest; nothing is retried or rolled back.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, instrument, warn};

use vetdischarge_completion::CompletionClient;
use vetdischarge_shared::{ConsultationRecord, DischargeError, DischargeNote, Result};

use crate::prompt::build_prompt;
use crate::record::{load_record, output_path_for, save_note};

/// Inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct DischargeRequest {
    /// Consultation record to read.
    pub input_path: PathBuf,
    /// Existing directory the note is written into.
    pub output_dir: PathBuf,
}

/// Result of a successful run.
#[derive(Debug)]
pub struct DischargeOutcome {
    /// Where the note was written.
    pub output_path: PathBuf,
    /// The note as written.
    pub note: DischargeNote,
    /// Length of the rendered prompt in bytes.
    pub prompt_len: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Last stage the pipeline reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Loaded,
    PromptBuilt,
    Completed,
    Saved,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Loaded => "loaded",
            Self::PromptBuilt => "prompt_built",
            Self::Completed => "completed",
            Self::Saved => "saved",
        };
        f.write_str(name)
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// The record was read and parsed.
    fn loaded(&self, record: &ConsultationRecord);
    /// The prompt was rendered; the completion call starts next.
    fn prompt_built(&self, prompt: &str);
    /// The completion service answered.
    fn completed(&self, text: &str);
    /// The note is about to be written.
    fn saving(&self, output_path: &Path);
    /// Called when the pipeline completes.
    fn done(&self, outcome: &DischargeOutcome);
    /// Called once when a stage fails. `reached` is the last stage that succeeded.
    fn aborted(&self, _reached: Stage, _error: &DischargeError) {}
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn loaded(&self, _record: &ConsultationRecord) {}
    fn prompt_built(&self, _prompt: &str) {}
    fn completed(&self, _text: &str) {}
    fn saving(&self, _output_path: &Path) {}
    fn done(&self, _outcome: &DischargeOutcome) {}
}

/// Run the full pipeline.
///
/// 1. Load the consultation record
/// 2. Build the prompt
/// 3. Ask the completion service for the note
/// 4. Save `{"discharge_note": ...}` under the output directory
#[instrument(skip_all, fields(input = %request.input_path.display()))]
pub async fn generate_discharge_note(
    request: &DischargeRequest,
    client: &dyn CompletionClient,
    progress: &dyn ProgressReporter,
) -> Result<DischargeOutcome> {
    let mut reached = Stage::Start;
    let result = run_stages(request, client, progress, &mut reached).await;

    if let Err(e) = &result {
        warn!(stage = %reached, error = %e, "pipeline aborted");
        progress.aborted(reached, e);
    }
    result
}

async fn run_stages(
    request: &DischargeRequest,
    client: &dyn CompletionClient,
    progress: &dyn ProgressReporter,
    reached: &mut Stage,
) -> Result<DischargeOutcome> {
    let start = Instant::now();
    let output_path = output_path_for(&request.input_path, &request.output_dir)?;

    let record = load_record(&request.input_path)?;
    *reached = Stage::Loaded;
    progress.loaded(&record);

    let prompt = build_prompt(&record);
    *reached = Stage::PromptBuilt;
    info!(prompt_len = prompt.len(), "prompt built");
    progress.prompt_built(&prompt);

    let text = client.complete(&prompt).await?;
    *reached = Stage::Completed;
    progress.completed(&text);

    progress.saving(&output_path);
    let note = DischargeNote::new(text);
    save_note(&output_path, &note)?;
    *reached = Stage::Saved;

    let outcome = DischargeOutcome {
        output_path,
        note,
        prompt_len: prompt.len(),
        elapsed: start.elapsed(),
    };

    info!(
        output = %outcome.output_path.display(),
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "discharge note generated"
    );
    progress.done(&outcome);
    Ok(outcome)
}

/// Load and render the prompt without calling the completion service.
pub fn render_prompt(input_path: &Path) -> Result<String> {
    let record = load_record(input_path)?;
    Ok(build_prompt(&record))
}
