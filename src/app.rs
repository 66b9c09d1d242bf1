//! Session controller for askframe.
//!
//! Owns the loaded dataset and the query synthesizer, and runs the
//! question → expression → evaluation → output pipeline one question at a
//! time. Every failure is turned into an [`Output`] here; nothing escapes
//! to terminate the session.

use std::path::Path;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::dataset::{self, Dataset};
use crate::error::{AskError, Result};
use crate::llm::{LlmClient, QuerySynthesizer};
use crate::output::Output;
use crate::query;

/// Default number of preview rows shown after loading.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No dataset; the query interface is unavailable.
    NoDatasetLoaded,
    /// Ready to accept a question.
    DatasetReady,
    /// A question is being answered.
    AwaitingQuery,
}

/// One interactive session over a single dataset.
pub struct Session {
    dataset: Option<Dataset>,
    synthesizer: QuerySynthesizer,
    state: SessionState,
    timeout: Duration,
    preview_rows: usize,
}

impl Session {
    /// Creates a session with no dataset loaded.
    pub fn new(client: Box<dyn LlmClient>, timeout: Duration) -> Self {
        Self {
            dataset: None,
            synthesizer: QuerySynthesizer::new(client),
            state: SessionState::NoDatasetLoaded,
            timeout,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }

    /// Sets how many rows the load preview shows.
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Loads a dataset from disk.
    ///
    /// On failure any previous dataset is dropped and the session returns to
    /// [`SessionState::NoDatasetLoaded`].
    pub fn load(&mut self, path: &Path, sheet: Option<&str>) -> Output {
        match dataset::load(path, sheet) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Dataset load failed");
                self.dataset = None;
                self.state = SessionState::NoDatasetLoaded;
                Output::from_error(&AskError::Load(e))
            }
        }
    }

    /// Installs an already-built dataset (e.g. the bundled sample).
    pub fn set_dataset(&mut self, dataset: Dataset) -> Output {
        info!(
            name = dataset.name(),
            rows = dataset.frame().row_count(),
            columns = dataset.frame().column_count(),
            "Dataset loaded"
        );
        let output = Output::loaded(&dataset, self.preview_rows);
        self.dataset = Some(dataset);
        self.state = SessionState::DatasetReady;
        output
    }

    /// Answers one question.
    ///
    /// Blank questions are rejected before any model call. The model call is
    /// bounded by the session timeout and aborted when `cancel` fires. The
    /// session is back in [`SessionState::DatasetReady`] when this returns.
    pub async fn ask(&mut self, question: &str, cancel: CancellationToken) -> Output {
        if question.trim().is_empty() {
            return Output::from_error(&AskError::EmptyInput);
        }
        let Some(dataset) = self.dataset.as_ref() else {
            return Output::error("No dataset is loaded. Load a dataset before asking questions.");
        };

        self.state = SessionState::AwaitingQuery;
        let start = Instant::now();
        let result = run_pipeline(&mut self.synthesizer, dataset, question, self.timeout, cancel).await;
        self.state = SessionState::DatasetReady;

        match result {
            Ok(output) => {
                info!(duration_ms = start.elapsed().as_millis(), "Question answered");
                output
            }
            Err(e) => {
                warn!(category = e.category(), error = %e, "Question failed");
                Output::from_error(&e)
            }
        }
    }
}

async fn run_pipeline(
    synthesizer: &mut QuerySynthesizer,
    dataset: &Dataset,
    question: &str,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<Output> {
    let schema = dataset.schema();
    let synthesis = tokio::time::timeout(timeout, synthesizer.synthesize(question, &schema));

    let expression = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(AskError::Cancelled),
        outcome = synthesis => outcome.map_err(|_| AskError::Timeout(timeout.as_secs()))??,
    };

    let Some(expression) = expression else {
        return Ok(Output::no_expression());
    };
    info!(%expression, "Evaluating generated expression");

    let value = query::evaluate(&expression, dataset)?;
    Ok(Output::classify(value))
}
