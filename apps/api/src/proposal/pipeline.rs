//! Proposal Pipeline: the single configurable entry point.
//!
//! Flow: transcript → prompt → model (one attempt, bounded) → extract →
//!       complete → record. Any failure after input validation degrades to
//!       the fallback record, except a rejected API key.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::layout::{Assembler, Document};
use crate::llm_client::{LlmError, ModelParams, TextModel};
use crate::proposal::completer::{Completer, DefaultsError, MinCardinalities};
use crate::proposal::defaults::DefaultTables;
use crate::proposal::extractor::extract_object;
use crate::proposal::fallback::fallback_record;
use crate::proposal::prompts::build_analysis_prompt;
use crate::proposal::record::ProposalRecord;

/// Prompt, model parameters and list minimums used by every entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub prompt_template: String,
    pub model_params: ModelParams,
    pub min_cardinalities: MinCardinalities,
}

/// Where the returned record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub record: ProposalRecord,
    pub source: RecordSource,
}

/// Failures that reach the caller. Everything else is absorbed by the fallback.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("transcript is missing")]
    InputMissing,

    #[error("upstream model misconfigured: {0}")]
    Upstream(#[source] LlmError),
}

pub struct ProposalPipeline {
    config: PipelineConfig,
    model: Arc<dyn TextModel>,
    completer: Completer,
    assembler: Assembler,
}

impl ProposalPipeline {
    /// Fails only if the default pools cannot satisfy the configured minimums.
    pub fn new(
        config: PipelineConfig,
        model: Arc<dyn TextModel>,
        tables: Arc<DefaultTables>,
        assembler: Assembler,
    ) -> Result<Self, DefaultsError> {
        let completer = Completer::new(tables, config.min_cardinalities)?;
        Ok(Self {
            config,
            model,
            completer,
            assembler,
        })
    }

    /// Turns a transcript into a complete record.
    ///
    /// Steps:
    /// 1. Reject an empty transcript before any upstream call
    /// 2. Call the model once, bounded by `model_params.timeout`
    /// 3. Extract the JSON object from the reply
    /// 4. Complete it against the default tables
    ///
    /// Steps 2–3 fall through to `fallback_record` on failure.
    pub async fn analyze(&self, transcript: &str) -> Result<Analysis, PipelineError> {
        if transcript.is_empty() {
            return Err(PipelineError::InputMissing);
        }

        let prompt = build_analysis_prompt(&self.config.prompt_template, transcript);
        let params = &self.config.model_params;

        let reply = tokio::time::timeout(params.timeout, self.model.generate(&prompt, params))
            .await
            .unwrap_or_else(|_| Err(LlmError::Timeout(params.timeout)));

        let text = match reply {
            Ok(text) => text,
            Err(e) if e.is_credential_error() => {
                error!("Model call rejected credentials: {e}");
                return Err(PipelineError::Upstream(e));
            }
            Err(e) => {
                warn!("Model call failed ({e}); using fallback proposal");
                return Ok(self.fallback(transcript));
            }
        };

        match extract_object(&text) {
            Ok(candidate) => {
                let record = self.completer.complete(Some(&candidate));
                info!(
                    "Proposal extracted for {}: {} problems, {} solutions",
                    record.company_info.name,
                    record.problems.len(),
                    record.solutions.len()
                );
                Ok(Analysis {
                    record,
                    source: RecordSource::Model,
                })
            }
            Err(e) => {
                warn!("Extraction failed ({e}); using fallback proposal");
                Ok(self.fallback(transcript))
            }
        }
    }

    /// Completes a caller-supplied candidate record.
    pub fn complete(&self, candidate: &Value) -> ProposalRecord {
        self.completer.complete(Some(candidate))
    }

    pub fn assemble(&self, record: &ProposalRecord, issued_on: NaiveDate) -> Document {
        self.assembler.assemble(record, issued_on)
    }

    fn fallback(&self, transcript: &str) -> Analysis {
        Analysis {
            record: fallback_record(transcript, self.completer.tables()),
            source: RecordSource::Fallback,
        }
    }
}
