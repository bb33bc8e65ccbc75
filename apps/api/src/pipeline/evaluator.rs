//! Stage 3 — Fit Evaluator: (original request, ExtractedValues) → FitResult.
//!
//! Accepts the extraction-failed sentinel as ordinary input. Any failure resolves to
//! the lowest score with an explanatory reason, never to an unscored state.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{complete_json, LlmError, TextGenerator};
use crate::pipeline::prompts::{
    BUYER_REQUEST_LABEL, EVALUATION_INSTRUCTION, VENDOR_OFFER_LABEL,
};
use crate::pipeline::values::ExtractedValues;

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;
pub const FALLBACK_REASON: &str = "AI could not evaluate.";

/// Fit score (0–100) and a one-sentence rationale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    pub score: i32,
    pub reason: String,
}

impl FitResult {
    pub fn fallback() -> Self {
        Self {
            score: MIN_SCORE,
            reason: FALLBACK_REASON.to_string(),
        }
    }
}

/// Raw verdict as the model writes it. The score may arrive as a float or out of range.
#[derive(Debug, Deserialize)]
struct Verdict {
    score: Number,
    reason: String,
}

#[derive(Debug, Error)]
enum EvaluationError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("reason is empty")]
    EmptyReason,
    #[error("score {0} is not a finite number")]
    BadScore(Number),
}

/// Scores an extracted offer against the buyer's original request.
pub async fn evaluate_fit(
    llm: &dyn TextGenerator,
    request_text: &str,
    values: &ExtractedValues,
) -> FitResult {
    match try_evaluate(llm, request_text, values).await {
        Ok(result) => {
            info!("Proposal scored {}/100", result.score);
            result
        }
        Err(e) => {
            warn!("Evaluation failed, using fallback score: {e}");
            FitResult::fallback()
        }
    }
}

async fn try_evaluate(
    llm: &dyn TextGenerator,
    request_text: &str,
    values: &ExtractedValues,
) -> Result<FitResult, EvaluationError> {
    let offer_json = serde_json::to_string(values).map_err(LlmError::Parse)?;
    let data = format!(
        "{BUYER_REQUEST_LABEL}\n{request_text}\n\n{VENDOR_OFFER_LABEL}\n{offer_json}"
    );

    let verdict: Verdict = complete_json(
        llm,
        &[EVALUATION_INSTRUCTION, JSON_ONLY_INSTRUCTION, data.as_str()],
    )
    .await?;

    let reason = verdict.reason.trim();
    if reason.is_empty() {
        return Err(EvaluationError::EmptyReason);
    }
    let score = clamp_score(&verdict.score).ok_or(EvaluationError::BadScore(verdict.score))?;

    Ok(FitResult {
        score,
        reason: reason.to_string(),
    })
}

/// Rounds to the nearest integer and clamps into [0, 100], logging any adjustment.
fn clamp_score(raw: &Number) -> Option<i32> {
    let value = raw.as_f64().filter(|v| v.is_finite())?;
    let clamped = value.round().clamp(MIN_SCORE as f64, MAX_SCORE as f64) as i32;
    if clamped as f64 != value {
        warn!("Model score {raw} adjusted to {clamped}");
    }
    Some(clamped)
}
