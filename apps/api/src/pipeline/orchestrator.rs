//! Proposal analysis — runs stage 2 then stage 3 for one uploaded document.
//!
//! Flow: extract_values → evaluate_fit → merge_evaluation.
//!
//! The stages are strictly sequential: the evaluator consumes the extractor's output,
//! including the `Failed` sentinel. Nothing here returns an error.

use serde_json::{Map, Value};
use tracing::info;

use crate::llm_client::TextGenerator;
use crate::pipeline::evaluator::{evaluate_fit, FitResult};
use crate::pipeline::extractor::extract_values;
use crate::pipeline::schema::FieldSchema;
use crate::pipeline::values::{ExtractedValues, RECOMMENDATION_KEY};

/// Merged output handed to persistence: values with the rationale folded in, plus the score.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalAnalysis {
    pub extracted_data: Map<String, Value>,
    pub fit_score: i32,
}

/// Analyzes one vendor document against its RFP.
pub async fn analyze_proposal(
    llm: &dyn TextGenerator,
    rfp_prompt: &str,
    schema: &FieldSchema,
    document_text: &str,
) -> ProposalAnalysis {
    info!(
        "Analyzing proposal: {} chars of text, {} schema fields",
        document_text.chars().count(),
        schema.fields.len()
    );

    let values = extract_values(llm, document_text, schema).await;
    if values.is_failed() {
        info!("Extraction failed; evaluating the error sentinel");
    }
    let fit = evaluate_fit(llm, rfp_prompt, &values).await;

    merge_evaluation(values, fit)
}

/// Folds the evaluator's reason into the values under `ai_recommendation` and carries
/// the score alongside.
pub fn merge_evaluation(values: ExtractedValues, fit: FitResult) -> ProposalAnalysis {
    let mut extracted_data = values.to_json_map();
    extracted_data.insert(RECOMMENDATION_KEY.to_string(), Value::String(fit.reason));
    ProposalAnalysis {
        extracted_data,
        fit_score: fit.score,
    }
}
