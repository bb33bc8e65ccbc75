//! Stage 2 — Guided Extractor: (document text, FieldSchema) → ExtractedValues.
//!
//! Short or empty documents are not special-cased; the model signals absence with
//! nulls. Any provider, parse or schema failure yields `ExtractedValues::Failed`.

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{complete_json, LlmError, TextGenerator};
use crate::pipeline::prompts::{EXTRACTION_INSTRUCTION_TEMPLATE, SOURCE_TEXT_LABEL};
use crate::pipeline::schema::{FieldSchema, SchemaError};
use crate::pipeline::values::{ExtractedValues, FieldValue};

#[derive(Debug, Error)]
enum ExtractionError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("model returned a JSON {0}, expected an object")]
    NotAnObject(&'static str),
    #[error("extracted values violate the schema: {0}")]
    Violation(#[from] SchemaError),
}

/// Extracts the schema's fields from a vendor document.
pub async fn extract_values(
    llm: &dyn TextGenerator,
    document_text: &str,
    schema: &FieldSchema,
) -> ExtractedValues {
    match try_extract(llm, document_text, schema).await {
        Ok(values) => values,
        Err(e) => {
            warn!("Extraction failed, returning error sentinel: {e}");
            ExtractedValues::Failed
        }
    }
}

async fn try_extract(
    llm: &dyn TextGenerator,
    document_text: &str,
    schema: &FieldSchema,
) -> Result<ExtractedValues, ExtractionError> {
    let schema_json = serde_json::to_string(schema).map_err(LlmError::Parse)?;
    let instruction = EXTRACTION_INSTRUCTION_TEMPLATE.replace("{schema_json}", &schema_json);
    let data = format!("{SOURCE_TEXT_LABEL}\n{document_text}");

    let raw: Value = complete_json(
        llm,
        &[instruction.as_str(), JSON_ONLY_INSTRUCTION, data.as_str()],
    )
    .await?;

    let object = match raw {
        Value::Object(map) => map,
        Value::Array(_) => return Err(ExtractionError::NotAnObject("array")),
        _ => return Err(ExtractionError::NotAnObject("scalar")),
    };

    let values = schema.conform(object)?;
    let found = values.values().filter(|v| **v != FieldValue::Null).count();
    info!("Extracted {found} of {} schema fields", schema.fields.len());
    Ok(ExtractedValues::Values(values))
}
