//! Stage 1 — Schema Synthesizer: free-text procurement need → FieldSchema.
//!
//! The returned schema becomes the frozen extraction contract for the RFP, so this
//! stage never fails: any provider or shape problem yields [`FieldSchema::fallback`].

use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{complete_json, LlmError, TextGenerator};
use crate::pipeline::prompts::{SCHEMA_SYNTHESIS_INSTRUCTION, USER_REQUEST_LABEL};
use crate::pipeline::schema::{FieldSchema, SchemaError};

#[derive(Debug, Error)]
enum SynthesisError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Generates the extraction schema for a procurement request.
pub async fn synthesize_schema(llm: &dyn TextGenerator, need: &str) -> FieldSchema {
    match try_synthesize(llm, need).await {
        Ok(schema) => {
            info!("Synthesized schema with {} fields", schema.fields.len());
            schema
        }
        Err(e) => {
            warn!("Schema synthesis failed, using fallback schema: {e}");
            FieldSchema::fallback()
        }
    }
}

async fn try_synthesize(
    llm: &dyn TextGenerator,
    need: &str,
) -> Result<FieldSchema, SynthesisError> {
    let data = format!("{USER_REQUEST_LABEL} {need}");
    let schema: FieldSchema = complete_json(
        llm,
        &[SCHEMA_SYNTHESIS_INSTRUCTION, JSON_ONLY_INSTRUCTION, data.as_str()],
    )
    .await?;
    schema.check()?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::MockLlm;
    use crate::pipeline::schema::FieldType;
    use serde_json::json;

    #[tokio::test]
    async fn test_parses_model_schema() {
        let llm = MockLlm::new().with_json_response(&json!({
            "fields": [
                {"key": "ram", "type": "number", "description": "RAM in GB"},
                {"key": "total_price", "type": "number", "description": "Total cost in USD"}
            ]
        }));

        let schema = synthesize_schema(&llm, "I need 50 laptops with 16GB RAM").await;

        assert_eq!(schema.fields.len(), 2);
        assert_eq!(schema.field("ram").unwrap().field_type, FieldType::Number);
        assert!(llm.last_prompt().unwrap().contains("USER REQUEST: I need 50 laptops"));
        assert!(llm.all_expected_json());
    }

    #[tokio::test]
    async fn test_tolerates_fenced_response() {
        let llm = MockLlm::new().with_response(
            "```json\n{\"fields\": [{\"key\": \"warranty\", \"type\": \"string\", \"description\": \"Years\"}]}\n```",
        );
        let schema = synthesize_schema(&llm, "chairs").await;
        assert_eq!(schema.fields[0].key, "warranty");
    }

    #[tokio::test]
    async fn test_provider_failure_returns_fallback() {
        let llm = MockLlm::new().with_failure(503);
        let schema = synthesize_schema(&llm, "I need 50 laptops").await;
        assert_eq!(schema, FieldSchema::fallback());
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_fallback() {
        let llm = MockLlm::new().with_response("Sure! Here are the fields: price, RAM");
        assert_eq!(synthesize_schema(&llm, "x").await, FieldSchema::fallback());
    }

    #[tokio::test]
    async fn test_wrong_shape_returns_fallback() {
        let llm = MockLlm::new().with_json_response(&json!({"columns": ["price"]}));
        assert_eq!(synthesize_schema(&llm, "x").await, FieldSchema::fallback());
    }

    #[tokio::test]
    async fn test_empty_or_duplicate_fields_return_fallback() {
        let llm = MockLlm::new()
            .with_json_response(&json!({"fields": []}))
            .with_json_response(&json!({"fields": [
                {"key": "price", "type": "number", "description": "a"},
                {"key": "price", "type": "number", "description": "b"}
            ]}));
        assert_eq!(synthesize_schema(&llm, "").await, FieldSchema::fallback());
        assert_eq!(synthesize_schema(&llm, "").await, FieldSchema::fallback());
    }
}
