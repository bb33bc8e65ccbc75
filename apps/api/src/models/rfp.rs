use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::pipeline::FieldSchema;

/// Lifecycle of a procurement request. Stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RfpStatus {
    Open,
    Sent,
}

impl RfpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RfpStatus::Open => "Open",
            RfpStatus::Sent => "Sent",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RfpRow {
    pub id: Uuid,
    pub title: String,
    pub prompt_text: String,
    pub status: String,
    /// Generated once at creation; the extraction contract for every proposal.
    pub json_schema: Json<FieldSchema>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rfp_row_serializes_schema_inline() {
        let row = RfpRow {
            id: Uuid::nil(),
            title: "Laptops".to_string(),
            prompt_text: "I need 50 laptops".to_string(),
            status: RfpStatus::Open.as_str().to_string(),
            json_schema: Json(FieldSchema::fallback()),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["status"], "Open");
        assert_eq!(value["json_schema"]["fields"][0], json!({
            "key": "price", "type": "number", "description": "Total Price"
        }));
    }
}
