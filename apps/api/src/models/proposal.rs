use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A vendor document reduced to extracted values and a fit score. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProposalRow {
    pub id: Uuid,
    pub rfp_id: Uuid,
    pub vendor_id: Option<Uuid>,
    /// First 5000 characters of the document text.
    pub raw_response_text: String,
    /// Extracted values plus `ai_recommendation`, or the extraction-failed sentinel.
    pub extracted_data: Value,
    pub fit_score: i32,
    pub created_at: DateTime<Utc>,
}
