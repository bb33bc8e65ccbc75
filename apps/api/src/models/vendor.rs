use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VendorRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub contact_person: Option<String>,
    pub created_at: DateTime<Utc>,
}
