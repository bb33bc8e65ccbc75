//! Persistence for vendors, RFPs and proposals.
//!
//! RFP schemas and proposals are insert-only; the only UPDATE is the RFP status transition.

use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{ProposalRow, RfpRow, RfpStatus, VendorRow};
use crate::pipeline::FieldSchema;

/// Postgres SQLSTATE for a UNIQUE constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// True when the statement was rejected by a UNIQUE constraint.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => is_unique_violation_code(db_err.code().as_deref()),
        _ => false,
    }
}

fn is_unique_violation_code(code: Option<&str>) -> bool {
    code == Some(UNIQUE_VIOLATION)
}

pub async fn find_vendor_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<VendorRow>, sqlx::Error> {
    sqlx::query_as::<_, VendorRow>("SELECT * FROM vendors WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn insert_vendor(
    pool: &PgPool,
    name: &str,
    email: &str,
    contact_person: Option<&str>,
) -> Result<VendorRow, sqlx::Error> {
    sqlx::query_as::<_, VendorRow>(
        r#"
        INSERT INTO vendors (id, name, email, contact_person)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(contact_person)
    .fetch_one(pool)
    .await
}

pub async fn list_vendors(pool: &PgPool) -> Result<Vec<VendorRow>, sqlx::Error> {
    sqlx::query_as::<_, VendorRow>("SELECT * FROM vendors ORDER BY created_at")
        .fetch_all(pool)
        .await
}

pub async fn insert_rfp(
    pool: &PgPool,
    title: &str,
    prompt_text: &str,
    schema: &FieldSchema,
) -> Result<RfpRow, sqlx::Error> {
    let row = sqlx::query_as::<_, RfpRow>(
        r#"
        INSERT INTO rfps (id, title, prompt_text, status, json_schema)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(prompt_text)
    .bind(RfpStatus::Open.as_str())
    .bind(Json(schema))
    .fetch_one(pool)
    .await?;

    info!("Created RFP {} with {} schema fields", row.id, schema.fields.len());
    Ok(row)
}

pub async fn list_rfps(pool: &PgPool) -> Result<Vec<RfpRow>, sqlx::Error> {
    sqlx::query_as::<_, RfpRow>("SELECT * FROM rfps ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn get_rfp(pool: &PgPool, rfp_id: Uuid) -> Result<Option<RfpRow>, sqlx::Error> {
    sqlx::query_as::<_, RfpRow>("SELECT * FROM rfps WHERE id = $1")
        .bind(rfp_id)
        .fetch_optional(pool)
        .await
}

pub async fn set_rfp_status(
    pool: &PgPool,
    rfp_id: Uuid,
    status: RfpStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE rfps SET status = $1 WHERE id = $2")
        .bind(status.as_str())
        .bind(rfp_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Parameters for storing an analyzed proposal.
pub struct NewProposal<'a> {
    pub rfp_id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub raw_response_text: &'a str,
    pub extracted_data: &'a Map<String, Value>,
    pub fit_score: i32,
}

pub async fn insert_proposal(
    pool: &PgPool,
    proposal: NewProposal<'_>,
) -> Result<ProposalRow, sqlx::Error> {
    let NewProposal {
        rfp_id,
        vendor_id,
        raw_response_text,
        extracted_data,
        fit_score,
    } = proposal;

    let row = sqlx::query_as::<_, ProposalRow>(
        r#"
        INSERT INTO proposals (id, rfp_id, vendor_id, raw_response_text, extracted_data, fit_score)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(rfp_id)
    .bind(vendor_id)
    .bind(raw_response_text)
    .bind(Json(extracted_data))
    .bind(fit_score)
    .fetch_one(pool)
    .await?;

    info!("Stored proposal {} for RFP {rfp_id} (fit {fit_score})", row.id);
    Ok(row)
}

pub async fn list_proposals(
    pool: &PgPool,
    rfp_id: Uuid,
) -> Result<Vec<ProposalRow>, sqlx::Error> {
    sqlx::query_as::<_, ProposalRow>(
        "SELECT * FROM proposals WHERE rfp_id = $1 ORDER BY fit_score DESC, created_at",
    )
    .bind(rfp_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_code() {
        assert!(is_unique_violation_code(Some("23505")));
        assert!(!is_unique_violation_code(Some("23503")));
        assert!(!is_unique_violation_code(None));
    }

    #[test]
    fn test_non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }
}
