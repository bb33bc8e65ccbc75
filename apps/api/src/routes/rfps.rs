//! RFP creation (stage 1) and vendor invitations.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::mailer::Mailer;
use crate::models::{RfpRow, RfpStatus};
use crate::pipeline::synthesize_schema;
use crate::routes::vendors::is_valid_email;
use crate::state::AppState;
use crate::store;

#[derive(Debug, Deserialize)]
pub struct CreateRfpRequest {
    pub title: String,
    pub prompt_text: String,
}

#[derive(Debug, Deserialize)]
pub struct SendRfpRequest {
    pub vendor_emails: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SendRfpResponse {
    pub message: String,
}

/// POST /rfps
///
/// Turns a free-text need into a FieldSchema and stores the RFP.
/// Schema synthesis cannot fail; a generic schema is used if the model misbehaves.
pub async fn handle_create_rfp(
    State(state): State<AppState>,
    Json(request): Json<CreateRfpRequest>,
) -> Result<Json<RfpRow>, AppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if request.prompt_text.trim().is_empty() {
        return Err(AppError::Validation("prompt_text cannot be empty".to_string()));
    }

    info!("Creating RFP '{title}'");
    let schema = synthesize_schema(state.llm.as_ref(), &request.prompt_text).await;
    let rfp = store::insert_rfp(&state.db, title, &request.prompt_text, &schema).await?;
    Ok(Json(rfp))
}

/// GET /rfps
pub async fn handle_list_rfps(
    State(state): State<AppState>,
) -> Result<Json<Vec<RfpRow>>, AppError> {
    Ok(Json(store::list_rfps(&state.db).await?))
}

/// GET /rfps/:id
pub async fn handle_get_rfp(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
) -> Result<Json<RfpRow>, AppError> {
    let rfp = store::get_rfp(&state.db, rfp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("RFP not found".to_string()))?;
    Ok(Json(rfp))
}

/// POST /rfps/:id/send
///
/// Emails the invitation to the selected vendors and marks the RFP as Sent.
pub async fn handle_send_rfp(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
    Json(request): Json<SendRfpRequest>,
) -> Result<Json<SendRfpResponse>, AppError> {
    let emails: Vec<String> = request
        .vendor_emails
        .iter()
        .map(|e| e.trim().to_lowercase())
        .collect();
    if emails.is_empty() {
        return Err(AppError::Validation("vendor_emails cannot be empty".to_string()));
    }
    if let Some(bad) = emails.iter().find(|e| !is_valid_email(e)) {
        return Err(AppError::Validation(format!("'{bad}' is not a valid email")));
    }

    let rfp = store::get_rfp(&state.db, rfp_id).await?;
    let (rfp, mailer) = invitation_target(rfp, state.mailer.as_ref())?;

    mailer.send_rfp_invitation(&emails, &rfp.title, rfp.id).await?;
    store::set_rfp_status(&state.db, rfp.id, RfpStatus::Sent).await?;

    Ok(Json(SendRfpResponse {
        message: "Emails sent successfully".to_string(),
    }))
}

/// An unknown RFP is reported before a missing mail configuration.
fn invitation_target(
    rfp: Option<RfpRow>,
    mailer: Option<&Mailer>,
) -> Result<(RfpRow, &Mailer), AppError> {
    let rfp = rfp.ok_or_else(|| AppError::NotFound("RFP not found".to_string()))?;
    let mailer = mailer.ok_or(AppError::MailDisabled)?;
    Ok((rfp, mailer))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sqlx::types::Json;

    use super::*;
    use crate::pipeline::FieldSchema;

    fn rfp() -> RfpRow {
        RfpRow {
            id: Uuid::new_v4(),
            title: "Laptops".to_string(),
            prompt_text: "I need 50 laptops".to_string(),
            status: RfpStatus::Open.as_str().to_string(),
            json_schema: Json(FieldSchema::fallback()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unknown_rfp_is_not_found_even_without_mailer() {
        assert!(matches!(
            invitation_target(None, None),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_known_rfp_without_mailer_is_disabled() {
        assert!(matches!(
            invitation_target(Some(rfp()), None),
            Err(AppError::MailDisabled)
        ));
    }

    #[test]
    fn test_known_rfp_with_mailer() {
        let mailer = Mailer::new("re_test".to_string(), "rfp@procure.example".to_string());
        let (found, _) = invitation_target(Some(rfp()), Some(&mailer)).unwrap();
        assert_eq!(found.title, "Laptops");
    }
}
