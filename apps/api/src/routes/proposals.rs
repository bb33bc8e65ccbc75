//! Proposal upload: PDF → text → extraction + evaluation → stored proposal.

use anyhow::anyhow;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::{extract_document_text, truncate_for_storage};
use crate::models::ProposalRow;
use crate::pipeline::analyze_proposal;
use crate::state::AppState;
use crate::store::{self, NewProposal};

/// Multipart field carrying the vendor document.
const FILE_FIELD: &str = "file";

/// POST /rfps/:id/proposals
///
/// Ingests the uploaded PDF, runs extraction and fit evaluation against the RFP's
/// schema, and stores the result. Only an unreadable document rejects the upload.
pub async fn handle_upload_proposal(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ProposalRow>, AppError> {
    let rfp = store::get_rfp(&state.db, rfp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("RFP not found".to_string()))?;

    let data = read_file_field(multipart).await?;
    info!("Received {} byte document for RFP {rfp_id}", data.len());

    let document_text = tokio::task::spawn_blocking(move || extract_document_text(&data))
        .await
        .map_err(|e| AppError::Internal(anyhow!("PDF extraction task failed: {e}")))??;

    let analysis = analyze_proposal(
        state.llm.as_ref(),
        &rfp.prompt_text,
        &rfp.json_schema,
        &document_text,
    )
    .await;

    let stored_text = truncate_for_storage(&document_text);
    let proposal = store::insert_proposal(
        &state.db,
        NewProposal {
            rfp_id,
            vendor_id: None,
            raw_response_text: &stored_text,
            extracted_data: &analysis.extracted_data,
            fit_score: analysis.fit_score,
        },
    )
    .await?;

    Ok(Json(proposal))
}

/// GET /rfps/:id/proposals
pub async fn handle_list_proposals(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
) -> Result<Json<Vec<ProposalRow>>, AppError> {
    if store::get_rfp(&state.db, rfp_id).await?.is_none() {
        return Err(AppError::NotFound("RFP not found".to_string()));
    }
    Ok(Json(store::list_proposals(&state.db, rfp_id).await?))
}

async fn read_file_field(mut multipart: Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() == Some(FILE_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")));
        }
    }
    Err(AppError::Validation(format!(
        "multipart field '{FILE_FIELD}' is required"
    )))
}
