//! Vendor registry.

use axum::{extract::State, Json};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::VendorRow;
use crate::state::AppState;
use crate::store;

const DUPLICATE_EMAIL: &str = "Email already registered";

#[derive(Debug, Deserialize)]
pub struct CreateVendorRequest {
    pub name: String,
    pub email: String,
    pub contact_person: Option<String>,
}

/// POST /vendors
///
/// Registers a vendor. Emails are unique.
pub async fn handle_create_vendor(
    State(state): State<AppState>,
    Json(request): Json<CreateVendorRequest>,
) -> Result<Json<VendorRow>, AppError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    let email = request.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::Validation(format!("'{}' is not a valid email", request.email)));
    }

    if store::find_vendor_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Validation(DUPLICATE_EMAIL.to_string()));
    }

    let contact_person = request
        .contact_person
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    // A concurrent registration can still win the race; the UNIQUE constraint decides.
    let vendor = store::insert_vendor(&state.db, name, &email, contact_person)
        .await
        .map_err(|e| {
            if store::is_unique_violation(&e) {
                AppError::Validation(DUPLICATE_EMAIL.to_string())
            } else {
                AppError::Database(e)
            }
        })?;
    Ok(Json(vendor))
}

/// GET /vendors
pub async fn handle_list_vendors(
    State(state): State<AppState>,
) -> Result<Json<Vec<VendorRow>>, AppError> {
    Ok(Json(store::list_vendors(&state.db).await?))
}

/// RFC 5322 address whose domain is a dotted hostname (letters, digits, inner hyphens).
pub(crate) fn is_valid_email(email: &str) -> bool {
    if !EmailAddress::is_valid(email) {
        return false;
    }
    match email.rsplit_once('@') {
        Some((_, domain)) => is_hostname(domain),
        None => false,
    }
}

fn is_hostname(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() > 1
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
