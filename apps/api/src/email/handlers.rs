use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::content::validation::email_is_valid;
use crate::email::templates;
use crate::errors::AppError;
use crate::state::AppState;
use crate::store;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
}

/// POST /api/v1/contact
///
/// Relays a contact-form submission to the site owner. Fire and forget:
/// once the payload validates the caller gets 202, whatever the mail
/// provider does later.
pub async fn handle_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if request.name.trim().is_empty() || request.message.trim().is_empty() {
        return Err(AppError::Validation(
            "name and message are required".to_string(),
        ));
    }
    if !email_is_valid(&request.email) {
        return Err(AppError::Validation(
            "a valid sender email is required".to_string(),
        ));
    }

    state.email.send_detached(templates::contact_email(
        &state.config.contact_email,
        &request.name,
        &request.email,
        &request.subject,
        &request.message,
    ));

    Ok((StatusCode::ACCEPTED, Json(json!({"success": true}))))
}

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub recipient_email: String,
    #[serde(default)]
    pub recipient_name: String,
}

/// POST /api/v1/portfolio/:user_id/share
///
/// Emails a portfolio link on the owner's behalf.
pub async fn handle_share(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<ShareRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if !email_is_valid(&request.recipient_email) {
        return Err(AppError::Validation(
            "a valid recipient email is required".to_string(),
        ));
    }

    let account = store::get_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))?;

    state.email.send_detached(templates::share_email(
        &state.config.public_base_url,
        &account.display_name,
        &request.recipient_email,
        &request.recipient_name,
        account.id,
    ));

    Ok((StatusCode::ACCEPTED, Json(json!({"success": true}))))
}
