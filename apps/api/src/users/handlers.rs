use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::content::validation::email_is_valid;
use crate::email::templates;
use crate::errors::AppError;
use crate::models::portfolio::PublicProfile;
use crate::models::user::UserAccount;
use crate::state::AppState;
use crate::store::{self, NewUser};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub phone_number: String,
    /// Optional initial content, e.g. when importing an existing portfolio.
    #[serde(default)]
    pub portfolio_data: Option<Value>,
}

/// POST /api/v1/users
///
/// Creates the account row and its all-empty document, then fires the
/// welcome email without waiting on it — a mail outage never fails
/// registration.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserAccount>), AppError> {
    if !email_is_valid(&request.email) {
        return Err(AppError::Validation(
            "a valid email address is required".to_string(),
        ));
    }
    if request.display_name.trim().is_empty() {
        return Err(AppError::Validation(
            "display name must not be blank".to_string(),
        ));
    }

    let account = store::create_user_with_document(
        &state.db,
        &NewUser {
            email: request.email.clone(),
            display_name: request.display_name.clone(),
            phone_number: request.phone_number.clone(),
        },
    )
    .await?;

    if let Some(initial) = request.portfolio_data {
        store::save_document(&state.db, account.id, initial).await?;
    }

    state.email.send_detached(templates::welcome_email(
        &state.config.public_base_url,
        account.id,
        &account.email,
        &account.display_name,
    ));

    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /api/v1/portfolio/:user_id
///
/// Public projection of a whole portfolio: display name and content,
/// never email or phone.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PublicProfile>, AppError> {
    let profile = store::get_public_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("portfolio for user {user_id} not found")))?;
    Ok(Json(profile))
}
