use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::uploads::{self, StoredFile, UploadKind};

/// POST /api/v1/files/:user_id
///
/// Multipart form with a `kind` text part (`profileImage` or `resume`) and
/// a `file` part. Constraints are checked before any bytes go to storage.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<StoredFile>, AppError> {
    let mut kind: Option<UploadKind> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("kind") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable kind field: {e}")))?;
                kind = Some(raw.parse()?);
            }
            Some("file") => {
                let name = field
                    .file_name()
                    .ok_or_else(|| {
                        AppError::Validation("file part must carry a filename".to_string())
                    })?
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable file part: {e}")))?;
                file = Some((name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let kind = kind.ok_or_else(|| AppError::Validation("missing 'kind' part".to_string()))?;
    let (name, bytes) =
        file.ok_or_else(|| AppError::Validation("missing 'file' part".to_string()))?;

    let stored = uploads::upload(&state.s3, &state.config, user_id, kind, &name, bytes).await?;
    Ok(Json(stored))
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub path: String,
}

/// DELETE /api/v1/files
pub async fn handle_delete(
    State(state): State<AppState>,
    Json(request): Json<DeleteRequest>,
) -> Result<StatusCode, AppError> {
    // Only keys under the per-user namespace are deletable through the API.
    if !request.path.starts_with("users/") {
        return Err(AppError::Validation(format!(
            "'{}' is not a user file key",
            request.path
        )));
    }
    uploads::delete(&state.s3, &state.config, &request.path).await?;
    Ok(StatusCode::NO_CONTENT)
}
