use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::content::defaults::default_content;
use crate::content::editor;
use crate::content::path::EditPath;
use crate::content::resolver::{resolve_section, DocumentState, ResolvedSection};
use crate::content::section::SectionKey;
use crate::content::validation::{validate_section, FieldReport};
use crate::errors::AppError;
use crate::state::AppState;
use crate::store;

fn parse_section(raw: &str) -> Result<SectionKey, AppError> {
    raw.parse::<SectionKey>()
        .map_err(|e| AppError::NotFound(e.to_string()))
}

/// GET /api/v1/portfolio/:user_id/sections/:key
///
/// Public read. Never blocks on missing content: an unknown user, an
/// unprovisioned document, or an empty section all resolve to bundled
/// defaults, with `using_fallback` telling the caller which case it got.
/// A store failure degrades to defaults with the error attached.
pub async fn handle_get_section(
    State(state): State<AppState>,
    Path((user_id, key)): Path<(Uuid, String)>,
) -> Result<Json<ResolvedSection>, AppError> {
    let key = parse_section(&key)?;

    let user = match store::get_user(&state.db, user_id).await {
        Ok(user) => user,
        Err(e) => {
            warn!("user lookup failed for {user_id}: {e}");
            return Ok(Json(ResolvedSection {
                section: key,
                data: default_content(key).clone(),
                loading: false,
                error: Some("Failed to load portfolio data".to_string()),
                using_fallback: true,
            }));
        }
    };

    let document = match &user {
        // Ignored by the resolver: no user means defaults regardless.
        None => DocumentState::Loading,
        Some(_) => match store::get_document_with_retry(&state.db, user_id).await {
            Ok(doc) => DocumentState::Loaded(doc),
            Err(e) => {
                warn!("document fetch failed for {user_id}: {e}");
                DocumentState::Failed("Failed to load portfolio data".to_string())
            }
        },
    };

    Ok(Json(resolve_section(key, user.as_ref(), &document)))
}

#[derive(Debug, Serialize)]
pub struct SectionSaveResponse {
    pub section: SectionKey,
    pub data: Value,
    pub validation: Vec<FieldReport>,
    pub updated_at: DateTime<Utc>,
}

/// PUT /api/v1/portfolio/:user_id/sections/:key
///
/// Replaces one section subtree. Validation is advisory: the save goes
/// through regardless and the report rides along in the response.
pub async fn handle_put_section(
    State(state): State<AppState>,
    Path((user_id, key)): Path<(Uuid, String)>,
    Json(body): Json<Value>,
) -> Result<Json<SectionSaveResponse>, AppError> {
    let key = parse_section(&key)?;
    if !body.is_object() {
        return Err(AppError::Validation(
            "section data must be a JSON object".to_string(),
        ));
    }

    let updated = store::update_section(&state.db, user_id, key, &body).await?;
    let validation = validate_section(key, &body);

    Ok(Json(SectionSaveResponse {
        section: key,
        data: body,
        validation,
        updated_at: updated.updated_at,
    }))
}

/// One edit intent against a section tree, addressed by dotted path.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    SetField {
        path: EditPath,
        value: Value,
    },
    SetArrayItem {
        path: EditPath,
        index: usize,
        value: Value,
    },
    AddItem {
        path: EditPath,
        #[serde(default)]
        item: Value,
    },
    RemoveItem {
        path: EditPath,
        index: usize,
    },
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub ops: Vec<EditOp>,
}

fn apply_op(tree: &Value, op: &EditOp) -> Result<Value, AppError> {
    let result = match op {
        EditOp::SetField { path, value } => editor::set_field(tree, path, value.clone()),
        EditOp::SetArrayItem { path, index, value } => {
            editor::set_array_item(tree, path, *index, value.clone())
        }
        EditOp::AddItem { path, item } => editor::add_item(tree, path, item.clone()),
        EditOp::RemoveItem { path, index } => editor::remove_item(tree, path, *index),
    };
    // Bad paths and out-of-range indexes are caller bugs; report, never clamp.
    result.map_err(|e| AppError::Validation(e.to_string()))
}

/// POST /api/v1/portfolio/:user_id/sections/:key/edits
///
/// Applies a batch of edits left-to-right against the stored section and
/// persists the final snapshot. All-or-nothing: a failing op aborts the
/// batch before anything is written.
pub async fn handle_apply_edits(
    State(state): State<AppState>,
    Path((user_id, key)): Path<(Uuid, String)>,
    Json(request): Json<EditRequest>,
) -> Result<Json<SectionSaveResponse>, AppError> {
    let key = parse_section(&key)?;

    let document = store::get_document(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))?;

    let mut tree = document
        .section(key)
        .cloned()
        .unwrap_or(Value::Null);
    for op in &request.ops {
        tree = apply_op(&tree, op)?;
    }

    let updated = store::update_section(&state.db, user_id, key, &tree).await?;
    let validation = validate_section(key, &tree);

    Ok(Json(SectionSaveResponse {
        section: key,
        data: tree,
        validation,
        updated_at: updated.updated_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_edit_op_wire_format() {
        let op: EditOp = serde_json::from_value(json!({
            "op": "set_field",
            "path": "personalInfo.name",
            "value": "Jane"
        }))
        .unwrap();
        assert!(matches!(op, EditOp::SetField { .. }));

        let op: EditOp = serde_json::from_value(json!({
            "op": "remove_item",
            "path": "skills",
            "index": 2
        }))
        .unwrap();
        assert!(matches!(op, EditOp::RemoveItem { index: 2, .. }));
    }

    #[test]
    fn test_add_item_defaults_to_null_item() {
        let op: EditOp =
            serde_json::from_value(json!({"op": "add_item", "path": "skills"})).unwrap();
        match op {
            EditOp::AddItem { item, .. } => assert!(item.is_null()),
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn test_apply_op_sequences_left_to_right() {
        let ops: Vec<EditOp> = serde_json::from_value(json!([
            {"op": "add_item", "path": "skills", "item": "Rust"},
            {"op": "add_item", "path": "skills", "item": "Go"},
            {"op": "set_array_item", "path": "skills", "index": 1, "value": "Zig"},
            {"op": "set_field", "path": "title", "value": "Skills"}
        ]))
        .unwrap();

        let mut tree = json!({});
        for op in &ops {
            tree = apply_op(&tree, op).unwrap();
        }
        assert_eq!(tree, json!({"skills": ["Rust", "Zig"], "title": "Skills"}));
    }

    #[test]
    fn test_apply_op_surfaces_out_of_range_as_validation() {
        let op: EditOp = serde_json::from_value(json!({
            "op": "remove_item", "path": "skills", "index": 9
        }))
        .unwrap();
        let err = apply_op(&json!({"skills": ["Rust"]}), &op).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_parse_section_unknown_is_not_found() {
        assert!(matches!(
            parse_section("blog"),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(parse_section("hero").unwrap(), SectionKey::Hero);
    }
}
