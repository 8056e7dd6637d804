//! Document store operations. One row per user in `users`; the portfolio
//! document lives in the `portfolio_data` JSONB column and the row is the
//! unit of atomicity. Concurrent saves resolve last-write-wins.

use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::content::section::SectionKey;
use crate::errors::AppError;
use crate::models::portfolio::{empty_portfolio_data, PortfolioDocument, PublicProfile};
use crate::models::user::UserAccount;
use crate::store::retry::retry_until_found;

pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub phone_number: String,
}

/// Creates the account row together with its all-empty portfolio document.
/// Every document starts with all seven section keys present.
pub async fn create_user_with_document(
    pool: &PgPool,
    new_user: &NewUser,
) -> Result<UserAccount, AppError> {
    let account: Result<UserAccount, sqlx::Error> = sqlx::query_as(
        r#"
        INSERT INTO users (email, display_name, phone_number, portfolio_data)
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, display_name, phone_number, created_at, updated_at
        "#,
    )
    .bind(&new_user.email)
    .bind(&new_user.display_name)
    .bind(&new_user.phone_number)
    .bind(empty_portfolio_data())
    .fetch_one(pool)
    .await;

    match account {
        Ok(account) => {
            info!("created user {} ({})", account.id, account.email);
            Ok(account)
        }
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
            "a user with email '{}' already exists",
            new_user.email
        ))),
        Err(e) => Err(e.into()),
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|d| d.is_unique_violation())
        .unwrap_or(false)
}

pub async fn get_user(pool: &PgPool, user_id: Uuid) -> Result<Option<UserAccount>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, email, display_name, phone_number, created_at, updated_at
         FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_document(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<PortfolioDocument>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id AS user_id, portfolio_data, updated_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Fetches a user's document, tolerating the eventual-consistency window
/// right after registration: two bounded retries, then a synthesized
/// all-empty document (in memory only, never persisted).
pub async fn get_document_with_retry(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<PortfolioDocument, sqlx::Error> {
    let found = retry_until_found(|| get_document(pool, user_id)).await?;
    Ok(found.unwrap_or_else(|| {
        warn!("document for user {user_id} still missing after retries, synthesizing empty");
        PortfolioDocument::empty(user_id)
    }))
}

/// Replaces the whole document. The payload must be an object whose keys are
/// section keys; any of the seven that are absent are filled in as `{}` so
/// the all-keys-present invariant survives partial payloads.
pub async fn save_document(
    pool: &PgPool,
    user_id: Uuid,
    portfolio_data: Value,
) -> Result<PortfolioDocument, AppError> {
    let normalized = normalize_document(portfolio_data)?;
    let updated: Option<PortfolioDocument> = sqlx::query_as(
        r#"
        UPDATE users
        SET portfolio_data = $2, updated_at = now()
        WHERE id = $1
        RETURNING id AS user_id, portfolio_data, updated_at
        "#,
    )
    .bind(user_id)
    .bind(normalized)
    .fetch_optional(pool)
    .await?;

    updated.ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))
}

/// Writes one section subtree in place. A single statement, so the document
/// row never holds a partially applied update.
pub async fn update_section(
    pool: &PgPool,
    user_id: Uuid,
    key: SectionKey,
    section_data: &Value,
) -> Result<PortfolioDocument, AppError> {
    let updated: Option<PortfolioDocument> = sqlx::query_as(
        r#"
        UPDATE users
        SET portfolio_data = jsonb_set(portfolio_data, ARRAY[$2], $3, true),
            updated_at = now()
        WHERE id = $1
        RETURNING id AS user_id, portfolio_data, updated_at
        "#,
    )
    .bind(user_id)
    .bind(key.as_str())
    .bind(section_data)
    .fetch_optional(pool)
    .await?;

    let updated = updated.ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))?;
    info!("updated section '{key}' for user {user_id}");
    Ok(updated)
}

pub async fn get_public_profile(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<PublicProfile>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id AS user_id, display_name, portfolio_data, created_at, updated_at
         FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

fn normalize_document(portfolio_data: Value) -> Result<Value, AppError> {
    let Value::Object(mut map) = portfolio_data else {
        return Err(AppError::Validation(
            "portfolio data must be a JSON object".to_string(),
        ));
    };
    if let Some(unknown) = map.keys().find(|k| k.parse::<SectionKey>().is_err()) {
        return Err(AppError::Validation(format!(
            "unknown section key '{unknown}'"
        )));
    }
    for key in SectionKey::ALL {
        map.entry(key.as_str().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    Ok(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_fills_missing_sections() {
        let normalized = normalize_document(json!({"hero": {"x": 1}})).unwrap();
        let map = normalized.as_object().unwrap();
        assert_eq!(map.len(), 7);
        assert_eq!(map["hero"], json!({"x": 1}));
        assert_eq!(map["skills"], json!({}));
    }

    #[test]
    fn test_normalize_rejects_non_objects() {
        assert!(normalize_document(json!([1, 2])).is_err());
        assert!(normalize_document(json!("nope")).is_err());
    }

    #[test]
    fn test_normalize_rejects_unknown_keys() {
        let err = normalize_document(json!({"blog": {}})).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
