//! Blob storage for user files: avatar images and resumes.
//!
//! Size and extension constraints come from config and are enforced before
//! any bytes leave the process. Keys are namespaced per user so delete
//! access can be scoped later without re-keying.

use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;

pub mod handlers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadKind {
    ProfileImage,
    Resume,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadKind::ProfileImage => "profileImage",
            UploadKind::Resume => "resume",
        }
    }
}

impl FromStr for UploadKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profileImage" => Ok(UploadKind::ProfileImage),
            "resume" => Ok(UploadKind::Resume),
            other => Err(AppError::Validation(format!(
                "unknown upload kind '{other}' (expected 'profileImage' or 'resume')"
            ))),
        }
    }
}

/// What callers get back after a successful upload, and what they stash in
/// the hero section's `files` subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    pub url: String,
    /// The object key, kept so the file can be deleted later.
    pub path: String,
    pub name: String,
    pub size: usize,
}

/// Validates name and size against the configured policy for `kind` and
/// returns the lowercased extension.
pub fn check_constraints(
    kind: UploadKind,
    file_name: &str,
    size: usize,
    config: &Config,
) -> Result<String, AppError> {
    let (max_bytes, allowed) = match kind {
        UploadKind::ProfileImage => (
            config.max_profile_image_bytes,
            config.profile_image_extensions.as_slice(),
        ),
        UploadKind::Resume => (config.max_resume_bytes, config.resume_extensions.as_slice()),
    };

    if size > max_bytes {
        return Err(AppError::Validation(format!(
            "file is too large ({size} bytes, max {max_bytes})"
        )));
    }

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| {
            AppError::Validation(format!("file name '{file_name}' has no extension"))
        })?;

    if !allowed.iter().any(|a| a == &extension) {
        return Err(AppError::Validation(format!(
            "extension '.{extension}' is not allowed for {} (allowed: {})",
            kind.as_str(),
            allowed.join(", ")
        )));
    }

    Ok(extension)
}

pub async fn upload(
    s3: &aws_sdk_s3::Client,
    config: &Config,
    user_id: Uuid,
    kind: UploadKind,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<StoredFile, AppError> {
    let size = bytes.len();
    let extension = check_constraints(kind, file_name, size, config)?;

    let key = object_key(user_id, kind, &extension, Utc::now().timestamp_millis());
    s3.put_object()
        .bucket(&config.s3_bucket)
        .key(&key)
        .body(ByteStream::from(bytes))
        .content_type(content_type_for(&extension))
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("upload failed: {e}")))?;

    info!("uploaded {} for user {user_id} to {key}", kind.as_str());

    Ok(StoredFile {
        url: public_url(config, &key),
        path: key,
        name: file_name.to_string(),
        size,
    })
}

pub async fn delete(
    s3: &aws_sdk_s3::Client,
    config: &Config,
    key: &str,
) -> Result<(), AppError> {
    s3.delete_object()
        .bucket(&config.s3_bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("delete failed: {e}")))?;
    info!("deleted object {key}");
    Ok(())
}

fn object_key(user_id: Uuid, kind: UploadKind, extension: &str, millis: i64) -> String {
    format!(
        "users/{user_id}/{kind}/{kind}_{millis}.{extension}",
        kind = kind.as_str()
    )
}

// Path-style URL; works for MinIO locally and any S3-compatible endpoint.
fn public_url(config: &Config, key: &str) -> String {
    format!(
        "{}/{}/{key}",
        config.s3_endpoint.trim_end_matches('/'),
        config.s3_bucket
    )
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}
