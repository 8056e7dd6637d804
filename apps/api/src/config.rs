use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Panics at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub email_endpoint: String,
    pub email_service_id: String,
    pub email_template_id: String,
    pub email_public_key: String,
    /// Where contact-form submissions are delivered.
    pub contact_email: String,
    /// Base URL of the public site, used for portfolio links in email.
    pub public_base_url: String,
    pub port: u16,
    pub rust_log: String,
    pub max_profile_image_bytes: usize,
    pub max_resume_bytes: usize,
    pub profile_image_extensions: Vec<String>,
    pub resume_extensions: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            email_endpoint: env_or("EMAIL_ENDPOINT", "https://api.emailjs.com"),
            email_service_id: require_env("EMAIL_SERVICE_ID")?,
            email_template_id: require_env("EMAIL_TEMPLATE_ID")?,
            email_public_key: require_env("EMAIL_PUBLIC_KEY")?,
            contact_email: require_env("CONTACT_EMAIL")?,
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:3000"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            max_profile_image_bytes: env_or("MAX_PROFILE_IMAGE_BYTES", "5242880")
                .parse::<usize>()
                .context("MAX_PROFILE_IMAGE_BYTES must be a byte count")?,
            max_resume_bytes: env_or("MAX_RESUME_BYTES", "10485760")
                .parse::<usize>()
                .context("MAX_RESUME_BYTES must be a byte count")?,
            profile_image_extensions: env_list(
                "PROFILE_IMAGE_EXTENSIONS",
                "jpg,jpeg,png,gif,webp",
            ),
            resume_extensions: env_list("RESUME_EXTENSIONS", "pdf,doc,docx"),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/folio_test".into(),
            s3_bucket: "folio-test".into(),
            s3_endpoint: "http://localhost:9000".into(),
            aws_access_key_id: "test".into(),
            aws_secret_access_key: "test".into(),
            email_endpoint: "https://api.emailjs.com".into(),
            email_service_id: "service_test".into(),
            email_template_id: "template_test".into(),
            email_public_key: "pk_test".into(),
            contact_email: "owner@example.com".into(),
            public_base_url: "http://localhost:3000".into(),
            port: 8080,
            rust_log: "info".into(),
            max_profile_image_bytes: 5 * 1024 * 1024,
            max_resume_bytes: 10 * 1024 * 1024,
            profile_image_extensions: ["jpg", "jpeg", "png", "gif", "webp"]
                .map(String::from)
                .to_vec(),
            resume_extensions: ["pdf", "doc", "docx"].map(String::from).to_vec(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_list(key: &str, default: &str) -> Vec<String> {
    env_or(key, default)
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
