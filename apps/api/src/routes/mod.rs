pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::content::handlers as content;
use crate::email::handlers as email;
use crate::state::AppState;
use crate::uploads::handlers as files;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    // Multipart bodies must fit the biggest allowed upload plus form overhead.
    let upload_limit = state.config.max_resume_bytes + 64 * 1024;

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/v1/users", post(users::handle_register))
        // Public portfolio reads
        .route("/api/v1/portfolio/:user_id", get(users::handle_get_profile))
        .route(
            "/api/v1/portfolio/:user_id/sections/:key",
            get(content::handle_get_section).put(content::handle_put_section),
        )
        .route(
            "/api/v1/portfolio/:user_id/sections/:key/edits",
            post(content::handle_apply_edits),
        )
        .route(
            "/api/v1/portfolio/:user_id/share",
            post(email::handle_share),
        )
        // Files
        .route(
            "/api/v1/files/:user_id",
            post(files::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/files", delete(files::handle_delete))
        // Contact form
        .route("/api/v1/contact", post(email::handle_contact))
        .with_state(state)
}
