// Document store: Postgres-backed persistence for accounts and their
// portfolio documents, plus the bounded-retry read used right after
// registration.

pub mod portfolio;
pub mod retry;

pub use portfolio::{
    create_user_with_document, get_document, get_document_with_retry, get_public_profile,
    get_user, save_document, update_section, NewUser,
};
