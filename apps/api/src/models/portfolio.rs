use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::content::section::SectionKey;

/// One user's full portfolio content: a JSON object carrying all seven
/// section keys. The keys are always present; an empty object under a key
/// means "not customized yet", which the resolver turns into default content.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortfolioDocument {
    pub user_id: Uuid,
    pub portfolio_data: Value,
    pub updated_at: DateTime<Utc>,
}

impl PortfolioDocument {
    /// The shape every document starts with at registration: all seven keys,
    /// all empty. Also what the store synthesizes when a fresh account's
    /// document has not landed yet.
    pub fn empty(user_id: Uuid) -> Self {
        PortfolioDocument {
            user_id,
            portfolio_data: empty_portfolio_data(),
            updated_at: Utc::now(),
        }
    }

    pub fn section(&self, key: SectionKey) -> Option<&Value> {
        self.portfolio_data.get(key.as_str())
    }
}

pub fn empty_portfolio_data() -> Value {
    json!({
        "about": {},
        "contact": {},
        "experience": {},
        "header": {},
        "hero": {},
        "projects": {},
        "skills": {}
    })
}

/// Public projection of an account and its content, safe to serve to any
/// visitor. Never carries email or phone number.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PublicProfile {
    pub user_id: Uuid,
    pub display_name: String,
    pub portfolio_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_carries_all_seven_keys() {
        let doc = PortfolioDocument::empty(Uuid::new_v4());
        for key in SectionKey::ALL {
            let section = doc.section(key).expect("key present");
            assert!(section.as_object().unwrap().is_empty());
        }
        assert_eq!(doc.portfolio_data.as_object().unwrap().len(), 7);
    }
}
