//! Section data resolver — decides, per section, whether a page shows the
//! owner's saved content or the bundled defaults.
//!
//! Pure over its inputs: the caller supplies whatever auth/document state it
//! has and gets back data plus status flags. All fetching (and the bounded
//! retry around the first post-registration fetch) lives in the store layer.

use serde::Serialize;
use serde_json::Value;

use crate::content::defaults::default_content;
use crate::content::section::SectionKey;
use crate::models::portfolio::PortfolioDocument;
use crate::models::user::UserAccount;

/// Where the owner's document currently stands, from the caller's view.
#[derive(Debug, Clone)]
pub enum DocumentState {
    /// The fetch has not completed yet.
    Loading,
    Loaded(PortfolioDocument),
    /// The fetch failed; the message is passed through to the output.
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSection {
    pub section: SectionKey,
    pub data: Value,
    pub loading: bool,
    pub error: Option<String>,
    /// True when `data` is bundled default content rather than anything the
    /// owner authored. The UI uses this to prompt for customization.
    pub using_fallback: bool,
}

/// The exact emptiness predicate the fallback decision uses: only absence,
/// null, or a literal `{}` counts as empty. A non-empty array, a scalar,
/// even an empty array are all user data — the check is shallow on purpose.
pub fn section_is_empty(section: Option<&Value>) -> bool {
    match section {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

pub fn resolve_section(
    key: SectionKey,
    user: Option<&UserAccount>,
    document: &DocumentState,
) -> ResolvedSection {
    let fallback = |loading: bool, error: Option<String>| ResolvedSection {
        section: key,
        data: default_content(key).clone(),
        loading,
        error,
        using_fallback: true,
    };

    let Some(_user) = user else {
        return fallback(false, None);
    };

    match document {
        DocumentState::Loading => fallback(true, None),
        DocumentState::Failed(message) => fallback(false, Some(message.clone())),
        DocumentState::Loaded(doc) => {
            let section = doc.section(key);
            if section_is_empty(section) {
                fallback(false, None)
            } else {
                ResolvedSection {
                    section: key,
                    data: section.cloned().unwrap_or(Value::Null),
                    loading: false,
                    error: None,
                    using_fallback: false,
                }
            }
        }
    }
}
