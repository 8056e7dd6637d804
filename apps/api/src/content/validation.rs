//! Field-level validation for section content.
//!
//! Validation is advisory: it never blocks a save. Rules are keyed by the
//! field's dotted name, all failing rules are reported, and an empty message
//! list is the only "valid" signal — there is no pass/fail boolean.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::content::path::EditPath;
use crate::content::section::SectionKey;

pub const MAX_FIELD_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMessage {
    pub code: &'static str,
    pub message: String,
}

impl ValidationMessage {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        ValidationMessage {
            code,
            message: message.into(),
        }
    }
}

/// One field's validation report inside a whole-section sweep.
#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    pub path: String,
    pub messages: Vec<ValidationMessage>,
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone regex"))
}

/// Shared with account registration, which checks addresses before any row
/// is written.
pub fn email_is_valid(value: &str) -> bool {
    email_re().is_match(value)
}

fn required_fields(section: SectionKey) -> &'static [&'static str] {
    match section {
        SectionKey::About => &["title"],
        SectionKey::Hero => &[
            "personalInfo.name",
            "personalInfo.title",
            "personalInfo.description",
        ],
        SectionKey::Header => &["logo"],
        SectionKey::Skills => &["title"],
        SectionKey::Experience => &["title"],
        SectionKey::Projects => &["title"],
        SectionKey::Contact => &["title"],
    }
}

/// Validates a single scalar field. `field_name` is the dotted name relative
/// to the section root (`email`, `personalInfo.name`, `socialLinks.github`).
///
/// Rules fire independently; every applicable failure is collected.
pub fn validate_field(
    section: SectionKey,
    field_name: &str,
    value: &str,
) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();
    let name_lower = field_name.to_lowercase();

    if name_lower.contains("email") && !value.is_empty() && !email_re().is_match(value) {
        messages.push(ValidationMessage::new(
            "invalid_email",
            "Please enter a valid email address",
        ));
    }

    if (name_lower.contains("url") || name_lower.contains("link"))
        && !value.is_empty()
        && !value.starts_with('#')
        && Url::parse(value).is_err()
    {
        messages.push(ValidationMessage::new(
            "invalid_url",
            "Please enter a valid URL",
        ));
    }

    if name_lower.contains("phone") && !value.is_empty() {
        let stripped: String = value
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
            .collect();
        if !phone_re().is_match(&stripped) {
            messages.push(ValidationMessage::new(
                "invalid_phone",
                "Please enter a valid phone number",
            ));
        }
    }

    if required_fields(section).contains(&field_name) && value.trim().is_empty() {
        messages.push(ValidationMessage::new(
            "required",
            "This field is required",
        ));
    }

    if value.chars().count() > MAX_FIELD_LEN {
        messages.push(ValidationMessage::new(
            "too_long",
            format!("Text is too long (max {MAX_FIELD_LEN} characters)"),
        ));
    }

    messages
}

/// Sweeps every string leaf of a section tree, returning reports for the
/// fields that have messages. Required fields missing from the tree entirely
/// are reported too, so a save of `{}` still flags `title`.
pub fn validate_section(section: SectionKey, tree: &Value) -> Vec<FieldReport> {
    let mut reports = Vec::new();
    walk_leaves(tree, None, &mut |path, text| {
        let messages = validate_field(section, path, text);
        if !messages.is_empty() {
            reports.push(FieldReport {
                path: path.to_string(),
                messages,
            });
        }
    });

    for &required in required_fields(section) {
        let path = EditPath::parse(required).expect("required-field table paths are well formed");
        let missing = match crate::content::editor::get(tree, &path) {
            None | Some(Value::Null) => true,
            Some(_) => false,
        };
        if missing && !reports.iter().any(|r| r.path == required) {
            reports.push(FieldReport {
                path: required.to_string(),
                messages: vec![ValidationMessage::new(
                    "required",
                    "This field is required",
                )],
            });
        }
    }

    reports
}

fn walk_leaves(value: &Value, prefix: Option<&str>, visit: &mut impl FnMut(&str, &str)) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = match prefix {
                    Some(prefix) => format!("{prefix}.{key}"),
                    None => key.clone(),
                };
                walk_leaves(child, Some(&path), visit);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                let path = match prefix {
                    Some(prefix) => format!("{prefix}.{index}"),
                    None => index.to_string(),
                };
                walk_leaves(child, Some(&path), visit);
            }
        }
        Value::String(text) => {
            if let Some(path) = prefix {
                visit(path, text);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_email_reported() {
        let messages = validate_field(SectionKey::Contact, "email", "not-an-email");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].message.contains("valid email"));
    }

    #[test]
    fn test_valid_email_passes() {
        assert!(validate_field(SectionKey::Contact, "email", "a@b.com").is_empty());
    }

    #[test]
    fn test_email_rule_matches_field_name_case_insensitively() {
        assert!(!validate_field(SectionKey::Contact, "contactEmail", "nope").is_empty());
    }

    #[test]
    fn test_url_must_be_absolute() {
        assert!(!validate_field(SectionKey::Hero, "socialLinks.github", "github.com/j").is_empty());
        assert!(validate_field(
            SectionKey::Hero,
            "socialLinks.github",
            "https://github.com/jane"
        )
        .is_empty());
    }

    #[test]
    fn test_anchor_links_exempt_from_url_rule() {
        assert!(validate_field(SectionKey::Header, "navigation.0.link", "#about").is_empty());
    }

    #[test]
    fn test_phone_strips_formatting() {
        assert!(validate_field(SectionKey::Contact, "phone", "+1 (555) 123-4567").is_empty());
        assert!(!validate_field(SectionKey::Contact, "phone", "call me").is_empty());
        // Leading zero after the optional plus is rejected.
        assert!(!validate_field(SectionKey::Contact, "phone", "+0123").is_empty());
    }

    #[test]
    fn test_required_hero_name() {
        let messages = validate_field(SectionKey::Hero, "personalInfo.name", "");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].code, "required");

        assert!(validate_field(SectionKey::Hero, "personalInfo.name", "Jane Doe").is_empty());
    }

    #[test]
    fn test_required_only_applies_to_listed_fields() {
        assert!(validate_field(SectionKey::Hero, "personalInfo.nickname", "").is_empty());
    }

    #[test]
    fn test_length_rule() {
        let long = "x".repeat(501);
        let messages = validate_field(SectionKey::About, "description", &long);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].code, "too_long");
        assert!(validate_field(SectionKey::About, "description", &"x".repeat(500)).is_empty());
    }

    #[test]
    fn test_multiple_rules_all_reported() {
        let long_bad_url = format!("not a url {}", "x".repeat(500));
        let messages = validate_field(SectionKey::Projects, "liveLink", &long_bad_url);
        let codes: Vec<_> = messages.iter().map(|m| m.code).collect();
        assert!(codes.contains(&"invalid_url"));
        assert!(codes.contains(&"too_long"));
    }

    #[test]
    fn test_no_matching_rule_means_empty_list() {
        assert!(validate_field(SectionKey::Skills, "whatever", "anything").is_empty());
    }

    #[test]
    fn test_validate_section_walks_nested_leaves() {
        let tree = json!({
            "title": "Get in touch",
            "email": "broken",
            "socialLinks": {"github": "nope"}
        });
        let reports = validate_section(SectionKey::Contact, &tree);
        let paths: Vec<_> = reports.iter().map(|r| r.path.as_str()).collect();
        assert!(paths.contains(&"email"));
        assert!(paths.contains(&"socialLinks.github"));
        assert!(!paths.contains(&"title"));
    }

    #[test]
    fn test_validate_section_flags_missing_required() {
        let reports = validate_section(SectionKey::Hero, &json!({}));
        let paths: Vec<_> = reports.iter().map(|r| r.path.as_str()).collect();
        assert!(paths.contains(&"personalInfo.name"));
        assert!(paths.contains(&"personalInfo.title"));
        assert!(paths.contains(&"personalInfo.description"));
    }

    #[test]
    fn test_validate_section_array_items_use_index_paths() {
        let tree = json!({"navigation": [{"name": "Home", "link": "not a url"}]});
        let reports = validate_section(SectionKey::Header, &tree);
        assert!(reports.iter().any(|r| r.path == "navigation.0.link"));
    }
}
