//! Bundled default content, one document per section key.
//!
//! Shipped inside the binary and parsed once on first use. This is what an
//! unauthenticated visitor sees, and what any section falls back to until
//! its owner customizes it.

use std::sync::OnceLock;

use serde_json::Value;

use crate::content::section::SectionKey;

static DEFAULTS: OnceLock<[Value; 7]> = OnceLock::new();

/// Returns the bundled default content for a section. Never empty.
pub fn default_content(key: SectionKey) -> &'static Value {
    let all = DEFAULTS.get_or_init(|| {
        [
            parse("about", include_str!("../../assets/defaults/about.json")),
            parse("contact", include_str!("../../assets/defaults/contact.json")),
            parse(
                "experience",
                include_str!("../../assets/defaults/experience.json"),
            ),
            parse("header", include_str!("../../assets/defaults/header.json")),
            parse("hero", include_str!("../../assets/defaults/hero.json")),
            parse(
                "projects",
                include_str!("../../assets/defaults/projects.json"),
            ),
            parse("skills", include_str!("../../assets/defaults/skills.json")),
        ]
    });
    match key {
        SectionKey::About => &all[0],
        SectionKey::Contact => &all[1],
        SectionKey::Experience => &all[2],
        SectionKey::Header => &all[3],
        SectionKey::Hero => &all[4],
        SectionKey::Projects => &all[5],
        SectionKey::Skills => &all[6],
    }
}

fn parse(name: &str, raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|e| panic!("bundled {name}.json is invalid: {e}"))
}
