use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven named subtrees of a portfolio document.
///
/// Every stored document carries all seven keys, possibly as empty objects.
/// An empty object means "no user data", which the resolver treats as a
/// fallback trigger, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    About,
    Contact,
    Experience,
    Header,
    Hero,
    Projects,
    Skills,
}

impl SectionKey {
    pub const ALL: [SectionKey; 7] = [
        SectionKey::About,
        SectionKey::Contact,
        SectionKey::Experience,
        SectionKey::Header,
        SectionKey::Hero,
        SectionKey::Projects,
        SectionKey::Skills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::About => "about",
            SectionKey::Contact => "contact",
            SectionKey::Experience => "experience",
            SectionKey::Header => "header",
            SectionKey::Hero => "hero",
            SectionKey::Projects => "projects",
            SectionKey::Skills => "skills",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "about" => Ok(SectionKey::About),
            "contact" => Ok(SectionKey::Contact),
            "experience" => Ok(SectionKey::Experience),
            "header" => Ok(SectionKey::Header),
            "hero" => Ok(SectionKey::Hero),
            "projects" => Ok(SectionKey::Projects),
            "skills" => Ok(SectionKey::Skills),
            other => Err(UnknownSection(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown section key: {0}")]
pub struct UnknownSection(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_keys() {
        for key in SectionKey::ALL {
            assert_eq!(key.as_str().parse::<SectionKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!("blog".parse::<SectionKey>().is_err());
        assert!("Hero".parse::<SectionKey>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(
            serde_json::to_string(&SectionKey::Hero).unwrap(),
            "\"hero\""
        );
        let key: SectionKey = serde_json::from_str("\"projects\"").unwrap();
        assert_eq!(key, SectionKey::Projects);
    }
}
