use std::fmt;

use serde::{Deserialize, Serialize};

/// A dot-separated address into a section tree, e.g. `personalInfo.name`,
/// `skills.2`, `experiences.0.responsibilities`.
///
/// Each segment is an object key or a non-negative array index. A purely
/// numeric segment is kept as both forms and disambiguated at apply time,
/// since JSON objects are allowed to have numeric-looking keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EditPath {
    segments: Vec<String>,
}

impl EditPath {
    pub fn parse(raw: &str) -> Result<Self, PathParseError> {
        if raw.is_empty() {
            return Err(PathParseError::Empty);
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PathParseError::EmptySegment(raw.to_string()));
        }
        Ok(EditPath { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment, used for field-name based validation rules.
    pub fn leaf(&self) -> &str {
        self.segments
            .last()
            .expect("EditPath is never empty")
            .as_str()
    }

    /// The path extended with one more segment, for addressing array items
    /// in validation reports (`skills.2`).
    pub fn child(&self, segment: impl fmt::Display) -> EditPath {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        EditPath { segments }
    }
}

impl fmt::Display for EditPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl TryFrom<String> for EditPath {
    type Error = PathParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EditPath::parse(&value)
    }
}

impl From<EditPath> for String {
    fn from(path: EditPath) -> String {
        path.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathParseError {
    #[error("edit path must not be empty")]
    Empty,

    #[error("edit path '{0}' contains an empty segment")]
    EmptySegment(String),
}
