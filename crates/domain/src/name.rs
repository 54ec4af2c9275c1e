use derive_more::{AsRef, Display};

/// Canonical exercise name.
///
/// Surrounding whitespace is removed and inner runs of whitespace are
/// collapsed, so that names read from speech transcripts compare equal to the
/// catalog spelling.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    pub fn new(name: &str) -> Result<Self, NameError> {
        let normalized_name = normalize(name);

        if normalized_name.is_empty() {
            return Err(NameError::Empty);
        }

        let len = normalized_name.chars().count();

        if len > 64 {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(normalized_name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used for all case-insensitive comparisons.
    #[must_use]
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.key() == normalize(other).to_lowercase()
    }
}

fn normalize(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
}
