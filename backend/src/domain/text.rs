//! Required free-text values (deck titles, card faces, prompts).

use std::fmt;

/// Validation errors for required text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TextValidationError {
    /// The value was empty or whitespace only.
    #[error("must not be blank")]
    Blank,
}

/// Text that is non-empty after trimming surrounding whitespace.
///
/// # Examples
/// ```
/// use flashdeck::domain::RequiredText;
///
/// let title = RequiredText::new("  Biology ").unwrap();
/// assert_eq!(title.as_str(), "Biology");
/// assert!(RequiredText::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequiredText(String);

impl RequiredText {
    /// Trim and validate `raw`.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TextValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextValidationError::Blank);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Treat blank input as absent rather than invalid.
    #[must_use]
    pub fn optional(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| Self::new(value).ok())
    }

    /// Borrow the trimmed text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume into the owned string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RequiredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
