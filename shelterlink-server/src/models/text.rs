//! Text field validation
//!
//! Request bodies arrive with every field optional; these helpers turn them
//! into trimmed, length-checked values at construction.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Default maximum length for short text fields (names, titles, addresses)
pub const MAX_SHORT_LEN: usize = 255;

/// Maximum length for long text fields (descriptions, letters, messages)
pub const MAX_LONG_LEN: usize = 20_000;

/// Loose email shape: something@something.tld, no whitespace
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// A present, non-blank, length-checked string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredText(String);

impl RequiredText {
    /// Validate a required field.
    ///
    /// Surrounding whitespace is trimmed; blank counts as missing.
    pub fn new(field: &'static str, value: Option<&str>, max: usize) -> Result<Self, ValidationError> {
        let trimmed = value.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Err(ValidationError::Required { field });
        }
        if trimmed.chars().count() > max {
            return Err(ValidationError::TooLong { field, max });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Shorthand for a required short field.
    pub fn short(field: &'static str, value: Option<&str>) -> Result<Self, ValidationError> {
        Self::new(field, value, MAX_SHORT_LEN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate an optional field: trims, maps blank to `None`, checks length.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong { field, max }),
        Some(v) => Ok(Some(v.to_owned())),
    }
}

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Validate a required email field.
    ///
    /// # Example
    /// ```
    /// use shelterlink_server::models::Email;
    ///
    /// assert!(Email::new("email", Some("help@example.org")).is_ok());
    /// assert!(Email::new("email", Some("not-an-email")).is_err());
    /// ```
    pub fn new(field: &'static str, value: Option<&str>) -> Result<Self, ValidationError> {
        let text = RequiredText::short(field, value)?;
        if !EMAIL_RE.is_match(text.as_str()) {
            return Err(ValidationError::InvalidFormat {
                field,
                reason: "must be a valid email address",
            });
        }
        Ok(Self(text.into_string().to_lowercase()))
    }

    /// Validate an optional email field; blank means absent.
    pub fn optional(field: &'static str, value: Option<&str>) -> Result<Option<Self>, ValidationError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(v) => Self::new(field, Some(v)).map(Some),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
