//! User identity value objects.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors for [`TelegramId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TelegramIdValidationError {
    /// The id string was empty.
    #[error("telegram id must not be empty")]
    Empty,
    /// The id string contained non-digit characters.
    #[error("telegram id must be numeric")]
    NonNumeric,
}

/// A Telegram user id, the key every workflow is scoped by.
///
/// Telegram issues numeric ids; the store keys rows by their decimal string
/// form, so this newtype validates shape rather than range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct TelegramId(String);

impl TelegramId {
    /// Validate and construct a [`TelegramId`] from a string.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramIdValidationError::Empty`] for an empty input and
    /// [`TelegramIdValidationError::NonNumeric`] when the input contains
    /// anything but ASCII digits.
    pub fn new(id: impl AsRef<str>) -> Result<Self, TelegramIdValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    fn from_owned(id: String) -> Result<Self, TelegramIdValidationError> {
        if id.is_empty() {
            return Err(TelegramIdValidationError::Empty);
        }
        if !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TelegramIdValidationError::NonNumeric);
        }
        Ok(Self(id))
    }

    /// The decimal string form used as the store key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Derive the user's referral code: `BT` followed by the last six
    /// digits of the id, uppercased.
    pub fn referral_code(&self) -> String {
        let tail_start = self.0.len().saturating_sub(6);
        let tail = self.0.get(tail_start..).unwrap_or_default();
        format!("BT{}", tail.to_uppercase())
    }
}

impl AsRef<str> for TelegramId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TelegramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<TelegramId> for String {
    fn from(value: TelegramId) -> Self {
        value.0
    }
}

impl TryFrom<String> for TelegramId {
    type Error = TelegramIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
