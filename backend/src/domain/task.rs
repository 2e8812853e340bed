//! Task template definitions.
//!
//! Templates are created and edited by the admin collaborator; the user
//! workflow treats them as read-only input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Taka;

/// Identifier of a task template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generate a random id. Primarily useful for tests.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Error parsing an unknown task type tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task type: {0}")]
pub struct ParseTaskTypeError(pub String);

/// Task category tag.
///
/// Referral, trading-platform, and bonus tasks are "special": completion is
/// evidenced by a submitted external UID and verified manually rather than
/// credited by the client workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Daily check-in with a 24h cooldown.
    Checkin,
    /// Recurring daily reward task.
    Daily,
    /// Social-media task (join a channel, share a post).
    Social,
    /// Referral-style special task.
    Referral,
    /// Trading-platform signup special task.
    TradingPlatform,
    /// One-off bonus special task.
    Bonus,
}

impl TaskType {
    /// The snake_case tag persisted in the store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checkin => "checkin",
            Self::Daily => "daily",
            Self::Social => "social",
            Self::Referral => "referral",
            Self::TradingPlatform => "trading_platform",
            Self::Bonus => "bonus",
        }
    }

    /// Whether completion goes through the UID-submission flow instead of
    /// immediate crediting.
    pub const fn is_special(self) -> bool {
        matches!(self, Self::Referral | Self::TradingPlatform | Self::Bonus)
    }
}

impl FromStr for TaskType {
    type Err = ParseTaskTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checkin" => Ok(Self::Checkin),
            "daily" => Ok(Self::Daily),
            "social" => Ok(Self::Social),
            "referral" => Ok(Self::Referral),
            "trading_platform" => Ok(Self::TradingPlatform),
            "bonus" => Ok(Self::Bonus),
            other => Err(ParseTaskTypeError(other.to_owned())),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task definition as configured by the admin collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTemplate {
    /// Template identifier.
    pub id: TaskId,
    /// Headline shown on the task card.
    pub title: String,
    /// Secondary line shown on the task card.
    pub subtitle: String,
    /// Longer description shown on demand.
    pub description: String,
    /// Reward credited on completion (or on UID verification for special
    /// tasks).
    pub reward: Taka,
    /// Category tag; drives special-task routing.
    pub task_type: TaskType,
    /// Icon hint for the client.
    pub icon: String,
    /// Call-to-action label.
    pub button_text: String,
    /// Minimum seconds between completions; 0 means no cooldown.
    pub cooldown_secs: i64,
    /// Advertised completion cap; informational only (see DESIGN.md).
    pub max_completions: i64,
    /// External link opened before completing, when present.
    pub url: Option<String>,
    /// Inactive templates are never eligible.
    pub is_active: bool,
}

impl TaskTemplate {
    /// Whether this template routes through the UID-submission flow.
    pub fn is_special(&self) -> bool {
        self.task_type.is_special()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TaskType::Checkin, false)]
    #[case(TaskType::Daily, false)]
    #[case(TaskType::Social, false)]
    #[case(TaskType::Referral, true)]
    #[case(TaskType::TradingPlatform, true)]
    #[case(TaskType::Bonus, true)]
    fn special_classification_matches_task_type(#[case] kind: TaskType, #[case] special: bool) {
        assert_eq!(kind.is_special(), special);
    }

    #[rstest]
    #[case("checkin", TaskType::Checkin)]
    #[case("trading_platform", TaskType::TradingPlatform)]
    fn tags_round_trip(#[case] tag: &str, #[case] kind: TaskType) {
        assert_eq!(tag.parse::<TaskType>(), Ok(kind));
        assert_eq!(kind.as_str(), tag);
    }

    #[rstest]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            "mining".parse::<TaskType>(),
            Err(ParseTaskTypeError("mining".to_owned()))
        );
    }
}
