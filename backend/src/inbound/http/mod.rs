//! HTTP inbound adapter: handlers, DTOs, auth extractors, and the error
//! envelope.

pub mod admin;
pub mod auth;
pub mod error;
pub mod health;
pub mod notifications;
pub mod referrals;
pub mod state;
pub mod tasks;
pub mod users;
pub mod wallet;

pub use error::ApiResult;

use uuid::Uuid;

use crate::domain::DomainError;

/// Parse a path or payload UUID, naming the field in the error.
pub(crate) fn parse_uuid(value: &str, field: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value)
        .map_err(|_| DomainError::invalid_request(format!("{field} must be a valid UUID")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn valid_uuids_parse() {
        parse_uuid("550e8400-e29b-41d4-a716-446655440000", "taskId").expect("parses");
    }

    #[rstest]
    fn invalid_uuids_name_the_field() {
        let error = parse_uuid("nope", "taskId").expect_err("rejected");
        assert!(error.message().contains("taskId"));
    }
}
