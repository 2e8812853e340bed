//! Request authentication extractors.
//!
//! The Mini-App front-end authenticates each request with the caller's
//! Telegram id in the `X-Telegram-Id` header, forwarded by the gateway that
//! validated the Telegram init data. Signature validation of that init data
//! is the gateway's job and out of scope here.
//!
//! Admin endpoints require the shared token from configuration in
//! `X-Admin-Token`.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};

use crate::domain::{DomainError, TelegramId};

/// Header carrying the authenticated Telegram user id.
pub const TELEGRAM_ID_HEADER: &str = "X-Telegram-Id";

/// Header carrying the admin console token.
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// The authenticated Mini-App caller.
#[derive(Debug, Clone)]
pub struct TelegramAuth(pub TelegramId);

impl TelegramAuth {
    /// The caller's Telegram id.
    pub fn user(&self) -> &TelegramId {
        &self.0
    }
}

fn extract_telegram_id(req: &HttpRequest) -> Result<TelegramId, DomainError> {
    let raw = req
        .headers()
        .get(TELEGRAM_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| DomainError::unauthorized("missing telegram id header"))?;
    TelegramId::new(raw).map_err(|error| DomainError::unauthorized(error.to_string()))
}

impl FromRequest for TelegramAuth {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_telegram_id(req).map(TelegramAuth))
    }
}

/// Shared secret guarding the admin endpoints, injected as app data.
#[derive(Clone)]
pub struct AdminToken(String);

impl AdminToken {
    /// Wrap the configured token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    fn matches(&self, candidate: &str) -> bool {
        !self.0.is_empty() && self.0 == candidate
    }
}

/// Marker extractor proving the request carried the admin token.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

fn check_admin(req: &HttpRequest) -> Result<AdminAuth, DomainError> {
    let expected = req
        .app_data::<web::Data<AdminToken>>()
        .ok_or_else(|| DomainError::internal("admin token not configured"))?;
    let candidate = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| DomainError::unauthorized("missing admin token header"))?;
    if expected.matches(candidate) {
        Ok(AdminAuth)
    } else {
        Err(DomainError::forbidden("invalid admin token"))
    }
}

impl FromRequest for AdminAuth {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(check_admin(req))
    }
}
