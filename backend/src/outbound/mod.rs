//! Outbound adapters: PostgreSQL persistence and the Telegram relay.

pub mod persistence;
pub mod telegram;
