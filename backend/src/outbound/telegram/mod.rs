//! Telegram Bot API relay adapter.

mod client;

pub use client::{BotCommand, BotInfo, TelegramClient, TelegramRelayError};
