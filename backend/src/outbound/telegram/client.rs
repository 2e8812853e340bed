//! Reqwest-backed Telegram Bot API client.
//!
//! Transport only: request serialisation, timeout, HTTP and API error
//! mapping. Used for out-of-band operator notices; the task-completion
//! workflow never calls it.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors raised by the Telegram relay.
#[derive(Debug, thiserror::Error)]
pub enum TelegramRelayError {
    /// The request could not be sent or the response not read.
    #[error("telegram request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The Bot API answered `ok: false`.
    #[error("telegram api error: {description}")]
    Api {
        /// Description returned by the Bot API.
        description: String,
    },
    /// The configured base URL or token produced an invalid endpoint.
    #[error("invalid telegram endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Bot identity returned by `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotInfo {
    /// Numeric bot id.
    pub id: i64,
    /// Bot username.
    pub username: Option<String>,
    /// Display name.
    pub first_name: String,
}

/// One entry of the bot command menu.
#[derive(Debug, Clone, Serialize)]
pub struct BotCommand {
    /// Command name without the leading slash.
    pub command: String,
    /// Menu description.
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SetMyCommandsBody<'a> {
    commands: &'a [BotCommand],
}

/// Telegram Bot API client bound to one bot token.
pub struct TelegramClient {
    client: Client,
    base: Url,
    token: String,
}

impl TelegramClient {
    /// Build a client against the public Bot API.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(token: impl Into<String>) -> Result<Self, TelegramRelayError> {
        Self::with_base(token, DEFAULT_API_BASE)
    }

    /// Build a client against a custom API base (test servers).
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn with_base(
        token: impl Into<String>,
        base: impl AsRef<str>,
    ) -> Result<Self, TelegramRelayError> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            client,
            base: Url::parse(base.as_ref())?,
            token: token.into(),
        })
    }

    fn endpoint(&self, method: &str) -> Result<Url, TelegramRelayError> {
        // Not Url::join: the token contains a colon, which a relative
        // reference would parse as a scheme.
        let base = self.base.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/bot{}/{method}", self.token))?)
    }

    async fn call<T, B>(&self, method: &str, body: Option<&B>) -> Result<T, TelegramRelayError>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + Sync,
    {
        let endpoint = self.endpoint(method)?;
        let request = match body {
            Some(body) => self.client.post(endpoint).json(body),
            None => self.client.get(endpoint),
        };
        let envelope: ApiEnvelope<T> = request.send().await?.json().await?;
        if !envelope.ok {
            return Err(TelegramRelayError::Api {
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_owned()),
            });
        }
        envelope.result.ok_or(TelegramRelayError::Api {
            description: "missing result payload".to_owned(),
        })
    }

    /// Fetch the bot's identity.
    pub async fn get_me(&self) -> Result<BotInfo, TelegramRelayError> {
        self.call::<BotInfo, ()>("getMe", None).await
    }

    /// Send a plain-text message to a chat.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
    ) -> Result<(), TelegramRelayError> {
        self.call::<serde_json::Value, _>(
            "sendMessage",
            Some(&SendMessageBody { chat_id, text }),
        )
        .await
        .map(|_| ())
    }

    /// Replace the bot's command menu.
    pub async fn set_my_commands(
        &self,
        commands: &[BotCommand],
    ) -> Result<(), TelegramRelayError> {
        self.call::<bool, _>("setMyCommands", Some(&SetMyCommandsBody { commands }))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn endpoints_embed_the_token() {
        let client = TelegramClient::new("123:abc").expect("client builds");
        let url = client.endpoint("getMe").expect("endpoint builds");
        assert_eq!(url.as_str(), "https://api.telegram.org/bot123:abc/getMe");
    }

    #[rstest]
    fn api_errors_carry_the_description() {
        let envelope: ApiEnvelope<BotInfo> = serde_json::from_str(
            r#"{"ok": false, "description": "Unauthorized"}"#,
        )
        .expect("envelope parses");
        assert!(!envelope.ok);
        assert_eq!(envelope.description.as_deref(), Some("Unauthorized"));
    }

    #[rstest]
    fn bot_info_parses() {
        let envelope: ApiEnvelope<BotInfo> = serde_json::from_str(
            r#"{"ok": true, "result": {"id": 42, "username": "cashpoints_bot", "first_name": "Cash Points"}}"#,
        )
        .expect("envelope parses");
        let info = envelope.result.expect("result present");
        assert_eq!(info.id, 42);
        assert_eq!(info.username.as_deref(), Some("cashpoints_bot"));
    }
}
