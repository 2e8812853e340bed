//! Application configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CASHPOINTS_*` environment variables, or a
//! config file, in OrthoConfig's usual precedence order.

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::Taka;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REFERRAL_BONUS: i64 = 2;
const DEFAULT_POOL_SIZE: u32 = 10;

/// Runtime configuration for the Cash Points backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CASHPOINTS")]
pub struct AppConfig {
    /// PostgreSQL connection string. Required.
    pub database_url: Option<String>,
    /// Socket address to bind the HTTP server to.
    pub bind_addr: Option<String>,
    /// Maximum database connections.
    pub db_pool_size: Option<u32>,
    /// Shared secret for the admin endpoints. Empty disables them.
    pub admin_token: Option<String>,
    /// Telegram bot token for the out-of-band relay. Optional.
    pub telegram_bot_token: Option<String>,
    /// Bonus credited to each side of a referral, in whole taka.
    pub referral_bonus: Option<i64>,
}

impl AppConfig {
    /// The configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// The configured pool size, falling back to the default.
    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    /// The admin token; empty when unset, which rejects every admin call.
    pub fn admin_token(&self) -> &str {
        self.admin_token.as_deref().unwrap_or("")
    }

    /// The per-side referral bonus, falling back to the default.
    pub fn referral_bonus(&self) -> Taka {
        Taka::new(self.referral_bonus.unwrap_or(DEFAULT_REFERRAL_BONUS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bare_config() -> AppConfig {
        AppConfig {
            database_url: None,
            bind_addr: None,
            db_pool_size: None,
            admin_token: None,
            telegram_bot_token: None,
            referral_bonus: None,
        }
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let config = bare_config();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.db_pool_size(), 10);
        assert_eq!(config.admin_token(), "");
        assert_eq!(config.referral_bonus(), Taka::new(2));
    }

    #[rstest]
    fn explicit_values_win() {
        let config = AppConfig {
            bind_addr: Some("127.0.0.1:9000".to_owned()),
            referral_bonus: Some(5),
            ..bare_config()
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.referral_bonus(), Taka::new(5));
    }
}
