use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::utils::error::{AppError, AppResult};

// osu! API 默认地址
pub const DEFAULT_API_BASE_URL: &str = "https://osu.ppy.sh/api/v2";
pub const DEFAULT_TOKEN_URL: &str = "https://osu.ppy.sh/oauth/token";
pub const DEFAULT_WEB_URL: &str = "https://osu.ppy.sh";
// lazer 成绩接口要求的 x-api-version
pub const DEFAULT_API_VERSION: &str = "20220705";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub osu_client_id: Option<String>,
    pub osu_client_secret: Option<String>,
    /// 预先签发的 token，设置后不再走 client credentials
    pub osu_access_token: Option<String>,
    pub osu_api_base_url: String,
    pub osu_token_url: String,
    pub osu_web_url: String,
    pub osu_api_version: String,
    pub http_connect_timeout_secs: u64,
    pub http_timeout_secs: u64,
}

/// OAuth token 的来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    ClientCredentials {
        client_id: String,
        client_secret: String,
        token_url: String,
    },
    Static(String),
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            osu_client_id: None,
            osu_client_secret: None,
            osu_access_token: None,
            osu_api_base_url: DEFAULT_API_BASE_URL.to_string(),
            osu_token_url: DEFAULT_TOKEN_URL.to_string(),
            osu_web_url: DEFAULT_WEB_URL.to_string(),
            osu_api_version: DEFAULT_API_VERSION.to_string(),
            http_connect_timeout_secs: 3,
            http_timeout_secs: 12,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port),
            osu_client_id: non_empty_var("OSU_CLIENT_ID"),
            osu_client_secret: non_empty_var("OSU_CLIENT_SECRET"),
            osu_access_token: non_empty_var("OSU_ACCESS_TOKEN"),
            osu_api_base_url: non_empty_var("OSU_API_BASE_URL").unwrap_or(defaults.osu_api_base_url),
            osu_token_url: non_empty_var("OSU_TOKEN_URL").unwrap_or(defaults.osu_token_url),
            osu_web_url: non_empty_var("OSU_WEB_URL").unwrap_or(defaults.osu_web_url),
            osu_api_version: non_empty_var("OSU_API_VERSION").unwrap_or(defaults.osu_api_version),
            http_connect_timeout_secs: parse_var(
                "HTTP_CONNECT_TIMEOUT_SECS",
                defaults.http_connect_timeout_secs,
            ),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
        }
    }

    /// 静态 token 优先，否则需要同时提供 client id 与 secret
    pub fn token_source(&self) -> AppResult<TokenSource> {
        if let Some(token) = &self.osu_access_token {
            return Ok(TokenSource::Static(token.clone()));
        }

        match (&self.osu_client_id, &self.osu_client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(TokenSource::ClientCredentials {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                token_url: self.osu_token_url.clone(),
            }),
            _ => Err(AppError::ConfigError(
                "需要设置 OSU_ACCESS_TOKEN，或同时设置 OSU_CLIENT_ID 与 OSU_CLIENT_SECRET".to_string(),
            )),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http_connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

lazy_static! {
    pub static ref CONFIG: Arc<AppConfig> = Arc::new(AppConfig::from_env());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_token_takes_precedence() {
        let config = AppConfig {
            osu_client_id: Some("1".to_string()),
            osu_client_secret: Some("secret".to_string()),
            osu_access_token: Some("abc".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.token_source().unwrap(), TokenSource::Static("abc".to_string()));
    }

    #[test]
    fn client_credentials_need_both_parts() {
        let config = AppConfig {
            osu_client_id: Some("1".to_string()),
            ..AppConfig::default()
        };
        assert!(matches!(config.token_source(), Err(AppError::ConfigError(_))));

        let config = AppConfig {
            osu_client_id: Some("1".to_string()),
            osu_client_secret: Some("secret".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(
            config.token_source().unwrap(),
            TokenSource::ClientCredentials {
                client_id: "1".to_string(),
                client_secret: "secret".to_string(),
                token_url: DEFAULT_TOKEN_URL.to_string(),
            }
        );
    }
}
