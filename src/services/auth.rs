use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::TokenSource;
use crate::utils::error::{AppError, AppResult};

// 提前刷新，避免 token 在请求途中过期
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    86400
}

/// 上游给出的有效期超出 `Instant` 表示范围时按默认有效期处理
fn expiry_from(now: Instant, expires_in: u64) -> Instant {
    now.checked_add(Duration::from_secs(expires_in))
        .unwrap_or_else(|| {
            log::warn!("OAuth token 有效期异常 ({expires_in} 秒)，按默认有效期处理");
            now + Duration::from_secs(default_expires_in())
        })
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + REFRESH_MARGIN < self.expires_at
    }
}

/// osu! OAuth token 提供者（client credentials 授权）
pub struct OsuAuthenticator {
    client: Client,
    source: TokenSource,
    cached: Mutex<Option<CachedToken>>,
}

impl OsuAuthenticator {
    pub fn new(client: Client, source: TokenSource) -> Self {
        Self {
            client,
            source,
            cached: Mutex::new(None),
        }
    }

    /// 返回可用的 access token；缓存过期时刷新，同一时刻只有一个刷新请求
    pub async fn access_token(&self) -> AppResult<String> {
        let (client_id, client_secret, token_url) = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::ClientCredentials {
                client_id,
                client_secret,
                token_url,
            } => (client_id, client_secret, token_url),
        };

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        log::debug!("OAuth token 不存在或即将过期，开始刷新...");
        let response = self
            .client
            .post(token_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("grant_type", "client_credentials"),
                ("scope", "public"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "无法读取错误信息".to_string());
            log::error!("获取 OAuth token 失败: HTTP {status}, 响应: {error_text}");
            return Err(AppError::AuthError(format!("获取 token 失败: HTTP {status}")));
        }

        let token = response.json::<TokenResponse>().await?;
        log::info!("成功获取 OAuth token，有效期 {} 秒", token.expires_in);

        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at: expiry_from(Instant::now(), token.expires_in),
        });
        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials(server: &MockServer) -> TokenSource {
        TokenSource::ClientCredentials {
            client_id: "1234".to_string(),
            client_secret: "s3cret".to_string(),
            token_url: format!("{}/oauth/token", server.uri()),
        }
    }

    #[tokio::test]
    async fn static_token_never_requests() {
        let server = MockServer::start().await;
        let auth = OsuAuthenticator::new(Client::new(), TokenSource::Static("fixed".to_string()));

        assert_eq!(auth.access_token().await.unwrap(), "fixed");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn caches_token_until_expiry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "expires_in": 86400,
                "access_token": "tok-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = OsuAuthenticator::new(Client::new(), credentials(&server));
        assert_eq!(auth.access_token().await.unwrap(), "tok-1");
        assert_eq!(auth.access_token().await.unwrap(), "tok-1");
    }

    #[tokio::test]
    async fn short_lived_token_is_refreshed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "expires_in": 30,
                "access_token": "tok-short"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let auth = OsuAuthenticator::new(Client::new(), credentials(&server));
        auth.access_token().await.unwrap();
        auth.access_token().await.unwrap();
    }

    #[tokio::test]
    async fn oversized_lifetime_uses_default_expiry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "expires_in": u64::MAX,
                "access_token": "tok-long"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = OsuAuthenticator::new(Client::new(), credentials(&server));
        assert_eq!(auth.access_token().await.unwrap(), "tok-long");
        assert_eq!(auth.access_token().await.unwrap(), "tok-long");
    }

    #[test]
    fn expiry_is_clamped_on_overflow() {
        let now = Instant::now();
        assert_eq!(expiry_from(now, 3600), now + Duration::from_secs(3600));
        assert_eq!(expiry_from(now, u64::MAX), now + Duration::from_secs(default_expires_in()));
    }

    #[tokio::test]
    async fn rejected_credentials_are_auth_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid_client" })))
            .mount(&server)
            .await;

        let auth = OsuAuthenticator::new(Client::new(), credentials(&server));
        let err = auth.access_token().await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }
}
