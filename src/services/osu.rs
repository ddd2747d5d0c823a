use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;

use crate::config::{AppConfig, TokenSource};
use crate::services::auth::OsuAuthenticator;
use crate::utils::error::{AppError, AppResult};

/// osu! API v2 的认证传输层，负责 URL 拼接与公共请求头
pub struct OsuClient {
    client: Client,
    auth: OsuAuthenticator,
    api_base_url: String,
    web_url: String,
    api_version: String,
}

impl OsuClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .pool_max_idle_per_host(8)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("构建 HTTP 客户端失败，回退默认设置: {e}");
                Client::new()
            });

        Ok(Self::with_client(
            client,
            config.token_source()?,
            &config.osu_api_base_url,
            &config.osu_web_url,
            &config.osu_api_version,
        ))
    }

    pub fn with_client(
        client: Client,
        source: TokenSource,
        api_base_url: &str,
        web_url: &str,
        api_version: &str,
    ) -> Self {
        Self {
            auth: OsuAuthenticator::new(client.clone(), source),
            client,
            api_base_url: api_base_url.to_string(),
            web_url: web_url.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
        }
    }

    /// 网页端根地址，用于拼接展示链接
    pub fn web_url(&self) -> &str {
        &self.web_url
    }

    /// 在 API 根路径后追加路径段，每段都会被转义
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_base_url)
            .map_err(|e| AppError::ConfigError(format!("无效的 API 地址 {}: {e}", self.api_base_url)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::ConfigError(format!("API 地址不能作为根路径: {}", self.api_base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 普通 GET 请求；只有传输错误会返回 Err，状态码由调用方判断
    pub async fn get(&self, segments: &[&str], query: &[(&str, &str)]) -> AppResult<Response> {
        let url = self.endpoint(segments)?;
        log::debug!("GET {url}");
        let token = self.auth.access_token().await?;
        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await?;
        Ok(response)
    }

    /// 带 `x-api-version` 的 GET 请求，用于 lazer 成绩接口
    pub async fn get_versioned(&self, segments: &[&str]) -> AppResult<Response> {
        let url = self.endpoint(segments)?;
        log::debug!("GET {url} (x-api-version: {})", self.api_version);
        let token = self.auth.access_token().await?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .header("x-api-version", &self.api_version)
            .send()
            .await?;
        Ok(response)
    }

    pub async fn post_json(&self, segments: &[&str], body: &Value) -> AppResult<Response> {
        let url = self.endpoint(segments)?;
        log::debug!("POST {url} {body}");
        let token = self.auth.access_token().await?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;
        Ok(response)
    }
}

/// 读取成功响应的 JSON；404 交给 `not_found` 构造错误，401/403 视为认证错误
pub async fn read_json(
    response: Response,
    not_found: impl FnOnce() -> AppError,
) -> AppResult<Value> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<Value>().await?);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "无法读取错误信息".to_string());
    log::error!("osu! API 请求失败: HTTP {status}, 响应: {error_text}");

    if status == StatusCode::NOT_FOUND {
        return Err(not_found());
    }
    Err(status_error(status, error_text))
}

/// 将非成功状态码转换为错误：401/403 为认证错误，其余为上游错误
pub fn status_error(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AppError::AuthError(format!("osu! API 拒绝访问: HTTP {status}"))
        }
        _ => AppError::UpstreamError {
            status: status.as_u16(),
            message,
        },
    }
}

pub fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}
