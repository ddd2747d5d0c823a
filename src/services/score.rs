use futures::future::try_join_all;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;

use crate::models::score::{NormalizedScore, ScoreGeneration, ScoreLink};
use crate::services::osu::{is_auth_failure, read_json, status_error, OsuClient};
use crate::utils::error::{AppError, AppResult};
use crate::utils::json_field::{field_u64, require};
use crate::utils::score_parser::normalize;

// 成绩服务：lazer 接口优先，失败时回退到旧版接口
#[derive(Clone)]
pub struct ScoreService {
    osu: Arc<OsuClient>,
}

impl ScoreService {
    pub fn new(osu: Arc<OsuClient>) -> Self {
        Self { osu }
    }

    /// 获取并统一一条成绩
    pub async fn get_score(&self, score_id: u64) -> AppResult<NormalizedScore> {
        let raw = self.fetch(score_id).await?;
        let resolved_id = require(field_u64(&raw, "id"), "成绩")?;
        let link = self.resolve_display_url(resolved_id).await?;
        normalize(&raw, link)
    }

    /// 获取原始成绩 JSON。
    ///
    /// 先请求 `/scores/{id}`，非成功状态时改用 `/scores/osu/{id}`，两者都失败时返回 `ScoreNotFound`。
    /// 传输错误和 401/403 直接向上返回，不做回退。
    pub async fn fetch(&self, score_id: u64) -> AppResult<Value> {
        let id = score_id.to_string();

        let primary = self.osu.get_versioned(&["scores", id.as_str()]).await?;
        let primary_status = primary.status();
        if primary_status.is_success() {
            log::debug!("成绩 {score_id} 由 lazer 接口返回");
            return Ok(primary.json::<Value>().await?);
        }
        if is_auth_failure(primary_status) {
            let error_text = primary.text().await.unwrap_or_default();
            return Err(status_error(primary_status, error_text));
        }

        log::warn!("lazer 接口获取成绩 {score_id} 失败: HTTP {primary_status}，回退到旧版接口");
        let legacy = self.osu.get(&["scores", "osu", id.as_str()], &[]).await?;
        let legacy_status = legacy.status();
        if legacy_status.is_success() {
            log::debug!("成绩 {score_id} 由旧版接口返回");
            return Ok(legacy.json::<Value>().await?);
        }
        if is_auth_failure(legacy_status) {
            let error_text = legacy.text().await.unwrap_or_default();
            return Err(status_error(legacy_status, error_text));
        }

        log::error!(
            "成绩 {score_id} 两个接口都失败: lazer HTTP {primary_status}, 旧版 HTTP {legacy_status}"
        );
        Err(AppError::ScoreNotFound(score_id.to_string()))
    }

    /// 判断成绩属于哪一代计分系统并给出对应的网页链接。
    ///
    /// 每次都单独请求一次 lazer 接口，结果不缓存。401/403 直接返回认证错误，
    /// 其余非成功状态判定为旧版成绩。
    pub async fn resolve_display_url(&self, score_id: u64) -> AppResult<ScoreLink> {
        let id = score_id.to_string();
        let response = self.osu.get_versioned(&["scores", id.as_str()]).await?;
        let status = response.status();
        let generation = if status.is_success() {
            ScoreGeneration::Lazer
        } else if is_auth_failure(status) {
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error(status, error_text));
        } else {
            if status != StatusCode::NOT_FOUND {
                log::warn!("判定成绩 {score_id} 类型时 lazer 接口返回 HTTP {status}，按旧版成绩处理");
            }
            ScoreGeneration::Legacy
        };
        log::debug!("成绩 {score_id} 判定为 {generation:?}");
        Ok(ScoreLink::new(self.osu.web_url(), score_id, generation))
    }

    /// 获取用户最近的成绩，展示链接并发解析，顺序与上游一致
    pub async fn get_recent_scores(
        &self,
        user_id: &str,
        cursor: Option<&str>,
    ) -> AppResult<Vec<NormalizedScore>> {
        let query: Vec<(&str, &str)> = cursor.map(|c| ("cursor_string", c)).into_iter().collect();
        let response = self
            .osu
            .get(&["users", user_id, "scores", "recent"], &query)
            .await?;
        let payload = read_json(response, || AppError::UserNotFound(user_id.to_string())).await?;

        let entries = payload.as_array().ok_or_else(|| {
            AppError::MalformedPayload("最近成绩: 响应不是数组".to_string())
        })?;
        log::debug!("用户 {user_id} 最近成绩共 {} 条", entries.len());

        let links = try_join_all(entries.iter().map(|entry| async move {
            let id = require(field_u64(entry, "id"), "最近成绩")?;
            self.resolve_display_url(id).await
        }))
        .await?;

        entries
            .iter()
            .zip(links)
            .map(|(entry, link)| normalize(entry, link))
            .collect()
    }
}
