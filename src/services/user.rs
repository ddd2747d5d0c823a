use serde_json::Value;
use std::sync::Arc;

use crate::models::user::User;
use crate::services::osu::{read_json, OsuClient};
use crate::utils::error::{AppError, AppResult};
use crate::utils::json_field::{field_array, field_object, field_str, field_u32, field_u64, require};

// 用户服务
#[derive(Clone)]
pub struct UserService {
    osu: Arc<OsuClient>,
}

impl UserService {
    pub fn new(osu: Arc<OsuClient>) -> Self {
        Self { osu }
    }

    /// 按用户 ID 或用户名获取用户
    pub async fn get_user(&self, user_id: &str) -> AppResult<User> {
        let response = self.osu.get(&["users", user_id], &[]).await?;
        let payload = read_json(response, || AppError::UserNotFound(user_id.to_string())).await?;
        let user = parse_user(&payload)?;
        log::debug!("获取到用户 {:?} (#{})", user.username, user.id);
        Ok(user)
    }
}

fn parse_user(payload: &Value) -> AppResult<User> {
    let statistics = field_object(payload, "statistics").ok();
    let rank = |key: &str| statistics.and_then(|s| field_u32(s, key).ok());

    Ok(User {
        id: require(field_u64(payload, "id"), "用户")?,
        username: field_str(payload, "username").ok().map(str::to_string),
        country_code: require(field_str(payload, "country_code"), "用户")?.to_string(),
        global_rank: rank("global_rank"),
        country_rank: rank("country_rank"),
        rank_history: parse_rank_history(payload),
    })
}

/// `rank_history` 可能是数组，也可能是 `{ "mode": ..., "data": [...] }`
fn parse_rank_history(payload: &Value) -> Vec<u32> {
    let entries = field_array(payload, "rank_history")
        .or_else(|_| field_object(payload, "rank_history").and_then(|h| field_array(h, "data")));

    match entries {
        Ok(entries) => entries
            .iter()
            .filter_map(|v| v.as_u64().and_then(|r| u32::try_from(r).ok()))
            .collect(),
        Err(e) => {
            log::debug!("{e}，排名历史为空");
            Vec::new()
        }
    }
}
