use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: u64,
    pub username: Option<String>,
    pub country_code: String,
    /// 未上榜的玩家没有排名
    pub global_rank: Option<u32>,
    pub country_rank: Option<u32>,
    /// 每日全球排名，按时间顺序
    pub rank_history: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub code: u32,
    pub status: String,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 200,
            status: "OK".to_string(),
            message: None,
            data: Some(data),
        }
    }
}
