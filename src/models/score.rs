use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 各判定的数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Judgements {
    pub great: u32,
    pub ok: u32,
    pub meh: u32,
    pub miss: u32,
}

/// 成绩来自哪一代计分系统
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoreGeneration {
    Lazer,
    Legacy,
}

/// 成绩的展示链接及其对应的计分系统
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLink {
    pub url: String,
    pub generation: ScoreGeneration,
}

impl ScoreLink {
    pub fn new(web_url: &str, score_id: u64, generation: ScoreGeneration) -> Self {
        let web_url = web_url.trim_end_matches('/');
        let url = match generation {
            ScoreGeneration::Lazer => format!("{web_url}/scores/{score_id}"),
            ScoreGeneration::Legacy => format!("{web_url}/scores/osu/{score_id}"),
        };
        Self { url, generation }
    }
}

/// 游玩时间取自哪个字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlayTimeSource {
    CreatedAt,
    EndedAt,
    /// 两个字段都不可用，`play_time` 为 Unix 纪元
    Missing,
}

/// 统一后的成绩
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NormalizedScore {
    pub id: u64,
    /// 总为有限的非负数，缺失时为 0
    pub pp: f64,
    pub accuracy: f64,
    pub max_combo: u32,
    pub rank: String,
    /// Mod 缩写，保持上游顺序
    pub mods: Vec<String>,
    pub score_url: String,
    pub generation: ScoreGeneration,
    pub judgements: Judgements,
    pub play_time: DateTime<Utc>,
    pub play_time_source: PlayTimeSource,
}
