use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::mods::GameMod;

/// 谱面未开 Mod 时的原始数据（来自 `GET /beatmaps/{id}`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBeatmapMetadata {
    pub id: u64,
    /// 难度名（version）
    pub version: String,
    pub circle_size: f64,
    pub hp_drain: f64,
    pub bpm: f64,
    /// 总长度（秒）
    pub total_length: u32,
}

/// 远端难度计算器按 Mod 位掩码给出的属性，已包含 Mod 对 AR/OD/星数/连击的影响
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteAttributeResult {
    pub approach_rate: f64,
    pub overall_difficulty: f64,
    pub star_rating: f64,
    pub max_combo: u32,
}

/// 合并并按 Mod 修正后的谱面属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResolvedBeatmapAttributes {
    pub approach_rate: f64,
    pub circle_size: f64,
    pub overall_difficulty: f64,
    pub hp_drain: f64,
    pub bpm: f64,
    pub star_rating: f64,
    pub max_combo: u32,
    /// 长度（秒），已按变速 Mod 调整
    pub length: u32,
}

/// 对外展示的谱面
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Beatmap {
    pub id: u64,
    pub difficulty: String,
    pub url: String,
    /// 未开 Mod 时的长度，格式 `mm:ss`
    pub formatted_length: String,
    pub mods: Vec<GameMod>,
    pub attributes: ResolvedBeatmapAttributes,
}

/// 将秒数格式化为 `mm:ss`
pub fn format_length(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
