//! 将两代计分系统的成绩 JSON 统一为 [`NormalizedScore`]。

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::score::{Judgements, NormalizedScore, PlayTimeSource, ScoreLink};
use crate::utils::error::AppResult;
use crate::utils::json_field::{
    field_array, field_f64, field_object, field_str, field_u32, field_u64, require,
    FieldUnavailable,
};

/// Mod 列表的一种解析方式；形状不符时返回 `None`，交给下一种
type ModDecoder = fn(&[Value]) -> Option<Vec<String>>;

const MOD_DECODERS: [(&str, ModDecoder); 2] = [
    ("对象数组", decode_mod_objects),
    ("字符串数组", decode_mod_strings),
];

/// 判定字段：(新命名, 旧的数字后缀命名)
const GREAT_FIELDS: (&str, &str) = ("great", "count_300");
const OK_FIELDS: (&str, &str) = ("ok", "count_100");
const MEH_FIELDS: (&str, &str) = ("meh", "count_50");
const MISS_FIELDS: (&str, &str) = ("miss", "count_miss");

/// 统一成绩数据。
///
/// 仅在缺少必需字段（id、accuracy、max_combo、rank、mods）时返回 `MalformedPayload`，
/// 其余可选字段缺失时取默认值并记录日志。
pub fn normalize(raw: &Value, link: ScoreLink) -> AppResult<NormalizedScore> {
    let id = require(field_u64(raw, "id"), "成绩")?;
    let accuracy = require(field_f64(raw, "accuracy"), "成绩")?;
    let max_combo = require(field_u32(raw, "max_combo"), "成绩")?;
    let rank = require(field_str(raw, "rank"), "成绩")?.to_string();
    let mods = extract_mods(require(field_array(raw, "mods"), "成绩")?);

    let (play_time, play_time_source) = extract_play_time(raw);

    Ok(NormalizedScore {
        id,
        pp: extract_pp(raw),
        accuracy,
        max_combo,
        rank,
        mods,
        score_url: link.url,
        generation: link.generation,
        judgements: extract_judgements(raw),
        play_time,
        play_time_source,
    })
}

fn extract_pp(raw: &Value) -> f64 {
    match field_f64(raw, "pp") {
        Ok(pp) if pp.is_finite() && pp >= 0.0 => pp,
        Ok(pp) => {
            log::warn!("成绩 pp 值异常 ({pp})，按 0 处理");
            0.0
        }
        Err(e) if e.is_unexpected() => {
            log::warn!("读取 pp 失败: {e}，按 0 处理");
            0.0
        }
        Err(e) => {
            log::debug!("{e}，pp 按 0 处理");
            0.0
        }
    }
}

fn extract_play_time(raw: &Value) -> (DateTime<Utc>, PlayTimeSource) {
    let candidates = [
        ("created_at", PlayTimeSource::CreatedAt),
        ("ended_at", PlayTimeSource::EndedAt),
    ];

    for (key, source) in candidates {
        match field_str(raw, key) {
            Ok(text) => match DateTime::parse_from_rfc3339(text) {
                Ok(time) => return (time.with_timezone(&Utc), source),
                Err(e) => log::warn!("无法解析时间字段 {key}={text:?}: {e}"),
            },
            Err(e) if e.is_unexpected() => log::warn!("读取时间字段失败: {e}"),
            Err(e) => log::debug!("{e}"),
        }
    }

    log::debug!("成绩没有可用的游玩时间，使用 Unix 纪元");
    (DateTime::<Utc>::UNIX_EPOCH, PlayTimeSource::Missing)
}

/// 依次尝试各解析方式，只采用第一个形状匹配的结果
fn extract_mods(entries: &[Value]) -> Vec<String> {
    for (name, decoder) in MOD_DECODERS {
        match decoder(entries) {
            Some(mods) => {
                log::debug!("Mod 列表按{name}解析，共 {} 个", mods.len());
                return mods;
            }
            None => log::warn!("Mod 列表不是{name}，尝试下一种解析方式"),
        }
    }
    Vec::new()
}

fn decode_mod_objects(entries: &[Value]) -> Option<Vec<String>> {
    let mut mods = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Value::Null => continue,
            // lazer 形式的 Mod 对象，只取 `acronym`，`settings` 等字段忽略
            Value::Object(_) => match field_str(entry, "acronym") {
                Ok(acronym) if !acronym.is_empty() => mods.push(acronym.to_string()),
                Ok(_) => log::debug!("Mod 对象的 acronym 为空，已忽略"),
                Err(e) if e.is_unexpected() => log::warn!("忽略无法解析的 Mod 对象: {e}"),
                Err(e) => log::debug!("{e}，Mod 对象已忽略"),
            },
            _ => return None,
        }
    }
    Some(mods)
}

fn decode_mod_strings(entries: &[Value]) -> Option<Vec<String>> {
    let mods = entries
        .iter()
        .filter_map(Value::as_str)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect();
    Some(mods)
}

fn extract_judgements(raw: &Value) -> Judgements {
    let statistics = match field_object(raw, "statistics") {
        Ok(statistics) => statistics,
        Err(e) => {
            if e.is_unexpected() {
                log::warn!("读取判定统计失败: {e}");
            } else {
                log::debug!("{e}，判定数全部按 0 处理");
            }
            return Judgements::default();
        }
    };

    Judgements {
        great: judgement_count(statistics, GREAT_FIELDS),
        ok: judgement_count(statistics, OK_FIELDS),
        meh: judgement_count(statistics, MEH_FIELDS),
        miss: judgement_count(statistics, MISS_FIELDS),
    }
}

/// 先读新命名，缺失时再读旧命名；两者互斥，不会相加
fn judgement_count(statistics: &Value, (named, legacy): (&str, &str)) -> u32 {
    let fallback = |named_err: FieldUnavailable| {
        if named_err.is_unexpected() {
            log::warn!("读取判定数失败: {named_err}");
        }
        field_u32(statistics, legacy)
    };

    field_u32(statistics, named)
        .or_else(fallback)
        .unwrap_or_else(|e| {
            if e.is_unexpected() {
                log::warn!("读取判定数失败: {e}");
            } else {
                log::debug!("判定 {named}/{legacy} 均不可用，按 0 处理");
            }
            0
        })
}
