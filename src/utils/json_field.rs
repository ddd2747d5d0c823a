//! 上游 JSON 的显式字段查找。
//!
//! 可选字段通过 `Result<T, FieldUnavailable>` 返回“存在/缺失”，由调用方决定默认值；
//! 必需字段通过 [`require`] 转换为 `AppError::MalformedPayload`。

use serde_json::Value;
use thiserror::Error;

use crate::utils::error::AppError;

/// 可选字段不可用的原因（内部错误，不会向外传播）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldUnavailable {
    #[error("字段 `{0}` 不存在")]
    Missing(String),

    #[error("字段 `{0}` 为 null")]
    Null(String),

    #[error("字段 `{field}` 类型错误，期望 {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

impl FieldUnavailable {
    /// 字段存在但不可解析，属于需要 warn 的意外情况
    pub fn is_unexpected(&self) -> bool {
        matches!(self, FieldUnavailable::WrongType { .. })
    }
}

fn lookup<'a>(obj: &'a Value, key: &str) -> Result<&'a Value, FieldUnavailable> {
    match obj.get(key) {
        None => Err(FieldUnavailable::Missing(key.to_string())),
        Some(Value::Null) => Err(FieldUnavailable::Null(key.to_string())),
        Some(value) => Ok(value),
    }
}

pub fn field_f64(obj: &Value, key: &str) -> Result<f64, FieldUnavailable> {
    lookup(obj, key)?
        .as_f64()
        .ok_or_else(|| FieldUnavailable::WrongType {
            field: key.to_string(),
            expected: "number",
        })
}

pub fn field_u64(obj: &Value, key: &str) -> Result<u64, FieldUnavailable> {
    lookup(obj, key)?
        .as_u64()
        .ok_or_else(|| FieldUnavailable::WrongType {
            field: key.to_string(),
            expected: "unsigned integer",
        })
}

pub fn field_u32(obj: &Value, key: &str) -> Result<u32, FieldUnavailable> {
    let value = field_u64(obj, key)?;
    u32::try_from(value).map_err(|_| FieldUnavailable::WrongType {
        field: key.to_string(),
        expected: "u32",
    })
}

pub fn field_str<'a>(obj: &'a Value, key: &str) -> Result<&'a str, FieldUnavailable> {
    lookup(obj, key)?
        .as_str()
        .ok_or_else(|| FieldUnavailable::WrongType {
            field: key.to_string(),
            expected: "string",
        })
}

pub fn field_array<'a>(obj: &'a Value, key: &str) -> Result<&'a Vec<Value>, FieldUnavailable> {
    lookup(obj, key)?
        .as_array()
        .ok_or_else(|| FieldUnavailable::WrongType {
            field: key.to_string(),
            expected: "array",
        })
}

pub fn field_object<'a>(obj: &'a Value, key: &str) -> Result<&'a Value, FieldUnavailable> {
    let value = lookup(obj, key)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(FieldUnavailable::WrongType {
            field: key.to_string(),
            expected: "object",
        })
    }
}

/// 将必需字段的缺失转换为致命的 `MalformedPayload`
pub fn require<T>(result: Result<T, FieldUnavailable>, context: &str) -> Result<T, AppError> {
    result.map_err(|e| AppError::MalformedPayload(format!("{context}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn distinguishes_missing_null_and_wrong_type() {
        let obj = json!({ "pp": null, "rank": 3, "accuracy": 0.98 });

        assert_eq!(
            field_f64(&obj, "max_combo"),
            Err(FieldUnavailable::Missing("max_combo".to_string()))
        );
        assert_eq!(
            field_f64(&obj, "pp"),
            Err(FieldUnavailable::Null("pp".to_string()))
        );
        assert!(field_str(&obj, "rank").unwrap_err().is_unexpected());
        assert_eq!(field_f64(&obj, "accuracy"), Ok(0.98));
    }

    #[test]
    fn u32_lookup_rejects_negative_and_overflow() {
        let obj = json!({ "a": -1, "b": 5_000_000_000u64, "c": 7 });
        assert!(field_u32(&obj, "a").is_err());
        assert!(field_u32(&obj, "b").is_err());
        assert_eq!(field_u32(&obj, "c"), Ok(7));
    }

    #[test]
    fn require_maps_to_malformed_payload() {
        let obj = json!({});
        let err = require(field_u64(&obj, "id"), "score").unwrap_err();
        assert!(matches!(err, AppError::MalformedPayload(msg) if msg.contains("id")));
    }
}
