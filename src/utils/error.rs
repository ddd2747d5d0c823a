use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("无效的 Mod 缩写: {0}")]
    InvalidModifier(String),

    #[error("找不到成绩: {0}")]
    ScoreNotFound(String),

    #[error("找不到谱面: {0}")]
    BeatmapNotFound(String),

    #[error("找不到用户: {0}")]
    UserNotFound(String),

    #[error("上游数据格式错误: {0}")]
    MalformedPayload(String),

    #[error("认证错误: {0}")]
    AuthError(String),

    #[error("上游接口错误: HTTP {status}, {message}")]
    UpstreamError { status: u16, message: String },

    #[error("错误的请求: {0}")]
    BadRequest(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("HTTP请求错误: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        use actix_web::http::StatusCode;

        let (status_code, error_type) = match self {
            AppError::InvalidModifier(_) => (StatusCode::BAD_REQUEST, "invalid_modifier"),
            AppError::ScoreNotFound(_) => (StatusCode::NOT_FOUND, "score_not_found"),
            AppError::BeatmapNotFound(_) => (StatusCode::NOT_FOUND, "beatmap_not_found"),
            AppError::UserNotFound(_) => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::MalformedPayload(_) => (StatusCode::BAD_GATEWAY, "malformed_payload"),
            AppError::AuthError(_) => (StatusCode::UNAUTHORIZED, "authentication_error"),
            AppError::UpstreamError { .. } => (StatusCode::BAD_GATEWAY, "upstream_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error"),
            AppError::ReqwestError(_) => (StatusCode::BAD_GATEWAY, "request_error"),
        };

        HttpResponse::build(status_code).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        })
    }
}
