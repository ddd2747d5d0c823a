use actix_web::{get, web, HttpResponse};
use log::debug;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::{ApiResponse, NormalizedScore};
use crate::services::ScoreService;
use crate::utils::error::AppResult;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentScoresQuery {
    /// 上一页响应给出的游标
    pub cursor_string: Option<String>,
}

/// 获取单条成绩
///
/// lazer 接口找不到时自动回退到旧版接口。
#[utoipa::path(
    get,
    path = "/scores/{score_id}",
    tag = "Score",
    params(("score_id" = u64, Path, description = "成绩 ID")),
    responses(
        (status = 200, description = "统一后的成绩", body = ApiResponse<NormalizedScore>),
        (status = 404, description = "两个接口都找不到该成绩")
    )
)]
#[get("/scores/{score_id}")]
pub async fn get_score(
    score_id: web::Path<u64>,
    score_service: web::Data<ScoreService>,
) -> AppResult<HttpResponse> {
    let score_id = score_id.into_inner();
    debug!("接收到成绩查询请求: score_id={score_id}");

    let score = score_service.get_score(score_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(score)))
}

/// 获取用户最近的成绩
#[utoipa::path(
    get,
    path = "/users/{user_id}/scores/recent",
    tag = "Score",
    params(("user_id" = String, Path, description = "用户 ID 或用户名"), RecentScoresQuery),
    responses(
        (status = 200, description = "最近成绩列表", body = ApiResponse<Vec<NormalizedScore>>),
        (status = 404, description = "用户不存在")
    )
)]
#[get("/users/{user_id}/scores/recent")]
pub async fn get_recent_scores(
    user_id: web::Path<String>,
    query: web::Query<RecentScoresQuery>,
    score_service: web::Data<ScoreService>,
) -> AppResult<HttpResponse> {
    debug!(
        "接收到最近成绩查询请求: user_id={}, cursor={:?}",
        user_id, query.cursor_string
    );

    let scores = score_service
        .get_recent_scores(&user_id, query.cursor_string.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(scores)))
}
