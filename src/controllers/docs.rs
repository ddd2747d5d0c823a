use actix_web::{get, HttpResponse, Responder};
use utoipa::OpenApi;

use crate::controllers::{beatmap_controller, health, score_controller, user_controller};
use crate::models::{
    Beatmap, GameMod, Judgements, NormalizedScore, PlayTimeSource, ResolvedBeatmapAttributes,
    ScoreGeneration, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        score_controller::get_score,
        score_controller::get_recent_scores,
        beatmap_controller::get_beatmap,
        beatmap_controller::get_beatmap_attributes,
        user_controller::get_user,
    ),
    components(schemas(
        Beatmap,
        ResolvedBeatmapAttributes,
        GameMod,
        NormalizedScore,
        Judgements,
        ScoreGeneration,
        PlayTimeSource,
        User,
    )),
    tags(
        (name = "Score", description = "成绩查询"),
        (name = "Beatmap", description = "谱面与难度属性"),
        (name = "User", description = "用户信息"),
        (name = "Status", description = "服务状态")
    )
)]
pub struct ApiDoc;

/// OpenAPI 文档
#[get("/api-docs/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
