use actix_web::{get, web, HttpResponse};
use log::debug;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::mods::{decode, parse_list};
use crate::models::{ApiResponse, Beatmap, GameMod, ResolvedBeatmapAttributes};
use crate::services::BeatmapService;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BeatmapQuery {
    /// Mod 缩写，逗号分隔，如 `HD,DT`
    pub mods: Option<String>,
    /// Mod 位掩码，与 `mods` 二选一
    pub mask: Option<u32>,
}

impl BeatmapQuery {
    /// 先校验 Mod，未知缩写不发起任何请求
    fn resolve_mods(&self) -> AppResult<Vec<GameMod>> {
        match (&self.mods, self.mask) {
            (Some(_), Some(_)) => Err(AppError::BadRequest(
                "参数 mods 与 mask 不能同时使用".to_string(),
            )),
            (Some(mods), None) => parse_list(mods),
            (None, Some(mask)) => Ok(decode(mask)),
            (None, None) => Ok(Vec::new()),
        }
    }
}

/// 获取谱面及指定 Mod 下的属性
#[utoipa::path(
    get,
    path = "/beatmaps/{beatmap_id}",
    tag = "Beatmap",
    params(("beatmap_id" = u64, Path, description = "谱面 ID"), BeatmapQuery),
    responses(
        (status = 200, description = "谱面与修正后的属性", body = ApiResponse<Beatmap>),
        (status = 400, description = "包含未知的 Mod 缩写"),
        (status = 404, description = "谱面不存在")
    )
)]
#[get("/beatmaps/{beatmap_id}")]
pub async fn get_beatmap(
    beatmap_id: web::Path<u64>,
    query: web::Query<BeatmapQuery>,
    beatmap_service: web::Data<BeatmapService>,
) -> AppResult<HttpResponse> {
    let beatmap_id = beatmap_id.into_inner();
    debug!("接收到谱面查询请求: beatmap_id={beatmap_id}, query={:?}", query);

    let mods = query.resolve_mods()?;
    let beatmap = beatmap_service.get_beatmap(beatmap_id, &mods).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(beatmap)))
}

/// 只获取指定 Mod 下修正后的属性
#[utoipa::path(
    get,
    path = "/beatmaps/{beatmap_id}/attributes",
    tag = "Beatmap",
    params(("beatmap_id" = u64, Path, description = "谱面 ID"), BeatmapQuery),
    responses(
        (status = 200, description = "修正后的属性", body = ApiResponse<ResolvedBeatmapAttributes>),
        (status = 400, description = "包含未知的 Mod 缩写"),
        (status = 404, description = "谱面不存在")
    )
)]
#[get("/beatmaps/{beatmap_id}/attributes")]
pub async fn get_beatmap_attributes(
    beatmap_id: web::Path<u64>,
    query: web::Query<BeatmapQuery>,
    beatmap_service: web::Data<BeatmapService>,
) -> AppResult<HttpResponse> {
    let beatmap_id = beatmap_id.into_inner();
    debug!("接收到谱面属性查询请求: beatmap_id={beatmap_id}, query={:?}", query);

    let mods = query.resolve_mods()?;
    let attributes = beatmap_service.get_attributes(beatmap_id, &mods).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(attributes)))
}
