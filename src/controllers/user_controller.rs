use actix_web::{get, web, HttpResponse};
use log::debug;

use crate::models::{ApiResponse, User};
use crate::services::UserService;
use crate::utils::error::AppResult;

/// 获取用户信息及排名历史
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "User",
    params(("user_id" = String, Path, description = "用户 ID 或用户名")),
    responses(
        (status = 200, description = "用户信息", body = ApiResponse<User>),
        (status = 404, description = "用户不存在")
    )
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    user_id: web::Path<String>,
    user_service: web::Data<UserService>,
) -> AppResult<HttpResponse> {
    debug!("接收到用户查询请求: user_id={user_id}");

    let user = user_service.get_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}
