use actix_web::{get, HttpResponse, Responder};

/// 健康检查端点
///
/// 只说明服务进程可以响应请求，不会访问 osu! API。
#[utoipa::path(
    get,
    path = "/health",
    tag = "Status",
    responses(
        (status = 200, description = "服务健康", body = String, example = json!("OK"))
    )
)]
#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}
