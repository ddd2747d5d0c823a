use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use std::sync::Arc;

mod config;
mod controllers;
mod models;
mod routes;
mod services;
mod utils;

use config::CONFIG;
use services::{BeatmapService, OsuClient, ScoreService, UserService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 加载.env文件
    dotenv().ok();

    // 初始化日志
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    // 构建 osu! API 客户端，缺少凭据时直接退出
    let osu_client = OsuClient::new(&CONFIG)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let osu_client = Arc::new(osu_client);
    log::info!("osu! API 地址: {}", CONFIG.osu_api_base_url);

    let score_service = web::Data::new(ScoreService::new(osu_client.clone()));
    let beatmap_service = web::Data::new(BeatmapService::new(osu_client.clone()));
    let user_service = web::Data::new(UserService::new(osu_client));

    let host = CONFIG.host.clone();
    let port = CONFIG.port;
    log::info!("Starting server at http://{}:{}", host, port);

    // 创建并启动HTTP服务器
    HttpServer::new(move || {
        // 配置CORS
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(score_service.clone())
            .app_data(beatmap_service.clone())
            .app_data(user_service.clone())
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
