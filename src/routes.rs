use actix_web::web;
use crate::controllers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Status
        .service(controllers::health_check)        // GET /health
        .service(controllers::openapi_json)        // GET /api-docs/openapi.json
        // Score
        .service(controllers::get_score)           // GET /scores/{score_id}
        .service(controllers::get_recent_scores)   // GET /users/{user_id}/scores/recent
        // Beatmap
        .service(controllers::get_beatmap)         // GET /beatmaps/{beatmap_id}?mods=HD,DT
        .service(controllers::get_beatmap_attributes) // GET /beatmaps/{beatmap_id}/attributes?mask=72
        // User
        .service(controllers::get_user);           // GET /users/{user_id}
}
