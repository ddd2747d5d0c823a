pub mod beatmap_controller;
pub mod docs;
pub mod health;
pub mod score_controller;
pub mod user_controller;

pub use beatmap_controller::{get_beatmap, get_beatmap_attributes};
pub use docs::openapi_json;
pub use health::health_check;
pub use score_controller::{get_recent_scores, get_score};
pub use user_controller::get_user;
