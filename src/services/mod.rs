pub mod auth;
pub mod beatmap;
pub mod osu;
pub mod score;
pub mod user;

// 重新导出主要的服务结构体，以便可以直接从 services 模块导入
pub use beatmap::BeatmapService;
pub use osu::OsuClient;
pub use score::ScoreService;
pub use user::UserService;
