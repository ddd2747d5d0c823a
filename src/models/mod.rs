pub mod beatmap;
pub mod mods;
pub mod score;
pub mod user;

pub use beatmap::*;
pub use mods::GameMod;
pub use score::*;
pub use user::*;
