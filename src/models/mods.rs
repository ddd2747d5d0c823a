use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::utils::error::{AppError, AppResult};

/// 传给难度属性接口的 Mod 位掩码
pub type ModBitmask = u32;

/// osu! 标准模式的 Mod
///
/// 每个变体持有自己的位；NC 与 PF 为复合 Mod，编码时会同时置上其隐含的 DT / SD 位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum GameMod {
    #[serde(rename = "NM")]
    NoMod,
    #[serde(rename = "NF")]
    NoFail,
    #[serde(rename = "EZ")]
    Easy,
    #[serde(rename = "TD")]
    TouchDevice,
    #[serde(rename = "HD")]
    Hidden,
    #[serde(rename = "HR")]
    HardRock,
    #[serde(rename = "SD")]
    SuddenDeath,
    #[serde(rename = "DT")]
    DoubleTime,
    #[serde(rename = "RX")]
    Relax,
    #[serde(rename = "HT")]
    HalfTime,
    #[serde(rename = "NC")]
    Nightcore,
    #[serde(rename = "FL")]
    Flashlight,
    #[serde(rename = "AT")]
    Autoplay,
    #[serde(rename = "SO")]
    SpunOut,
    #[serde(rename = "AP")]
    Autopilot,
    #[serde(rename = "PF")]
    Perfect,
}

impl GameMod {
    /// 位掩码表的顺序，也是 `decode` 的输出顺序
    pub const ALL: [GameMod; 16] = [
        GameMod::NoMod,
        GameMod::NoFail,
        GameMod::Easy,
        GameMod::TouchDevice,
        GameMod::Hidden,
        GameMod::HardRock,
        GameMod::SuddenDeath,
        GameMod::DoubleTime,
        GameMod::Relax,
        GameMod::HalfTime,
        GameMod::Nightcore,
        GameMod::Flashlight,
        GameMod::Autoplay,
        GameMod::SpunOut,
        GameMod::Autopilot,
        GameMod::Perfect,
    ];

    pub fn acronym(self) -> &'static str {
        match self {
            GameMod::NoMod => "NM",
            GameMod::NoFail => "NF",
            GameMod::Easy => "EZ",
            GameMod::TouchDevice => "TD",
            GameMod::Hidden => "HD",
            GameMod::HardRock => "HR",
            GameMod::SuddenDeath => "SD",
            GameMod::DoubleTime => "DT",
            GameMod::Relax => "RX",
            GameMod::HalfTime => "HT",
            GameMod::Nightcore => "NC",
            GameMod::Flashlight => "FL",
            GameMod::Autoplay => "AT",
            GameMod::SpunOut => "SO",
            GameMod::Autopilot => "AP",
            GameMod::Perfect => "PF",
        }
    }

    /// 该 Mod 自身保留的位（NM 为 0）
    pub fn base_bit(self) -> ModBitmask {
        match self {
            GameMod::NoMod => 0,
            GameMod::NoFail => 1 << 0,
            GameMod::Easy => 1 << 1,
            GameMod::TouchDevice => 1 << 2,
            GameMod::Hidden => 1 << 3,
            GameMod::HardRock => 1 << 4,
            GameMod::SuddenDeath => 1 << 5,
            GameMod::DoubleTime => 1 << 6,
            GameMod::Relax => 1 << 7,
            GameMod::HalfTime => 1 << 8,
            GameMod::Nightcore => 1 << 9,
            GameMod::Flashlight => 1 << 10,
            GameMod::Autoplay => 1 << 11,
            GameMod::SpunOut => 1 << 12,
            GameMod::Autopilot => 1 << 13,
            GameMod::Perfect => 1 << 14,
        }
    }

    /// 复合 Mod 隐含的基础 Mod
    pub fn implied(self) -> Option<GameMod> {
        match self {
            GameMod::Nightcore => Some(GameMod::DoubleTime),
            GameMod::Perfect => Some(GameMod::SuddenDeath),
            _ => None,
        }
    }

    /// 编码单个 Mod：自身位 | 隐含基础 Mod 的位
    pub fn bits(self) -> ModBitmask {
        self.base_bit() | self.implied().map_or(0, GameMod::bits)
    }

    pub fn from_acronym(acronym: &str) -> AppResult<GameMod> {
        let trimmed = acronym.trim();
        GameMod::ALL
            .into_iter()
            .find(|m| m.acronym().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| AppError::InvalidModifier(acronym.to_string()))
    }
}

impl fmt::Display for GameMod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.acronym())
    }
}

impl FromStr for GameMod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameMod::from_acronym(s)
    }
}

/// 将 Mod 集合编码为位掩码
pub fn encode(mods: &[GameMod]) -> ModBitmask {
    mods.iter().fold(0, |mask, m| mask | m.bits())
}

/// 由位掩码还原 Mod 列表，复合 Mod 会吸收其隐含的基础 Mod
pub fn decode(mask: ModBitmask) -> Vec<GameMod> {
    let present: Vec<GameMod> = GameMod::ALL
        .into_iter()
        .filter(|m| m.base_bit() != 0 && mask & m.base_bit() != 0)
        .collect();

    present
        .iter()
        .copied()
        .filter(|m| {
            !present
                .iter()
                .any(|composite| composite.implied() == Some(*m))
        })
        .collect()
}

/// 解析调用方给出的 Mod 列表（逗号或空白分隔），保持顺序并去重
pub fn parse_list(input: &str) -> AppResult<Vec<GameMod>> {
    let acronyms: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    parse_acronyms(&acronyms)
}

pub fn parse_acronyms<S: AsRef<str>>(acronyms: &[S]) -> AppResult<Vec<GameMod>> {
    let mut mods = Vec::with_capacity(acronyms.len());
    for acronym in acronyms {
        let m = GameMod::from_acronym(acronym.as_ref())?;
        if !mods.contains(&m) {
            mods.push(m);
        }
    }
    Ok(mods)
}
