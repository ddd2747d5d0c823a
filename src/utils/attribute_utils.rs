use crate::models::beatmap::{RawBeatmapMetadata, RemoteAttributeResult, ResolvedBeatmapAttributes};
use crate::models::mods::GameMod;

const HP_DRAIN_MAX: f64 = 10.0;
const HARD_ROCK_HP_MULTIPLIER: f64 = 1.4;
const HARD_ROCK_CS_MULTIPLIER: f64 = 1.3;
const EASY_MULTIPLIER: f64 = 0.5;
const TEMPO_MULTIPLIER: f64 = 1.5;

/// 合并远端属性与原始谱面数据，并在本地补上远端不会处理的 CS/HP/BPM/长度修正。
///
/// AR、OD、星数和最大连击直接信任远端结果。其余四项按 `mods` 给出的顺序逐个应用。
///
/// 调用方不能同时传入 DT 与 NC（或 HT 与任一加速 Mod），否则变速修正会被重复应用。
pub fn reconcile(
    raw: &RawBeatmapMetadata,
    mods: &[GameMod],
    remote: &RemoteAttributeResult,
) -> ResolvedBeatmapAttributes {
    let seeded = ResolvedBeatmapAttributes {
        approach_rate: remote.approach_rate,
        circle_size: raw.circle_size,
        overall_difficulty: remote.overall_difficulty,
        hp_drain: raw.hp_drain,
        bpm: raw.bpm,
        star_rating: remote.star_rating,
        max_combo: remote.max_combo,
        length: raw.total_length,
    };

    let resolved = mods.iter().fold(seeded, apply_mod);
    log::debug!(
        "[属性修正] 谱面 {} 应用 {} 个 Mod 后: CS {:.2}, HP {:.2}, BPM {:.1}, 长度 {}s",
        raw.id,
        mods.len(),
        resolved.circle_size,
        resolved.hp_drain,
        resolved.bpm,
        resolved.length
    );
    resolved
}

fn apply_mod(mut attrs: ResolvedBeatmapAttributes, m: &GameMod) -> ResolvedBeatmapAttributes {
    match m {
        GameMod::HardRock => {
            attrs.hp_drain = (attrs.hp_drain * HARD_ROCK_HP_MULTIPLIER).min(HP_DRAIN_MAX);
            attrs.circle_size *= HARD_ROCK_CS_MULTIPLIER;
        }
        GameMod::Easy => {
            attrs.circle_size *= EASY_MULTIPLIER;
            attrs.hp_drain *= EASY_MULTIPLIER;
        }
        GameMod::DoubleTime | GameMod::Nightcore => {
            attrs.bpm *= TEMPO_MULTIPLIER;
            attrs.length = (f64::from(attrs.length) / TEMPO_MULTIPLIER) as u32;
        }
        GameMod::HalfTime => {
            attrs.bpm /= TEMPO_MULTIPLIER;
            attrs.length = (f64::from(attrs.length) * TEMPO_MULTIPLIER) as u32;
        }
        GameMod::NoMod
        | GameMod::NoFail
        | GameMod::TouchDevice
        | GameMod::Hidden
        | GameMod::SuddenDeath
        | GameMod::Relax
        | GameMod::Flashlight
        | GameMod::Autoplay
        | GameMod::SpunOut
        | GameMod::Autopilot
        | GameMod::Perfect => {}
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(cs: f64, hp: f64, bpm: f64, length: u32) -> RawBeatmapMetadata {
        RawBeatmapMetadata {
            id: 75,
            version: "Normal".to_string(),
            circle_size: cs,
            hp_drain: hp,
            bpm,
            total_length: length,
        }
    }

    fn remote() -> RemoteAttributeResult {
        RemoteAttributeResult {
            approach_rate: 9.67,
            overall_difficulty: 9.08,
            star_rating: 5.43,
            max_combo: 1024,
        }
    }

    #[test]
    fn no_mods_passes_inputs_through() {
        let raw = raw(4.0, 6.0, 180.0, 180);
        let resolved = reconcile(&raw, &[], &remote());

        assert_eq!(resolved.circle_size, 4.0);
        assert_eq!(resolved.hp_drain, 6.0);
        assert_eq!(resolved.bpm, 180.0);
        assert_eq!(resolved.length, 180);
        assert_eq!(resolved.approach_rate, 9.67);
        assert_eq!(resolved.overall_difficulty, 9.08);
        assert_eq!(resolved.star_rating, 5.43);
        assert_eq!(resolved.max_combo, 1024);
    }

    #[test]
    fn hard_rock_clamps_hp_and_scales_cs() {
        let resolved = reconcile(&raw(4.0, 8.0, 180.0, 180), &[GameMod::HardRock], &remote());
        assert_eq!(resolved.hp_drain, 10.0);
        assert_eq!(resolved.circle_size, 4.0 * 1.3);

        let resolved = reconcile(&raw(4.0, 5.0, 180.0, 180), &[GameMod::HardRock], &remote());
        assert_eq!(resolved.hp_drain, 5.0 * 1.4);
    }

    #[test]
    fn easy_halves_cs_and_hp() {
        let resolved = reconcile(&raw(4.0, 6.0, 180.0, 180), &[GameMod::Easy], &remote());
        assert_eq!(resolved.circle_size, 2.0);
        assert_eq!(resolved.hp_drain, 3.0);
    }

    #[test]
    fn double_time_speeds_up_bpm_and_truncates_length() {
        let resolved = reconcile(&raw(4.0, 6.0, 180.0, 180), &[GameMod::DoubleTime], &remote());
        assert_eq!(resolved.bpm, 270.0);
        assert_eq!(resolved.length, 120);

        let resolved = reconcile(&raw(4.0, 6.0, 180.0, 100), &[GameMod::Nightcore], &remote());
        assert_eq!(resolved.length, 66);
    }

    #[test]
    fn half_time_slows_down_bpm_and_truncates_length() {
        let resolved = reconcile(&raw(4.0, 6.0, 180.0, 101), &[GameMod::HalfTime], &remote());
        assert_eq!(resolved.bpm, 120.0);
        assert_eq!(resolved.length, 151);
    }

    #[test]
    fn visual_mods_have_no_numeric_effect() {
        let raw = raw(4.0, 6.0, 180.0, 180);
        let mods = [
            GameMod::Hidden,
            GameMod::Flashlight,
            GameMod::SpunOut,
            GameMod::SuddenDeath,
            GameMod::Perfect,
            GameMod::NoFail,
            GameMod::Relax,
            GameMod::Autopilot,
            GameMod::Autoplay,
        ];
        assert_eq!(reconcile(&raw, &mods, &remote()), reconcile(&raw, &[], &remote()));
    }

    #[test]
    fn double_time_with_nightcore_applies_twice() {
        let resolved = reconcile(
            &raw(4.0, 6.0, 100.0, 180),
            &[GameMod::DoubleTime, GameMod::Nightcore],
            &remote(),
        );
        assert_eq!(resolved.bpm, 225.0);
        assert_eq!(resolved.length, 80);
    }

    #[test]
    fn mods_apply_in_supplied_order() {
        // HR 先乘 1.4 被截到 10 再减半，与 EZ 在前结果不同
        let hr_then_ez = reconcile(
            &raw(4.0, 8.0, 180.0, 180),
            &[GameMod::HardRock, GameMod::Easy],
            &remote(),
        );
        let ez_then_hr = reconcile(
            &raw(4.0, 8.0, 180.0, 180),
            &[GameMod::Easy, GameMod::HardRock],
            &remote(),
        );
        assert_eq!(hr_then_ez.hp_drain, 5.0);
        assert_eq!(ez_then_hr.hp_drain, 4.0 * 1.4);
    }
}
