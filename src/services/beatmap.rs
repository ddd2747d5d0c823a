use serde_json::{json, Value};
use std::sync::Arc;

use crate::models::beatmap::{
    format_length, Beatmap, RawBeatmapMetadata, RemoteAttributeResult, ResolvedBeatmapAttributes,
};
use crate::models::mods::{self, GameMod, ModBitmask};
use crate::services::osu::{read_json, OsuClient};
use crate::utils::attribute_utils::reconcile;
use crate::utils::error::{AppError, AppResult};
use crate::utils::json_field::{field_f64, field_object, field_str, field_u32, require};

const RULESET: &str = "osu";

// 谱面服务：原始数据 + 远端难度属性 + 本地 Mod 修正
#[derive(Clone)]
pub struct BeatmapService {
    osu: Arc<OsuClient>,
}

impl BeatmapService {
    pub fn new(osu: Arc<OsuClient>) -> Self {
        Self { osu }
    }

    /// 获取谱面及其在给定 Mod 下的属性
    pub async fn get_beatmap(&self, beatmap_id: u64, mods: &[GameMod]) -> AppResult<Beatmap> {
        let mask = mods::encode(mods);
        log::debug!("获取谱面 {beatmap_id}，Mod {mods:?} -> 位掩码 {mask}");

        let (raw, remote) = tokio::try_join!(
            self.fetch_metadata(beatmap_id),
            self.fetch_attributes(beatmap_id, mask)
        )?;
        let attributes = reconcile(&raw, mods, &remote);

        Ok(Beatmap {
            id: raw.id,
            difficulty: raw.version.clone(),
            url: format!("{}/beatmaps/{}", self.osu.web_url(), raw.id),
            formatted_length: format_length(raw.total_length),
            mods: mods.to_vec(),
            attributes,
        })
    }

    /// 只获取修正后的属性
    pub async fn get_attributes(
        &self,
        beatmap_id: u64,
        mods: &[GameMod],
    ) -> AppResult<ResolvedBeatmapAttributes> {
        let (raw, remote) = tokio::try_join!(
            self.fetch_metadata(beatmap_id),
            self.fetch_attributes(beatmap_id, mods::encode(mods))
        )?;
        Ok(reconcile(&raw, mods, &remote))
    }

    async fn fetch_metadata(&self, beatmap_id: u64) -> AppResult<RawBeatmapMetadata> {
        let id = beatmap_id.to_string();
        let response = self.osu.get(&["beatmaps", id.as_str()], &[]).await?;
        let payload = read_json(response, || AppError::BeatmapNotFound(id.clone())).await?;
        parse_metadata(beatmap_id, &payload)
    }

    async fn fetch_attributes(
        &self,
        beatmap_id: u64,
        mask: ModBitmask,
    ) -> AppResult<RemoteAttributeResult> {
        let id = beatmap_id.to_string();
        let body = json!({ "mods": mask, "ruleset": RULESET });
        let response = self
            .osu
            .post_json(&["beatmaps", id.as_str(), "attributes"], &body)
            .await?;
        let payload = read_json(response, || AppError::BeatmapNotFound(id.clone())).await?;
        parse_attributes(&payload)
    }
}

fn parse_metadata(beatmap_id: u64, payload: &Value) -> AppResult<RawBeatmapMetadata> {
    Ok(RawBeatmapMetadata {
        id: beatmap_id,
        version: require(field_str(payload, "version"), "谱面")?.to_string(),
        circle_size: require(field_f64(payload, "cs"), "谱面")?,
        hp_drain: require(field_f64(payload, "drain"), "谱面")?,
        bpm: require(field_f64(payload, "bpm"), "谱面")?,
        total_length: require(field_u32(payload, "total_length"), "谱面")?,
    })
}

/// 线上接口把属性包在 `attributes` 下，也接受直接放在顶层的形式
fn parse_attributes(payload: &Value) -> AppResult<RemoteAttributeResult> {
    let attrs = field_object(payload, "attributes").unwrap_or(payload);
    Ok(RemoteAttributeResult {
        approach_rate: require(field_f64(attrs, "approach_rate"), "难度属性")?,
        overall_difficulty: require(field_f64(attrs, "overall_difficulty"), "难度属性")?,
        star_rating: require(field_f64(attrs, "star_rating"), "难度属性")?,
        max_combo: require(field_u32(attrs, "max_combo"), "难度属性")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::osu::test_support::mock_client;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> BeatmapService {
        BeatmapService::new(Arc::new(mock_client(server)))
    }

    async fn mount_metadata(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/v2/beatmaps/129891"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 129891,
                "version": "FOUR DIMENSIONS",
                "cs": 4.0,
                "drain": 8.0,
                "bpm": 180,
                "total_length": 180
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn resolves_attributes_for_mod_combination() {
        let server = MockServer::start().await;
        mount_metadata(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v2/beatmaps/129891/attributes"))
            .and(body_json(json!({ "mods": 88, "ruleset": "osu" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "attributes": {
                    "approach_rate": 10.33,
                    "overall_difficulty": 10.08,
                    "star_rating": 9.12,
                    "max_combo": 2385
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mods = [GameMod::Hidden, GameMod::HardRock, GameMod::DoubleTime];
        let beatmap = service(&server).get_beatmap(129891, &mods).await.unwrap();

        assert_eq!(beatmap.difficulty, "FOUR DIMENSIONS");
        assert_eq!(beatmap.url, "https://osu.ppy.sh/beatmaps/129891");
        assert_eq!(beatmap.formatted_length, "03:00");
        assert_eq!(beatmap.mods, mods.to_vec());

        let attrs = beatmap.attributes;
        assert_eq!(attrs.approach_rate, 10.33);
        assert_eq!(attrs.star_rating, 9.12);
        assert_eq!(attrs.max_combo, 2385);
        assert_eq!(attrs.hp_drain, 10.0);
        assert_eq!(attrs.circle_size, 4.0 * 1.3);
        assert_eq!(attrs.bpm, 270.0);
        assert_eq!(attrs.length, 120);
    }

    #[tokio::test]
    async fn accepts_top_level_attribute_shape() {
        let server = MockServer::start().await;
        mount_metadata(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v2/beatmaps/129891/attributes"))
            .and(body_json(json!({ "mods": 0, "ruleset": "osu" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "approach_rate": 9.0,
                "overall_difficulty": 8.5,
                "star_rating": 6.1,
                "max_combo": 2000
            })))
            .mount(&server)
            .await;

        let attrs = service(&server).get_attributes(129891, &[]).await.unwrap();
        assert_eq!(attrs.overall_difficulty, 8.5);
        assert_eq!(attrs.bpm, 180.0);
        assert_eq!(attrs.length, 180);
    }

    #[tokio::test]
    async fn missing_beatmap_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/beatmaps/1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v2/beatmaps/1/attributes"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = service(&server).get_beatmap(1, &[]).await.unwrap_err();
        assert!(matches!(err, AppError::BeatmapNotFound(ref id) if id == "1"));
    }

    #[test]
    fn incomplete_attributes_are_malformed() {
        let err = parse_attributes(&json!({ "attributes": { "star_rating": 5.0 } })).unwrap_err();
        assert!(matches!(err, AppError::MalformedPayload(_)));
    }
}
