//! Fallback asset resolution for champion, item and spell icons plus ranked
//! emblems. Each kind carries an ordered candidate list over the public CDNs;
//! the first success wins and total failure degrades to a transparent
//! placeholder instead of an error, so a broken art pipeline can never break
//! a page render.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use base64::Engine;
use bytes::Bytes;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::AppError;

/// Transparent 1x1 PNG served when no candidate resolves.
static PLACEHOLDER_PNG: LazyLock<Bytes> = LazyLock::new(|| {
    let b64 = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
    // Static literal, decoding cannot fail.
    Bytes::from(
        base64::engine::general_purpose::STANDARD
            .decode(b64)
            .expect("placeholder png literal decodes"),
    )
});

pub fn placeholder_bytes() -> Bytes {
    PLACEHOLDER_PNG.clone()
}

pub const PLACEHOLDER_CACHE_CONTROL: &str = "public, max-age=3600";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    ChampionIcon,
    ItemIcon,
    SpellIcon,
    RankedEmblem,
}

impl AssetKind {
    /// Cache lifetime for a successfully resolved asset. Art only changes on
    /// patch releases, so everything is long-lived; champion squares get a
    /// shorter edge TTL since the "latest" alias moves with the patch.
    pub fn cache_control(self) -> &'static str {
        match self {
            Self::ChampionIcon => "public, max-age=3600, s-maxage=86400, stale-while-revalidate=604800",
            Self::ItemIcon | Self::SpellIcon | Self::RankedEmblem => {
                "public, max-age=86400, s-maxage=604800, stale-while-revalidate=2592000"
            }
        }
    }
}

impl FromStr for AssetKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "champion" => Ok(Self::ChampionIcon),
            "item" => Ok(Self::ItemIcon),
            "spell" => Ok(Self::SpellIcon),
            "rank-emblem" => Ok(Self::RankedEmblem),
            other => Err(AppError::InvalidParam(format!(
                "unknown asset kind: {other}"
            ))),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ChampionIcon => "champion",
            Self::ItemIcon => "item",
            Self::SpellIcon => "spell",
            Self::RankedEmblem => "rank-emblem",
        };
        f.write_str(s)
    }
}

/// Outcome of a resolution. Degradation is a success from the caller's point
/// of view; it only changes the bytes and the cache lifetime served.
#[derive(Debug, Clone)]
pub enum ResolvedAsset {
    Resolved {
        bytes: Bytes,
        content_type: String,
        source_url: String,
    },
    Degraded,
}

pub struct AssetResolver {
    http: reqwest::Client,
    ddragon_version: String,
}

impl AssetResolver {
    pub fn new(ddragon_version: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            ddragon_version: ddragon_version.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ddragon_version.clone())
    }

    /// Resolve `(kind, id)` to image bytes. Never fails: exhausting every
    /// candidate (or having none to try) yields [`ResolvedAsset::Degraded`].
    pub async fn resolve(&self, kind: AssetKind, id: &str) -> ResolvedAsset {
        let candidates = self.candidate_urls(kind, id);
        self.try_candidates(kind, id, &candidates).await
    }

    async fn try_candidates(&self, kind: AssetKind, id: &str, urls: &[String]) -> ResolvedAsset {
        for url in urls {
            match self.fetch_once(url).await {
                Some((bytes, content_type)) => {
                    info!(%kind, id, source = %url, "asset resolved");
                    return ResolvedAsset::Resolved {
                        bytes,
                        content_type,
                        source_url: url.clone(),
                    };
                }
                None => debug!(%kind, id, %url, "asset candidate failed, trying next"),
            }
        }

        debug!(%kind, id, "no asset candidate resolved, serving placeholder");
        ResolvedAsset::Degraded
    }

    /// Single plain fetch, no retries. Any error or non-success status just
    /// moves resolution on to the next candidate.
    async fn fetch_once(&self, url: &str) -> Option<(Bytes, String)> {
        let response = self.http.get(url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = response.bytes().await.ok()?;

        Some((bytes, content_type))
    }

    /// Ordered candidate URLs for a `(kind, id)` pair. Candidates needing an
    /// id translation that does not exist are skipped rather than attempted.
    fn candidate_urls(&self, kind: AssetKind, id: &str) -> Vec<String> {
        let ver = &self.ddragon_version;
        match kind {
            AssetKind::ChampionIcon => vec![
                format!("https://cdn.communitydragon.org/latest/champion/{id}/square"),
                format!(
                    "https://raw.communitydragon.org/latest/plugins/rcp-be-lol-game-data/global/default/v1/champion-icons/{id}.png"
                ),
            ],
            AssetKind::ItemIcon => vec![
                format!("https://ddragon.leagueoflegends.com/cdn/{ver}/img/item/{id}.png"),
                format!("https://cdn.communitydragon.org/{ver}/item/{id}"),
                format!(
                    "https://raw.communitydragon.org/pbe/plugins/rcp-be-lol-game-data/global/default/assets/items/icons2d/{id}.png"
                ),
            ],
            AssetKind::SpellIcon => {
                let spell_id: Option<i64> = id.parse().ok();
                let mut urls = Vec::new();
                if let Some(name) = spell_id.and_then(ddragon_spell_name) {
                    urls.push(format!(
                        "https://ddragon.leagueoflegends.com/cdn/{ver}/img/spell/{name}.png"
                    ));
                }
                if let Some(name) = spell_id.and_then(cdragon_spell_name) {
                    urls.push(format!(
                        "https://raw.communitydragon.org/pbe/plugins/rcp-be-lol-game-data/global/default/data/spells/icons2d/{name}.png"
                    ));
                }
                urls
            }
            AssetKind::RankedEmblem => vec![format!(
                "https://raw.communitydragon.org/latest/plugins/rcp-fe-lol-shared-components/global/default/{}.png",
                tier_slug(id)
            )],
        }
    }
}

/// Data Dragon spell art names by spell id. Not every spell ships there.
fn ddragon_spell_name(id: i64) -> Option<&'static str> {
    let name = match id {
        1 => "SummonerBoost",
        3 => "SummonerExhaust",
        4 => "SummonerFlash",
        6 => "SummonerHaste",
        7 => "SummonerHeal",
        11 => "SummonerSmite",
        12 => "SummonerTeleport",
        14 => "SummonerDot",
        21 => "SummonerBarrier",
        32 => "SummonerSnowball",
        _ => return None,
    };
    Some(name)
}

/// Community Dragon spell art names, covering more ids than Data Dragon
/// (ARAM and Arena variants included).
fn cdragon_spell_name(id: i64) -> Option<&'static str> {
    let name = match id {
        1 => "summonerboost",
        3 => "summonerexhaust",
        4 => "summonerflash",
        6 => "summonerhaste",
        7 | 55 | 2201 => "summonerheal",
        11 => "summonersmite",
        12 => "summonerteleport",
        13 => "summonermana",
        14 => "summonerdot",
        21 => "summonerbarrier",
        30 => "summonerpororecall",
        31 => "summonerporopounce",
        32 => "summonersnowball",
        39 => "summonerultimatespellbook",
        54 => "summonerclarity",
        2202 => "summonerexhaust",
        _ => return None,
    };
    Some(name)
}

/// Ranked tier to emblem filename. Unknown tiers fall back to the unranked
/// emblem rather than producing a dead URL.
fn tier_slug(tier: &str) -> &'static str {
    match tier.to_ascii_uppercase().as_str() {
        "IRON" => "iron",
        "BRONZE" => "bronze",
        "SILVER" => "silver",
        "GOLD" => "gold",
        "PLATINUM" => "platinum",
        "EMERALD" => "emerald",
        "DIAMOND" => "diamond",
        "MASTER" => "master",
        "GRANDMASTER" => "grandmaster",
        "CHALLENGER" => "challenger",
        _ => "unranked",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn resolver() -> AssetResolver {
        AssetResolver::new("15.20.1")
    }

    #[test]
    fn asset_kind_parses_path_segments() {
        assert_eq!("champion".parse::<AssetKind>().unwrap(), AssetKind::ChampionIcon);
        assert_eq!("item".parse::<AssetKind>().unwrap(), AssetKind::ItemIcon);
        assert_eq!("spell".parse::<AssetKind>().unwrap(), AssetKind::SpellIcon);
        assert_eq!(
            "rank-emblem".parse::<AssetKind>().unwrap(),
            AssetKind::RankedEmblem
        );
        assert!("banner".parse::<AssetKind>().is_err());
    }

    #[test]
    fn champion_candidates_try_cdn_before_raw_mirror() {
        let urls = resolver().candidate_urls(AssetKind::ChampionIcon, "67");
        assert_eq!(urls.len(), 2);
        assert!(urls[0].contains("cdn.communitydragon.org/latest/champion/67/square"));
        assert!(urls[1].contains("champion-icons/67.png"));
    }

    #[test]
    fn item_candidates_are_version_pinned() {
        let urls = resolver().candidate_urls(AssetKind::ItemIcon, "3031");
        assert_eq!(urls.len(), 3);
        assert!(urls[0].contains("/cdn/15.20.1/img/item/3031.png"));
        assert!(urls[1].contains("/15.20.1/item/3031"));
    }

    #[test]
    fn spell_without_any_mapping_has_no_candidates() {
        let urls = resolver().candidate_urls(AssetKind::SpellIcon, "9999");
        assert!(urls.is_empty());
    }

    #[test]
    fn spell_known_only_to_mirror_skips_ddragon() {
        // Poro Toss has no Data Dragon art.
        let urls = resolver().candidate_urls(AssetKind::SpellIcon, "31");
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("summonerporopounce"));
    }

    #[test]
    fn unknown_tier_maps_to_unranked_emblem() {
        let urls = resolver().candidate_urls(AssetKind::RankedEmblem, "WOOD");
        assert_eq!(urls.len(), 1);
        assert!(urls[0].ends_with("/unranked.png"));
    }

    #[test]
    fn placeholder_is_a_nonempty_png() {
        let bytes = placeholder_bytes();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[tokio::test]
    async fn first_successful_candidate_wins() {
        let server = MockServer::start_async().await;
        let miss = server
            .mock_async(|when, then| {
                when.method(GET).path("/a.png");
                then.status(404);
            })
            .await;
        let hit = server
            .mock_async(|when, then| {
                when.method(GET).path("/b.png");
                then.status(200)
                    .header("content-type", "image/png")
                    .body(vec![1, 2, 3]);
            })
            .await;

        let urls = vec![server.url("/a.png"), server.url("/b.png")];
        let resolved = resolver()
            .try_candidates(AssetKind::ChampionIcon, "67", &urls)
            .await;

        miss.assert_async().await;
        hit.assert_async().await;
        match resolved {
            ResolvedAsset::Resolved {
                bytes,
                content_type,
                source_url,
            } => {
                assert_eq!(bytes.as_ref(), &[1, 2, 3]);
                assert_eq!(content_type, "image/png");
                assert!(source_url.ends_with("/b.png"));
            }
            ResolvedAsset::Degraded => panic!("expected a resolved asset"),
        }
    }

    #[tokio::test]
    async fn exhausted_candidates_degrade_without_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(500);
            })
            .await;

        let urls = vec![server.url("/a.png"), server.url("/b.png")];
        let resolved = resolver()
            .try_candidates(AssetKind::ItemIcon, "3031", &urls)
            .await;

        assert!(matches!(resolved, ResolvedAsset::Degraded));
    }

    #[tokio::test]
    async fn zero_viable_candidates_degrade_immediately() {
        let resolved = resolver().resolve(AssetKind::SpellIcon, "9999").await;
        assert!(matches!(resolved, ResolvedAsset::Degraded));
    }
}
