//! Profile aggregation: the dependent multi-step fetch turning a Riot ID
//! into a [`Profile`], plus incremental match-window pagination.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AppError;
use crate::riot::region::{Platform, Region};
use crate::riot::traits::RiotApi;
use crate::riot::types::{AccountDto, LeagueEntryDto, MasteryDto, MatchDto, SummonerDto};

/// Size of the first match window fetched with a fresh profile.
pub const FIRST_WINDOW: u32 = 20;
/// How many mastery entries the aggregator asks upstream for.
pub const MASTERY_TOP_COUNT: u32 = 40;
/// Cap on the locally synthesized mastery list.
pub const DEGRADED_MASTERY_CAP: usize = 40;

/// Aggregate root for one player.
///
/// `matches` is append-only across pagination and never contains two entries
/// with the same match id. `account` and `summoner` are never mutated after
/// resolution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub account: AccountDto,
    pub summoner: SummonerDto,
    pub ranked: Option<LeagueEntryDto>,
    pub mastery: Vec<MasteryDto>,
    pub matches: Vec<MatchDto>,
}

impl Profile {
    /// Append a fetched window, dropping any match id already present.
    /// Duplicates should not occur when the start index advances by the
    /// previously returned count, but the append stays defensive.
    pub fn append_matches(&mut self, page: Vec<MatchDto>) {
        let mut seen: HashSet<String> = self
            .matches
            .iter()
            .map(|m| m.match_id().to_string())
            .collect();

        for m in page {
            if seen.insert(m.match_id().to_string()) {
                self.matches.push(m);
            }
        }
    }
}

/// One page of match history.
///
/// `has_more` is a heuristic: the upstream gives no authoritative total, so a
/// full page is read as "probably more" and a short page as exhaustion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchWindow {
    pub matches: Vec<MatchDto>,
    pub has_more: bool,
}

/// Degraded mastery entry synthesized from match history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedChampion {
    pub champion_id: i64,
    pub games: u32,
}

/// Ordered sources for ranked entries, tried in sequence.
#[derive(Debug, Clone, Copy)]
enum RankedSource {
    ByPuuid,
    BySummonerId,
}

const RANKED_SOURCES: [RankedSource; 2] = [RankedSource::ByPuuid, RankedSource::BySummonerId];

/// Ordered sources for mastery entries, tried in sequence.
#[derive(Debug, Clone, Copy)]
enum MasterySource {
    ByPuuid,
    BySummonerId,
}

const MASTERY_SOURCES: [MasterySource; 2] = [MasterySource::ByPuuid, MasterySource::BySummonerId];

/// Orchestrates all upstream reads for profile and match-window lookups.
pub struct ProfileService<A> {
    api: Arc<A>,
}

impl<A: RiotApi> ProfileService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Resolve a full profile from a Riot ID.
    ///
    /// Identity and summoner resolution are hard failures; ranked and
    /// mastery degrade to `None` / empty instead of aborting the profile.
    pub async fn fetch_profile(
        &self,
        platform: Platform,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Profile, AppError> {
        let region = platform.to_region();
        info!(%platform, game_name, tag_line, "fetching profile");

        let account = self
            .api
            .get_account_by_riot_id(region, game_name, tag_line)
            .await
            .map_err(|e| hard_failure(e, game_name, tag_line))?;

        let summoner = self
            .api
            .get_summoner_by_puuid(platform, &account.puuid)
            .await
            .map_err(|e| hard_failure(e, game_name, tag_line))?;

        let ranked = self
            .fetch_ranked(platform, &account.puuid, summoner.id.as_deref())
            .await;

        let mastery = self
            .fetch_mastery(
                platform,
                Some(&account.puuid),
                summoner.id.as_deref(),
                MASTERY_TOP_COUNT,
            )
            .await;

        let ids = self
            .api
            .get_match_ids(region, &account.puuid, 0, FIRST_WINDOW)
            .await?;
        let matches = self.fetch_matches(region, &ids).await?;

        Ok(Profile {
            account,
            summoner,
            ranked,
            mastery,
            matches,
        })
    }

    /// Fetch the next page of match history for an existing profile.
    ///
    /// Idempotent for a given `(puuid, start, count)`; upstream data for
    /// historical matches does not change. Errors propagate verbatim so a
    /// failed "load more" stays visibly retryable.
    pub async fn fetch_window(
        &self,
        platform: Platform,
        puuid: &str,
        start: u32,
        count: u32,
    ) -> Result<MatchWindow, AppError> {
        let region = platform.to_region();
        let ids = self.api.get_match_ids(region, puuid, start, count).await?;

        if ids.is_empty() {
            return Ok(MatchWindow {
                matches: Vec::new(),
                has_more: false,
            });
        }

        let matches = self.fetch_matches(region, &ids).await?;
        // Short page read as exhaustion; approximate, the upstream has no
        // explicit end-of-list signal.
        let has_more = matches.len() == count as usize;

        Ok(MatchWindow { matches, has_more })
    }

    /// Ranked entry via the ordered source list; any failure moves on to the
    /// next source, total failure is the unranked state.
    async fn fetch_ranked(
        &self,
        platform: Platform,
        puuid: &str,
        summoner_id: Option<&str>,
    ) -> Option<LeagueEntryDto> {
        for source in RANKED_SOURCES {
            let attempt = match source {
                RankedSource::ByPuuid => self.api.get_league_entries_by_puuid(platform, puuid).await,
                RankedSource::BySummonerId => match summoner_id {
                    Some(id) => self.api.get_league_entries_by_summoner(platform, id).await,
                    None => continue,
                },
            };

            match attempt {
                Ok(entries) => return pick_ranked_entry(entries),
                Err(e) => debug!(?source, error = %e, "ranked source failed, trying next"),
            }
        }

        None
    }

    /// Mastery entries via the ordered source list. Total failure yields an
    /// empty list; callers with match history can synthesize a degraded list
    /// with [`mastery_from_matches`].
    pub async fn fetch_mastery(
        &self,
        platform: Platform,
        puuid: Option<&str>,
        summoner_id: Option<&str>,
        count: u32,
    ) -> Vec<MasteryDto> {
        for source in MASTERY_SOURCES {
            let attempt = match source {
                MasterySource::ByPuuid => match puuid {
                    Some(p) => self.api.get_mastery_top_by_puuid(platform, p, count).await,
                    None => continue,
                },
                MasterySource::BySummonerId => match summoner_id {
                    Some(id) => {
                        self.api
                            .get_mastery_top_by_summoner(platform, id, count)
                            .await
                    }
                    None => continue,
                },
            };

            match attempt {
                Ok(entries) => return entries,
                Err(e) => debug!(?source, error = %e, "mastery source failed, trying next"),
            }
        }

        Vec::new()
    }

    /// Standalone mastery lookup for the service surface. Resolves the
    /// encrypted summoner id from the puuid when only the latter is given,
    /// so the fallback source stays reachable.
    pub async fn lookup_mastery(
        &self,
        platform: Platform,
        puuid: Option<&str>,
        summoner_id: Option<&str>,
        count: u32,
    ) -> Result<Vec<MasteryDto>, AppError> {
        if puuid.is_none() && summoner_id.is_none() {
            return Err(AppError::InvalidParam(
                "summonerId or puuid is required".into(),
            ));
        }

        let resolved;
        let summoner_id = match (summoner_id, puuid) {
            (Some(id), _) => Some(id),
            (None, Some(p)) => {
                resolved = self
                    .api
                    .get_summoner_by_puuid(platform, p)
                    .await
                    .ok()
                    .and_then(|s| s.id);
                resolved.as_deref()
            }
            (None, None) => None,
        };

        Ok(self.fetch_mastery(platform, puuid, summoner_id, count).await)
    }

    /// Fetch match details for every id in parallel. `join_all` re-associates
    /// results with the identifier order, so completion races never reorder
    /// the final list. Each call goes through the shared client, keeping the
    /// batch under the global in-flight cap.
    async fn fetch_matches(
        &self,
        region: Region,
        ids: &[String],
    ) -> Result<Vec<MatchDto>, AppError> {
        let results = join_all(ids.iter().map(|id| self.api.get_match(region, id))).await;
        results.into_iter().collect()
    }
}

fn hard_failure(err: AppError, game_name: &str, tag_line: &str) -> AppError {
    match err {
        AppError::NotFound => AppError::PlayerNotFound {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
        },
        other => other,
    }
}

/// Solo/duo entry preferred, otherwise the first one. Empty list means the
/// player is unranked, which is not a failure.
fn pick_ranked_entry(entries: Vec<LeagueEntryDto>) -> Option<LeagueEntryDto> {
    let mut entries = entries;
    entries
        .iter()
        .position(LeagueEntryDto::is_solo_queue)
        .map(|i| entries.swap_remove(i))
        .or_else(|| {
            if entries.is_empty() {
                None
            } else {
                Some(entries.remove(0))
            }
        })
}

/// Degraded mastery synthesized from match history when the mastery API is
/// unavailable. Pure function of the matches and the puuid: champions the
/// player appeared on, ranked by descending game count, ties kept in
/// first-seen order, capped at [`DEGRADED_MASTERY_CAP`].
pub fn mastery_from_matches(matches: &[MatchDto], puuid: &str) -> Vec<PlayedChampion> {
    let mut counts: Vec<PlayedChampion> = Vec::new();

    for m in matches {
        let Some(p) = m.participant_for(puuid) else {
            continue;
        };
        match counts.iter_mut().find(|c| c.champion_id == p.champion_id) {
            Some(c) => c.games += 1,
            None => counts.push(PlayedChampion {
                champion_id: p.champion_id,
                games: 1,
            }),
        }
    }

    // Stable sort: ties keep first-seen order.
    counts.sort_by(|a, b| b.games.cmp(&a.games));
    counts.truncate(DEGRADED_MASTERY_CAP);
    counts
}
