use async_trait::async_trait;

use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::region::{Platform, Region};
use crate::riot::types::{AccountDto, LeagueEntryDto, MasteryDto, MatchDto, SummonerDto};

/// Every upstream call the aggregation layer depends on.
///
/// [`RiotClient`] is the production implementation; tests substitute
/// in-memory mocks to drive fallback and ordering behavior deterministically.
#[async_trait]
pub trait RiotApi: Send + Sync {
    async fn get_account_by_riot_id(
        &self,
        region: Region,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, AppError>;

    async fn get_summoner_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<SummonerDto, AppError>;

    async fn get_league_entries_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError>;

    async fn get_league_entries_by_summoner(
        &self,
        platform: Platform,
        summoner_id: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError>;

    async fn get_mastery_top_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
        count: u32,
    ) -> Result<Vec<MasteryDto>, AppError>;

    async fn get_mastery_top_by_summoner(
        &self,
        platform: Platform,
        summoner_id: &str,
        count: u32,
    ) -> Result<Vec<MasteryDto>, AppError>;

    async fn get_match_ids(
        &self,
        region: Region,
        puuid: &str,
        start: u32,
        count: u32,
    ) -> Result<Vec<String>, AppError>;

    async fn get_match(&self, region: Region, match_id: &str) -> Result<MatchDto, AppError>;
}

#[async_trait]
impl RiotApi for RiotClient {
    async fn get_account_by_riot_id(
        &self,
        region: Region,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, AppError> {
        RiotClient::get_account_by_riot_id(self, region, game_name, tag_line).await
    }

    async fn get_summoner_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<SummonerDto, AppError> {
        RiotClient::get_summoner_by_puuid(self, platform, puuid).await
    }

    async fn get_league_entries_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        RiotClient::get_league_entries_by_puuid(self, platform, puuid).await
    }

    async fn get_league_entries_by_summoner(
        &self,
        platform: Platform,
        summoner_id: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        RiotClient::get_league_entries_by_summoner(self, platform, summoner_id).await
    }

    async fn get_mastery_top_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
        count: u32,
    ) -> Result<Vec<MasteryDto>, AppError> {
        RiotClient::get_mastery_top_by_puuid(self, platform, puuid, count).await
    }

    async fn get_mastery_top_by_summoner(
        &self,
        platform: Platform,
        summoner_id: &str,
        count: u32,
    ) -> Result<Vec<MasteryDto>, AppError> {
        RiotClient::get_mastery_top_by_summoner(self, platform, summoner_id, count).await
    }

    async fn get_match_ids(
        &self,
        region: Region,
        puuid: &str,
        start: u32,
        count: u32,
    ) -> Result<Vec<String>, AppError> {
        RiotClient::get_match_ids(self, region, puuid, start, count).await
    }

    async fn get_match(&self, region: Region, match_id: &str) -> Result<MatchDto, AppError> {
        RiotClient::get_match(self, region, match_id).await
    }
}
