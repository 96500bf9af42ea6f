use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::region::Platform;
use crate::riot::types::LeagueEntryDto;

impl RiotClient {
    /// Get league entries (ranked info) for a player by PUUID
    /// Uses platform routing (euw1, na1, kr, etc.)
    pub async fn get_league_entries_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        let url = format!(
            "{}/lol/league/v4/entries/by-puuid/{}",
            platform.base_url(),
            puuid
        );

        self.get(&url).await
    }

    /// Get league entries by encrypted summoner id. Older routing, kept as a
    /// fallback for platforms where the puuid-keyed endpoint misbehaves.
    pub async fn get_league_entries_by_summoner(
        &self,
        platform: Platform,
        summoner_id: &str,
    ) -> Result<Vec<LeagueEntryDto>, AppError> {
        let url = format!(
            "{}/lol/league/v4/entries/by-summoner/{}",
            platform.base_url(),
            urlencoding::encode(summoner_id)
        );

        self.get(&url).await
    }
}
