use crate::error::AppError;
use crate::riot::client::RiotClient;
use crate::riot::region::Platform;
use crate::riot::types::MasteryDto;

impl RiotClient {
    /// Get top champion masteries for a player by PUUID
    pub async fn get_mastery_top_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
        count: u32,
    ) -> Result<Vec<MasteryDto>, AppError> {
        let url = format!(
            "{}/lol/champion-mastery/v4/champion-masteries/by-puuid/{}/top?count={}",
            platform.base_url(),
            urlencoding::encode(puuid),
            count
        );

        self.get(&url).await
    }

    /// Get top champion masteries by encrypted summoner id (fallback routing)
    pub async fn get_mastery_top_by_summoner(
        &self,
        platform: Platform,
        summoner_id: &str,
        count: u32,
    ) -> Result<Vec<MasteryDto>, AppError> {
        let url = format!(
            "{}/lol/champion-mastery/v4/champion-masteries/by-summoner/{}/top?count={}",
            platform.base_url(),
            urlencoding::encode(summoner_id),
            count
        );

        self.get(&url).await
    }
}
