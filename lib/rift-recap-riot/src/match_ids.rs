use crate::{Error, RegionGroup, RiotApiClient};

impl RiotApiClient {
    /// Fetch up to `count` match IDs for a PUUID, most recent first.
    /// The returned order is meaningful and must be preserved downstream.
    pub async fn get_match_ids(
        &self,
        group: RegionGroup,
        puuid: &str,
        count: usize,
    ) -> Result<Vec<String>, Error> {
        let mut url = self.endpoint(
            group,
            &["lol", "match", "v5", "matches", "by-puuid", puuid, "ids"],
        );
        url.query_pairs_mut()
            .append_pair("start", "0")
            .append_pair("count", &count.to_string());
        self.get_json(url).await
    }
}
