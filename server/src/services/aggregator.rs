use chrono::Utc;
use clanwar_shared::{ClanRef, WarSummary};
use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::services::coc_client::CocClient;
use crate::services::war_fetcher::{WarOutcome, fetch_current_war};
use crate::services::war_summarizer::summarize;

/// One summary per clan, in configuration order.
///
/// All clans are fetched concurrently. Dropping the returned future cancels
/// every in-flight request and yields nothing, so callers never see a partial
/// list.
pub async fn summarize_all(
    client: &CocClient,
    clans: &[ClanRef],
    league_concurrency: usize,
) -> Vec<WarSummary> {
    stream::iter(clans.iter().cloned().map(|clan| {
        let client = client.clone();
        async move {
            let outcome = fetch_current_war(&client, &clan.tag, league_concurrency).await;
            if let WarOutcome::Error(message) = &outcome {
                warn!(clan = %clan.name, tag = %clan.tag, error = %message, "failed to fetch current war");
            }
            summarize(&clan, &outcome, Utc::now())
        }
    }))
    .buffered(clans.len().max(1))
    .collect()
    .await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use clanwar_shared::WarState;
    use serde_json::json;

    use super::*;
    use crate::services::mock_api::MockApi;

    #[tokio::test]
    async fn keeps_configuration_order_despite_completion_order() {
        let mock = MockApi::new()
            .respond_json(
                "/v1/clans/%23AAA/currentwar",
                json!({"state": "inWar", "clan": {"tag": "#AAA", "stars": 1}}),
            )
            .delay("/v1/clans/%23AAA/currentwar", Duration::from_millis(300))
            .respond_json(
                "/v1/clans/%23BBB/currentwar",
                json!({"state": "preparation", "clan": {"tag": "#BBB"}}),
            )
            .respond(
                "/v1/clans/%23CCC/currentwar",
                StatusCode::INTERNAL_SERVER_ERROR,
                "{}",
            )
            .spawn()
            .await;
        let clans = vec![
            ClanRef::new("Alpha", "#AAA"),
            ClanRef::new("Bravo", "#BBB"),
            ClanRef::new("Charlie", "#CCC"),
        ];

        let summaries = summarize_all(&mock.client(), &clans, 4).await;

        let names: Vec<&str> = summaries.iter().map(|s| s.clan.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Bravo", "Charlie"]);
        assert_eq!(summaries[0].state, WarState::InWar);
        assert_eq!(summaries[1].state, WarState::Preparation);
        assert_eq!(summaries[2].state, WarState::Error);

        assert_eq!(mock.hits().len(), 3);
    }

    #[tokio::test]
    async fn every_clan_failing_still_yields_a_row_each() {
        let mock = MockApi::new().spawn().await;
        let client = CocClient::new(reqwest::Client::new(), &mock.base_url(), "wrong")
            .expect("valid base URL");
        let clans = vec![ClanRef::new("Alpha", "#AAA"), ClanRef::new("Bravo", "#BBB")];

        let summaries = summarize_all(&client, &clans, 4).await;

        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.state == WarState::Error));
        assert!(summaries.iter().all(|s| s.missing.labels() == vec!["N/A"]));
    }

    #[tokio::test]
    async fn no_clans_yields_no_rows() {
        let mock = MockApi::new().spawn().await;
        assert!(summarize_all(&mock.client(), &[], 4).await.is_empty());
        assert!(mock.hits().is_empty());
    }
}
