use std::collections::HashSet;

use clanwar_shared::{WarType, normalize_tag};
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::services::coc_client::{ApiError, CocClient};
use crate::services::coc_model::{LeagueGroup, RawWar, RawWarState};

/// War tag the API uses for league rounds that have not been drawn yet.
const UNSCHEDULED_WAR_TAG: &str = "#0";

/// Classified result of looking up one clan's current war.
#[derive(Debug, Clone)]
pub enum WarOutcome {
    Private,
    Maintenance,
    NotInWar,
    War { war: Box<RawWar>, war_type: WarType },
    Unknown,
    Error(String),
}

/// Looks up the clan's current war, falling back to its league group when
/// the clan is not in a regular war. Never fails: every upstream problem is
/// folded into the returned outcome.
pub async fn fetch_current_war(
    client: &CocClient,
    clan_tag: &str,
    league_concurrency: usize,
) -> WarOutcome {
    match client.current_war(clan_tag).await {
        Ok(war) => match war.state {
            RawWarState::InWar | RawWarState::Preparation | RawWarState::WarEnded => {
                WarOutcome::War {
                    war: Box::new(war),
                    war_type: WarType::Regular,
                }
            }
            RawWarState::NotInWar => find_league_war(client, clan_tag, league_concurrency).await,
            RawWarState::Unrecognized => WarOutcome::Unknown,
        },
        Err(ApiError::NotFound) => find_league_war(client, clan_tag, league_concurrency).await,
        Err(e) => failure_outcome(e),
    }
}

fn failure_outcome(error: ApiError) -> WarOutcome {
    match error {
        ApiError::NotFound => WarOutcome::NotInWar,
        ApiError::Private => WarOutcome::Private,
        ApiError::Maintenance => WarOutcome::Maintenance,
        e => WarOutcome::Error(e.to_string()),
    }
}

async fn find_league_war(client: &CocClient, clan_tag: &str, concurrency: usize) -> WarOutcome {
    let group = match client.league_group(clan_tag).await {
        Ok(group) => group,
        Err(ApiError::NotFound) => return WarOutcome::NotInWar,
        Err(e) => {
            warn!(tag = clan_tag, error = %e, "league group lookup failed");
            return failure_outcome(e);
        }
    };

    let war_tags = league_war_tags(&group);
    if war_tags.is_empty() {
        return WarOutcome::NotInWar;
    }

    // `buffered` yields in submission order, so selection sees round/tag order.
    let wars: Vec<RawWar> = stream::iter(war_tags.into_iter().map(|war_tag| {
        let client = client.clone();
        async move {
            match client.league_war(&war_tag).await {
                Ok(war) => Some(war),
                Err(e) => {
                    debug!(war_tag = %war_tag, error = %e, "skipping league war");
                    None
                }
            }
        }
    }))
    .buffered(concurrency.max(1))
    .filter_map(|war| async move { war })
    .collect()
    .await;

    match select_league_war(wars, clan_tag) {
        Some(war) => WarOutcome::War {
            war: Box::new(war),
            war_type: WarType::League,
        },
        None => WarOutcome::NotInWar,
    }
}

/// Every scheduled war tag in round order, then tag order, without repeats.
fn league_war_tags(group: &LeagueGroup) -> Vec<String> {
    let mut seen = HashSet::new();
    group
        .rounds
        .iter()
        .flat_map(|round| round.war_tags.iter().flatten())
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty() && !tag.eq_ignore_ascii_case("none"))
        .map(normalize_tag)
        .filter(|tag| tag != UNSCHEDULED_WAR_TAG)
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Picks the league war to report for `clan_tag`: the first one in progress,
/// else the first one in preparation. Wars not involving the clan are ignored.
fn select_league_war(wars: impl IntoIterator<Item = RawWar>, clan_tag: &str) -> Option<RawWar> {
    let mut preparation = None;
    for war in wars {
        if !war.involves(clan_tag) {
            continue;
        }
        match war.state {
            RawWarState::InWar => return Some(war),
            RawWarState::Preparation if preparation.is_none() => preparation = Some(war),
            _ => {}
        }
    }
    preparation
}
