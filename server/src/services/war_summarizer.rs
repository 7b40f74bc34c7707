use chrono::{DateTime, Utc};
use clanwar_shared::{ClanRef, MissingMembers, Tally, WarState, WarSummary, format_relative};

use crate::services::coc_model::RawWarState;
use crate::services::war_fetcher::WarOutcome;

/// Normalizes a fetch outcome into the row shown for `clan`.
///
/// Pure apart from `now`, which only feeds the relative start/end strings.
/// `attacks_left` counts members still owing attacks; the `"None"` and `"NA"`
/// sentinels in `missing` count as zero.
pub fn summarize(clan: &ClanRef, outcome: &WarOutcome, now: DateTime<Utc>) -> WarSummary {
    let (war, war_type) = match outcome {
        WarOutcome::Private => return WarSummary::placeholder(clan, WarState::Private),
        WarOutcome::Maintenance => return WarSummary::placeholder(clan, WarState::Maintenance),
        WarOutcome::NotInWar => return WarSummary::placeholder(clan, WarState::NotInWar),
        WarOutcome::Unknown => return WarSummary::placeholder(clan, WarState::Unknown),
        WarOutcome::Error(_) => return WarSummary::placeholder(clan, WarState::Error),
        WarOutcome::War { war, war_type } => (war, *war_type),
    };

    let state = match war.state {
        RawWarState::InWar => WarState::InWar,
        RawWarState::Preparation => WarState::Preparation,
        RawWarState::WarEnded => WarState::WarEnded,
        RawWarState::NotInWar => return WarSummary::placeholder(clan, WarState::NotInWar),
        RawWarState::Unrecognized => return WarSummary::placeholder(clan, WarState::Unknown),
    };

    let side = war.side(&clan.tag);
    let missing = if state == WarState::Preparation {
        MissingMembers::NotStarted
    } else {
        let allowed = war_type.attacks_per_member();
        MissingMembers::from_names(
            side.members
                .iter()
                .filter(|member| member.attacks.len() < allowed)
                .map(|member| member.name.clone())
                .collect(),
        )
    };
    let attacks_left = u32::try_from(missing.count()).unwrap_or(u32::MAX);

    WarSummary {
        clan: clan.name.clone(),
        tag: clan.tag.clone(),
        state,
        stars: Tally::Count(side.stars),
        attacks_left: Tally::Count(attacks_left),
        missing,
        start_in: format_relative(war.start_time, now),
        end_in: format_relative(war.end_time, now),
        war_type,
    }
}
