//! Payload shapes of the Clash of Clans API, decoded at the boundary.

use chrono::{DateTime, NaiveDateTime, Utc};
use clanwar_shared::same_tag;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Timestamp format used throughout the API, e.g. `20260301T120000.000Z`.
const COC_TIME_FORMAT: &str = "%Y%m%dT%H%M%S%.fZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawWarState {
    NotInWar,
    Preparation,
    InWar,
    WarEnded,
    #[serde(other)]
    Unrecognized,
}

/// A current war or a league war; both endpoints return this shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWar {
    pub state: RawWarState,
    #[serde(default, deserialize_with = "deserialize_coc_time")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_coc_time")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clan: RawWarClan,
    #[serde(default)]
    pub opponent: RawWarClan,
}

impl RawWar {
    pub fn involves(&self, clan_tag: &str) -> bool {
        self.clan.has_tag(clan_tag) || self.opponent.has_tag(clan_tag)
    }

    /// The side of the war the given clan plays on. League wars may list the
    /// tracked clan as the opponent; otherwise the `clan` side is used.
    pub fn side(&self, clan_tag: &str) -> &RawWarClan {
        if !self.clan.has_tag(clan_tag) && self.opponent.has_tag(clan_tag) {
            &self.opponent
        } else {
            &self.clan
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWarClan {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub members: Vec<RawWarMember>,
}

impl RawWarClan {
    fn has_tag(&self, clan_tag: &str) -> bool {
        self.tag.as_deref().is_some_and(|tag| same_tag(tag, clan_tag))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWarMember {
    pub name: String,
    #[serde(default)]
    pub attacks: Vec<IgnoredAny>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeagueGroup {
    #[serde(default)]
    pub rounds: Vec<LeagueRound>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueRound {
    #[serde(default)]
    pub war_tags: Vec<Option<String>>,
}

/// Body the API sends alongside non-2xx statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

pub fn parse_coc_time(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), COC_TIME_FORMAT).map(|naive| naive.and_utc())
}

fn deserialize_coc_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_coc_time(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    #[test]
    fn parses_api_timestamps() {
        let parsed = parse_coc_time("20260301T123456.000Z").expect("timestamp should parse");
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 34, 56)
                .single()
                .expect("valid date")
        );
        assert_eq!(parsed.nanosecond(), 0);
    }

    #[test]
    fn rejects_other_timestamp_formats() {
        assert!(parse_coc_time("2026-03-01T12:34:56Z").is_err());
    }

    #[test]
    fn decodes_regular_war_payload() {
        let payload = r##"{
            "state": "inWar",
            "teamSize": 2,
            "preparationStartTime": "20260301T100000.000Z",
            "startTime": "20260301T110000.000Z",
            "endTime": "20260302T110000.000Z",
            "clan": {
                "tag": "#29P2VLJP",
                "name": "Krush War",
                "stars": 7,
                "members": [
                    {"tag": "#A", "name": "alpha", "attacks": [{"stars": 3}, {"stars": 2}]},
                    {"tag": "#B", "name": "bravo"}
                ]
            },
            "opponent": {"tag": "#OTHER", "stars": 4, "members": []}
        }"##;

        let war: RawWar = serde_json::from_str(payload).expect("war payload should decode");
        assert_eq!(war.state, RawWarState::InWar);
        assert!(war.start_time.is_some());
        assert!(war.end_time.is_some());
        assert_eq!(war.clan.stars, 7);
        assert_eq!(war.clan.members.len(), 2);
        assert_eq!(war.clan.members[0].attacks.len(), 2);
        assert!(war.clan.members[1].attacks.is_empty());
    }

    #[test]
    fn decodes_not_in_war_without_sides() {
        let war: RawWar =
            serde_json::from_str(r#"{"state":"notInWar"}"#).expect("bare state should decode");
        assert_eq!(war.state, RawWarState::NotInWar);
        assert!(war.start_time.is_none());
        assert!(war.clan.members.is_empty());
    }

    #[test]
    fn unknown_states_decode_as_unrecognized() {
        let war: RawWar =
            serde_json::from_str(r#"{"state":"truce"}"#).expect("unknown state should decode");
        assert_eq!(war.state, RawWarState::Unrecognized);
    }

    #[test]
    fn malformed_timestamp_is_a_decode_error() {
        let result = serde_json::from_str::<RawWar>(r#"{"state":"inWar","startTime":"soon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn side_picks_opponent_when_tracked_clan_is_there() {
        let war: RawWar = serde_json::from_str(
            r##"{"state":"inWar","clan":{"tag":"#AAA","stars":1},"opponent":{"tag":"#BBB","stars":9}}"##,
        )
        .expect("war payload should decode");

        assert!(war.involves("#bbb"));
        assert!(!war.involves("#CCC"));
        assert_eq!(war.side("#BBB").stars, 9);
        assert_eq!(war.side("#AAA").stars, 1);
        assert_eq!(war.side("#CCC").stars, 1);
    }

    #[test]
    fn decodes_league_group_with_placeholder_tags() {
        let group: LeagueGroup = serde_json::from_str(
            r##"{"state":"inWar","season":"2026-03","rounds":[{"warTags":["#0","#0"]},{"warTags":["#W1",null]}]}"##,
        )
        .expect("league group should decode");
        assert_eq!(group.rounds.len(), 2);
        assert_eq!(group.rounds[1].war_tags[0].as_deref(), Some("#W1"));
        assert!(group.rounds[1].war_tags[1].is_none());
    }
}
