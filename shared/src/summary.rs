use std::fmt;

use serde::{Serialize, Serializer};

use crate::clan::ClanRef;
use crate::time_format::NOT_AVAILABLE;

pub const UNKNOWN_TALLY: &str = "?";
pub const NO_MISSING_MEMBERS: &str = "None";
pub const NOT_STARTED: &str = "NA";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WarState {
    InWar,
    Preparation,
    WarEnded,
    NotInWar,
    Private,
    Maintenance,
    Error,
    Unknown,
}

impl WarState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InWar => "inWar",
            Self::Preparation => "preparation",
            Self::WarEnded => "warEnded",
            Self::NotInWar => "notInWar",
            Self::Private => "private",
            Self::Maintenance => "maintenance",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A count that may be unknown when the war could not be read.
/// Serializes as a number, or `"?"` when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    Count(u32),
    Unknown,
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Unknown => f.write_str(UNKNOWN_TALLY),
        }
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => serializer.serialize_u32(*n),
            Self::Unknown => serializer.serialize_str(UNKNOWN_TALLY),
        }
    }
}

/// Members that still have attacks to use.
///
/// Never renders as an empty list: an empty roster becomes `["None"]`, a war
/// that has not started is `["NA"]`, and anything without a roster is `["N/A"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingMembers {
    Members(Vec<String>),
    Nobody,
    NotStarted,
    NotApplicable,
}

impl MissingMembers {
    pub fn from_names(names: Vec<String>) -> Self {
        if names.is_empty() {
            Self::Nobody
        } else {
            Self::Members(names)
        }
    }

    /// Number of members actually missing attacks; sentinels count as zero.
    pub fn count(&self) -> usize {
        match self {
            Self::Members(names) => names.len(),
            Self::Nobody | Self::NotStarted | Self::NotApplicable => 0,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::Members(names) => names.iter().map(String::as_str).collect(),
            Self::Nobody => vec![NO_MISSING_MEMBERS],
            Self::NotStarted => vec![NOT_STARTED],
            Self::NotApplicable => vec![NOT_AVAILABLE],
        }
    }
}

impl Serialize for MissingMembers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.labels())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarType {
    #[serde(rename = "Regular War")]
    Regular,
    #[serde(rename = "CWL War")]
    League,
    #[serde(rename = "")]
    Unspecified,
}

impl WarType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Regular => "Regular War",
            Self::League => "CWL War",
            Self::Unspecified => "",
        }
    }

    pub fn attacks_per_member(self) -> usize {
        match self {
            Self::League => 1,
            Self::Regular | Self::Unspecified => 2,
        }
    }
}

/// One row of the war status page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarSummary {
    pub clan: String,
    pub tag: String,
    pub state: WarState,
    pub stars: Tally,
    pub attacks_left: Tally,
    pub missing: MissingMembers,
    pub start_in: String,
    pub end_in: String,
    pub war_type: WarType,
}

impl WarSummary {
    /// Row for a clan whose war could not be read, or that has no war.
    pub fn placeholder(clan: &ClanRef, state: WarState) -> Self {
        Self {
            clan: clan.name.clone(),
            tag: clan.tag.clone(),
            state,
            stars: Tally::Unknown,
            attacks_left: Tally::Unknown,
            missing: MissingMembers::NotApplicable,
            start_in: NOT_AVAILABLE.to_string(),
            end_in: NOT_AVAILABLE.to_string(),
            war_type: WarType::Unspecified,
        }
    }
}
