use std::time::Duration;

use clanwar_shared::{ClanRef, normalize_tag};
use tracing::warn;

pub const DEFAULT_COC_API_BASE_URL: &str = "https://api.clashofclans.com/v1";
pub const DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_LEAGUE_WAR_MAX_CONCURRENCY: usize = 4;
pub const DEFAULT_SERVER_PORT: u16 = 10000;

const DEFAULT_CLANS: [(&str, &str); 3] = [
    ("Krush War", "#29P2VLJP"),
    ("Krush Family", "#2L2UP98LU"),
    ("불난 집에 부채질", "#9VPPJU8Y"),
];

pub fn coc_api_token() -> Option<String> {
    std::env::var("COC_API_TOKEN")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn coc_api_base_url() -> String {
    std::env::var("COC_API_BASE_URL")
        .ok()
        .map(|value| value.trim().trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_COC_API_BASE_URL.to_string())
}

/// Tracked clans in display order. `WAR_CLANS` is `Name=#TAG;Name=#TAG`.
pub fn tracked_clans() -> Vec<ClanRef> {
    let parsed = std::env::var("WAR_CLANS")
        .ok()
        .map(|raw| parse_clan_list(&raw))
        .unwrap_or_default();

    if parsed.is_empty() {
        return DEFAULT_CLANS
            .iter()
            .map(|(name, tag)| ClanRef::new(*name, tag))
            .collect();
    }

    parsed
}

fn parse_clan_list(raw: &str) -> Vec<ClanRef> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let parsed = entry
                .rsplit_once('=')
                .map(|(name, tag)| (name.trim(), tag.trim()))
                .filter(|(name, tag)| !name.is_empty() && normalize_tag(tag).len() > 1);
            if parsed.is_none() {
                warn!(entry, "ignoring malformed WAR_CLANS entry");
            }
            parsed.map(|(name, tag)| ClanRef::new(name, tag))
        })
        .collect()
}

pub fn upstream_http_timeout() -> Duration {
    std::env::var("UPSTREAM_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS))
}

pub fn upstream_connect_timeout() -> Duration {
    std::env::var("UPSTREAM_CONNECT_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS))
}

pub fn league_war_max_concurrency() -> usize {
    std::env::var("LEAGUE_WAR_MAX_CONCURRENCY")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_LEAGUE_WAR_MAX_CONCURRENCY)
}

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}
