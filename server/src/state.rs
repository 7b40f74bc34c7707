use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use clanwar_shared::ClanRef;
use tracing::warn;

use crate::config::{
    coc_api_base_url, league_war_max_concurrency, tracked_clans, upstream_connect_timeout,
    upstream_http_timeout,
};
use crate::services::coc_client::CocClient;

#[derive(Clone)]
pub struct AppState {
    /// Clans shown on the summary page, in display order.
    pub clans: Arc<[ClanRef]>,
    pub coc: CocClient,
    pub league_war_max_concurrency: usize,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    warsummary_requests_total: AtomicU64,
    clan_errors_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub warsummary_requests_total: u64,
    pub clan_errors_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            warsummary_requests_total: self.warsummary_requests_total.load(Ordering::Relaxed),
            clan_errors_total: self.clan_errors_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_warsummary_request(&self) {
        self.warsummary_requests_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_clan_errors(&self, count: u64) {
        self.clan_errors_total.fetch_add(count, Ordering::Relaxed);
    }
}

impl AppState {
    /// Builds state from the environment; `token` is the API credential.
    pub fn from_env(token: &str) -> Result<Self, String> {
        let request_timeout = upstream_http_timeout();
        let connect_timeout = upstream_connect_timeout();
        let http_client = reqwest::Client::builder()
            .user_agent("clanwar-server/0.1")
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .or_else(|e| {
                warn!(
                    error = %e,
                    "failed to build configured HTTP client, retrying without custom user-agent"
                );
                reqwest::Client::builder()
                    .timeout(request_timeout)
                    .connect_timeout(connect_timeout)
                    .build()
            })
            .map_err(|e| format!("failed to build timeout-configured HTTP client: {e}"))?;

        let coc = CocClient::new(http_client, &coc_api_base_url(), token)?;
        Ok(Self::new(tracked_clans(), coc, league_war_max_concurrency()))
    }

    pub fn new(clans: Vec<ClanRef>, coc: CocClient, league_war_max_concurrency: usize) -> Self {
        Self {
            clans: clans.into(),
            coc,
            league_war_max_concurrency,
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }
}
