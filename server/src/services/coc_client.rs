use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::services::coc_model::{ErrorResponse, LeagueGroup, RawWar};

const BODY_PREVIEW_CHARS: usize = 200;

/// Failures of a single API call.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The clan's war log is not public (or the credential was refused).
    #[error("war log is private")]
    Private,

    #[error("API is under maintenance")]
    Maintenance,

    #[error("resource not found")]
    NotFound,

    #[error("upstream status {status}{}", status_detail(.reason.as_deref(), .message.as_deref()))]
    Status {
        status: StatusCode,
        reason: Option<String>,
        message: Option<String>,
    },

    /// Network, TLS or timeout failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode payload: {0}")]
    Decode(String),
}

fn status_detail(reason: Option<&str>, message: Option<&str>) -> String {
    let mut detail = String::new();
    if let Some(reason) = reason {
        detail.push_str(&format!(" ({reason})"));
    }
    if let Some(message) = message {
        detail.push_str(&format!(": {message}"));
    }
    detail
}

/// Authenticated client for the three war endpoints the summary needs.
#[derive(Clone)]
pub struct CocClient {
    http: reqwest::Client,
    base_url: reqwest::Url,
    token: Arc<str>,
}

impl CocClient {
    pub fn new(http: reqwest::Client, base_url: &str, token: &str) -> Result<Self, String> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|e| format!("invalid API base URL {base_url:?}: {e}"))?;
        if base_url.cannot_be_a_base() {
            return Err(format!("API base URL {base_url} cannot carry a path"));
        }

        Ok(Self {
            http,
            base_url,
            token: Arc::from(token),
        })
    }

    pub async fn current_war(&self, clan_tag: &str) -> Result<RawWar, ApiError> {
        self.get_json(self.endpoint(&["clans", clan_tag, "currentwar"]))
            .await
    }

    pub async fn league_group(&self, clan_tag: &str) -> Result<LeagueGroup, ApiError> {
        self.get_json(self.endpoint(&["clans", clan_tag, "currentwar", "leaguegroup"]))
            .await
    }

    pub async fn league_war(&self, war_tag: &str) -> Result<RawWar, ApiError> {
        self.get_json(self.endpoint(&["clanwarleagues", "wars", war_tag]))
            .await
    }

    /// Appends path segments to the base URL. Each segment is percent-encoded,
    /// so a leading `#` in a tag becomes `%23`.
    pub fn endpoint(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: reqwest::Url) -> Result<T, ApiError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(classify_error(status, &bytes));
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Decode(format!("{e}; body preview: {}", body_preview(&bytes))))
    }
}

fn classify_error(status: StatusCode, body: &[u8]) -> ApiError {
    let ErrorResponse { reason, message } = serde_json::from_slice(body).unwrap_or_default();

    match reason.as_deref() {
        Some("accessDenied" | "privateWarLog") => return ApiError::Private,
        Some("inMaintenance") => return ApiError::Maintenance,
        Some("notFound") => return ApiError::NotFound,
        _ => {}
    }

    match status {
        StatusCode::FORBIDDEN => {
            warn!(
                reason = reason.as_deref().unwrap_or("<none>"),
                message = message.as_deref().unwrap_or(""),
                "403 without a private-war-log reason; check the API token and its IP allowlist"
            );
            ApiError::Private
        }
        StatusCode::SERVICE_UNAVAILABLE => ApiError::Maintenance,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        _ => ApiError::Status {
            status,
            reason,
            message,
        },
    }
}

fn body_preview(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .take(BODY_PREVIEW_CHARS)
        .collect()
}
