use std::fmt::Write as _;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use clanwar_shared::{WarState, WarSummary};
use tracing::info;

use crate::services::aggregator::summarize_all;
use crate::state::AppState;

pub async fn warsummary_page(State(state): State<AppState>) -> impl IntoResponse {
    let summaries = collect_summaries(&state).await;
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(render_summary_page(&summaries)),
    )
}

pub async fn warsummary_json(State(state): State<AppState>) -> impl IntoResponse {
    let summaries = collect_summaries(&state).await;
    ([(header::CACHE_CONTROL, "no-store")], Json(summaries))
}

async fn collect_summaries(state: &AppState) -> Vec<WarSummary> {
    state.observability.record_warsummary_request();
    let summaries = summarize_all(&state.coc, &state.clans, state.league_war_max_concurrency).await;

    let errors = summaries
        .iter()
        .filter(|summary| summary.state == WarState::Error)
        .count() as u64;
    if errors > 0 {
        state.observability.record_clan_errors(errors);
    }
    info!(clans = summaries.len(), errors, "built war summary");

    summaries
}

fn render_summary_page(summaries: &[WarSummary]) -> String {
    let mut body = String::from("<html><body style=\"font-family: Menlo, monospace;\">\n");

    for summary in summaries {
        let _ = writeln!(
            body,
            "🛡️ <b>{}</b>: {}⭐, {}공 남음 ({})<br>",
            escape_html(&summary.clan),
            summary.stars,
            summary.attacks_left,
            summary.war_type.label(),
        );
        match summary.state {
            WarState::InWar => {
                let _ = writeln!(body, "🕒 {} 후 종료<br>", escape_html(&summary.end_in));
            }
            WarState::Preparation => {
                let _ = writeln!(body, "🕒 {} 후 시작<br>", escape_html(&summary.start_in));
            }
            WarState::WarEnded => body.push_str("🏁 전쟁 종료<br>\n"),
            WarState::NotInWar => body.push_str("💤 전쟁 없음<br>\n"),
            WarState::Private => body.push_str("🔒 전쟁 기록 비공개<br>\n"),
            WarState::Maintenance => body.push_str("🛠️ 서버 점검 중<br>\n"),
            WarState::Error => body.push_str("⚠️ 조회 실패<br>\n"),
            WarState::Unknown => body.push_str("❓ 알 수 없는 상태<br>\n"),
        }
        let missing = summary
            .missing
            .labels()
            .into_iter()
            .map(escape_html)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(body, "⚔️ 미공격: {missing}<br><br>");
    }

    body.push_str("</body></html>\n");
    body
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
