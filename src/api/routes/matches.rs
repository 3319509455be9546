use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::calculate::{MatchFilter, MatchdaySelection};
use crate::league::{MatchReport, MatchRow};
use crate::models::{DivisionId, MatchId, TeamId};

#[derive(Debug, Deserialize)]
pub struct ListMatchesParams {
    pub division: Option<u32>,
    pub team: Option<u32>,
    pub matchday: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchRow>,
    pub pagination: PaginationMeta,
}

pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<ListMatchesParams>,
) -> Result<Json<MatchListResponse>, ApiError> {
    let league = state.league.read().await;

    let divisions: Vec<DivisionId> = match params.division {
        Some(id) => vec![league.division(DivisionId::new(id))?.id],
        None => league.divisions.iter().map(|d| d.id).collect(),
    };
    let team = match params.team {
        Some(id) => Some(league.team(TeamId::new(id))?.id),
        None => None,
    };
    let matchdays = match params.matchday {
        Some(label) => MatchdaySelection::Exactly(label),
        None => MatchdaySelection::All,
    };

    let mut rows: Vec<MatchRow> = divisions
        .into_iter()
        .flat_map(|division| {
            let filter = MatchFilter::division(division)
                .with_team(team)
                .with_matchdays(matchdays.clone());
            league.match_rows(&filter, &state.rules)
        })
        .collect();
    rows.sort_by_key(|r| r.id);

    let pagination = Pagination::new(params.page, params.page_size);
    let meta = PaginationMeta::new(&pagination, rows.len() as u32);

    Ok(Json(MatchListResponse {
        matches: pagination.slice(&rows).to_vec(),
        pagination: meta,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MatchReportParams {
    /// Limit the report to one period (1-based)
    pub period: Option<usize>,
}

pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(params): Query<MatchReportParams>,
) -> Result<Json<MatchReport>, ApiError> {
    let league = state.league.read().await;
    let report = league.match_report(MatchId::new(id), params.period, &state.rules)?;
    Ok(Json(report))
}

pub fn match_routes() -> Router<AppState> {
    Router::new()
        .route("/api/matches", get(list_matches))
        .route("/api/matches/:id", get(get_match))
}
