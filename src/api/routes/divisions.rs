use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{DivisionId, StandingRow, TeamId};

#[derive(Debug, Serialize)]
pub struct TeamSummary {
    pub id: TeamId,
    pub name: String,
    pub initials: String,
}

#[derive(Debug, Serialize)]
pub struct DivisionSummary {
    pub id: DivisionId,
    pub name: String,
    pub season: String,
    pub teams: Vec<TeamSummary>,
    pub matchdays: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DivisionListResponse {
    pub divisions: Vec<DivisionSummary>,
}

pub async fn list_divisions(
    State(state): State<AppState>,
) -> Result<Json<DivisionListResponse>, ApiError> {
    let league = state.league.read().await;

    let mut divisions = Vec::with_capacity(league.divisions.len());
    for division in &league.divisions {
        let teams = league
            .division_teams(division.id)?
            .into_iter()
            .map(|t| TeamSummary {
                id: t.id,
                name: t.name.clone(),
                initials: t.initials.clone(),
            })
            .collect();

        divisions.push(DivisionSummary {
            id: division.id,
            name: division.name.clone(),
            season: division.season.clone(),
            teams,
            matchdays: league.matchday_order(division.id).labels().to_vec(),
        });
    }

    Ok(Json(DivisionListResponse { divisions }))
}

#[derive(Debug, Deserialize)]
pub struct StandingsParams {
    /// First matchday label to count
    pub from: Option<String>,
    /// Last matchday label to count
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub division: DivisionId,
    pub from: Option<String>,
    pub to: Option<String>,
    pub rows: Vec<StandingRow>,
}

pub async fn division_standings(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(params): Query<StandingsParams>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let league = state.league.read().await;
    let division = league.division(DivisionId::new(id))?;
    let order = league.matchday_order(division.id);

    let range = if params.from.is_some() || params.to.is_some() {
        let range = order
            .range_between(params.from.as_deref(), params.to.as_deref())
            .ok_or_else(|| {
                ApiError::BadRequest(format!(
                    "Unknown matchday; expected one of: {}",
                    order.labels().join(", ")
                ))
            })?;
        Some(range)
    } else {
        None
    };

    let rows = league.standings(division.id, range.as_ref(), &state.rules)?;
    let label = |index: usize| order.labels().get(index).cloned();

    Ok(Json(StandingsResponse {
        division: division.id,
        from: range.and_then(|r| label(r.start)),
        to: range.and_then(|r| label(r.end)),
        rows,
    }))
}

pub fn division_routes() -> Router<AppState> {
    Router::new()
        .route("/api/divisions", get(list_divisions))
        .route("/api/divisions/:id/standings", get(division_standings))
}
