use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::format_gametime;
use crate::league::StatsQuery;
use crate::models::{DivisionId, GamePosition, PlayerId, StatLine, StatRates, TeamId};

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub division: u32,
    pub team: Option<u32>,
    /// First matchday label
    pub from: Option<String>,
    /// Last matchday label
    pub to: Option<String>,
    /// Position label, e.g. `GK`
    pub position: Option<String>,
    #[serde(default)]
    pub full_games_only: bool,
    /// Add per-full-game rates to every row
    #[serde(default)]
    pub normalize: bool,
}

#[derive(Debug, Serialize)]
pub struct PlayerStatRow {
    pub player: Option<PlayerId>,
    pub player_name: String,
    pub team: TeamId,
    pub team_name: String,
    pub position: &'static str,
    pub gametime: String,
    pub periods: u32,
    pub clean_sheets: u32,
    pub pass_success: f64,
    pub stats: StatLine,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_full_game: Option<StatRates>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub division: DivisionId,
    pub from: Option<String>,
    pub to: Option<String>,
    pub players: Vec<PlayerStatRow>,
}

pub async fn player_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<StatsResponse>, ApiError> {
    let league = state.league.read().await;
    let division = league.division(DivisionId::new(params.division))?.id;
    let order = league.matchday_order(division);

    let range = if params.from.is_some() || params.to.is_some() {
        let range = order
            .range_between(params.from.as_deref(), params.to.as_deref())
            .ok_or_else(|| ApiError::BadRequest("Unknown matchday".to_string()))?;
        Some(range)
    } else {
        None
    };

    let position = match params.position.as_deref() {
        Some(label) => Some(GamePosition::from_label(label).ok_or_else(|| {
            ApiError::BadRequest(format!("Unknown position '{}'", label))
        })?),
        None => None,
    };

    let query = StatsQuery {
        division,
        team: params.team.map(TeamId::new),
        range,
        position,
        full_games_only: params.full_games_only,
    };
    let sheets = league.statistics(&query, &state.rules)?;
    let full_game_secs = state.rules.full_game_secs();

    let players = sheets
        .into_iter()
        .map(|sheet| PlayerStatRow {
            player: sheet.player,
            player_name: sheet.player_name.clone(),
            team: sheet.team,
            team_name: league.team_name(sheet.team),
            position: sheet.stats.position.label(),
            gametime: format_gametime(sheet.stats.gametime),
            periods: sheet.periods,
            clean_sheets: sheet.clean_sheets,
            pass_success: sheet.pass_success(),
            per_full_game: params
                .normalize
                .then(|| sheet.per_full_game(full_game_secs)),
            stats: sheet.stats,
        })
        .collect();

    let label = |index: usize| order.labels().get(index).cloned();
    Ok(Json(StatsResponse {
        division,
        from: range.and_then(|r| label(r.start)),
        to: range.and_then(|r| label(r.end)),
        players,
    }))
}

pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/api/stats", get(player_stats))
}
