//! Statistics handlers: combined stats, per-game and per-player views.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{GameStatsResponse, PlayerStatsResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, StatsError};
use crate::service::StatsSnapshot;

/// `GET /materialized`: Combined live statistics.
///
/// # Errors
///
/// Returns [`StatsError`] if an aggregator is missing or misbehaves.
#[utoipa::path(
    get,
    path = "/materialized",
    tag = "Statistics",
    summary = "Combined statistics",
    description = "Returns the top player by bets, deposits and wins together with the total event count, events in the last minute and the moving average of events per second.",
    responses(
        (status = 200, description = "Current statistics", body = StatsSnapshot),
        (status = 404, description = "Aggregator not registered", body = ErrorResponse),
        (status = 500, description = "Aggregator returned an unexpected snapshot", body = ErrorResponse),
    )
)]
pub async fn materialized(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StatsError> {
    let stats = state.publisher.get_stats()?;
    Ok((StatusCode::OK, Json(stats)))
}

/// `GET /stats/games`: Per-game statistics.
///
/// # Errors
///
/// Returns [`StatsError`] if the game aggregator is missing.
#[utoipa::path(
    get,
    path = "/stats/games",
    tag = "Statistics",
    summary = "Per-game statistics",
    description = "Returns play counts and stakes for every game seen, plus the most played and most betted game.",
    responses(
        (status = 200, description = "Game statistics", body = GameStatsResponse),
        (status = 404, description = "Game aggregator not registered", body = ErrorResponse),
    )
)]
pub async fn game_stats(State(state): State<AppState>) -> Result<impl IntoResponse, StatsError> {
    let snapshot = state.publisher.game_stats()?;
    Ok((StatusCode::OK, Json(GameStatsResponse::from(snapshot))))
}

/// `GET /stats/players/{id}`: One player's counters.
///
/// # Errors
///
/// Returns [`StatsError::PlayerNotFound`] if no event for the player has
/// been aggregated.
#[utoipa::path(
    get,
    path = "/stats/players/{id}",
    tag = "Statistics",
    summary = "Per-player statistics",
    params(("id" = u64, Path, description = "Player id")),
    responses(
        (status = 200, description = "Player counters", body = PlayerStatsResponse),
        (status = 404, description = "Player not seen yet", body = ErrorResponse),
    )
)]
pub async fn player_stats(
    State(state): State<AppState>,
    Path(player_id): Path<u64>,
) -> Result<impl IntoResponse, StatsError> {
    let counters = state
        .players
        .player(player_id)
        .ok_or(StatsError::PlayerNotFound(player_id))?;
    Ok((
        StatusCode::OK,
        Json(PlayerStatsResponse::new(player_id, counters)),
    ))
}

/// Statistics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/materialized", get(materialized))
        .route("/stats/games", get(game_stats))
        .route("/stats/players/{id}", get(player_stats))
}
