//! OpenAPI document for the read endpoints.

use utoipa::OpenApi;

use crate::aggregator::{TopAmount, TopCount};
use crate::api::dto::{GameStatsDto, GameStatsResponse, PlayerStatsResponse};
use crate::api::handlers::{stats, system};
use crate::error::{ErrorBody, ErrorResponse};
use crate::service::StatsSnapshot;

/// Generated OpenAPI document.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "casino-stats", description = "Live casino event statistics"),
    paths(
        stats::materialized,
        stats::game_stats,
        stats::player_stats,
        system::health_handler,
    ),
    components(schemas(
        StatsSnapshot,
        TopCount,
        TopAmount,
        GameStatsDto,
        GameStatsResponse,
        PlayerStatsResponse,
        system::HealthResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Statistics", description = "Aggregated event statistics"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;
