//! casino-stats entry point.
//!
//! Wires the pipeline, runs the synthetic event source through it and
//! serves the statistics over HTTP and WebSocket.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use casino_stats::aggregator::{
    Aggregator, GameAggregator, Leaderboard, PlayerAggregator, TimeAggregator,
};
use casino_stats::api;
use casino_stats::app_state::AppState;
use casino_stats::broker::SubscriptionBroker;
use casino_stats::config::{AppConfig, LogFormat};
use casino_stats::enrichment::{
    EnrichmentCache, ExchangeRateProvider, FixedRateProvider, HttpExchangeRateProvider,
    InMemoryPlayerDirectory, PgPlayerDirectory, PlayerDirectory,
};
use casino_stats::service::Publisher;
use casino_stats::source::generator;
use casino_stats::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, channel = %config.event_channel, "starting casino-stats");

    // External collaborators
    let rates: Arc<dyn ExchangeRateProvider> = match &config.exchange_api_url {
        Some(url) => Arc::new(HttpExchangeRateProvider::new(
            url.clone(),
            config.exchange_http_timeout,
        )?),
        None => {
            tracing::info!("no exchange endpoint configured, using identity rates");
            Arc::new(FixedRateProvider::identity())
        }
    };
    let directory: Arc<dyn PlayerDirectory> = match &config.database_url {
        Some(url) => Arc::new(
            PgPlayerDirectory::connect(
                url,
                config.database_max_connections,
                Duration::from_secs(config.database_connect_timeout_secs),
            )
            .await?,
        ),
        None => {
            tracing::info!("no player database configured, using in-memory directory");
            Arc::new(InMemoryPlayerDirectory::new())
        }
    };

    // Aggregators share one leaderboard
    let leaderboard = Arc::new(Leaderboard::new());
    let players = Arc::new(PlayerAggregator::new(Arc::clone(&leaderboard)));
    let broker = Arc::new(SubscriptionBroker::new(config.broker_capacity));
    broker.register(Arc::clone(&players) as Arc<dyn Aggregator>);
    broker.register(Arc::new(GameAggregator::new(leaderboard)));
    broker.register(Arc::new(TimeAggregator::new()));

    let publisher = Arc::new(Publisher::new(
        Arc::clone(&broker),
        EnrichmentCache::new(rates, config.exchange_rate_ttl),
        directory,
        config.event_channel.clone(),
    ));

    // Subscribers must be listening before the first event is published
    let cancel = CancellationToken::new();
    let mut subscribers = broker.spawn_subscribers(&config.event_channel, &cancel);
    tokio::spawn(watch_shutdown(cancel.clone(), config.run_timeout));

    let (source, source_task) = generator::spawn(config.generator(), cancel.clone());
    let pipeline = {
        let publisher = Arc::clone(&publisher);
        let cancel = cancel.clone();
        tokio::spawn(async move { publisher.run(source, &cancel).await })
    };

    // HTTP server
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(Arc::clone(&publisher), players));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");
    let server = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { cancel.cancelled().await })
                .await
        })
    };

    let report = pipeline.await?;
    tracing::info!(outcome = ?report.outcome, published = report.published, "publisher finished");

    while let Some(joined) = subscribers.join_next().await {
        match joined {
            Ok(exit) => tracing::info!(
                subscriber = exit.name,
                reason = ?exit.reason,
                processed = exit.processed,
                skipped = exit.skipped,
                "subscriber joined"
            ),
            Err(err) => tracing::error!(error = %err, "subscriber task failed"),
        }
    }
    let generated = source_task.await?;
    tracing::info!(generated, "event source joined");

    match publisher.get_stats() {
        Ok(stats) => tracing::info!(
            top_player_bet = ?stats.top_player_bet,
            top_player_deposit = ?stats.top_player_deposit,
            top_player_win = ?stats.top_player_win,
            total_events = stats.total_events,
            events_per_minute = stats.events_per_minute,
            moving_avg_per_second = stats.moving_avg_per_second,
            "final statistics"
        ),
        Err(err) => tracing::warn!(error = %err, "final statistics unavailable"),
    }

    if !cancel.is_cancelled() {
        tracing::info!("event source exhausted, serving final statistics until shutdown");
    }
    server.await??;
    tracing::info!("casino-stats stopped");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Cancels `cancel` on Ctrl-C or when `deadline` elapses.
async fn watch_shutdown(cancel: CancellationToken, deadline: Option<Duration>) {
    let deadline = async move {
        match deadline {
            Some(after) => tokio::time::sleep(after).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    tokio::select! {
        () = cancel.cancelled() => return,
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("received Ctrl-C, shutting down"),
            Err(err) => {
                tracing::warn!(error = %err, "cannot listen for Ctrl-C");
                (&mut deadline).await;
                tracing::info!("run deadline reached, shutting down");
            }
        },
        () = &mut deadline => tracing::info!("run deadline reached, shutting down"),
    }
    cancel.cancel();
}
