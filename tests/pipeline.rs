//! End-to-end pipeline tests: source → publisher → broker → aggregators.

#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use casino_stats::aggregator::{
    Aggregator, GameAggregator, Leaderboard, PlayerAggregator, TimeAggregator, TopAmount, TopCount,
};
use casino_stats::broker::{ExitReason, SubscriberExit, SubscriptionBroker};
use casino_stats::domain::{Currency, Event, Player};
use casino_stats::enrichment::{EnrichmentCache, FixedRateProvider, InMemoryPlayerDirectory};
use casino_stats::service::{Publisher, RunOutcome};
use casino_stats::source::generator::{self, GeneratorConfig};

const CHANNEL: &str = "casino_event";

struct Pipeline {
    publisher: Arc<Publisher>,
    players: Arc<PlayerAggregator>,
    games: Arc<GameAggregator>,
}

fn pipeline() -> Pipeline {
    let leaderboard = Arc::new(Leaderboard::new());
    let players = Arc::new(PlayerAggregator::new(Arc::clone(&leaderboard)));
    let games = Arc::new(GameAggregator::new(leaderboard));

    let broker = Arc::new(SubscriptionBroker::new(1024));
    broker.register(Arc::clone(&players) as Arc<dyn Aggregator>);
    broker.register(Arc::clone(&games) as Arc<dyn Aggregator>);
    broker.register(Arc::new(TimeAggregator::new()));

    let rates = FixedRateProvider::new().with_rate(Currency::Usd, Currency::Eur, 0.5);
    let directory = InMemoryPlayerDirectory::new()
        .with_player(7, Player::new("seven@example.com", Utc::now()));
    let publisher = Arc::new(Publisher::new(
        broker,
        EnrichmentCache::new(Arc::new(rates), Duration::from_secs(1)),
        Arc::new(directory),
        CHANNEL,
    ));

    Pipeline {
        publisher,
        players,
        games,
    }
}

async fn join_all(mut set: JoinSet<SubscriberExit>) -> Vec<SubscriberExit> {
    let mut exits = Vec::new();
    while let Some(joined) = set.join_next().await {
        let Ok(exit) = joined else {
            panic!("subscriber task panicked");
        };
        exits.push(exit);
    }
    exits.sort_by_key(|exit| exit.name);
    exits
}

/// Publishes `events` through the full pipeline and waits for every
/// subscriber to drain.
async fn run_events(pipeline: &Pipeline, events: Vec<Event>) -> Vec<SubscriberExit> {
    let cancel = CancellationToken::new();
    let subscribers = pipeline
        .publisher
        .broker()
        .spawn_subscribers(CHANNEL, &cancel);

    let (tx, rx) = mpsc::channel(events.len().max(1));
    for event in events {
        let _ = tx.send(event).await;
    }
    drop(tx);

    let report = pipeline.publisher.run(rx, &cancel).await;
    assert_eq!(report.outcome, RunOutcome::Exhausted);

    let Ok(exits) = tokio::time::timeout(Duration::from_secs(5), join_all(subscribers)).await
    else {
        panic!("subscribers did not drain");
    };
    exits
}

#[tokio::test]
async fn single_reference_bet_updates_player_and_leaderboard() {
    let pipeline = pipeline();
    run_events(
        &pipeline,
        vec![Event::bet(1, 7, 101, 500, Currency::Eur, false, Utc::now())],
    )
    .await;

    let Some(counters) = pipeline.players.player(7) else {
        panic!("player 7 should have been aggregated");
    };
    assert_eq!(counters.bet_count, 1);
    assert_eq!(counters.bet_amount, 500);

    let Ok(stats) = pipeline.publisher.get_stats() else {
        panic!("stats should be available");
    };
    assert_eq!(stats.top_player_bet, TopCount::new(7, 1));
    assert_eq!(stats.total_events, 1);
}

#[tokio::test]
async fn game_stops_determine_most_played_game() {
    let pipeline = pipeline();
    let at = Utc::now();
    run_events(
        &pipeline,
        vec![
            Event::game_stop(1, 1, 3, at),
            Event::game_stop(2, 2, 3, at),
            Event::game_stop(3, 3, 3, at),
        ],
    )
    .await;

    let Ok(games) = pipeline.publisher.game_stats() else {
        panic!("game stats should be available");
    };
    assert_eq!(games.most_played_game, TopCount::new(3, 3));
    let Some(game) = pipeline.games.game(3) else {
        panic!("game 3 should exist");
    };
    assert_eq!(game.play_count, 3);
}

#[tokio::test]
async fn non_reference_bets_are_converted_before_aggregation() {
    let pipeline = pipeline();
    let at = Utc::now();
    run_events(
        &pipeline,
        vec![
            Event::bet(1, 7, 101, 300, Currency::Usd, true, at),
            Event::bet(2, 8, 102, 100, Currency::Eur, false, at),
        ],
    )
    .await;

    let Some(counters) = pipeline.players.player(7) else {
        panic!("player 7 should have been aggregated");
    };
    assert_eq!(counters.bet_amount, 150);
    assert_eq!(counters.win_count, 1);

    let Ok(games) = pipeline.publisher.game_stats() else {
        panic!("game stats should be available");
    };
    assert_eq!(games.most_betted_game, TopAmount::new(101, 150));
    let Some(book_of_cats) = games.games.iter().find(|g| g.id == 101) else {
        panic!("game 101 should be listed");
    };
    assert_eq!(book_of_cats.bet_per_currency.get(&Currency::Usd), Some(&3.0));
}

#[tokio::test]
async fn failed_conversion_leaves_reference_amount_at_zero() {
    let pipeline = pipeline();
    run_events(
        &pipeline,
        vec![Event::deposit(1, 9, 1_000, Currency::Gbp, Utc::now())],
    )
    .await;

    let Some(counters) = pipeline.players.player(9) else {
        panic!("player 9 should have been aggregated");
    };
    assert_eq!(counters.deposit_count, 1);
    assert_eq!(counters.deposit_amount, 0);
}

#[tokio::test]
async fn sentinel_drains_every_subscriber_after_all_events() {
    let pipeline = pipeline();
    let at = Utc.with_ymd_and_hms(2024, 3, 2, 10, 5, 0).single().unwrap_or_else(Utc::now);
    let events: Vec<Event> = (0..25)
        .map(|id| Event::game_start(id, id % 4, 100 + id % 10, at))
        .collect();

    let exits = run_events(&pipeline, events).await;
    assert_eq!(exits.len(), 3);
    for exit in &exits {
        assert_eq!(exit.reason, ExitReason::Shutdown, "{}", exit.name);
        assert_eq!(exit.processed, 25, "{}", exit.name);
        assert_eq!(exit.skipped, 0, "{}", exit.name);
    }
    assert_eq!(pipeline.publisher.broker().receiver_count(CHANNEL), 0);
}

#[tokio::test]
async fn cancellation_stops_unbounded_source_and_subscribers() {
    let pipeline = pipeline();
    let cancel = CancellationToken::new();
    let subscribers = pipeline
        .publisher
        .broker()
        .spawn_subscribers(CHANNEL, &cancel);

    let config = GeneratorConfig {
        interval: Duration::from_millis(1),
        ..GeneratorConfig::default()
    };
    let (source, source_task) = generator::spawn(config, cancel.clone());
    let run = {
        let publisher = Arc::clone(&pipeline.publisher);
        let cancel = cancel.clone();
        tokio::spawn(async move { publisher.run(source, &cancel).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let Ok(Ok(report)) = tokio::time::timeout(Duration::from_secs(5), run).await else {
        panic!("publisher did not stop on cancellation");
    };
    assert_eq!(report.outcome, RunOutcome::Cancelled);

    let Ok(exits) = tokio::time::timeout(Duration::from_secs(5), join_all(subscribers)).await
    else {
        panic!("subscribers did not stop on cancellation");
    };
    assert!(exits.iter().all(|exit| exit.reason == ExitReason::Cancelled));
    assert!(source_task.await.is_ok());
}

#[tokio::test]
async fn stats_snapshot_exposes_six_keys() {
    let pipeline = pipeline();
    run_events(
        &pipeline,
        vec![Event::deposit(1, 7, 100, Currency::Eur, Utc::now())],
    )
    .await;

    let Ok(stats) = pipeline.publisher.get_stats() else {
        panic!("stats should be available");
    };
    let Ok(serde_json::Value::Object(map)) = serde_json::to_value(stats) else {
        panic!("stats should serialize to an object");
    };
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "events_per_minute",
            "moving_avg_per_second",
            "top_player_bet",
            "top_player_deposit",
            "top_player_win",
            "total_events",
        ]
    );
    assert_eq!(stats.top_player_deposit, TopCount::new(7, 1));
}

#[tokio::test]
async fn concurrent_consumers_never_lose_updates() {
    let leaderboard = Arc::new(Leaderboard::new());
    let players = Arc::new(PlayerAggregator::new(leaderboard));
    let mut tasks = JoinSet::new();

    for worker in 0..8u64 {
        let players = Arc::clone(&players);
        tasks.spawn(async move {
            for n in 0..100u64 {
                let mut bet = Event::bet(worker * 1_000 + n, 1, 101, 10, Currency::Eur, false, Utc::now());
                bet.amount_in_reference = Some(10);
                players.consume(&bet);
            }
        });
    }
    while let Some(joined) = tasks.join_next().await {
        assert!(joined.is_ok());
    }

    let Some(counters) = players.player(1) else {
        panic!("player 1 should exist");
    };
    assert_eq!(counters.bet_count, 800);
    assert_eq!(counters.bet_amount, 8_000);
}
