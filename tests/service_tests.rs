//! Service tests - sessions, persistence and request dispatch together

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use web_tetris::core::GameSummary;
use web_tetris::service::{
    handle_line, GameService, HighScoreRecord, InMemoryGateway, PersistenceError,
    PersistenceGateway, PlayerStats, Response, ServiceConfig, ServiceError,
};
use web_tetris::types::{GameAction, GameMode};

fn service_with(gateway: Arc<dyn PersistenceGateway>) -> GameService {
    GameService::new(ServiceConfig::default(), gateway)
}

fn play_until_over(service: &GameService, player: &str) {
    for _ in 0..500 {
        let outcome = service.apply(player, GameAction::HardDrop).unwrap();
        if outcome.snapshot.game_over {
            return;
        }
    }
    panic!("match for {player} never ended");
}

/// Gateway that fails on demand
#[derive(Default)]
struct FlakyGateway {
    inner: InMemoryGateway,
    failing: Mutex<bool>,
}

impl FlakyGateway {
    fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    fn check(&self) -> Result<(), PersistenceError> {
        if *self.failing.lock().unwrap() {
            Err(PersistenceError::Backend("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

impl PersistenceGateway for FlakyGateway {
    fn record_score(
        &self,
        player: &str,
        summary: &GameSummary,
    ) -> Result<HighScoreRecord, PersistenceError> {
        self.check()?;
        self.inner.record_score(player, summary)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<HighScoreRecord>, PersistenceError> {
        self.check()?;
        self.inner.leaderboard(limit)
    }

    fn player_stats(&self, player: &str) -> Result<PlayerStats, PersistenceError> {
        self.check()?;
        self.inner.player_stats(player)
    }
}

/// Gateway whose `record_score` parks until the test lets it through
struct GatedGateway {
    inner: InMemoryGateway,
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

fn gated() -> (Arc<GatedGateway>, Receiver<()>, Sender<()>) {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let gateway = GatedGateway {
        inner: InMemoryGateway::new(),
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    };
    (Arc::new(gateway), entered_rx, release_tx)
}

impl PersistenceGateway for GatedGateway {
    fn record_score(
        &self,
        player: &str,
        summary: &GameSummary,
    ) -> Result<HighScoreRecord, PersistenceError> {
        let _ = self.entered.lock().unwrap().send(());
        let _ = self
            .release
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(5));
        self.inner.record_score(player, summary)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<HighScoreRecord>, PersistenceError> {
        self.inner.leaderboard(limit)
    }

    fn player_stats(&self, player: &str) -> Result<PlayerStats, PersistenceError> {
        self.inner.player_stats(player)
    }
}

#[test]
fn test_one_match_per_player() {
    let service = service_with(Arc::new(InMemoryGateway::new()));

    service.start("ann", GameMode::Normal).unwrap();
    service.start("bob", GameMode::Sprint).unwrap();
    service.apply("ann", GameAction::HardDrop).unwrap();

    // Starting again replaces the unfinished match
    let fresh = service.start("ann", GameMode::Normal).unwrap();
    assert_eq!(fresh.total_pieces, 0);

    assert_eq!(
        service.sessions().active_players(),
        vec!["ann".to_string(), "bob".to_string()]
    );
    assert_eq!(service.snapshot("bob").unwrap().mode, GameMode::Sprint);
}

#[test]
fn test_finished_match_can_still_be_ended() {
    let gateway = Arc::new(InMemoryGateway::new());
    let service = service_with(gateway.clone());

    service.start("ann", GameMode::Normal).unwrap();
    play_until_over(&service, "ann");

    assert_eq!(
        service.apply("ann", GameAction::Rotate).unwrap_err(),
        ServiceError::GameOver("ann".into())
    );

    let expected = service.snapshot("ann").unwrap();
    let summary = service.end("ann").unwrap();
    assert_eq!(summary.score, expected.score);
    assert_eq!(summary.lines_cleared, expected.lines_cleared);
    assert_eq!(summary.level, expected.level);

    assert!(service.sessions().is_empty());
    assert_eq!(gateway.len(), 1);
    assert_eq!(
        service.end("ann").unwrap_err(),
        ServiceError::NoActiveGame("ann".into())
    );
}

#[test]
fn test_end_retries_after_persistence_failure() {
    let gateway = Arc::new(FlakyGateway::default());
    let service = service_with(gateway.clone());

    service.start("ann", GameMode::Normal).unwrap();
    service.apply("ann", GameAction::HardDrop).unwrap();

    gateway.set_failing(true);
    let err = service.end("ann").unwrap_err();
    assert!(matches!(err, ServiceError::Persistence(_)));
    assert!(service.sessions().contains("ann"));

    gateway.set_failing(false);
    let summary = service.end("ann").unwrap();
    assert!(!service.sessions().contains("ann"));

    let stats = service.player_stats("ann").unwrap();
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.total_score, u64::from(summary.score));
}

#[test]
fn test_leaderboard_uses_configured_limit() {
    let gateway = Arc::new(InMemoryGateway::new());
    let config = ServiceConfig {
        leaderboard_limit: 2,
        ..ServiceConfig::default()
    };
    let service = GameService::new(config, gateway);

    for player in ["ann", "bob", "cy"] {
        service.start(player, GameMode::Normal).unwrap();
        service.apply(player, GameAction::HardDrop).unwrap();
        service.end(player).unwrap();
    }

    let top = service.leaderboard(None).unwrap();
    assert_eq!(top.len(), 2);
    assert!(top[0].score >= top[1].score);
    assert_eq!(service.leaderboard(Some(10)).unwrap().len(), 3);
}

#[test]
fn test_hold_reports_success_flag() {
    let service = service_with(Arc::new(InMemoryGateway::new()));
    handle_line(&service, r#"{"type":"start","player":"ann"}"#);

    let first = handle_line(&service, r#"{"type":"action","player":"ann","action":"hold"}"#);
    assert!(matches!(first, Response::State { success: true, .. }));

    let second = handle_line(&service, r#"{"type":"action","player":"ann","action":"hold"}"#);
    match second {
        Response::State { success, game_state } => {
            assert!(!success);
            assert!(game_state.held_piece.is_some());
            assert!(!game_state.can_hold);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn test_concurrent_end_records_once() {
    let (gateway, entered, release) = gated();
    let service = service_with(gateway.clone());
    service.start("ann", GameMode::Normal).unwrap();
    service.apply("ann", GameAction::HardDrop).unwrap();

    let results = thread::scope(|s| {
        let first = s.spawn(|| service.end("ann"));
        entered.recv_timeout(Duration::from_secs(5)).unwrap();

        let second = s.spawn(|| service.end("ann"));
        thread::sleep(Duration::from_millis(50));
        release.send(()).unwrap();
        // Let a wrongly admitted second record through instead of hanging
        let _ = release.send(());

        [first.join().unwrap(), second.join().unwrap()]
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| r == &Err(ServiceError::NoActiveGame("ann".into()))));
    assert_eq!(gateway.inner.len(), 1);
    assert_eq!(service.player_stats("ann").unwrap().games_played, 1);
    assert!(!service.sessions().contains("ann"));
}

#[test]
fn test_end_keeps_match_started_meanwhile() {
    let (gateway, entered, release) = gated();
    let service = service_with(gateway.clone());
    service.start("ann", GameMode::Normal).unwrap();
    service.apply("ann", GameAction::HardDrop).unwrap();

    thread::scope(|s| {
        let ending = s.spawn(|| service.end("ann"));
        entered.recv_timeout(Duration::from_secs(5)).unwrap();

        // Replace the match while the old one is being recorded
        service.start("ann", GameMode::Sprint).unwrap();
        release.send(()).unwrap();

        let summary = ending.join().unwrap().unwrap();
        assert!(summary.score >= 2);
    });

    let current = service.snapshot("ann").unwrap();
    assert_eq!(current.mode, GameMode::Sprint);
    assert_eq!(current.total_pieces, 0);
    assert_eq!(gateway.inner.len(), 1);
}
