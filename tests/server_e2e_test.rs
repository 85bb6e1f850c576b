use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use web_tetris::service::{
    run_server, GameService, InMemoryGateway, ServiceConfig, MAX_LINE_BYTES,
};

async fn start_server() -> (SocketAddr, JoinHandle<()>) {
    let config = ServiceConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServiceConfig::default()
    };
    let service = Arc::new(GameService::new(config, Arc::new(InMemoryGateway::new())));
    let (ready_tx, ready_rx) = oneshot::channel();

    let handle = tokio::spawn(async move {
        let _ = run_server(service, Some(ready_tx)).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");
    (addr, handle)
}

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn request(&mut self, line: &str) -> serde_json::Value {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();

        let reply = tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .unwrap()
            .unwrap()
            .expect("expected response line");
        serde_json::from_str(&reply).unwrap()
    }
}

#[tokio::test]
async fn server_plays_a_match_end_to_end() {
    let (addr, server_handle) = start_server().await;
    let mut client = Client::connect(addr).await;

    let started = client
        .request(r#"{"type":"start","player":"ann","mode":"sprint"}"#)
        .await;
    assert_eq!(started["type"], "state");
    assert_eq!(started["success"], true);
    assert_eq!(started["game_state"]["game_mode"], "sprint");
    assert_eq!(started["game_state"]["sprint_target"], 40);
    assert_eq!(started["game_state"]["board"].as_array().unwrap().len(), 20);

    let moved = client
        .request(r#"{"type":"action","player":"ann","action":"hard_drop"}"#)
        .await;
    assert_eq!(moved["type"], "state");
    assert_eq!(moved["game_state"]["total_pieces"], 1);
    let score = moved["game_state"]["score"].as_u64().unwrap();
    assert!(score >= 2);

    let ticked = client.request(r#"{"type":"tick","player":"ann"}"#).await;
    assert_eq!(ticked["game_state"]["current_piece"]["y"], 1);

    let summary = client.request(r#"{"type":"end","player":"ann"}"#).await;
    assert_eq!(summary["type"], "summary");
    assert_eq!(summary["final_score"].as_u64(), Some(score));
    assert_eq!(summary["level"], 1);

    let leaderboard = client.request(r#"{"type":"leaderboard","limit":5}"#).await;
    assert_eq!(leaderboard["type"], "leaderboard");
    assert_eq!(leaderboard["scores"][0]["player"], "ann");
    assert_eq!(leaderboard["scores"][0]["score"].as_u64(), Some(score));

    let stats = client.request(r#"{"type":"stats","player":"ann"}"#).await;
    assert_eq!(stats["stats"]["games_played"], 1);

    server_handle.abort();
}

#[tokio::test]
async fn server_reports_errors_and_keeps_connection() {
    let (addr, server_handle) = start_server().await;
    let mut client = Client::connect(addr).await;

    let garbage = client.request("this is not json").await;
    assert_eq!(garbage["type"], "error");
    assert_eq!(garbage["code"], "invalid_request");

    let missing = client.request(r#"{"type":"snapshot","player":"bob"}"#).await;
    assert_eq!(missing["code"], "no_active_game");

    // Still usable after errors
    let started = client.request(r#"{"type":"start","player":"bob"}"#).await;
    assert_eq!(started["type"], "state");

    let stats = client.request(r#"{"type":"stats","player":"nobody"}"#).await;
    assert_eq!(stats["stats"]["games_played"], 0);
    assert_eq!(stats["stats"]["best_score"], 0);

    server_handle.abort();
}

#[tokio::test]
async fn server_keeps_players_apart() {
    let (addr, server_handle) = start_server().await;
    let mut ann = Client::connect(addr).await;
    let mut bob = Client::connect(addr).await;

    ann.request(r#"{"type":"start","player":"ann"}"#).await;
    bob.request(r#"{"type":"start","player":"bob"}"#).await;

    ann.request(r#"{"type":"action","player":"ann","action":"hard_drop"}"#)
        .await;

    let bob_view = bob.request(r#"{"type":"snapshot","player":"bob"}"#).await;
    assert_eq!(bob_view["game_state"]["total_pieces"], 0);

    let ann_view = bob.request(r#"{"type":"snapshot","player":"ann"}"#).await;
    assert_eq!(ann_view["game_state"]["total_pieces"], 1);

    server_handle.abort();
}

#[tokio::test]
async fn server_rejects_oversized_lines() {
    let (addr, server_handle) = start_server().await;
    let mut client = Client::connect(addr).await;

    let huge = "x".repeat(MAX_LINE_BYTES * 2 + 17);
    let rejected = client.request(&huge).await;
    assert_eq!(rejected["type"], "error");
    assert_eq!(rejected["code"], "invalid_request");

    // The rest of the long line was dropped; the next request is read cleanly
    let started = client.request(r#"{"type":"start","player":"dee"}"#).await;
    assert_eq!(started["type"], "state");
    assert_eq!(started["success"], true);

    server_handle.abort();
}
