//! TCP server for the game service
//!
//! Handles incoming connections and manages client lifecycle. Each connection
//! gets its own task; requests are answered in order, one response line per
//! request line.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::ServiceError;
use crate::game_service::GameService;
use crate::protocol::{parse_action, parse_mode, parse_request, Request, Response};

/// Longest request line accepted, newline included
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Start the TCP server.
///
/// Sends the bound address on `ready_tx` once listening, so callers binding
/// port 0 learn the real port.
pub async fn run_server(
    service: Arc<GameService>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = service.config().bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;
    info!(%bound, "game server listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0usize;

    // Accept incoming connections
    loop {
        let (socket, peer) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!(client_id, %peer, "client connected");

        let service = Arc::clone(&service);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, service).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    service: Arc<GameService>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);

    let mut line: Vec<u8> = Vec::with_capacity(1024);
    let mut buf: Vec<u8> = Vec::with_capacity(4096);

    loop {
        line.clear();
        let bytes_read = read_bounded_line(&mut reader, &mut line).await?;

        if bytes_read == 0 {
            // Client disconnected
            break;
        }

        if line.last() != Some(&b'\n') && bytes_read == MAX_LINE_BYTES {
            skip_rest_of_line(&mut reader, &mut line).await?;
            warn!(client_id, limit = MAX_LINE_BYTES, "request line too long");
            let err = ServiceError::InvalidRequest(format!(
                "request line exceeds {MAX_LINE_BYTES} bytes"
            ));
            write_response(&mut writer, &mut buf, &Response::error(&err)).await?;
            continue;
        }

        let text = String::from_utf8_lossy(&line);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = handle_line(&service, trimmed);
        if let Response::Error { code, message } = &response {
            debug!(client_id, code = code.as_str(), message = message.as_str(), "request rejected");
        }

        write_response(&mut writer, &mut buf, &response).await?;
    }

    Ok(())
}

/// Read up to `MAX_LINE_BYTES`, stopping after a newline
async fn read_bounded_line(
    reader: &mut BufReader<OwnedReadHalf>,
    line: &mut Vec<u8>,
) -> std::io::Result<usize> {
    reader
        .take(MAX_LINE_BYTES as u64)
        .read_until(b'\n', line)
        .await
}

/// Discard input up to and including the next newline
async fn skip_rest_of_line(
    reader: &mut BufReader<OwnedReadHalf>,
    scratch: &mut Vec<u8>,
) -> std::io::Result<()> {
    loop {
        scratch.clear();
        let n = read_bounded_line(reader, scratch).await?;
        if n == 0 || scratch.last() == Some(&b'\n') {
            return Ok(());
        }
    }
}

async fn write_response(
    writer: &mut OwnedWriteHalf,
    buf: &mut Vec<u8>,
    response: &Response,
) -> anyhow::Result<()> {
    buf.clear();
    serde_json::to_writer(&mut *buf, response)?;
    buf.push(b'\n');
    writer.write_all(buf).await?;
    writer.flush().await?;
    Ok(())
}

/// Parse one request line and answer it
pub fn handle_line(service: &GameService, line: &str) -> Response {
    match parse_request(line) {
        Ok(request) => handle_request(service, request),
        Err(err) => Response::error(&err),
    }
}

/// Dispatch a parsed request to the service
pub fn handle_request(service: &GameService, request: Request) -> Response {
    if let Some(player) = request.player() {
        debug!(player, "dispatching request");
    }
    let result = match request {
        Request::Start { player, mode } => parse_mode(mode.as_deref())
            .and_then(|mode| service.start(&player, mode))
            .map(|snapshot| Response::state(true, &snapshot)),
        Request::Action { player, action } => parse_action(&action)
            .and_then(|action| service.apply(&player, action))
            .map(|outcome| Response::state(outcome.applied, &outcome.snapshot)),
        Request::Tick { player } => service
            .tick(&player)
            .map(|snapshot| Response::state(true, &snapshot)),
        Request::Snapshot { player } => service
            .snapshot(&player)
            .map(|snapshot| Response::state(true, &snapshot)),
        Request::End { player } => service.end(&player).map(|summary| Response::summary(&summary)),
        Request::Leaderboard { limit } => service
            .leaderboard(limit)
            .map(|scores| Response::Leaderboard { scores }),
        Request::Stats { player } => service
            .player_stats(&player)
            .map(|stats| Response::Stats { stats }),
    };

    result.unwrap_or_else(|err| Response::error(&err))
}
