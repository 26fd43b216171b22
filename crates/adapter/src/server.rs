//! TCP server for AI adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::hash::{Hash, Hasher};
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use arrayvec::ArrayVec;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, watch, RwLock};
use tracing::{debug, info, warn};

use crate::core::{legal_moves, GameState, RandomSource};
use crate::protocol::*;
use crate::runtime::{AdapterStatus, InboundCommand, InboundPayload, OutboundMessage};
use crate::types::GameAction;

/// Major protocol version accepted from clients.
const PROTOCOL_MAJOR_PREFIX: &str = "1.";

/// Stable 64-bit FNV-1a hasher for deterministic `state_hash`.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions.
#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Pull `seq` out of a line that failed to parse, so the error can echo it.
fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
    /// Append every line sent or received to this file.
    pub log_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            protocol_version: "1.0.0".to_string(),
            max_pending_commands: 10,
            log_path: None,
        }
    }
}

impl ServerConfig {
    /// Create from `TUI_2048_AI_*` environment variables.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("TUI_2048_AI_HOST").unwrap_or(defaults.host);
        let port = env::var("TUI_2048_AI_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        let max_pending_commands = env::var("TUI_2048_AI_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        let log_path = env::var("TUI_2048_AI_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            max_pending_commands,
            log_path,
        }
    }

    /// Whether `TUI_2048_AI_DISABLED` turns the adapter off.
    pub fn is_disabled() -> bool {
        std::env::var("TUI_2048_AI_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("invalid adapter address {}:{}", self.host, self.port))?
            .next()
            .ok_or_else(|| anyhow!("adapter address {}:{} resolved to nothing", self.host, self.port))
    }
}

/// Fail fast when the adapter port is already taken, before the UI starts.
pub fn check_tcp_listen_available(host: &str, port: u16) -> std::io::Result<()> {
    let listener = std::net::TcpListener::bind((host, port))?;
    drop(listener);
    Ok(())
}

/// Shared server state
struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
    status_tx: Option<watch::Sender<AdapterStatus>>,
}

impl ServerState {
    fn new(config: ServerConfig, status_tx: Option<watch::Sender<AdapterStatus>>) -> Self {
        Self {
            config,
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
            status_tx,
        }
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    async fn is_controller(&self, client_id: usize) -> bool {
        *self.controller.read().await == Some(client_id)
    }

    /// Enforce strictly increasing `seq` per client.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };

        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn publish_status(&self) {
        let Some(tx) = self.status_tx.as_ref() else {
            return;
        };
        let controller_id = *self.controller.read().await;
        let clients = self.clients.read().await;
        let status = AdapterStatus {
            client_count: clients.len().min(u16::MAX as usize) as u16,
            controller_id,
            streaming_count: clients
                .iter()
                .filter(|c| c.stream_observations)
                .count()
                .min(u16::MAX as usize) as u16,
        };
        tx.send_replace(status);
    }
}

/// Handle to a connected client
struct ClientHandle {
    id: usize,
    stream_observations: bool,
    handshaken: bool,
    last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
enum ClientOutbound {
    Line(String),
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(Arc<ObservationMessage>),
}

fn encode_into<T: Serialize>(buf: &mut Vec<u8>, msg: &T) -> bool {
    buf.clear();
    serde_json::to_writer(&mut *buf, msg).is_ok()
}

/// Start the TCP server
///
/// Runs until the listener fails. `ready_tx` receives the bound address
/// (useful with port 0); `status_tx` receives connection counts for the UI.
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
    status_tx: Option<watch::Sender<AdapterStatus>>,
) -> anyhow::Result<()> {
    let wire_log_tx = config.log_path.clone().map(spawn_wire_log);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind adapter on {addr}"))?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, "adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config, status_tx));
    state.publish_status().await;
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                dispatch_outbound(&state, msg).await;
            }
        });
    }

    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!(client_id, peer = %addr, "client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        let wire_log_tx = wire_log_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, state, command_tx, wire_log_tx).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

async fn dispatch_outbound(state: &ServerState, msg: OutboundMessage) {
    let clients = state.clients.read().await;
    match msg {
        OutboundMessage::ToClient { client_id, line } => {
            if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                let _ = c.tx.send(ClientOutbound::Line(line));
            }
        }
        OutboundMessage::Broadcast { line } => {
            for c in clients.iter().filter(|c| c.stream_observations) {
                let _ = c.tx.send(ClientOutbound::Line(line.clone()));
            }
        }
        OutboundMessage::ToClientObservation { client_id, obs } => {
            if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                let _ = c.tx.send(ClientOutbound::Observation(Arc::new(obs)));
            }
        }
        OutboundMessage::BroadcastObservation { obs } => {
            let obs = Arc::new(obs);
            for c in clients.iter().filter(|c| c.stream_observations) {
                let _ = c.tx.send(ClientOutbound::Observation(Arc::clone(&obs)));
            }
        }
        OutboundMessage::ToClientAck { client_id, ack } => {
            if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                let _ = c.tx.send(ClientOutbound::Ack(ack));
            }
        }
    }
}

/// Append-only wire log; one JSON line per message in either direction.
fn spawn_wire_log(path: String) -> mpsc::UnboundedSender<Vec<u8>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path, error = %e, "cannot open adapter wire log");
                return;
            }
        };

        while let Some(mut bytes) = rx.recv().await {
            bytes.push(b'\n');
            if file.write_all(&bytes).await.is_err() {
                break;
            }
        }

        let _ = file.flush().await;
    });
    tx
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
    wire_log_tx: Option<mpsc::UnboundedSender<Vec<u8>>>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            stream_observations: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }
    state.publish_status().await;

    let wire_log_tx_out = wire_log_tx.clone();

    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            let encoded = match &msg {
                ClientOutbound::Line(line) => {
                    buf.clear();
                    buf.extend_from_slice(line.as_bytes());
                    true
                }
                ClientOutbound::Welcome(m) => encode_into(&mut buf, m),
                ClientOutbound::Ack(m) => encode_into(&mut buf, m),
                ClientOutbound::Error(m) => encode_into(&mut buf, m),
                ClientOutbound::Observation(m) => encode_into(&mut buf, m.as_ref()),
            };
            if !encoded {
                continue;
            }
            if let Some(log) = wire_log_tx_out.as_ref() {
                let _ = log.send(buf.clone());
            }

            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let result = read_loop(&mut reader, client_id, &state, &command_tx, &tx, wire_log_tx.as_ref()).await;

    // Clean up even after a read error: remove the client and promote a new
    // controller if needed.
    {
        let mut controller = state.controller.write().await;
        let mut clients = state.clients.write().await;

        clients.retain(|c| c.id != client_id);

        if *controller == Some(client_id) {
            let next_id = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
            *controller = next_id;
            match next_id {
                Some(new_id) => info!(client_id = new_id, "controller promoted"),
                None => info!(client_id, "controller released"),
            }
        }
    }
    state.publish_status().await;

    drop(tx);
    let _ = write_task.await;

    result
}

async fn read_loop(
    reader: &mut BufReader<tokio::net::tcp::OwnedReadHalf>,
    client_id: usize,
    state: &Arc<ServerState>,
    command_tx: &mpsc::Sender<InboundCommand>,
    tx: &mpsc::UnboundedSender<ClientOutbound>,
    wire_log_tx: Option<&mpsc::UnboundedSender<Vec<u8>>>,
) -> anyhow::Result<()> {
    let send_error = |seq: u64, code: ErrorCode, message: &str| {
        let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
    };

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }

        let raw_line = line.trim_end_matches(['\n', '\r']);
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(log) = wire_log_tx {
            let _ = log.send(raw_line.as_bytes().to_vec());
        }

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, hello.seq).await
                {
                    send_error(hello.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }

                if !hello.protocol_version.starts_with(PROTOCOL_MAJOR_PREFIX) {
                    warn!(client_id, version = %hello.protocol_version, "protocol mismatch");
                    send_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    return Ok(());
                }

                // First client to hello becomes controller.
                let (role, controller_id) = {
                    let mut controller = state.controller.write().await;
                    let mut clients = state.clients.write().await;
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        client.stream_observations = hello.requested.stream_observations;
                    }
                    if controller.is_none() {
                        *controller = Some(client_id);
                        info!(client_id, client = %hello.client.name, "client is now controller");
                    }
                    let role = if *controller == Some(client_id) {
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    };
                    (role, *controller)
                };
                state.publish_status().await;

                let welcome = create_welcome(
                    hello.seq,
                    &state.config.protocol_version,
                    client_id as u64,
                    role,
                    controller_id.map(|id| id as u64),
                );
                let _ = tx.send(ClientOutbound::Welcome(welcome));

                if hello.requested.stream_observations {
                    let _ = command_tx.try_send(InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::SnapshotRequest,
                    });
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !state.is_handshaken(client_id).await {
                    send_error(cmd.seq, ErrorCode::HandshakeRequired, "Send hello before command");
                    continue;
                }

                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    send_error(cmd.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }

                if !state.is_controller(client_id).await {
                    send_error(cmd.seq, ErrorCode::NotController, "Only controller may send commands");
                    continue;
                }

                let actions = match map_command(&cmd) {
                    Ok(a) => a,
                    Err(message) => {
                        send_error(cmd.seq, ErrorCode::InvalidCommand, message);
                        continue;
                    }
                };

                // Bounded queue; the game loop acks once the actions are applied.
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Actions(actions),
                    })
                    .is_err()
                {
                    debug!(client_id, seq = cmd.seq, "command queue full");
                    send_error(cmd.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }

            Ok(ParsedMessage::Control(ctrl)) => {
                if !state.is_handshaken(client_id).await {
                    send_error(ctrl.seq, ErrorCode::HandshakeRequired, "Send hello before control");
                    continue;
                }

                if !state.check_and_update_seq(client_id, ctrl.seq).await {
                    send_error(ctrl.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }

                let granted = {
                    let mut controller = state.controller.write().await;
                    match ctrl.action {
                        ControlAction::Claim => match *controller {
                            None => {
                                *controller = Some(client_id);
                                Ok(())
                            }
                            Some(id) if id == client_id => Ok(()),
                            Some(_) => Err((ErrorCode::ControllerActive, "Controller already assigned")),
                        },
                        ControlAction::Release => {
                            if *controller == Some(client_id) {
                                *controller = None;
                                Ok(())
                            } else {
                                Err((ErrorCode::NotController, "Only controller may release"))
                            }
                        }
                    }
                };

                match granted {
                    Ok(()) => {
                        info!(client_id, action = ?ctrl.action, "control change");
                        state.publish_status().await;
                        let _ = tx.send(ClientOutbound::Ack(create_ack(ctrl.seq)));
                    }
                    Err((code, message)) => send_error(ctrl.seq, code, message),
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, unknown.seq).await
                {
                    send_error(unknown.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                send_error(unknown.seq, ErrorCode::InvalidCommand, "Unknown message type");
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                send_error(seq, ErrorCode::InvalidCommand, &format!("JSON parse error: {e}"));
            }
        }
    }
}

/// Map a protocol command into engine actions.
fn map_command(cmd: &CommandMessage) -> Result<ArrayVec<GameAction, MAX_ACTIONS_PER_COMMAND>, &'static str> {
    let Some(list) = cmd.actions.as_ref() else {
        return Err("Missing actions");
    };
    if list.0.is_empty() {
        return Err("Empty actions");
    }
    Ok(list.0.iter().copied().map(GameAction::from).collect())
}

/// Build observation message from game state
pub fn build_observation<R: RandomSource>(game: &GameState<R>, seq: u64) -> ObservationMessage {
    let grid = game.grid();
    let status = game.status();

    let mut hasher = Fnv1aHasher::new();
    grid.size().hash(&mut hasher);
    grid.cells().hash(&mut hasher);
    game.score().hash(&mut hasher);
    status.hash(&mut hasher);
    game.moves().hash(&mut hasher);
    game.episode_id().hash(&mut hasher);
    game.seed().hash(&mut hasher);
    game.config().win_target.hash(&mut hasher);
    let state_hash = StateHash(hasher.finish());

    // A finished game accepts no moves even when tiles could still slide.
    let legal = if status.is_over() {
        LegalMoves::default()
    } else {
        LegalMoves(legal_moves(grid))
    };

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        playable: !status.is_over(),
        status: status.into(),
        won: status == crate::types::GameStatus::Won,
        lost: status == crate::types::GameStatus::Lost,
        episode_id: game.episode_id(),
        seed: game.seed(),
        moves: game.moves(),
        size: grid.size(),
        cells: grid.to_rows(),
        score: game.score(),
        best_tile: grid.max_tile(),
        target: game.config().win_target,
        legal_moves: legal,
        last_spawn: game.last_spawn().map(SpawnSnapshot::from),
        state_hash,
    }
}
