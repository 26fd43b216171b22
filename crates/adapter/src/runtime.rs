//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server. The tokio runtime
//! lives inside [`Adapter`]; the game loop only ever calls non-blocking
//! methods on it.

use anyhow::Context;
use arrayvec::ArrayVec;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use crate::protocol::{AckMessage, ObservationMessage, MAX_ACTIONS_PER_COMMAND};
use crate::server::{check_tcp_listen_available, run_server, ServerConfig};
use crate::types::GameAction;

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    /// Actions from the controller, applied in order.
    Actions(ArrayVec<GameAction, MAX_ACTIONS_PER_COMMAND>),
    /// A client just said hello and wants the current observation.
    SnapshotRequest,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    Broadcast { line: String },
    ToClientObservation { client_id: usize, obs: ObservationMessage },
    BroadcastObservation { obs: ObservationMessage },
    ToClientAck { client_id: usize, ack: AckMessage },
}

/// Connection summary for the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterStatus {
    pub client_count: u16,
    pub controller_id: Option<usize>,
    pub streaming_count: u16,
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    status_rx: watch::Receiver<AdapterStatus>,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` when `TUI_2048_AI_DISABLED` is set, and an error
    /// when the port is already in use.
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        if ServerConfig::is_disabled() {
            info!("AI adapter disabled via TUI_2048_AI_DISABLED");
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        check_tcp_listen_available(&config.host, config.port).with_context(|| {
            format!(
                "AI adapter cannot listen on {}:{} (set TUI_2048_AI_PORT or TUI_2048_AI_DISABLED=1)",
                config.host, config.port
            )
        })?;

        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (status_tx, status_rx) = watch::channel(AdapterStatus::default());

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, None, Some(status_tx)).await {
                error!(error = %e, "adapter server stopped");
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            status_rx,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    /// Latest connection summary published by the server.
    pub fn status(&self) -> AdapterStatus {
        *self.status_rx.borrow()
    }
}
