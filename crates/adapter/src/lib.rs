//! Adapter module - AI control via TCP socket with JSON protocol
//!
//! External agents connect over TCP and play the game through a
//! **line-delimited JSON protocol**:
//!
//! 1. **Connection**: client connects (default `127.0.0.1:7878`)
//! 2. **Handshake**: client sends `hello`, server answers `welcome`
//! 3. **Controller Assignment**: the first client to say hello controls the
//!    game, later ones observe; when the controller leaves, the lowest
//!    remaining client id is promoted
//! 4. **Observation Streaming**: after every applied command the game state
//!    is broadcast to clients that asked for observations
//! 5. **Commanding**: the controller sends up to 32 actions per `command`
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: client info, protocol version (`1.x`), `requested.stream_observations`
//! - **command**: `actions` from `left`, `right`, `up`, `down`, `restart`
//! - **control**: `claim` or `release` controller status
//!
//! ## Server → Client
//!
//! - **welcome**: assigned client id, role and capabilities
//! - **observation**: board rows, score, status, legal moves, `state_hash`
//! - **ack**: command applied
//! - **error**: `code` + `message`
//!
//! # Environment Variables
//!
//! - `TUI_2048_AI_HOST`: bind address (default: "127.0.0.1")
//! - `TUI_2048_AI_PORT`: port number (default: 7878)
//! - `TUI_2048_AI_MAX_PENDING`: command queue bound (default: 10)
//! - `TUI_2048_AI_LOG_PATH`: append every wire line to this file
//! - `TUI_2048_AI_DISABLED`: set to "1" or "true" to disable the adapter
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1700000000000,"client":{"name":"my-ai","version":"0.1.0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1700000000001,"protocol_version":"1.0.0","client_id":1,"role":"controller",...}
//! Server -> Client: {"type":"observation","seq":1,"ts":1700000000002,"cells":[[0,2,0,0],...],"legal_moves":["left","right","down"],...}
//! Client -> Server: {"type":"command","seq":2,"ts":1700000000100,"actions":["left","up"]}
//! Server -> Client: {"type":"ack","seq":2,"ts":1700000000101,"status":"ok"}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"nc","version":"0"},"protocol_version":"1.0.0"}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

pub use protocol::*;
pub use runtime::{Adapter, AdapterStatus, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{build_observation, check_tcp_listen_available, run_server, ServerConfig};
