use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};

use tui_2048::adapter::protocol::{create_ack, create_hello};
use tui_2048::adapter::server::{build_observation, run_server, ServerConfig};
use tui_2048::adapter::{AdapterStatus, InboundCommand, InboundPayload, OutboundMessage};
use tui_2048::core::{EngineConfig, GameState};
use tui_2048::types::{Direction, GameAction};

fn test_config(max_pending_commands: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_pending_commands,
        ..ServerConfig::default()
    }
}

async fn read_json(lines: &mut Lines<BufReader<OwnedReadHalf>>) -> serde_json::Value {
    let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .expect("timeout waiting for line")
        .expect("io error")
        .expect("expected line");
    serde_json::from_str(&line).expect("server sent invalid json")
}

async fn send_line(write_half: &mut OwnedWriteHalf, line: &str) {
    write_half.write_all(line.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();
    write_half.flush().await.unwrap();
}

async fn connect(
    addr: std::net::SocketAddr,
) -> (Lines<BufReader<OwnedReadHalf>>, OwnedWriteHalf) {
    let stream = TcpStream::connect(addr).await.expect("connect failed");
    let (read_half, write_half) = stream.into_split();
    (BufReader::new(read_half).lines(), write_half)
}

async fn hello(
    lines: &mut Lines<BufReader<OwnedReadHalf>>,
    write_half: &mut OwnedWriteHalf,
    seq: u64,
    stream_observations: bool,
) -> serde_json::Value {
    let mut hello = create_hello(seq, "e2e-test", "1.0.0");
    hello.requested.stream_observations = stream_observations;
    send_line(write_half, &serde_json::to_string(&hello).unwrap()).await;
    read_json(lines).await
}

async fn recv_inbound(cmd_rx: &mut mpsc::Receiver<InboundCommand>) -> InboundCommand {
    tokio::time::timeout(Duration::from_secs(2), cmd_rx.recv())
        .await
        .expect("timeout waiting for inbound command")
        .expect("command channel closed")
}

#[tokio::test]
async fn adapter_hello_command_ack_and_observation() {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let _ = run_server(test_config(8), cmd_tx, out_rx, Some(ready_tx), None).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");
    let (mut lines, mut write_half) = connect(addr).await;

    let welcome = hello(&mut lines, &mut write_half, 1, true).await;
    assert_eq!(welcome["type"], "welcome");
    assert_eq!(welcome["seq"], 1);
    assert_eq!(welcome["role"], "controller");
    assert_eq!(welcome["protocol_version"], "1.0.0");
    assert_eq!(welcome["game_id"], "tui-2048");
    assert_eq!(welcome["capabilities"]["max_actions_per_command"], 32);
    assert_eq!(
        welcome["capabilities"]["actions"],
        serde_json::json!(["left", "right", "up", "down", "restart"])
    );

    // A streaming hello asks the game loop for an initial snapshot.
    let inbound = recv_inbound(&mut cmd_rx).await;
    assert!(matches!(inbound.payload, InboundPayload::SnapshotRequest));

    send_line(
        &mut write_half,
        r#"{"type":"command","seq":2,"ts":1,"actions":["left","UP","restart"]}"#,
    )
    .await;

    let inbound = recv_inbound(&mut cmd_rx).await;
    assert_eq!(inbound.seq, 2);
    match inbound.payload {
        InboundPayload::Actions(actions) => assert_eq!(
            actions.as_slice(),
            &[
                GameAction::Move(Direction::Left),
                GameAction::Move(Direction::Up),
                GameAction::Restart,
            ]
        ),
        other => panic!("unexpected payload: {other:?}"),
    }

    // ack after apply
    out_tx
        .send(OutboundMessage::ToClientAck {
            client_id: inbound.client_id,
            ack: create_ack(2),
        })
        .unwrap();
    let ack = read_json(&mut lines).await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["seq"], 2);
    assert_eq!(ack["status"], "ok");

    // broadcast observation
    let game = GameState::new(EngineConfig::default(), 1);
    let obs = build_observation(&game, 10);
    out_tx.send(OutboundMessage::BroadcastObservation { obs }).unwrap();

    let obs = read_json(&mut lines).await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["seq"], 10);
    assert_eq!(obs["size"], 4);
    assert_eq!(obs["status"], "playing");
    assert_eq!(obs["playable"], true);
    assert_eq!(obs["seed"], 1);
    assert_eq!(obs["state_hash"].as_str().map(str::len), Some(16));
    let non_zero = obs["cells"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|row| row.as_array().unwrap())
        .filter(|v| v.as_u64() != Some(0))
        .count();
    assert_eq!(non_zero, 2);

    server_handle.abort();
}

#[tokio::test]
async fn adapter_rejects_bad_commands() {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (_out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let _ = run_server(test_config(8), cmd_tx, out_rx, Some(ready_tx), None).await;
    });
    let addr = ready_rx.await.unwrap();
    let (mut lines, mut write_half) = connect(addr).await;

    // Command before hello.
    send_line(&mut write_half, r#"{"type":"command","seq":1,"ts":1,"actions":["left"]}"#).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "handshake_required");

    let welcome = hello(&mut lines, &mut write_half, 2, false).await;
    assert_eq!(welcome["type"], "welcome");

    // Unknown action name.
    send_line(&mut write_half, r#"{"type":"command","seq":3,"ts":1,"actions":["jump"]}"#).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 3);

    // Empty action list.
    send_line(&mut write_half, r#"{"type":"command","seq":4,"ts":1,"actions":[]}"#).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");

    // Too many actions.
    let many = vec!["left"; 33];
    let line = serde_json::json!({"type": "command", "seq": 5, "ts": 1, "actions": many});
    send_line(&mut write_half, &line.to_string()).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 5);

    // seq must increase; lines that fail to parse do not consume one.
    send_line(&mut write_half, r#"{"type":"command","seq":4,"ts":1,"actions":["left"]}"#).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");

    // Unknown type and plain garbage.
    send_line(&mut write_half, r#"{"type":"dance","seq":7,"ts":1}"#).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 7);

    send_line(&mut write_half, "not json").await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["seq"], 0);

    // None of it reached the game loop.
    assert!(cmd_rx.try_recv().is_err());

    server_handle.abort();
}

#[tokio::test]
async fn adapter_protocol_mismatch_closes_connection() {
    let (cmd_tx, _cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (_out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let _ = run_server(test_config(8), cmd_tx, out_rx, Some(ready_tx), None).await;
    });
    let addr = ready_rx.await.unwrap();
    let (mut lines, mut write_half) = connect(addr).await;

    let hello = create_hello(1, "old-client", "2.0.0");
    send_line(&mut write_half, &serde_json::to_string(&hello).unwrap()).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "protocol_mismatch");

    let eof = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .expect("timeout waiting for close");
    assert!(matches!(eof, Ok(None) | Err(_)));

    server_handle.abort();
}

#[tokio::test]
async fn adapter_second_client_is_observer() {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (_out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();
    let (status_tx, mut status_rx) = watch::channel(AdapterStatus::default());

    let server_handle = tokio::spawn(async move {
        let _ = run_server(test_config(8), cmd_tx, out_rx, Some(ready_tx), Some(status_tx)).await;
    });
    let addr = ready_rx.await.unwrap();

    let (mut lines1, mut write1) = connect(addr).await;
    let welcome1 = hello(&mut lines1, &mut write1, 1, false).await;
    assert_eq!(welcome1["role"], "controller");

    let (mut lines2, mut write2) = connect(addr).await;
    let welcome2 = hello(&mut lines2, &mut write2, 1, true).await;
    assert_eq!(welcome2["role"], "observer");
    assert_eq!(welcome2["controller_id"], welcome1["client_id"]);
    let _ = recv_inbound(&mut cmd_rx).await; // snapshot request

    send_line(&mut write2, r#"{"type":"command","seq":2,"ts":1,"actions":["left"]}"#).await;
    let err = read_json(&mut lines2).await;
    assert_eq!(err["code"], "not_controller");

    send_line(&mut write2, r#"{"type":"control","seq":3,"ts":1,"action":"claim"}"#).await;
    let err = read_json(&mut lines2).await;
    assert_eq!(err["code"], "controller_active");

    // Controller releases; the observer may now claim.
    send_line(&mut write1, r#"{"type":"control","seq":2,"ts":1,"action":"release"}"#).await;
    let ack = read_json(&mut lines1).await;
    assert_eq!(ack["type"], "ack");

    send_line(&mut write2, r#"{"type":"control","seq":4,"ts":1,"action":"claim"}"#).await;
    let ack = read_json(&mut lines2).await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["seq"], 4);

    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let st = *status_rx.borrow_and_update();
            if st.client_count == 2 && st.streaming_count == 1 && st.controller_id.is_some() {
                break;
            }
            status_rx.changed().await.unwrap();
        }
    })
    .await
    .expect("status never reflected both clients");

    server_handle.abort();
}

#[tokio::test]
async fn adapter_backpressure_returns_error() {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(1);
    let (_out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let _ = run_server(test_config(1), cmd_tx, out_rx, Some(ready_tx), None).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .unwrap()
        .unwrap();
    let (mut lines, mut write_half) = connect(addr).await;

    // Not streaming, so hello queues nothing.
    let _ = hello(&mut lines, &mut write_half, 1, false).await;

    // Nobody drains the queue: the first command fills it, the second bounces.
    send_line(&mut write_half, r#"{"type":"command","seq":2,"ts":1,"actions":["left"]}"#).await;
    send_line(&mut write_half, r#"{"type":"command","seq":3,"ts":1,"actions":["right"]}"#).await;

    let err = read_json(&mut lines).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "backpressure");
    assert_eq!(err["seq"], 3);

    let queued = recv_inbound(&mut cmd_rx).await;
    assert_eq!(queued.seq, 2);

    server_handle.abort();
}
