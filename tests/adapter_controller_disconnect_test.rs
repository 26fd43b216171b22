use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

use tui_2048::adapter::protocol::{create_ack, create_hello};
use tui_2048::adapter::runtime::InboundPayload;
use tui_2048::adapter::server::{run_server, ServerConfig};
use tui_2048::adapter::{InboundCommand, OutboundMessage};

async fn read_line(lines: &mut Lines<BufReader<OwnedReadHalf>>) -> serde_json::Value {
    let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .expect("timeout waiting for line")
        .expect("io error")
        .expect("expected line");
    serde_json::from_str(&line).unwrap()
}

async fn write_line(write_half: &mut OwnedWriteHalf, line: &str) {
    write_half.write_all(line.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();
    write_half.flush().await.unwrap();
}

async fn handshake(
    addr: std::net::SocketAddr,
    name: &str,
) -> (Lines<BufReader<OwnedReadHalf>>, OwnedWriteHalf, serde_json::Value) {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    let mut hello = create_hello(1, name, "1.0.0");
    hello.requested.stream_observations = false;
    write_line(&mut write_half, &serde_json::to_string(&hello).unwrap()).await;

    let welcome = read_line(&mut lines).await;
    assert_eq!(welcome["type"], "welcome");
    (lines, write_half, welcome)
}

/// Server plus a minimal game loop that acks every action batch.
async fn start_server() -> (std::net::SocketAddr, tokio::task::JoinHandle<()>, tokio::task::JoinHandle<()>) {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_pending_commands: 64,
        ..ServerConfig::default()
    };

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(128);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx), None).await;
    });

    let engine_handle = tokio::spawn(async move {
        while let Some(inbound) = cmd_rx.recv().await {
            if matches!(inbound.payload, InboundPayload::Actions(_)) {
                let _ = out_tx.send(OutboundMessage::ToClientAck {
                    client_id: inbound.client_id,
                    ack: create_ack(inbound.seq),
                });
            }
        }
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .unwrap()
        .unwrap();
    (addr, server_handle, engine_handle)
}

#[tokio::test]
async fn controller_disconnect_does_not_leave_stale_controller() {
    let (addr, server_handle, engine_handle) = start_server().await;

    // Client 1 becomes controller on hello and then breaks its connection.
    {
        let (_lines, mut write_half, welcome) = handshake(addr, "ctrl1").await;
        assert_eq!(welcome["role"], "controller");

        // Invalid UTF-8 makes the server's line reader fail, so cleanup must
        // also run on an I/O error and not only on a clean EOF.
        write_half.write_all(&[0xFF, b'\n']).await.unwrap();
        let _ = write_half.flush().await;
    }

    tokio::time::sleep(Duration::from_millis(50)).await;

    // Client 2 arrives after the fact and takes over.
    let (mut lines, mut write_half, welcome) = handshake(addr, "ctrl2").await;
    assert_eq!(welcome["role"], "controller");

    write_line(
        &mut write_half,
        r#"{"type":"command","seq":2,"ts":1,"actions":["left","down"]}"#,
    )
    .await;
    let resp = read_line(&mut lines).await;
    assert_eq!(resp["type"], "ack", "expected ack, got {resp}");
    assert_eq!(resp["seq"], 2);

    server_handle.abort();
    engine_handle.abort();
}

#[tokio::test]
async fn observer_is_promoted_when_controller_leaves() {
    let (addr, server_handle, engine_handle) = start_server().await;

    let (lines1, write1, welcome1) = handshake(addr, "first").await;
    assert_eq!(welcome1["role"], "controller");

    let (mut lines2, mut write2, welcome2) = handshake(addr, "second").await;
    assert_eq!(welcome2["role"], "observer");

    write_line(&mut write2, r#"{"type":"command","seq":2,"ts":1,"actions":["up"]}"#).await;
    let resp = read_line(&mut lines2).await;
    assert_eq!(resp["code"], "not_controller");

    drop(write1);
    drop(lines1);
    tokio::time::sleep(Duration::from_millis(50)).await;

    write_line(&mut write2, r#"{"type":"command","seq":3,"ts":1,"actions":["up"]}"#).await;
    let resp = read_line(&mut lines2).await;
    assert_eq!(resp["type"], "ack", "expected ack, got {resp}");
    assert_eq!(resp["seq"], 3);

    server_handle.abort();
    engine_handle.abort();
}
