use std::net::TcpListener;

use tui_2048::adapter::server::{check_tcp_listen_available, ServerConfig};
use tui_2048::adapter::Adapter;

#[test]
fn adapter_port_check_fails_when_port_in_use() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral port");
    let port = listener.local_addr().unwrap().port();

    let err = check_tcp_listen_available("127.0.0.1", port).expect_err("expected addr in use");
    assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);
}

#[test]
fn adapter_start_reports_busy_port() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral port");
    let port = listener.local_addr().unwrap().port();

    let config = ServerConfig {
        port,
        ..ServerConfig::default()
    };
    let err = Adapter::start(config).err().expect("expected start to fail");
    assert!(err.to_string().contains(&port.to_string()), "{err:#}");
}
