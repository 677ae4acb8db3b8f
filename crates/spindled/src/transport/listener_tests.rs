//! Tests for the socket listener.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rstest::{fixture, rstest};

use spindle_config::SocketEndpoint;

use super::listener::SocketListener;
use super::{ConnectionHandler, CountingHandler, ListenerError, MessageHandoff};
use crate::events::EventLoop;

#[fixture]
fn tcp_endpoint() -> SocketEndpoint {
    SocketEndpoint::tcp("127.0.0.1", 0)
}

fn wait_for_count(count: &AtomicUsize, expected: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if count.load(Ordering::SeqCst) >= expected {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[rstest]
fn tcp_listener_accepts_connections(tcp_endpoint: SocketEndpoint) {
    let listener = SocketListener::bind(&tcp_endpoint).expect("bind tcp listener");
    let addr = listener
        .local_addr()
        .expect("listener should report local address");
    let (count, handler) = CountingHandler::new();
    let handler: Arc<dyn ConnectionHandler> = handler;
    let handle = listener.start(handler).expect("start listener");

    TcpStream::connect(addr).expect("connect first client");
    TcpStream::connect(addr).expect("connect second client");

    assert!(wait_for_count(&count, 2), "expected two connections");
    handle.shutdown();
    handle.join().expect("join listener");
}

#[rstest]
fn listener_feeds_messages_to_the_event_loop(tcp_endpoint: SocketEndpoint) {
    let events = EventLoop::default().spawn().expect("spawn loop");
    let listener = SocketListener::bind(&tcp_endpoint).expect("bind tcp listener");
    let addr = listener.local_addr().expect("local address");
    let handle = listener
        .start(Arc::new(MessageHandoff::new(events.queue())))
        .expect("start listener");

    let mut client = TcpStream::connect(addr).expect("connect client");
    client
        .write_all(b"config\0frobnicate\0\0")
        .expect("write message");
    let mut response = String::new();
    client.read_to_string(&mut response).expect("read response");
    assert_eq!(
        response,
        "error: unknown command 'frobnicate' for domain 'config'\n"
    );

    handle.shutdown();
    handle.join().expect("join listener");
    events.shutdown().expect("stop loop");
}

#[cfg(unix)]
#[fixture]
fn unix_tempdir() -> tempfile::TempDir {
    tempfile::tempdir().expect("temp dir")
}

#[cfg(unix)]
fn unix_endpoint(path: &std::path::Path) -> SocketEndpoint {
    SocketEndpoint::unix(path.to_str().expect("utf8 path"))
}

#[cfg(unix)]
#[rstest]
fn unix_listener_cleans_stale_socket_files(unix_tempdir: tempfile::TempDir) {
    let path = unix_tempdir.path().join("spindled.sock");
    {
        let _stale = std::os::unix::net::UnixListener::bind(&path).expect("bind stale listener");
    }
    assert!(path.exists(), "stale socket should remain");

    let listener = SocketListener::bind(&unix_endpoint(&path)).expect("bind new listener");
    assert!(listener.local_addr().is_none());
    let (count, handler) = CountingHandler::new();
    let handle = listener.start(handler).expect("start listener");

    std::os::unix::net::UnixStream::connect(&path).expect("connect unix client");
    assert!(wait_for_count(&count, 1), "expected one connection");

    handle.shutdown();
    handle.join().expect("join listener");
    assert!(
        !path.exists(),
        "listener should remove unix socket on shutdown"
    );
}

#[cfg(unix)]
#[rstest]
fn unix_listener_rejects_in_use_socket(unix_tempdir: tempfile::TempDir) {
    let path = unix_tempdir.path().join("spindled.sock");
    let _existing = std::os::unix::net::UnixListener::bind(&path).expect("bind existing listener");

    let error = SocketListener::bind(&unix_endpoint(&path)).expect_err("should fail bind");
    assert!(matches!(error, ListenerError::UnixInUse { .. }));
}

#[cfg(unix)]
#[rstest]
fn unix_listener_refuses_regular_files(unix_tempdir: tempfile::TempDir) {
    let path = unix_tempdir.path().join("spindled.sock");
    std::fs::write(&path, b"not a socket").expect("write file");

    let error = SocketListener::bind(&unix_endpoint(&path)).expect_err("should fail bind");
    assert!(matches!(error, ListenerError::UnixNotSocket { .. }));
}
