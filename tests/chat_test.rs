//! Integration tests for member WebSocket connection, team chat broadcast,
//! and registry cleanup on disconnect.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::COOKIE;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Start the server on a random port and return its address.
async fn start_test_server() -> SocketAddr {
    let state = quorum_server::state::AppState::new();
    let app = quorum_server::routes::build_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Connect a member WebSocket carrying the identity cookie pair.
async fn connect_member(addr: SocketAddr, name: &str, team: u32) -> WsStream {
    let mut request = format!("ws://{}/ws/chat", addr)
        .into_client_request()
        .unwrap();
    request.headers_mut().insert(
        COOKIE,
        format!("name={}; team={}", name, team).parse().unwrap(),
    );
    let (stream, _) = tokio_tungstenite::connect_async(request)
        .await
        .expect("member WebSocket connect failed");
    // Give the server a moment to run the actor and register the connection.
    tokio::time::sleep(Duration::from_millis(100)).await;
    stream
}

/// Next text frame within a timeout, skipping control frames.
async fn next_text(stream: &mut WsStream) -> String {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("timed out waiting for message")
            .expect("stream ended")
            .expect("receive error");
        if let Message::Text(text) = msg {
            return text.as_str().to_string();
        }
    }
}

/// Assert no text frame arrives within a short window.
async fn assert_silent(stream: &mut WsStream) {
    let result = tokio::time::timeout(Duration::from_millis(300), stream.next()).await;
    if let Ok(Some(Ok(Message::Text(text)))) = result {
        panic!("expected no message, got: {}", text);
    }
}

#[tokio::test]
async fn chat_broadcasts_to_own_team_only() {
    let addr = start_test_server().await;
    let mut alice = connect_member(addr, "alice", 1).await;
    let mut bob = connect_member(addr, "bob", 1).await;
    let mut carol = connect_member(addr, "carol", 2).await;

    alice.send(Message::Text("hi team".into())).await.unwrap();

    assert_eq!(next_text(&mut alice).await, "c:alice: hi team");
    assert_eq!(next_text(&mut bob).await, "c:alice: hi team");
    assert_silent(&mut carol).await;
}

#[tokio::test]
async fn disconnect_is_announced_to_the_team() {
    let addr = start_test_server().await;
    let mut alice = connect_member(addr, "alice", 1).await;
    let mut bob = connect_member(addr, "bob", 1).await;

    bob.send(Message::Close(None)).await.unwrap();

    assert_eq!(next_text(&mut alice).await, "c:bob has disconnected");
}

#[tokio::test]
async fn duplicate_identity_displaces_the_old_connection() {
    let addr = start_test_server().await;
    let mut first = connect_member(addr, "alice", 1).await;
    let mut second = connect_member(addr, "alice", 1).await;

    // The first socket is force-closed with the replacement code.
    let msg = tokio::time::timeout(Duration::from_secs(2), first.next())
        .await
        .expect("expected close frame")
        .expect("stream ended")
        .expect("receive error");
    match msg {
        Message::Close(Some(frame)) => assert_eq!(frame.code, CloseCode::from(4000)),
        other => panic!("expected close frame, got: {:?}", other),
    }

    // The replacement still receives team traffic.
    let mut bob = connect_member(addr, "bob", 1).await;
    bob.send(Message::Text("hello".into())).await.unwrap();
    assert_eq!(next_text(&mut second).await, "c:bob: hello");
}

#[tokio::test]
async fn unregistered_websocket_is_rejected() {
    let addr = start_test_server().await;

    // No identity cookies: the extractor redirects instead of upgrading.
    let result = tokio_tungstenite::connect_async(format!("ws://{}/ws/chat", addr)).await;
    assert!(result.is_err(), "expected handshake rejection");
}

#[tokio::test]
async fn reconnect_after_close_works() {
    let addr = start_test_server().await;

    {
        let mut alice = connect_member(addr, "alice", 1).await;
        alice.send(Message::Close(None)).await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut alice = connect_member(addr, "alice", 1).await;
    let mut bob = connect_member(addr, "bob", 1).await;
    bob.send(Message::Text("back?".into())).await.unwrap();
    assert_eq!(next_text(&mut alice).await, "c:bob: back?");
}
