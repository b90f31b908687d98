//! WebSocket test client for protocol testing
//!
//! Provides a low-level WsConnection and a higher-level GameClient speaking
//! the lobby protocol.
//!
//! Note: some methods may appear unused because they're only used in specific
//! test files and each test binary compiles independently.

use std::net::SocketAddr;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Low-level WebSocket connection
pub struct WsConnection {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
}

impl WsConnection {
    /// Connect to the server's WebSocket endpoint
    pub async fn connect(addr: SocketAddr) -> Self {
        let url = format!("ws://{}/ws", addr);
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("Failed to connect");
        let (sink, stream) = ws.split();
        Self { sink, stream }
    }

    /// Send raw text
    pub async fn send_raw(&mut self, msg: &str) {
        self.sink
            .send(Message::Text(msg.to_string().into()))
            .await
            .unwrap();
    }

    /// Send a JSON message
    pub async fn send_json<T: Serialize>(&mut self, msg: &T) {
        let json = serde_json::to_string(msg).unwrap();
        self.send_raw(&json).await;
    }

    /// Receive the next text frame
    pub async fn recv_raw(&mut self) -> String {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return text.to_string(),
                Some(Ok(Message::Ping(_))) => continue,
                Some(Ok(_)) => continue,
                Some(Err(e)) => panic!("WebSocket error: {}", e),
                None => panic!("WebSocket closed"),
            }
        }
    }

    /// Receive and parse the next JSON message
    pub async fn recv_json(&mut self) -> serde_json::Value {
        let text = self.recv_raw().await;
        serde_json::from_str(&text).expect("Failed to parse JSON")
    }

    /// Receive with timeout, returns None on timeout
    pub async fn recv_timeout(&mut self, duration: Duration) -> Option<String> {
        tokio::time::timeout(duration, self.recv_raw()).await.ok()
    }

    /// Send a close frame and drop the connection
    pub async fn close(mut self) {
        let _ = self.sink.send(Message::Close(None)).await;
    }
}

/// High-level client speaking the lobby protocol
pub struct GameClient {
    pub conn: WsConnection,
}

impl GameClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        Self {
            conn: WsConnection::connect(addr).await,
        }
    }

    /// CREATE_LOBBY, asserts success, returns the new lobby id
    #[allow(dead_code)]
    pub async fn create_lobby(&mut self) -> String {
        self.conn
            .send_json(&serde_json::json!({"type": "CREATE_LOBBY"}))
            .await;

        let response = self.conn.recv_json().await;
        assert_eq!(
            response["type"], "LOBBY_CREATED",
            "Expected LOBBY_CREATED but got: {}",
            response
        );
        response["lobbyId"].as_str().unwrap().to_string()
    }

    /// JOIN_LOBBY, asserts success, returns the assigned mark
    #[allow(dead_code)]
    pub async fn join_lobby(&mut self, lobby_id: &str) -> String {
        self.conn
            .send_json(&serde_json::json!({"type": "JOIN_LOBBY", "lobbyId": lobby_id}))
            .await;

        let response = self.conn.recv_json().await;
        assert_eq!(
            response["type"], "JOINED_LOBBY",
            "Expected JOINED_LOBBY but got: {}",
            response
        );
        response["mark"].as_str().unwrap().to_string()
    }

    /// MAKE_MOVE (reply, if any, is read by the caller)
    #[allow(dead_code)]
    pub async fn make_move(&mut self, row: usize, col: usize, mark: &str) {
        self.conn
            .send_json(&serde_json::json!({
                "type": "MAKE_MOVE",
                "row": row,
                "col": col,
                "mark": mark,
            }))
            .await;
    }

    #[allow(dead_code)]
    pub async fn restart_game(&mut self) {
        self.conn
            .send_json(&serde_json::json!({"type": "RESTART_GAME"}))
            .await;
    }

    #[allow(dead_code)]
    pub async fn leave_lobby(&mut self) {
        self.conn
            .send_json(&serde_json::json!({"type": "LEAVE_LOBBY"}))
            .await;
    }

    /// GET_LOBBIES, returns the sessions array
    #[allow(dead_code)]
    pub async fn list_lobbies(&mut self) -> serde_json::Value {
        self.conn
            .send_json(&serde_json::json!({"type": "GET_LOBBIES"}))
            .await;

        let response = self.conn.recv_json().await;
        assert_eq!(
            response["type"], "GET_LOBBIES",
            "Expected GET_LOBBIES but got: {}",
            response
        );
        response["sessions"].clone()
    }

    /// Receive the next message
    #[allow(dead_code)]
    pub async fn recv(&mut self) -> serde_json::Value {
        self.conn.recv_json().await
    }

    /// Receive the next message and assert its type tag
    #[allow(dead_code)]
    pub async fn expect(&mut self, msg_type: &str) -> serde_json::Value {
        let response = self.conn.recv_json().await;
        assert_eq!(
            response["type"], msg_type,
            "Expected {} but got: {}",
            msg_type, response
        );
        response
    }

    /// Assert no message arrives within the duration
    #[allow(dead_code)]
    pub async fn expect_no_message(&mut self, duration: Duration) {
        if let Some(text) = self.conn.recv_timeout(duration).await {
            panic!("Expected no message but received: {}", text);
        }
    }
}
