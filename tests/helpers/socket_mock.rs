//! Scripted Socket.IO server for testing the realtime relay
//!
//! Speaks just enough Engine.IO v4 / Socket.IO v5 over a plain WebSocket:
//! sends the open packet, answers CONNECT (or rejects it), pushes
//! `newPayment` snapshots and acknowledges `adminResponse` emits.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// Behaviour of every accepted connection
#[derive(Debug, Clone)]
pub struct SocketScript {
    /// Reject CONNECT with this message
    pub reject: Option<String>,
    /// `newPayment` payload pushed right after CONNECT
    pub snapshot: Option<Value>,
    /// First argument of every acknowledgment
    pub ack: Value,
    pub ping_interval_ms: u64,
    pub ping_timeout_ms: u64,
}

impl Default for SocketScript {
    fn default() -> Self {
        Self {
            reject: None,
            snapshot: None,
            ack: json!({"success": true, "message": "Card number sent"}),
            ping_interval_ms: 25_000,
            ping_timeout_ms: 20_000,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SocketAction {
    /// Push a `newPayment` event with this payload
    Push(Value),
    /// Send an Engine.IO ping
    Ping,
    /// Drop the TCP connection without a close handshake
    Drop,
}

#[derive(Debug, Default)]
struct Recorded {
    tokens: Vec<String>,
    responses: Vec<Value>,
    pongs: usize,
    connections: usize,
}

pub struct SocketMock {
    pub addr: SocketAddr,
    recorded: Arc<Mutex<Recorded>>,
    actions: broadcast::Sender<SocketAction>,
    handle: JoinHandle<()>,
}

impl SocketMock {
    pub async fn start(script: SocketScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind socket mock");
        let addr = listener.local_addr().expect("Socket mock has no address");
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let (actions, _) = broadcast::channel(16);

        let handle = {
            let recorded = recorded.clone();
            let actions = actions.clone();
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    tokio::spawn(serve(stream, script.clone(), recorded.clone(), actions.subscribe()));
                }
            })
        };

        Self {
            addr,
            recorded,
            actions,
            handle,
        }
    }

    /// Base URL for `realtime.url`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn send(&self, action: SocketAction) {
        let _ = self.actions.send(action);
    }

    pub fn tokens(&self) -> Vec<String> {
        self.recorded.lock().unwrap().tokens.clone()
    }

    /// `adminResponse` payloads received so far
    pub fn responses(&self) -> Vec<Value> {
        self.recorded.lock().unwrap().responses.clone()
    }

    pub fn pongs(&self) -> usize {
        self.recorded.lock().unwrap().pongs
    }

    /// Accepted Socket.IO sessions
    pub fn connections(&self) -> usize {
        self.recorded.lock().unwrap().connections
    }
}

impl Drop for SocketMock {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    stream: TcpStream,
    script: SocketScript,
    recorded: Arc<Mutex<Recorded>>,
    mut actions: broadcast::Receiver<SocketAction>,
) {
    let Ok(ws) = accept_async(stream).await else {
        return;
    };
    let (mut sink, mut source) = ws.split();

    let open = json!({
        "sid": "mock-sid",
        "upgrades": [],
        "pingInterval": script.ping_interval_ms,
        "pingTimeout": script.ping_timeout_ms,
        "maxPayload": 1_000_000,
    });
    if sink.send(Message::Text(format!("0{}", open))).await.is_err() {
        return;
    }

    let token = loop {
        match source.next().await {
            Some(Ok(Message::Text(text))) if text.starts_with("40") => {
                let auth: Value = serde_json::from_str(&text[2..]).unwrap_or(Value::Null);
                break auth["token"].as_str().unwrap_or_default().to_string();
            }
            Some(Ok(_)) => continue,
            _ => return,
        }
    };
    recorded.lock().unwrap().tokens.push(token);

    if let Some(reason) = &script.reject {
        let _ = sink.send(Message::Text(format!("44{}", json!({"message": reason})))).await;
        return;
    }

    if sink.send(Message::Text(r#"40{"sid":"mock-socket"}"#.to_string())).await.is_err() {
        return;
    }
    recorded.lock().unwrap().connections += 1;

    if let Some(snapshot) = &script.snapshot {
        if sink.send(Message::Text(new_payment(snapshot))).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            action = actions.recv() => match action {
                Ok(SocketAction::Push(payload)) => {
                    if sink.send(Message::Text(new_payment(&payload))).await.is_err() {
                        return;
                    }
                }
                Ok(SocketAction::Ping) => {
                    if sink.send(Message::Text("2".to_string())).await.is_err() {
                        return;
                    }
                }
                Ok(SocketAction::Drop) => return,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return,
            },
            message = source.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    if text == "3" {
                        recorded.lock().unwrap().pongs += 1;
                    } else if let Some(rest) = text.strip_prefix("42") {
                        if let Some(ack) = handle_event(rest, &script, &recorded) {
                            if sink.send(Message::Text(ack)).await.is_err() {
                                return;
                            }
                        }
                    }
                }
                Some(Ok(_)) => {}
                _ => return,
            },
        }
    }
}

fn new_payment(payload: &Value) -> String {
    format!("42{}", json!(["newPayment", payload]))
}

/// Record an `adminResponse` emit and build its acknowledgment
fn handle_event(rest: &str, script: &SocketScript, recorded: &Mutex<Recorded>) -> Option<String> {
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let id = &rest[..digits];
    let data: Value = serde_json::from_str(&rest[digits..]).ok()?;

    if data.get(0).and_then(Value::as_str) != Some("adminResponse") {
        return None;
    }
    recorded.lock().unwrap().responses.push(data.get(1).cloned().unwrap_or(Value::Null));

    if id.is_empty() {
        None
    } else {
        Some(format!("43{}{}", id, json!([script.ack])))
    }
}
