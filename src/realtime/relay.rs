//! Realtime payment relay
//!
//! One spawned task owns the socket. Callers send emits through an `mpsc`
//! command channel and observe the connection through a `watch` channel of
//! [`RelayStatus`]. Each `newPayment` event carries the full pending list and
//! replaces the previous one.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, timeout, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use crate::config::{RealtimeConfig, Settings};
use crate::models::payment::{Payment, PaymentStatus};
use crate::session::{Session, SessionState};
use crate::utils::errors::{AdminError, RealtimeError, RealtimeResult, Result};
use crate::utils::helpers::mask_card_number;
use crate::utils::logging::{log_operator_action, log_realtime_event};
use super::backoff::Backoff;
use super::protocol::{connect_error_message, EnginePacket, OpenHandshake, SocketPacket};
use super::response::{AdminAck, AdminResponder, AdminResponse};

pub const NEW_PAYMENT_EVENT: &str = "newPayment";
pub const ADMIN_RESPONSE_EVENT: &str = "adminResponse";

const CLOSE_GRACE: Duration = Duration::from_secs(2);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
}

/// What the payment desk renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelayStatus {
    pub state: ConnectionState,
    /// Set when the connection dropped after the last snapshot
    pub stale: bool,
    pub payments: Vec<Payment>,
    pub last_snapshot_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl RelayStatus {
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn pending_count(&self) -> usize {
        self.payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Pending)
            .count()
    }
}

enum Command {
    Emit {
        response: AdminResponse,
        reply: oneshot::Sender<RealtimeResult<AdminAck>>,
    },
    Close,
}

struct Worker {
    commands: mpsc::Sender<Command>,
    handle: JoinHandle<()>,
}

struct Connection {
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
    open: OpenHandshake,
}

/// Why a served connection ended
enum Exit {
    Closed,
    SessionChanged,
    ServerDisconnect,
    Rejected(String),
    Dropped(String),
}

/// Handle to the realtime channel; cheap to clone
#[derive(Clone)]
pub struct RealtimeRelay {
    inner: Arc<RelayInner>,
}

struct RelayInner {
    url: String,
    config: RealtimeConfig,
    session: Session,
    status: Arc<watch::Sender<RelayStatus>>,
    worker: Mutex<Option<Worker>>,
}

impl std::fmt::Debug for RealtimeRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeRelay")
            .field("url", &self.inner.url)
            .field("state", &self.inner.status.borrow().state)
            .finish()
    }
}

impl RealtimeRelay {
    pub fn new(settings: &Settings, session: Session) -> Result<Self> {
        let base = settings
            .realtime
            .url
            .as_deref()
            .unwrap_or(&settings.api.base_url);
        let url = socket_url(base, &settings.realtime.path)?;
        let (status, _) = watch::channel(RelayStatus::default());

        Ok(Self {
            inner: Arc::new(RelayInner {
                url,
                config: settings.realtime.clone(),
                session,
                status: Arc::new(status),
                worker: Mutex::new(None),
            }),
        })
    }

    /// WebSocket URL including the Engine.IO query
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    pub fn status(&self) -> RelayStatus {
        self.inner.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RelayStatus> {
        self.inner.status.subscribe()
    }

    /// Latest payment snapshot
    pub fn snapshot(&self) -> Vec<Payment> {
        self.inner.status.borrow().payments.clone()
    }

    /// Open the channel (desk mount). A no-op while a connection task is alive.
    pub async fn connect(&self) -> Result<()> {
        let mut worker = self.inner.worker.lock().await;
        if worker.as_ref().is_some_and(|w| !w.handle.is_finished()) {
            return Ok(());
        }

        let credentials = self.inner.session.credentials();
        let Some(token) = credentials.token else {
            return Err(AdminError::Auth("no session token".to_string()));
        };

        self.inner.status.send_modify(|status| {
            status.state = ConnectionState::Connecting;
            status.last_error = None;
        });
        log_realtime_event("connecting", Some(&self.inner.url));

        let connection = match handshake(&self.inner.url, &token, self.inner.config.ack_timeout()).await {
            Ok(connection) => connection,
            Err(e) => {
                self.inner.status.send_modify(|status| {
                    status.state = ConnectionState::Disconnected;
                    status.last_error = Some(e.to_string());
                });
                warn!(error = %e, "Realtime handshake failed");
                return Err(match e {
                    RealtimeError::ConnectRejected(reason) => AdminError::Auth(reason),
                    other => AdminError::Realtime(other),
                });
            }
        };

        if !self.inner.session.is_current(credentials.generation) {
            let mut connection = connection;
            let _ = connection.sink.close().await;
            self.inner.status.send_replace(RelayStatus::default());
            return Err(AdminError::SessionInvalidated);
        }

        self.inner.status.send_modify(|status| {
            status.state = ConnectionState::Connected;
            status.last_error = None;
        });
        log_realtime_event("connected", Some(&connection.open.sid));

        let (commands, receiver) = mpsc::channel(32);
        let task = RelayTask {
            url: self.inner.url.clone(),
            token,
            generation: credentials.generation,
            config: self.inner.config.clone(),
            session: self.inner.session.clone(),
            status: self.inner.status.clone(),
        };
        let handle = tokio::spawn(task.run(connection, receiver));
        *worker = Some(Worker { commands, handle });
        Ok(())
    }

    /// Close the channel (desk unmount) and stop reconnecting
    pub async fn close(&self) {
        let Some(mut worker) = self.inner.worker.lock().await.take() else {
            return;
        };

        let _ = worker.commands.send(Command::Close).await;
        if timeout(CLOSE_GRACE, &mut worker.handle).await.is_err() {
            warn!("Realtime task did not stop in time, aborting");
            worker.handle.abort();
        }

        self.inner.status.send_replace(RelayStatus::default());
        log_realtime_event("closed", None);
    }

    /// Emit `adminResponse` and wait for the server acknowledgment
    pub async fn respond(&self, response: AdminResponse) -> Result<AdminAck> {
        if !self.inner.status.borrow().is_connected() {
            return Err(RealtimeError::NotConnected.into());
        }

        let commands = {
            let worker = self.inner.worker.lock().await;
            worker.as_ref().map(|w| w.commands.clone())
        }
        .ok_or(RealtimeError::NotConnected)?;

        log_operator_action(
            "payment_desk",
            "admin_response",
            Some(&response.payment_id),
            Some(&format!("room={} card={}", response.room, mask_card_number(&response.card_number))),
        );

        let (reply, ack) = oneshot::channel();
        commands
            .send(Command::Emit { response, reply })
            .await
            .map_err(|_| RealtimeError::NotConnected)?;

        match timeout(self.inner.config.ack_timeout(), ack).await {
            Err(_) => Err(RealtimeError::AckTimeout.into()),
            Ok(Err(_)) => Err(RealtimeError::Closed.into()),
            Ok(Ok(result)) => result.map_err(AdminError::from),
        }
    }
}

#[async_trait]
impl AdminResponder for RealtimeRelay {
    async fn respond(&self, response: AdminResponse) -> Result<AdminAck> {
        RealtimeRelay::respond(self, response).await
    }
}

/// State owned by the spawned connection task
struct RelayTask {
    url: String,
    token: String,
    generation: u64,
    config: RealtimeConfig,
    session: Session,
    status: Arc<watch::Sender<RelayStatus>>,
}

impl RelayTask {
    async fn run(self, mut connection: Connection, mut commands: mpsc::Receiver<Command>) {
        let mut backoff = Backoff::new(self.config.reconnect.clone());
        let mut session = self.session.subscribe();
        session.borrow_and_update();

        loop {
            match self.serve(&mut connection, &mut commands, &mut session).await {
                Exit::Closed => {
                    let _ = connection.sink.close().await;
                    return;
                }
                Exit::SessionChanged => {
                    let _ = connection.sink.close().await;
                    self.status.send_replace(RelayStatus::default());
                    log_realtime_event("closed", Some("session changed"));
                    return;
                }
                Exit::ServerDisconnect => {
                    self.status.send_modify(|status| {
                        status.state = ConnectionState::Disconnected;
                        status.stale = true;
                        status.last_error = Some("server closed the session".to_string());
                    });
                    log_realtime_event("disconnected", Some("server closed the session"));
                    return;
                }
                Exit::Rejected(reason) => {
                    self.status.send_modify(|status| {
                        status.state = ConnectionState::Disconnected;
                        status.stale = true;
                        status.last_error = Some(reason.clone());
                    });
                    warn!(reason = %reason, "Realtime connection rejected");
                    return;
                }
                Exit::Dropped(reason) => {
                    warn!(reason = %reason, "Realtime connection dropped");
                    self.status.send_modify(|status| {
                        status.stale = true;
                        status.last_error = Some(reason);
                    });

                    match self.reconnect(&mut backoff, &mut commands, &mut session).await {
                        Some(fresh) => {
                            connection = fresh;
                            backoff.reset();
                        }
                        None => return,
                    }
                }
            }
        }
    }

    async fn serve(
        &self,
        connection: &mut Connection,
        commands: &mut mpsc::Receiver<Command>,
        session: &mut watch::Receiver<SessionState>,
    ) -> Exit {
        let mut pending: HashMap<u64, oneshot::Sender<RealtimeResult<AdminAck>>> = HashMap::new();
        let mut next_id: u64 = 0;
        let liveness = Duration::from_millis(connection.open.ping_interval + connection.open.ping_timeout);
        let mut deadline = Instant::now() + liveness;

        loop {
            tokio::select! {
                _ = sleep_until(deadline) => {
                    return Exit::Dropped("ping timeout".to_string());
                }
                changed = session.changed() => {
                    if changed.is_err() || !self.session.is_current(self.generation) {
                        return Exit::SessionChanged;
                    }
                }
                command = commands.recv() => match command {
                    None | Some(Command::Close) => return Exit::Closed,
                    Some(Command::Emit { response, reply }) => {
                        pending.retain(|_, waiting| !waiting.is_closed());
                        let id = next_id;
                        next_id += 1;

                        let payload = serde_json::to_value(&response).unwrap_or(Value::Null);
                        let packet = EnginePacket::Message(SocketPacket::event(ADMIN_RESPONSE_EVENT, payload, Some(id)));
                        match connection.sink.send(Message::Text(packet.encode())).await {
                            Ok(()) => {
                                debug!(ack_id = id, payment_id = %response.payment_id, "Admin response emitted");
                                pending.insert(id, reply);
                            }
                            Err(e) => {
                                let _ = reply.send(Err(RealtimeError::Transport(e.to_string())));
                                return Exit::Dropped(e.to_string());
                            }
                        }
                    }
                },
                message = connection.stream.next() => match message {
                    Some(Ok(Message::Text(text))) => match EnginePacket::decode(&text) {
                        Ok(EnginePacket::Ping) => {
                            deadline = Instant::now() + liveness;
                            if let Err(e) = connection.sink.send(Message::Text(EnginePacket::Pong.encode())).await {
                                return Exit::Dropped(e.to_string());
                            }
                        }
                        Ok(EnginePacket::Close) => return Exit::Dropped("server closed the transport".to_string()),
                        Ok(EnginePacket::Message(packet)) => {
                            if let Some(exit) = self.handle_packet(packet, &mut pending) {
                                return exit;
                            }
                        }
                        Ok(_) => {}
                        Err(e) => warn!(error = %e, "Ignoring malformed realtime packet"),
                    },
                    Some(Ok(Message::Close(_))) | None => return Exit::Dropped("socket closed".to_string()),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Exit::Dropped(e.to_string()),
                },
            }
        }
    }

    fn handle_packet(
        &self,
        packet: SocketPacket,
        pending: &mut HashMap<u64, oneshot::Sender<RealtimeResult<AdminAck>>>,
    ) -> Option<Exit> {
        match &packet {
            SocketPacket::Event { .. } => {
                match packet.event_parts() {
                    Some((NEW_PAYMENT_EVENT, payload)) => self.apply_snapshot(payload),
                    Some((name, _)) => debug!(event = name, "Ignoring realtime event"),
                    None => warn!("Ignoring event packet without a name"),
                }
                None
            }
            SocketPacket::Ack { id, data, .. } => {
                match pending.remove(id) {
                    Some(reply) => {
                        let _ = reply.send(AdminAck::from_ack_args(data));
                    }
                    None => debug!(ack_id = id, "Acknowledgment for an unknown or expired emit"),
                }
                None
            }
            SocketPacket::Disconnect { .. } => Some(Exit::ServerDisconnect),
            SocketPacket::ConnectError { data, .. } => Some(Exit::Rejected(connect_error_message(data))),
            SocketPacket::Connect { .. } => None,
        }
    }

    fn apply_snapshot(&self, payload: Option<&Value>) {
        let Some(payload) = payload.filter(|p| p.is_array()) else {
            warn!("Rejecting non-array newPayment payload, keeping the current list");
            return;
        };

        match serde_json::from_value::<Vec<Payment>>(payload.clone()) {
            Ok(payments) => {
                let count = payments.len();
                self.status.send_modify(|status| {
                    status.payments = payments;
                    status.stale = false;
                    status.last_snapshot_at = Some(Utc::now());
                });
                log_realtime_event(NEW_PAYMENT_EVENT, Some(&format!("{} payments", count)));
            }
            Err(e) => warn!(error = %e, "Rejecting malformed newPayment snapshot"),
        }
    }

    /// Back off and reconnect; `None` when the task should stop
    async fn reconnect(
        &self,
        backoff: &mut Backoff,
        commands: &mut mpsc::Receiver<Command>,
        session: &mut watch::Receiver<SessionState>,
    ) -> Option<Connection> {
        loop {
            let Some(delay) = backoff.next_delay() else {
                warn!(attempts = backoff.attempt(), "Giving up reconnecting");
                self.status.send_modify(|status| {
                    status.state = ConnectionState::Disconnected;
                    status.last_error = Some("reconnect attempts exhausted".to_string());
                });
                return None;
            };

            let attempt = backoff.attempt();
            self.status.send_modify(|status| status.state = ConnectionState::Reconnecting { attempt });
            log_realtime_event("reconnecting", Some(&format!("attempt {} in {:?}", attempt, delay)));

            let wake = Instant::now() + delay;
            loop {
                tokio::select! {
                    _ = sleep_until(wake) => break,
                    changed = session.changed() => {
                        if changed.is_err() || !self.session.is_current(self.generation) {
                            self.status.send_replace(RelayStatus::default());
                            log_realtime_event("closed", Some("session changed"));
                            return None;
                        }
                    }
                    command = commands.recv() => match command {
                        None | Some(Command::Close) => return None,
                        Some(Command::Emit { reply, .. }) => {
                            let _ = reply.send(Err(RealtimeError::NotConnected));
                        }
                    },
                }
            }

            match handshake(&self.url, &self.token, self.config.ack_timeout()).await {
                Ok(connection) => {
                    self.status.send_modify(|status| {
                        status.state = ConnectionState::Connected;
                        status.last_error = None;
                    });
                    info!(attempt = attempt, "Realtime connection restored");
                    return Some(connection);
                }
                Err(RealtimeError::ConnectRejected(reason)) => {
                    self.status.send_modify(|status| {
                        status.state = ConnectionState::Disconnected;
                        status.last_error = Some(reason.clone());
                    });
                    warn!(reason = %reason, "Realtime reconnect rejected");
                    return None;
                }
                Err(e) => {
                    debug!(attempt = attempt, error = %e, "Reconnect attempt failed");
                    self.status.send_modify(|status| status.last_error = Some(e.to_string()));
                }
            }
        }
    }
}

/// Build `ws(s)://host<path>?EIO=4&transport=websocket` from an http(s) or ws(s) base
pub fn socket_url(base: &str, path: &str) -> Result<String> {
    let mut url = url::Url::parse(base)?;
    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => {
            return Err(AdminError::Config(format!(
                "Unsupported realtime URL scheme: {}",
                other
            )))
        }
    };

    url.set_scheme(scheme)
        .map_err(|_| AdminError::Config(format!("Cannot use scheme {} for {}", scheme, base)))?;
    url.set_path(path);
    url.set_query(Some("EIO=4&transport=websocket"));
    Ok(url.to_string())
}

async fn handshake(url: &str, token: &str, limit: Duration) -> RealtimeResult<Connection> {
    timeout(limit, open_session(url, token))
        .await
        .map_err(|_| RealtimeError::Handshake("timed out".to_string()))?
}

async fn open_session(url: &str, token: &str) -> RealtimeResult<Connection> {
    let (ws, _) = connect_async(url)
        .await
        .map_err(|e| RealtimeError::Transport(e.to_string()))?;
    let (mut sink, mut stream) = ws.split();

    let open = loop {
        match next_packet(&mut stream).await? {
            EnginePacket::Open(open) => break open,
            other => debug!(packet = ?other, "Packet before Engine.IO open"),
        }
    };

    let connect = EnginePacket::Message(SocketPacket::connect(json!({ "token": token })));
    sink.send(Message::Text(connect.encode()))
        .await
        .map_err(|e| RealtimeError::Transport(e.to_string()))?;

    loop {
        match next_packet(&mut stream).await? {
            EnginePacket::Ping => {
                sink.send(Message::Text(EnginePacket::Pong.encode()))
                    .await
                    .map_err(|e| RealtimeError::Transport(e.to_string()))?;
            }
            EnginePacket::Message(SocketPacket::Connect { .. }) => break,
            EnginePacket::Message(SocketPacket::ConnectError { data, .. }) => {
                return Err(RealtimeError::ConnectRejected(connect_error_message(&data)));
            }
            EnginePacket::Close => {
                return Err(RealtimeError::Handshake("closed during handshake".to_string()));
            }
            other => debug!(packet = ?other, "Packet before Socket.IO connect"),
        }
    }

    Ok(Connection { sink, stream, open })
}

async fn next_packet(stream: &mut SplitStream<WsStream>) -> RealtimeResult<EnginePacket> {
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => return EnginePacket::decode(&text),
            Some(Ok(Message::Close(_))) | None => {
                return Err(RealtimeError::Handshake("socket closed during handshake".to_string()))
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(RealtimeError::Transport(e.to_string())),
        }
    }
}
