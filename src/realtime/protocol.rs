//! Engine.IO v4 / Socket.IO v5 text framing
//!
//! Only the text packets used by the payment desk are supported: the
//! WebSocket transport never carries binary attachments here.

use serde::Deserialize;
use serde_json::Value;
use crate::utils::errors::{RealtimeError, RealtimeResult};

pub const DEFAULT_NAMESPACE: &str = "/";

/// Payload of the Engine.IO `open` packet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenHandshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(OpenHandshake),
    Close,
    Ping,
    Pong,
    /// Socket.IO packet carried as an Engine.IO message
    Message(SocketPacket),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(text: &str) -> RealtimeResult<Self> {
        let mut chars = text.chars();
        let kind = chars
            .next()
            .ok_or_else(|| RealtimeError::Protocol("empty Engine.IO packet".to_string()))?;
        let rest = chars.as_str();

        match kind {
            '0' => serde_json::from_str(rest)
                .map(EnginePacket::Open)
                .map_err(|e| RealtimeError::Handshake(format!("bad open packet: {}", e))),
            '1' => Ok(EnginePacket::Close),
            '2' => Ok(EnginePacket::Ping),
            '3' => Ok(EnginePacket::Pong),
            '4' => SocketPacket::decode(rest).map(EnginePacket::Message),
            '5' => Ok(EnginePacket::Upgrade),
            '6' => Ok(EnginePacket::Noop),
            other => Err(RealtimeError::Protocol(format!(
                "unknown Engine.IO packet type '{}'",
                other
            ))),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            EnginePacket::Open(open) => format!(
                "0{}",
                serde_json::json!({
                    "sid": open.sid,
                    "upgrades": open.upgrades,
                    "pingInterval": open.ping_interval,
                    "pingTimeout": open.ping_timeout,
                })
            ),
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping => "2".to_string(),
            EnginePacket::Pong => "3".to_string(),
            EnginePacket::Message(packet) => format!("4{}", packet.encode()),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect { namespace: String, data: Option<Value> },
    Disconnect { namespace: String },
    Event { namespace: String, id: Option<u64>, data: Vec<Value> },
    Ack { namespace: String, id: u64, data: Vec<Value> },
    ConnectError { namespace: String, data: Value },
}

impl SocketPacket {
    /// `CONNECT` on the default namespace with an auth payload
    pub fn connect(auth: Value) -> Self {
        SocketPacket::Connect {
            namespace: DEFAULT_NAMESPACE.to_string(),
            data: Some(auth),
        }
    }

    /// Named event on the default namespace
    pub fn event(name: &str, payload: Value, id: Option<u64>) -> Self {
        SocketPacket::Event {
            namespace: DEFAULT_NAMESPACE.to_string(),
            id,
            data: vec![Value::String(name.to_string()), payload],
        }
    }

    pub fn decode(text: &str) -> RealtimeResult<Self> {
        let mut chars = text.chars();
        let kind = chars
            .next()
            .ok_or_else(|| RealtimeError::Protocol("empty Socket.IO packet".to_string()))?;
        let mut rest = chars.as_str();

        if matches!(kind, '5' | '6') {
            return Err(RealtimeError::Protocol("binary packets are not supported".to_string()));
        }

        let namespace = if rest.starts_with('/') {
            let end = rest.find(',').unwrap_or(rest.len());
            let namespace = rest[..end].to_string();
            rest = rest.get(end + 1..).unwrap_or("");
            namespace
        } else {
            DEFAULT_NAMESPACE.to_string()
        };

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let id = if digits > 0 {
            let id = rest[..digits]
                .parse::<u64>()
                .map_err(|e| RealtimeError::Protocol(format!("bad ack id: {}", e)))?;
            rest = &rest[digits..];
            Some(id)
        } else {
            None
        };

        let data: Option<Value> = if rest.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(rest)
                    .map_err(|e| RealtimeError::Protocol(format!("bad packet payload: {}", e)))?,
            )
        };

        match kind {
            '0' => Ok(SocketPacket::Connect { namespace, data }),
            '1' => Ok(SocketPacket::Disconnect { namespace }),
            '2' => Ok(SocketPacket::Event {
                namespace,
                id,
                data: into_array(data)?,
            }),
            '3' => Ok(SocketPacket::Ack {
                namespace,
                id: id.ok_or_else(|| RealtimeError::Protocol("ack without id".to_string()))?,
                data: into_array(data)?,
            }),
            '4' => Ok(SocketPacket::ConnectError {
                namespace,
                data: data.unwrap_or(Value::Null),
            }),
            other => Err(RealtimeError::Protocol(format!(
                "unknown Socket.IO packet type '{}'",
                other
            ))),
        }
    }

    pub fn encode(&self) -> String {
        let (kind, namespace, id, data) = match self {
            SocketPacket::Connect { namespace, data } => ('0', namespace, None, data.clone()),
            SocketPacket::Disconnect { namespace } => ('1', namespace, None, None),
            SocketPacket::Event { namespace, id, data } => {
                ('2', namespace, *id, Some(Value::Array(data.clone())))
            }
            SocketPacket::Ack { namespace, id, data } => {
                ('3', namespace, Some(*id), Some(Value::Array(data.clone())))
            }
            SocketPacket::ConnectError { namespace, data } => ('4', namespace, None, Some(data.clone())),
        };

        let mut out = String::new();
        out.push(kind);
        if namespace != DEFAULT_NAMESPACE {
            out.push_str(namespace);
            out.push(',');
        }
        if let Some(id) = id {
            out.push_str(&id.to_string());
        }
        if let Some(data) = data {
            out.push_str(&data.to_string());
        }
        out
    }

    /// Event name and first argument of an `EVENT` packet
    pub fn event_parts(&self) -> Option<(&str, Option<&Value>)> {
        match self {
            SocketPacket::Event { data, .. } => {
                let name = data.first()?.as_str()?;
                Some((name, data.get(1)))
            }
            _ => None,
        }
    }
}

fn into_array(data: Option<Value>) -> RealtimeResult<Vec<Value>> {
    match data {
        Some(Value::Array(items)) => Ok(items),
        None => Ok(Vec::new()),
        Some(other) => Err(RealtimeError::Protocol(format!(
            "expected an array payload, got {}",
            other
        ))),
    }
}

/// Human-readable reason from a `CONNECT_ERROR` payload
pub fn connect_error_message(data: &Value) -> String {
    data.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| data.as_str().map(str::to_string))
        .unwrap_or_else(|| data.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_decode_open() {
        let packet = EnginePacket::decode(
            r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#,
        )
        .unwrap();
        assert_matches!(packet, EnginePacket::Open(open) if open.ping_interval == 25000 && open.sid == "abc");
    }

    #[test]
    fn test_decode_event_with_payload() {
        let packet = EnginePacket::decode(r#"42["newPayment",[{"paymentId":"p1"}]]"#).unwrap();
        let EnginePacket::Message(socket) = packet else {
            panic!("expected message");
        };
        let (name, payload) = socket.event_parts().unwrap();
        assert_eq!(name, "newPayment");
        assert!(payload.unwrap().is_array());
    }

    #[test]
    fn test_decode_ack_and_namespace() {
        assert_eq!(
            SocketPacket::decode(r#"37[{"success":true}]"#).unwrap(),
            SocketPacket::Ack {
                namespace: "/".to_string(),
                id: 7,
                data: vec![json!({"success": true})],
            }
        );
        assert_eq!(
            SocketPacket::decode(r#"2/admin,["ping"]"#).unwrap(),
            SocketPacket::Event {
                namespace: "/admin".to_string(),
                id: None,
                data: vec![json!("ping")],
            }
        );
        assert_matches!(SocketPacket::decode("3[]"), Err(RealtimeError::Protocol(_)));
    }

    #[test]
    fn test_encode_emit_with_ack_id() {
        let packet = SocketPacket::event("adminResponse", json!({"room": "room-1"}), Some(3));
        assert_eq!(
            EnginePacket::Message(packet).encode(),
            r#"423["adminResponse",{"room":"room-1"}]"#
        );
        assert_eq!(
            EnginePacket::Message(SocketPacket::connect(json!({"token": "t"}))).encode(),
            r#"40{"token":"t"}"#
        );
    }

    #[test]
    fn test_connect_error_message() {
        let packet = SocketPacket::decode(r#"4{"message":"Not authorized"}"#).unwrap();
        let SocketPacket::ConnectError { data, .. } = packet else {
            panic!("expected connect error");
        };
        assert_eq!(connect_error_message(&data), "Not authorized");
        assert_eq!(connect_error_message(&json!("nope")), "nope");
    }

    #[test]
    fn test_rejects_binary_and_unknown() {
        assert_matches!(SocketPacket::decode("51-[]"), Err(RealtimeError::Protocol(_)));
        assert_matches!(EnginePacket::decode("9"), Err(RealtimeError::Protocol(_)));
        assert_matches!(EnginePacket::decode(""), Err(RealtimeError::Protocol(_)));
    }
}
