//! Phoenix channel frames spoken by the realtime service.

use crate::realtime::{ChangeEvent, ChangeKind};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Topic that carries socket-level heartbeats.
pub const HEARTBEAT_TOPIC: &str = "phoenix";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

/// What an inbound frame means to a single-channel client.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Joined,
    JoinRejected(String),
    Change(ChangeEvent),
    /// The server closed or errored the channel; the client should rejoin.
    ChannelClosed,
    Ignored,
}

/// Channel topic for a table subscription.
pub fn topic_for(table: &str) -> String {
    format!("realtime:{}-changes", table)
}

impl Frame {
    /// Joins `topic`, asking for every change on `public.{table}`.
    pub fn join(topic: &str, table: &str, access_token: &str, reference: u64) -> Self {
        Self {
            topic: topic.to_string(),
            event: "phx_join".to_string(),
            payload: json!({
                "config": {
                    "broadcast": { "self": false },
                    "presence": { "key": "" },
                    "postgres_changes": [
                        { "event": "*", "schema": "public", "table": table }
                    ]
                },
                "access_token": access_token
            }),
            reference: Some(reference.to_string()),
        }
    }

    pub fn heartbeat(reference: u64) -> Self {
        Self {
            topic: HEARTBEAT_TOPIC.to_string(),
            event: "heartbeat".to_string(),
            payload: json!({}),
            reference: Some(reference.to_string()),
        }
    }

    pub fn leave(topic: &str, reference: u64) -> Self {
        Self {
            topic: topic.to_string(),
            event: "phx_leave".to_string(),
            payload: json!({}),
            reference: Some(reference.to_string()),
        }
    }

    /// Interprets a frame received on the socket for the channel `topic`.
    pub fn classify(&self, topic: &str, join_ref: Option<&str>) -> Inbound {
        if self.topic != topic {
            return Inbound::Ignored;
        }
        match self.event.as_str() {
            "phx_reply" if join_ref.is_some() && self.reference.as_deref() == join_ref => {
                match self.payload.get("status").and_then(Value::as_str) {
                    Some("ok") => Inbound::Joined,
                    _ => Inbound::JoinRejected(
                        self.payload
                            .pointer("/response/reason")
                            .and_then(Value::as_str)
                            .unwrap_or("join rejected")
                            .to_string(),
                    ),
                }
            }
            "postgres_changes" => self
                .payload
                .get("data")
                .and_then(parse_change)
                .map_or(Inbound::Ignored, Inbound::Change),
            "INSERT" | "UPDATE" | "DELETE" => {
                parse_change(&self.payload).map_or(Inbound::Ignored, Inbound::Change)
            }
            "phx_close" | "phx_error" => Inbound::ChannelClosed,
            _ => Inbound::Ignored,
        }
    }
}

fn parse_change(data: &Value) -> Option<ChangeEvent> {
    let kind = data
        .get("type")
        .or_else(|| data.get("eventType"))
        .and_then(Value::as_str)?
        .parse::<ChangeKind>()
        .ok()?;
    let table = data.get("table").and_then(Value::as_str)?;
    let non_null = |key: &str| data.get(key).filter(|v| !v.is_null()).cloned();
    Some(ChangeEvent {
        table: table.to_string(),
        kind,
        record: non_null("record"),
        old_record: non_null("old_record"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_frame_shape() {
        let frame = Frame::join("realtime:projects-changes", "projects", "key", 1);
        let encoded = serde_json::to_value(&frame).unwrap();
        assert_eq!(encoded["event"], "phx_join");
        assert_eq!(encoded["ref"], "1");
        assert_eq!(
            encoded["payload"]["config"]["postgres_changes"][0],
            json!({"event": "*", "schema": "public", "table": "projects"})
        );
        assert_eq!(encoded["payload"]["access_token"], "key");
    }

    #[test]
    fn test_join_reply_is_matched_by_reference() {
        let topic = topic_for("projects");
        let reply: Frame = serde_json::from_value(json!({
            "topic": topic,
            "event": "phx_reply",
            "payload": {"status": "ok", "response": {}},
            "ref": "1"
        }))
        .unwrap();
        assert_eq!(reply.classify(&topic, Some("1")), Inbound::Joined);
        assert_eq!(reply.classify(&topic, Some("7")), Inbound::Ignored);

        let rejected: Frame = serde_json::from_value(json!({
            "topic": topic,
            "event": "phx_reply",
            "payload": {"status": "error", "response": {"reason": "unauthorized"}},
            "ref": "1"
        }))
        .unwrap();
        assert_eq!(
            rejected.classify(&topic, Some("1")),
            Inbound::JoinRejected("unauthorized".to_string())
        );
    }

    #[test]
    fn test_postgres_change_is_parsed() {
        let topic = topic_for("ai_api_keys");
        let frame: Frame = serde_json::from_value(json!({
            "topic": topic,
            "event": "postgres_changes",
            "payload": {
                "ids": [1],
                "data": {
                    "type": "UPDATE",
                    "table": "ai_api_keys",
                    "schema": "public",
                    "record": {"id": "k1", "enabled": false},
                    "old_record": {"id": "k1"}
                }
            },
            "ref": null
        }))
        .unwrap();

        let Inbound::Change(change) = frame.classify(&topic, Some("1")) else {
            panic!("expected a change");
        };
        assert_eq!(change.kind, ChangeKind::Update);
        assert_eq!(change.table, "ai_api_keys");
        assert_eq!(change.record.unwrap()["enabled"], false);
    }

    #[test]
    fn test_other_topics_and_events_are_ignored() {
        let topic = topic_for("projects");
        let heartbeat_reply: Frame = serde_json::from_value(json!({
            "topic": "phoenix",
            "event": "phx_reply",
            "payload": {"status": "ok"},
            "ref": "2"
        }))
        .unwrap();
        assert_eq!(heartbeat_reply.classify(&topic, Some("1")), Inbound::Ignored);

        let presence: Frame = serde_json::from_value(json!({
            "topic": topic,
            "event": "presence_state",
            "payload": {}
        }))
        .unwrap();
        assert_eq!(presence.classify(&topic, Some("1")), Inbound::Ignored);

        let closed = Frame {
            topic: topic.clone(),
            event: "phx_error".to_string(),
            payload: Value::Null,
            reference: None,
        };
        assert_eq!(closed.classify(&topic, None), Inbound::ChannelClosed);
    }
}
