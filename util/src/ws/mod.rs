pub mod manager;
pub use manager::{Receiver, WebSocketManager};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Standard event envelope sent over realtime topics.
#[derive(Serialize)]
pub struct EventEnvelope<'a, T> {
    #[serde(rename = "type")]
    pub r#type: &'static str,
    pub event: &'a str,
    pub topic: &'a str,
    pub payload: T,
    pub ts: String,
}

/// Owned form of [`EventEnvelope`] for subscribers decoding a frame.
#[derive(Debug, Deserialize)]
pub struct ReceivedEvent<T> {
    pub event: String,
    pub topic: String,
    pub payload: T,
    pub ts: String,
}

/// Broadcast a JSON-serialized `EventEnvelope` on `topic`.
pub async fn emit<T: Serialize>(ws: &WebSocketManager, topic: &str, event: &str, payload: &T) {
    let env = EventEnvelope {
        r#type: "event",
        event,
        topic,
        payload,
        ts: Utc::now().to_rfc3339(),
    };
    match serde_json::to_string(&env) {
        Ok(json) => ws.broadcast(topic, json).await,
        Err(e) => tracing::warn!(topic, event, "failed to encode event: {e}"),
    }
}
