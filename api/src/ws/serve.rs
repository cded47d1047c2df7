//! Forwards one broker topic to one WebSocket client.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::{broadcast::error::RecvError, mpsc};
use util::ws::WebSocketManager;

pub struct WsServerOptions {
    pub ws_ping_sec: u64,
    pub enable_app_ping: bool,
}

impl Default for WsServerOptions {
    fn default() -> Self {
        Self {
            ws_ping_sec: 30,
            enable_app_ping: true,
        }
    }
}

/// Streams every message published on `topic` to `socket` until either side
/// goes away. Answers `{"type":"ping"}` with an app-level pong.
pub async fn serve_topic(
    socket: WebSocket,
    manager: WebSocketManager,
    topic: String,
    opts: WsServerOptions,
) {
    let ping_every = Duration::from_secs(opts.ws_ping_sec);
    let app_ping = opts.enable_app_ping;
    let mut rx = manager.subscribe(&topic).await;
    let (mut sink, mut socket_rx) = socket.split();

    // All writes go through one queue so the three producers never contend on the sink.
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(64);
    let writer_task = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if sink.send(frame).await.is_err() {
                break;
            }
        }
    });

    let forward_task = {
        let out_tx = out_tx.clone();
        let topic = topic.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(msg) => {
                        if out_tx.send(Message::Text(msg.into())).await.is_err() {
                            tracing::info!("Client disconnected while sending to '{topic}'");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!("WS client on '{topic}' lagged by {n} messages");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    };

    let ping_task = {
        let out_tx = out_tx.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(ping_every).await;
                if out_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        })
    };

    let receive_task = {
        let out_tx = out_tx.clone();
        let topic = topic.clone();
        tokio::spawn(async move {
            while let Some(Ok(msg)) = socket_rx.next().await {
                match msg {
                    Message::Text(text) => {
                        if app_ping && is_app_ping(text.as_str()) {
                            let pong = serde_json::json!({
                                "event": "pong",
                                "topic": topic,
                                "payload": {},
                                "ts": Utc::now().to_rfc3339(),
                            });
                            let _ = out_tx.send(Message::Text(pong.to_string().into())).await;
                        } else {
                            tracing::debug!("Ignoring client message on '{topic}'");
                        }
                    }
                    Message::Ping(payload) => {
                        let _ = out_tx.send(Message::Pong(payload)).await;
                    }
                    Message::Pong(_) => {}
                    Message::Binary(_) => {
                        tracing::warn!("Ignoring binary on topic '{topic}'");
                    }
                    Message::Close(_) => break,
                }
            }
        })
    };
    drop(out_tx);

    // The client leaving ends the session; the other tasks only stop on their own
    // once their channels close.
    let _ = receive_task.await;
    forward_task.abort();
    ping_task.abort();
    let _ = writer_task.await;

    manager.prune(&topic).await;
    tracing::info!("WS session ended for topic '{topic}'");
}

fn is_app_ping(raw: &str) -> bool {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
        if let Some(Value::String(t)) = map.get("type") {
            return t == "ping";
        }
    }
    false
}
