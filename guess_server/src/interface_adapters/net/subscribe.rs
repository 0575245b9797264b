use crate::interface_adapters::protocol::EventMessage;
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::rand_id;
use crate::use_cases::{Event, Subscriber, SubscriberError};

use async_trait::async_trait;
use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    SinkExt,
    stream::{SplitSink, StreamExt},
};
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};

/// Write half of a `/subscribe` socket, owned by the broadcaster once registered.
pub struct WsSubscriber {
    conn_id: u64,
    sink: SplitSink<WebSocket, Message>,
}

impl WsSubscriber {
    pub fn new(conn_id: u64, sink: SplitSink<WebSocket, Message>) -> Self {
        Self { conn_id, sink }
    }
}

#[async_trait]
impl Subscriber for WsSubscriber {
    fn id(&self) -> u64 {
        self.conn_id
    }

    async fn send_event(&mut self, event: &Event) -> Result<(), SubscriberError> {
        let txt = serde_json::to_string(&EventMessage::from(event))
            .map_err(|e| SubscriberError::Serialization(e.to_string()))?;
        self.sink
            .send(Message::Text(txt.into()))
            .await
            .map_err(|e| SubscriberError::Transport(e.to_string()))
    }

    async fn close(&mut self) {
        let _ = self
            .sink
            .send(Message::Close(Some(CloseFrame {
                code: close_code::AWAY,
                reason: "server closing subscription".into(),
            })))
            .await;
        let _ = self.sink.close().await;
    }
}

pub async fn subscribe_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let conn_id = rand_id();
    ws.on_upgrade(move |socket| {
        handle_socket(socket, state, conn_id).instrument(info_span!("conn", conn_id))
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, conn_id: u64) {
    let (sink, mut stream) = socket.split();

    if let Err(e) = state
        .broadcaster
        .subscribe(Box::new(WsSubscriber::new(conn_id, sink)))
        .await
    {
        // The sink went down with the rejected subscription, so the peer sees a dropped socket.
        warn!(error = %e, "subscription refused");
        return;
    }
    info!("subscriber connected");

    // Inbound frames carry nothing for us; reading keeps control frames flowing.
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Close(reason)) => {
                debug!(?reason, "client sent close");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "socket read failed");
                break;
            }
        }
    }
    info!("subscriber disconnected");
}
