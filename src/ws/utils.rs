use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, stream::SplitSink};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    models::messages::FeedbackServerMessage,
    state::{ViewerConnection, ViewerConnectionMap},
};

pub async fn store_viewer_connection(
    viewer_id: Uuid,
    sender: SplitSink<WebSocket, Message>,
    viewers: &ViewerConnectionMap,
) {
    let mut conns = viewers.lock().await;
    let conn_info = ViewerConnection {
        sender: Arc::new(Mutex::new(sender)),
    };
    conns.insert(viewer_id, Arc::new(conn_info));
    tracing::debug!("Stored connection for viewer {}", viewer_id);
}

pub async fn remove_viewer_connection(viewer_id: Uuid, viewers: &ViewerConnectionMap) {
    let mut conns = viewers.lock().await;
    conns.remove(&viewer_id);
    tracing::info!("Viewer {} disconnected", viewer_id);
}

pub async fn send_to_viewer(
    viewer_id: Uuid,
    msg: &FeedbackServerMessage,
    viewers: &ViewerConnectionMap,
) {
    let serialized = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize message: {}", e);
            return;
        }
    };

    // Clone the handle so the map lock is not held while sending
    let connection = {
        let conns = viewers.lock().await;
        conns.get(&viewer_id).cloned()
    };

    if let Some(connection) = connection {
        let mut sender = connection.sender.lock().await;
        if let Err(e) = sender.send(Message::Text(serialized.into())).await {
            tracing::debug!("Failed to send to viewer {}: {}", viewer_id, e);
        }
    }
}
