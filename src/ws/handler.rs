use axum::{
    extract::{
        ConnectInfo, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures::StreamExt;
use std::net::SocketAddr;
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    guestbook::{Focus, LiveSurface},
    models::messages::{FeedbackClientMessage, FeedbackServerMessage},
    state::AppState,
    ws::{
        session::ViewerSession,
        utils::{remove_viewer_connection, send_to_viewer, store_viewer_connection},
    },
};

pub async fn feedback_ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let viewer_id = Uuid::new_v4();
    tracing::info!("New guest book viewer {} from {}", viewer_id, addr);

    ws.on_upgrade(move |socket| handle_feedback_socket(socket, viewer_id, state))
}

async fn focus_changed(rx: &mut Option<watch::Receiver<Focus>>) -> Option<Focus> {
    match rx {
        Some(rx) => match rx.changed().await {
            Ok(()) => Some(rx.borrow_and_update().clone()),
            Err(_) => None,
        },
        None => std::future::pending().await,
    }
}

async fn handle_feedback_socket(socket: WebSocket, viewer_id: Uuid, state: AppState) {
    let (sender, mut receiver) = socket.split();
    let viewers = state.viewers.clone();

    store_viewer_connection(viewer_id, sender, &viewers).await;

    let mut surface = match LiveSurface::mount(state.gateway.clone(), state.display.order).await {
        Ok(surface) => surface,
        Err(e) => {
            tracing::error!("Failed to mount live surface for {}: {}", viewer_id, e);
            send_to_viewer(
                viewer_id,
                &FeedbackServerMessage::Error {
                    message: e.to_string(),
                },
                &viewers,
            )
            .await;
            remove_viewer_connection(viewer_id, &viewers).await;
            return;
        }
    };

    let mut session = ViewerSession::new(viewer_id, state);
    let mut view_rx = surface.watch();
    let mut focus_rx = session.focus_updates();

    send_to_viewer(
        viewer_id,
        &FeedbackServerMessage::Snapshot {
            view: surface.view(),
        },
        &viewers,
    )
    .await;
    session.send_form_state().await;
    session.start();

    loop {
        tokio::select! {
            Ok(()) = view_rx.changed() => {
                let view = view_rx.borrow_and_update().clone();
                session.set_entry_count(view.entries.len());
                // A changed entry count reaches the client through `focus_rx`.
                send_to_viewer(viewer_id, &FeedbackServerMessage::Snapshot { view }, &viewers).await;
            }
            Some(focus) = focus_changed(&mut focus_rx) => {
                send_to_viewer(viewer_id, &FeedbackServerMessage::Focus { focus }, &viewers).await;
            }
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<FeedbackClientMessage>(&text) {
                        Ok(parsed) => session.handle_message(parsed).await,
                        Err(e) => {
                            tracing::debug!("Viewer {} sent invalid message: {}", viewer_id, e);
                            send_to_viewer(
                                viewer_id,
                                &FeedbackServerMessage::Error { message: "Invalid message".into() },
                                &viewers,
                            )
                            .await;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    tracing::debug!("Viewer {} socket error: {}", viewer_id, e);
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    session.close();
    surface.unmount();
    remove_viewer_connection(viewer_id, &viewers).await;
}
