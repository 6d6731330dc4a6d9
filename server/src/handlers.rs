use std::path::PathBuf;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Extension;
use drawsync_shared::encode_text;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::logic::{accept_frame, broadcast_except, Frame};
use crate::sessions::{join_session, new_session_id, normalize_session_id, remove_if_empty};
use crate::state::{AppState, LOBBY_SESSION};

pub async fn ping_handler() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

pub async fn root_handler() -> impl IntoResponse {
    Redirect::to(&format!("/s/{}", new_session_id()))
}

pub async fn session_handler(
    Path(session_id): Path<String>,
    Extension(index_file): Extension<PathBuf>,
) -> Response {
    if normalize_session_id(&session_id).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    match tokio::fs::read_to_string(&index_file).await {
        Ok(contents) => Html(contents).into_response(),
        Err(error) => {
            warn!(path = %index_file.display(), %error, "failed to read index page");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn lobby_ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, LOBBY_SESSION.to_string()))
}

pub async fn ws_handler(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(session_id) = normalize_session_id(&session_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id))
}

async fn handle_socket(socket: WebSocket, state: AppState, session_id: String) {
    let (mut socket_sender, mut socket_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection_id = Uuid::new_v4();

    let (session, peers) = join_session(&state, &session_id, connection_id, tx).await;
    info!(session = %session_id, conn = %connection_id, peers, "WS connected");

    let send_session_id = session_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let payload = match encode_text(&message) {
                Ok(payload) => payload,
                Err(error) => {
                    warn!(session = %send_session_id, conn = %connection_id, %error, "WS encode failed");
                    continue;
                }
            };
            if socket_sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = socket_receiver.next().await {
        let frame = match &message {
            Message::Text(text) => Frame::Text(text),
            Message::Binary(data) => Frame::Binary(data),
            Message::Close(frame) => {
                if let Some(frame) = frame {
                    debug!(
                        session = %session_id,
                        conn = %connection_id,
                        code = frame.code,
                        reason = %frame.reason,
                        "WS close frame"
                    );
                }
                break;
            }
            _ => continue,
        };
        match accept_frame(frame, &state.limits) {
            Ok(message) => {
                broadcast_except(&session, connection_id, message).await;
            }
            Err(error) => {
                warn!(session = %session_id, conn = %connection_id, %error, "WS message dropped");
            }
        }
    }

    {
        let mut session = session.write().await;
        session.peers.remove(&connection_id);
        info!(
            session = %session_id,
            conn = %connection_id,
            peers = session.peers.len(),
            "WS disconnected"
        );
    }
    send_task.abort();
    remove_if_empty(&state, &session_id, &session).await;
}
