use axum::{
    debug_handler,
    extract::{ws::{Message as Frame, WebSocket}, State, WebSocketUpgrade},
    response::{IntoResponse, Redirect, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tower_sessions::Session;
use tracing::{debug, warn};

use crate::{session::{self, SIGN_IN}, store::{Store, StoreEvent}, AppResult};

/// Streams every store change to the client, which re-fetches what it shows.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn events(
    State(store): State<Store>,
    session: Session,
    ws: WebSocketUpgrade,
) -> AppResult<Response> {
    let Some(me) = session::active_user(&session).await? else {
        return Ok(Redirect::to(SIGN_IN).into_response());
    };

    let rx = store.subscribe();
    debug!(username = %me.username, "event stream opened");
    Ok(ws.on_upgrade(move |socket| forward(socket, rx)))
}

async fn forward(socket: WebSocket, mut rx: broadcast::Receiver<StoreEvent>) {
    let (mut sender, mut receiver) = socket.split();

    let mut broadcast_task = tokio::spawn(async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event stream lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let Ok(text) = serde_json::to_string(&event) else {
                continue;
            };
            if sender.send(Frame::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // client frames carry nothing; wait for close
    loop {
        tokio::select! {
            _ = &mut broadcast_task => break,
            frame = receiver.next() => match frame {
                Some(Ok(Frame::Close(_))) | Some(Err(_)) | None => {
                    broadcast_task.abort();
                    break;
                }
                Some(Ok(_)) => continue,
            },
        }
    }
}
