mod contacts;
mod groups;
mod msg;
mod ws;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(contacts::contacts))
        .route("/chats/{username}", get(msg::conversation))
        .route("/lobby", get(msg::lobby))
        .route("/messages", post(msg::send))
        .route("/groups", get(groups::list).post(groups::create))
        .route("/groups/{id}/messages", get(groups::thread))
        .route("/ws", get(ws::events))
}
