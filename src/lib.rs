pub mod appresult;
pub mod auth;
pub mod chats;
pub mod config;
pub mod db;
pub mod groups;
pub mod messages;
pub mod password;
pub mod presence;
pub mod profiles;
pub mod session;
pub mod store;
pub mod users;

use axum::{extract::FromRef, Router};

pub use appresult::{AppError, AppResult, ChatError, ChatResult};
pub use store::Store;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Store,
}

/// Every entry point. The caller adds the session layer.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(chats::router())
        .merge(profiles::router())
}
