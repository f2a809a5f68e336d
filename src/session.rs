use tower_sessions::Session;
use tracing::debug;

use crate::{
    db::{SessionUser, User},
    ChatResult,
};

pub const LOGGED_IN_USER: &str = "loggedInUser";

pub const SIGN_IN: &str = "/signin";

/// Overwrites whatever snapshot the session held.
pub async fn login(session: &Session, user: &User) -> ChatResult<SessionUser> {
    let snapshot = SessionUser::from(user);
    session.insert(LOGGED_IN_USER, &snapshot).await?;
    debug!(username = %snapshot.username, "session pointer set");
    Ok(snapshot)
}

pub async fn active_user(session: &Session) -> ChatResult<Option<SessionUser>> {
    Ok(session.get::<SessionUser>(LOGGED_IN_USER).await?)
}

/// Drops the session from the session store as well, so the old cookie can't revive it.
pub async fn logout(session: &Session) -> ChatResult<()> {
    session.flush().await?;
    Ok(())
}
