use axum::{debug_handler, extract::State, response::Redirect};
use tower_sessions::Session;
use tracing::warn;

use crate::{presence, session::{self, SIGN_IN}, store::Store, AppResult};

#[debug_handler(state = crate::AppState)]
pub(crate) async fn logout(
    State(store): State<Store>,
    session: Session,
) -> AppResult<Redirect> {
    if let Some(me) = session::active_user(&session).await? {
        // the record may have been renamed from another session
        if let Err(err) = presence::set_online_status(&store, &me.username, false).await {
            warn!(username = %me.username, %err, "could not mark offline");
        }
    }

    session::logout(&session).await?;
    Ok(Redirect::to(SIGN_IN))
}
