use axum::{debug_handler, extract::State, response::{IntoResponse, Redirect, Response}, Json};
use tower_sessions::Session;

use crate::{
    session::{self, SIGN_IN},
    store::Store,
    users::{self, ProfileUpdate},
    AppResult,
};

#[debug_handler]
pub(crate) async fn profile(session: Session) -> AppResult<Response> {
    let Some(me) = session::active_user(&session).await? else {
        return Ok(Redirect::to(SIGN_IN).into_response());
    };

    Ok(Json(me).into_response())
}

/// Renames carry the online flag with them, so presence needs no separate re-key.
#[debug_handler(state = crate::AppState)]
pub(crate) async fn save_profile(
    State(store): State<Store>,
    session: Session,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Response> {
    let Some(me) = session::active_user(&session).await? else {
        return Ok(Redirect::to(SIGN_IN).into_response());
    };

    let updated = users::update_profile(&store, &me.username, update).await?;

    Ok(Json(session::login(&session, &updated).await?).into_response())
}
