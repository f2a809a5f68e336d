use axum::{debug_handler, extract::State, response::{IntoResponse, Redirect, Response}, Json};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::{
    db::SessionUser,
    presence,
    session::{self, SIGN_IN},
    store::Store,
    users, AppResult, ChatError,
};

#[derive(Deserialize)]
pub(crate) struct SigninForm {
    username: String,
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SigninStatus {
    signed_in_as: Option<SessionUser>,
}

#[debug_handler]
pub(crate) async fn signin_page(session: Session) -> AppResult<Json<SigninStatus>> {
    Ok(Json(SigninStatus {
        signed_in_as: session::active_user(&session).await?,
    }))
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn signin(
    State(store): State<Store>,
    session: Session,
    Json(SigninForm { username, password }): Json<SigninForm>,
) -> AppResult<Json<SessionUser>> {
    let Some(mut user) = users::authenticate(&store, &username, &password).await? else {
        return Err(ChatError::BadCredentials.into());
    };

    presence::set_online_status(&store, &user.username, true).await?;
    user.is_online = true;

    Ok(Json(session::login(&session, &user).await?))
}

#[debug_handler]
pub(crate) async fn me(session: Session) -> AppResult<Response> {
    let Some(me) = session::active_user(&session).await? else {
        return Ok(Redirect::to(SIGN_IN).into_response());
    };

    Ok(Json(me).into_response())
}
