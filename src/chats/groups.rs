use axum::{debug_handler, extract::{Path, State}, http::StatusCode, response::{IntoResponse, Redirect, Response}, Json};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    db::GroupId,
    groups, messages,
    session::{self, SIGN_IN},
    store::Store,
    AppResult, ChatError,
};

use super::msg;

#[derive(Debug, Deserialize)]
pub(crate) struct NewGroupForm {
    name: String,
    #[serde(default)]
    members: Vec<String>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn list(
    State(store): State<Store>,
    session: Session,
) -> AppResult<Response> {
    let Some(me) = session::active_user(&session).await? else {
        return Ok(Redirect::to(SIGN_IN).into_response());
    };

    Ok(Json(groups::list_for_user(&store, &me.username).await?).into_response())
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn create(
    State(store): State<Store>,
    session: Session,
    Json(NewGroupForm { name, members }): Json<NewGroupForm>,
) -> AppResult<Response> {
    let Some(me) = session::active_user(&session).await? else {
        return Ok(Redirect::to(SIGN_IN).into_response());
    };

    match groups::create(&store, &name, &members, &me.username).await? {
        Some(group) => Ok((StatusCode::CREATED, Json(group)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn thread(
    State(store): State<Store>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Some(me) = session::active_user(&session).await? else {
        return Ok(Redirect::to(SIGN_IN).into_response());
    };

    let id = GroupId(id);
    let Some(group) = groups::find(&store, &id)
        .await?
        .filter(|g| g.has_member(&me.username))
    else {
        return Err(ChatError::NotFound(format!("group {id}")).into());
    };

    let msgs = messages::group_thread(&store, &group, &me.username).await?;
    Ok(Json(msg::views(msgs, &me.username)).into_response())
}
