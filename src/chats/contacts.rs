use axum::{debug_handler, extract::{Query, State}, response::{IntoResponse, Redirect, Response}, Json};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::{
    presence::{self, ContactsTab},
    session::{self, SIGN_IN},
    store::Store,
    AppResult,
};

#[derive(Deserialize)]
pub(crate) struct ContactsQuery {
    #[serde(default)]
    tab: ContactsTab,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Contact {
    username: String,
    is_online: bool,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn contacts(
    State(store): State<Store>,
    session: Session,
    Query(ContactsQuery { tab }): Query<ContactsQuery>,
) -> AppResult<Response> {
    let Some(me) = session::active_user(&session).await? else {
        return Ok(Redirect::to(SIGN_IN).into_response());
    };

    let contacts: Vec<Contact> = presence::contacts(&store, &me.username, tab)
        .await?
        .into_iter()
        .map(|u| Contact { username: u.username, is_online: u.is_online })
        .collect();

    Ok(Json(contacts).into_response())
}
