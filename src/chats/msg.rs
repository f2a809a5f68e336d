use axum::{debug_handler, extract::{Path, State}, http::StatusCode, response::{IntoResponse, Redirect, Response}, Json};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    db::{Message, Recipient},
    groups, messages,
    session::{self, SIGN_IN},
    store::Store,
    users, AppResult, ChatError,
};

#[derive(Deserialize)]
pub(crate) struct SendMessageForm {
    text: String,
    #[serde(default)]
    to: Recipient,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MessageView {
    id: Uuid,
    sender: String,
    text: String,
    html: String,
    recipient: Recipient,
    timestamp: String,
    mine: bool,
}

impl MessageView {
    pub(crate) fn new(msg: Message, viewer: &str) -> Self {
        Self {
            id: msg.id,
            html: messages::render_html(&msg.text),
            timestamp: msg.timestamp(),
            mine: msg.sender == viewer,
            sender: msg.sender,
            text: msg.text,
            recipient: msg.recipient,
        }
    }
}

pub(crate) fn views(msgs: Vec<Message>, viewer: &str) -> Vec<MessageView> {
    msgs.into_iter().map(|m| MessageView::new(m, viewer)).collect()
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn send(
    State(store): State<Store>,
    session: Session,
    Json(SendMessageForm { text, to }): Json<SendMessageForm>,
) -> AppResult<Response> {
    let Some(me) = session::active_user(&session).await? else {
        return Ok(Redirect::to(SIGN_IN).into_response());
    };

    match &to {
        Recipient::User(name) => {
            if users::find(&store, name).await?.is_none() {
                return Err(ChatError::NotFound(format!("user {name}")).into());
            }
        }
        Recipient::Group(id) => {
            let member = groups::find(&store, id)
                .await?
                .is_some_and(|g| g.has_member(&me.username));
            if !member {
                return Err(ChatError::NotFound(format!("group {id}")).into());
            }
        }
        Recipient::Lobby => {}
    }

    let Some(msg) = messages::save(&store, &me.username, &text, to).await? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    Ok((StatusCode::CREATED, Json(MessageView::new(msg, &me.username))).into_response())
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn conversation(
    State(store): State<Store>,
    session: Session,
    Path(username): Path<String>,
) -> AppResult<Response> {
    let Some(me) = session::active_user(&session).await? else {
        return Ok(Redirect::to(SIGN_IN).into_response());
    };

    let msgs = messages::conversation(&store, &me.username, &username).await?;
    Ok(Json(views(msgs, &me.username)).into_response())
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn lobby(
    State(store): State<Store>,
    session: Session,
) -> AppResult<Response> {
    let Some(me) = session::active_user(&session).await? else {
        return Ok(Redirect::to(SIGN_IN).into_response());
    };

    let msgs = messages::lobby(&store).await?;
    Ok(Json(views(msgs, &me.username)).into_response())
}
