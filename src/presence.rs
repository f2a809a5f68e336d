use serde::Deserialize;
use tracing::info;

use crate::{
    db::User,
    store::{Store, USERS},
    users, ChatError, ChatResult,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactsTab {
    #[default]
    Online,
    Chats,
}

/// The `is_online` flag on the user record is the only presence state.
pub async fn set_online_status(store: &Store, username: &str, online: bool) -> ChatResult<()> {
    store.update(USERS, |users: &mut Vec<User>| {
        let user = users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| ChatError::NotFound(format!("user {username}")))?;
        user.is_online = online;
        Ok(())
    }).await?;

    info!(username, online, "presence changed");
    Ok(())
}

pub async fn online_users(store: &Store) -> ChatResult<Vec<User>> {
    Ok(users::all(store)
        .await?
        .into_iter()
        .filter(|u| u.is_online)
        .collect())
}

/// Everyone but `viewer`, narrowed to online users on the online tab.
pub async fn contacts(store: &Store, viewer: &str, tab: ContactsTab) -> ChatResult<Vec<User>> {
    let candidates = match tab {
        ContactsTab::Online => online_users(store).await?,
        ContactsTab::Chats => users::all(store).await?,
    };

    Ok(candidates
        .into_iter()
        .filter(|u| u.username != viewer)
        .collect())
}
