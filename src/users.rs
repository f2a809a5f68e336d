use serde::Deserialize;
use tracing::info;

use crate::{
    db::{Group, Message, Recipient, User},
    password::{hash_password, verify_password},
    store::{Store, GROUPS, MESSAGES, USERS},
    ChatError, ChatResult,
};

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Blank fields keep the current value.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

pub async fn all(store: &Store) -> ChatResult<Vec<User>> {
    store.read(USERS).await
}

pub async fn find(store: &Store, username: &str) -> ChatResult<Option<User>> {
    Ok(all(store).await?.into_iter().find(|u| u.username == username))
}

pub async fn is_username_unique(store: &Store, username: &str) -> ChatResult<bool> {
    Ok(find(store, username).await?.is_none())
}

/// Checks uniqueness and inserts under the same write lock. The username is kept exactly
/// as given, since every lookup matches it byte for byte.
pub async fn register(store: &Store, NewUser { username, email, password }: NewUser) -> ChatResult<User> {
    let email = email.trim().to_owned();
    if username.trim().is_empty() || email.is_empty() || password.is_empty() {
        return Err(ChatError::Invalid("username, email and password are required".into()));
    }

    let user = User {
        username,
        email,
        password_hash: hash_password(&password)?,
        is_online: false,
    };

    store.update(USERS, |users: &mut Vec<User>| {
        if users.iter().any(|u| u.username == user.username) {
            return Err(ChatError::UsernameTaken(user.username.clone()));
        }
        users.push(user.clone());
        Ok(())
    }).await?;

    info!(username = %user.username, "registered");
    Ok(user)
}

pub async fn authenticate(store: &Store, username: &str, password: &str) -> ChatResult<Option<User>> {
    let Some(user) = find(store, username).await? else {
        return Ok(None);
    };

    if verify_password(password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

pub async fn update_profile(store: &Store, current: &str, update: ProfileUpdate) -> ChatResult<User> {
    let new_username = non_blank(update.username);
    let new_email = non_blank(update.email);

    let updated = store.update(USERS, |users: &mut Vec<User>| {
        let idx = users
            .iter()
            .position(|u| u.username == current)
            .ok_or_else(|| ChatError::NotFound(format!("user {current}")))?;

        if let Some(name) = &new_username {
            if name != current && users.iter().any(|u| &u.username == name) {
                return Err(ChatError::UsernameTaken(name.clone()));
            }
        }

        let user = &mut users[idx];
        if let Some(name) = new_username {
            user.username = name;
        }
        if let Some(email) = new_email {
            user.email = email;
        }
        Ok(user.clone())
    }).await?;

    if updated.username != current {
        carry_references(store, current, &updated.username).await?;
    }

    info!(from = current, to = %updated.username, "profile updated");
    Ok(updated)
}

/// Moves group memberships and direct messages over to the new name, so the old one is
/// released clean.
async fn carry_references(store: &Store, from: &str, to: &str) -> ChatResult<()> {
    store.update(GROUPS, |groups: &mut Vec<Group>| {
        for member in groups.iter_mut().flat_map(|g| g.members.iter_mut()) {
            if member == from {
                *member = to.to_owned();
            }
        }
        Ok(())
    }).await?;

    store.update(MESSAGES, |log: &mut Vec<Message>| {
        for msg in log.iter_mut() {
            if msg.sender == from {
                msg.sender = to.to_owned();
            }
            if let Recipient::User(name) = &mut msg.recipient {
                if name == from {
                    *name = to.to_owned();
                }
            }
        }
        Ok(())
    }).await
}
