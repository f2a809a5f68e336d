use std::fmt;

use serde::{Deserialize, Serialize};
use time::{macros::format_description, OffsetDateTime};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub is_online: bool,

    // unique: username
}

/// Point-in-time copy of a [`User`] kept in the session. Never carries the password hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub username: String,
    pub email: String,
    pub is_online: bool,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            is_online: user.is_online,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub const PREFIX: &'static str = "group_";

    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, Uuid::now_v7().simple()))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub members: Vec<String>,

    // unique: id
}

impl Group {
    pub fn has_member(&self, username: &str) -> bool {
        self.members.iter().any(|m| m == username)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "to", rename_all = "snake_case")]
pub enum Recipient {
    User(String),
    Group(GroupId),
    /// The global chat every signed-in user sees.
    #[default]
    Lobby,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender: String,
    pub text: String,
    pub recipient: Recipient,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
}

impl Message {
    pub fn new(sender: impl Into<String>, text: impl Into<String>, recipient: Recipient) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender: sender.into(),
            text: text.into(),
            recipient,
            sent_at: OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()),
        }
    }

    /// `HH:MM` in the offset the message was sent from.
    pub fn timestamp(&self) -> String {
        self.sent_at
            .format(format_description!("[hour]:[minute]"))
            .unwrap_or_default()
    }

    pub fn is_between(&self, a: &str, b: &str) -> bool {
        match &self.recipient {
            Recipient::User(to) => {
                (self.sender == a && to == b) || (self.sender == b && to == a)
            }
            _ => false,
        }
    }

    pub fn is_in_group(&self, group: &GroupId) -> bool {
        matches!(&self.recipient, Recipient::Group(id) if id == group)
    }
}
