use tracing::info;

use crate::{
    db::{Group, GroupId},
    store::{Store, GROUPS},
    ChatResult,
};

/// `None` when the name is blank or nobody was selected. The creator always comes first
/// and every member appears once.
pub async fn create(store: &Store, name: &str, members: &[String], creator: &str) -> ChatResult<Option<Group>> {
    let name = name.trim();
    if name.is_empty() || members.is_empty() {
        return Ok(None);
    }

    let mut roster = vec![creator.to_owned()];
    for member in members {
        if !roster.contains(member) {
            roster.push(member.clone());
        }
    }

    let group = Group {
        id: GroupId::generate(),
        name: name.to_owned(),
        members: roster,
    };

    store.update(GROUPS, |groups: &mut Vec<Group>| {
        groups.push(group.clone());
        Ok(())
    }).await?;

    info!(id = %group.id, creator, members = group.members.len(), "group created");
    Ok(Some(group))
}

pub async fn list_for_user(store: &Store, username: &str) -> ChatResult<Vec<Group>> {
    Ok(store
        .read::<Group>(GROUPS)
        .await?
        .into_iter()
        .filter(|g| g.has_member(username))
        .collect())
}

pub async fn find(store: &Store, id: &GroupId) -> ChatResult<Option<Group>> {
    Ok(store
        .read::<Group>(GROUPS)
        .await?
        .into_iter()
        .find(|g| &g.id == id))
}
