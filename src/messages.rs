use pulldown_cmark::{html, Event, Parser};
use tracing::info;

use crate::{
    db::{Group, Message, Recipient},
    store::{Store, MESSAGES},
    ChatResult,
};

/// Blank text is dropped without touching the log.
pub async fn save(store: &Store, sender: &str, text: &str, recipient: Recipient) -> ChatResult<Option<Message>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let message = Message::new(sender, text, recipient);
    store.update(MESSAGES, |log: &mut Vec<Message>| {
        log.push(message.clone());
        Ok(())
    }).await?;

    info!(id = %message.id, sender, "message saved");
    Ok(Some(message))
}

pub async fn all(store: &Store) -> ChatResult<Vec<Message>> {
    store.read(MESSAGES).await
}

pub async fn conversation(store: &Store, a: &str, b: &str) -> ChatResult<Vec<Message>> {
    Ok(all(store)
        .await?
        .into_iter()
        .filter(|m| m.is_between(a, b))
        .collect())
}

/// Empty for anyone outside the group.
pub async fn group_thread(store: &Store, group: &Group, viewer: &str) -> ChatResult<Vec<Message>> {
    if !group.has_member(viewer) {
        return Ok(Vec::new());
    }

    Ok(all(store)
        .await?
        .into_iter()
        .filter(|m| m.is_in_group(&group.id))
        .collect())
}

pub async fn lobby(store: &Store) -> ChatResult<Vec<Message>> {
    Ok(all(store)
        .await?
        .into_iter()
        .filter(|m| m.recipient == Recipient::Lobby)
        .collect())
}

/// Markdown to html. Raw html in the text is escaped, not passed through.
pub fn render_html(text: &str) -> String {
    let parser = Parser::new(text).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        _ => event,
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
