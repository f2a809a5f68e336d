use std::sync::Arc;

use chatterbox::{
    db::Recipient,
    groups, messages, presence,
    session,
    store::{Backend, Store, StoreEvent, DEFAULT_EVENT_CAPACITY, GROUPS, MESSAGES, USERS},
    users::{self, NewUser},
    ChatError,
};
use sqlx::sqlite::SqlitePoolOptions;
use tower_sessions::{MemoryStore, Session};

fn new_user(username: &str, email: &str, password: &str) -> NewUser {
    NewUser {
        username: username.into(),
        email: email.into(),
        password: password.into(),
    }
}

fn tab() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}

/// Sign-in screen flow: authenticate, mark online, set the session pointer.
async fn sign_in(store: &Store, session: &Session, username: &str, password: &str) {
    let mut user = users::authenticate(store, username, password).await.unwrap().unwrap();
    presence::set_online_status(store, username, true).await.unwrap();
    user.is_online = true;
    session::login(session, &user).await.unwrap();
}

async fn sign_out(store: &Store, session: &Session) {
    let me = session::active_user(session).await.unwrap().unwrap();
    presence::set_online_status(store, &me.username, false).await.unwrap();
    session::logout(session).await.unwrap();
}

async fn online_names(store: &Store) -> Vec<String> {
    presence::online_users(store)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect()
}

async fn direct_message_is_delivered(store: Store) {
    users::register(&store, new_user("alice", "alice@x.com", "pw1")).await.unwrap();
    users::register(&store, new_user("bob", "bob@x.com", "pw2")).await.unwrap();

    let tab = tab();
    sign_in(&store, &tab, "alice", "pw1").await;
    assert_eq!(online_names(&store).await, ["alice"]);

    let alice = session::active_user(&tab).await.unwrap().unwrap();
    messages::save(&store, &alice.username, "hi", Recipient::User("bob".into())).await.unwrap();

    sign_out(&store, &tab).await;
    assert!(online_names(&store).await.is_empty());
    assert_eq!(session::active_user(&tab).await.unwrap(), None);

    sign_in(&store, &tab, "bob", "pw2").await;
    let bob = session::active_user(&tab).await.unwrap().unwrap();
    assert_eq!(bob.username, "bob");

    let convo = messages::conversation(&store, &bob.username, "alice").await.unwrap();
    assert_eq!(convo.len(), 1);
    assert_eq!(convo[0].sender, "alice");
    assert_eq!(convo[0].text, "hi");
}

#[tokio::test]
async fn direct_message_scenario_in_memory() {
    direct_message_is_delivered(Store::in_memory()).await;
}

#[tokio::test]
async fn direct_message_scenario_on_sqlite() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = Store::new(Backend::sqlite(pool).await.unwrap(), DEFAULT_EVENT_CAPACITY);

    direct_message_is_delivered(store).await;
}

#[tokio::test]
async fn group_message_scenario() {
    let store = Store::in_memory();
    for (name, pw) in [("alice", "pw1"), ("bob", "pw2"), ("carol", "pw3")] {
        users::register(&store, new_user(name, &format!("{name}@x.com"), pw)).await.unwrap();
    }

    let group = groups::create(&store, "Team", &["bob".to_string()], "alice")
        .await
        .unwrap()
        .unwrap();
    assert!(group.has_member("alice"));
    assert!(group.has_member("bob"));

    messages::save(&store, "alice", "standup at 10", Recipient::Group(group.id.clone()))
        .await
        .unwrap();

    let bobs_view = messages::group_thread(&store, &group, "bob").await.unwrap();
    assert_eq!(bobs_view.len(), 1);
    assert_eq!(bobs_view[0].text, "standup at 10");

    assert!(messages::group_thread(&store, &group, "carol").await.unwrap().is_empty());
    assert!(messages::conversation(&store, "alice", "bob").await.unwrap().is_empty());
    assert!(groups::list_for_user(&store, "carol").await.unwrap().is_empty());
}

#[tokio::test]
async fn racing_registrations_admit_one() {
    let store = Store::in_memory();

    let tasks: Vec<_> = (0..4)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move {
                users::register(&store, new_user("alice", &format!("alice{n}@x.com"), "pw")).await
            })
        })
        .collect();

    let mut admitted = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(ChatError::UsernameTaken(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(users::all(&store).await.unwrap().len(), 1);
}

#[tokio::test]
async fn subscribers_hear_each_collection_change() {
    let store = Store::in_memory();
    let mut rx = store.subscribe();

    users::register(&store, new_user("alice", "alice@x.com", "pw1")).await.unwrap();
    presence::set_online_status(&store, "alice", true).await.unwrap();
    groups::create(&store, "Solo", &["alice".to_string()], "alice").await.unwrap();
    messages::save(&store, "alice", "hello", Recipient::Lobby).await.unwrap();

    let mut keys = Vec::new();
    while let Ok(StoreEvent { key }) = rx.try_recv() {
        keys.push(key);
    }
    assert_eq!(keys, [USERS, USERS, GROUPS, MESSAGES]);
}
