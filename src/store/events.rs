use serde::{Deserialize, Serialize};

/// Published after every successful write to the shared store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEvent {
    pub key: String,
}

impl StoreEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}
