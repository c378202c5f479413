mod entity;
mod store;

pub use entity::UserInfo;
pub use store::{FailingStore, ScriptedStore};

use crate::db::store::MemoryStore;

/// Seed rows shared by resolver and store tests.
#[must_use]
pub fn seed_users() -> Vec<UserInfo> {
    vec![
        UserInfo::new(1, "Jone", 18, "test1@example.com"),
        UserInfo::new(2, "Jack", 20, "test2@example.com"),
        UserInfo::new(3, "Tom", 28, "test3@example.com"),
        UserInfo::new(4, "Sandy", 21, "test4@example.com"),
        UserInfo::new(5, "Billie", 24, "test5@example.com"),
    ]
}

/// Memory store pre-loaded with `seed_users`.
#[must_use]
pub fn seeded_store() -> MemoryStore<UserInfo> {
    seed_users().into_iter().collect()
}
