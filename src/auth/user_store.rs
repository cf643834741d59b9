//! User Storage
//! Mission: Serve read-only user lookups from a fixed in-memory table

use crate::auth::models::User;
use std::collections::HashMap;
use tracing::{debug, info};

/// Seed accounts loaded at startup: (email, password)
pub const SEED_USERS: &[(&str, &str)] = &[
    ("user1@example.com", "1234"),
    ("user2@example.com", "abcd"),
];

/// Read-only user lookup. Implementations must be safe to share across
/// request handlers.
pub trait UserStore: Send + Sync {
    fn lookup(&self, email: &str) -> Option<User>;
}

/// Fixed user table keyed by email, immutable once built
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: HashMap<String, User>,
}

impl InMemoryUserStore {
    /// Build a store from (email, password) pairs. Entries whose email is
    /// malformed are skipped.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut users = HashMap::new();
        for (email, password) in pairs {
            match User::new(email, password) {
                Some(user) => {
                    users.insert(user.email.clone(), user);
                }
                None => debug!("Skipping seed user with malformed email: {}", email),
            }
        }
        Self { users }
    }

    /// The default seeded table
    pub fn seeded() -> Self {
        let store = Self::from_pairs(SEED_USERS.iter().copied());
        info!("👥 User store seeded with {} users", store.len());
        store
    }

    fn len(&self) -> usize {
        self.users.len()
    }
}

impl UserStore for InMemoryUserStore {
    fn lookup(&self, email: &str) -> Option<User> {
        self.users.get(email).cloned()
    }
}
