//! User profile lookups used to break ordering ties between profiles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::entry::UserHandle;

/// Host capability answering "who is the invoking user" and "in which order were profiles created".
pub trait UserDirectory {
    /// Whether `user` is the user the launcher runs as.
    fn is_primary_user(&self, user: UserHandle) -> bool;

    /// Creation-order serial for `user`; lower sorts first.
    fn priority_of(&self, user: UserHandle) -> i64;
}

/// Fixed user table, e.g. loaded from a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StaticUserDirectory {
    pub primary_user: UserHandle,
    pub priorities: HashMap<UserHandle, i64>,
}

impl StaticUserDirectory {
    #[must_use]
    pub fn new(primary_user: UserHandle) -> Self {
        Self {
            primary_user,
            priorities: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_priority(mut self, user: UserHandle, priority: i64) -> Self {
        self.priorities.insert(user, priority);
        self
    }
}

impl UserDirectory for StaticUserDirectory {
    fn is_primary_user(&self, user: UserHandle) -> bool {
        self.primary_user == user
    }

    /// Unknown users sort after every registered profile.
    fn priority_of(&self, user: UserHandle) -> i64 {
        self.priorities.get(&user).copied().unwrap_or(i64::MAX)
    }
}
