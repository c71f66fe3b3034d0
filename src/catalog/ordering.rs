//! Total order over app entries: title, then component, then user profile.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::catalog::entry::{AppEntry, UserHandle};
use crate::catalog::users::UserDirectory;

/// Title comparison seam; hosts plug in locale-aware collation here.
pub trait TitleCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Case-folded comparison with a code-point tiebreak.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveCollator;

impl TitleCollator for CaseInsensitiveCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        let folded_a = a.chars().flat_map(char::to_lowercase);
        let folded_b = b.chars().flat_map(char::to_lowercase);
        folded_a.cmp(folded_b).then_with(|| a.cmp(b))
    }
}

impl<F> TitleCollator for F
where
    F: Fn(&str, &str) -> Ordering,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

/// Ordering collaborators shared by every sort and search pass.
pub struct OrderingPolicy {
    collator: Box<dyn TitleCollator>,
    users: Box<dyn UserDirectory>,
}

impl OrderingPolicy {
    #[must_use]
    pub fn new(collator: Box<dyn TitleCollator>, users: Box<dyn UserDirectory>) -> Self {
        Self { collator, users }
    }

    /// Start a sort/search pass with an empty priority cache.
    #[must_use]
    pub fn comparator(&self) -> PassComparator<'_> {
        PassComparator {
            policy: self,
            priority_cache: HashMap::new(),
            lookups: 0,
        }
    }
}

impl std::fmt::Debug for OrderingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderingPolicy").finish_non_exhaustive()
    }
}

/// Comparator for one pass. Dropping it discards the cached priorities.
pub struct PassComparator<'a> {
    policy: &'a OrderingPolicy,
    priority_cache: HashMap<UserHandle, i64>,
    lookups: usize,
}

impl PassComparator<'_> {
    pub fn compare(&mut self, a: &AppEntry, b: &AppEntry) -> Ordering {
        let by_title = self.policy.collator.compare(&a.title, &b.title);
        if by_title != Ordering::Equal {
            return by_title;
        }
        let by_component = a.component.cmp(&b.component);
        if by_component != Ordering::Equal {
            return by_component;
        }
        if a.user == b.user {
            return Ordering::Equal;
        }

        // Same app installed for two profiles.
        let users = &self.policy.users;
        match (users.is_primary_user(a.user), users.is_primary_user(b.user)) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => {
                let pa = self.priority(a.user);
                let pb = self.priority(b.user);
                pa.cmp(&pb)
            }
        }
    }

    /// Number of directory lookups this pass actually issued.
    #[must_use]
    pub fn directory_lookups(&self) -> usize {
        self.lookups
    }

    fn priority(&mut self, user: UserHandle) -> i64 {
        if let Some(cached) = self.priority_cache.get(&user) {
            return *cached;
        }
        let value = self.policy.users.priority_of(user);
        self.lookups += 1;
        self.priority_cache.insert(user, value);
        value
    }
}
