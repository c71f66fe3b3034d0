//! Sorted registry: sole owner of app entries, kept in [`OrderingPolicy`] order.

#![allow(missing_docs)]

use std::cmp::Ordering;

use crate::catalog::entry::AppEntry;
use crate::catalog::ordering::OrderingPolicy;

/// All known apps, sorted.
///
/// Inserts keep the order. Upserts replace in place and may leave the
/// replaced entry out of order until the next [`SortedRegistry::resort`].
#[derive(Debug)]
pub struct SortedRegistry {
    policy: OrderingPolicy,
    apps: Vec<AppEntry>,
}

impl SortedRegistry {
    #[must_use]
    pub fn new(policy: OrderingPolicy) -> Self {
        Self {
            policy,
            apps: Vec::new(),
        }
    }

    #[must_use]
    pub fn apps(&self) -> &[AppEntry] {
        &self.apps
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AppEntry> {
        self.apps.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Drop everything and take `apps` as the new contents (unsorted until resort).
    pub fn replace_all(&mut self, apps: impl IntoIterator<Item = AppEntry>) {
        self.apps.clear();
        self.apps.extend(apps);
    }

    /// Binary-search insert after any run of equal entries.
    ///
    /// Unlike a plain binary-search insert this checks the equal run: an entry
    /// that compares `Equal` and has the same identity as a stored one is
    /// skipped and `false` is returned. Identity duplicates with another title
    /// are still inserted.
    pub fn insert(&mut self, entry: AppEntry) -> bool {
        let mut cmp = self.policy.comparator();
        let start = self
            .apps
            .partition_point(|probe| cmp.compare(probe, &entry) == Ordering::Less);
        let equal_run = self.apps[start..]
            .iter()
            .take_while(|probe| cmp.compare(probe, &entry) == Ordering::Equal)
            .collect::<Vec<_>>();
        if equal_run.iter().any(|probe| probe.same_identity(&entry)) {
            return false;
        }
        let at = start + equal_run.len();
        self.apps.insert(at, entry);
        true
    }

    /// Replace the app with the same identity, or insert it. Returns `true` on replace.
    pub fn upsert(&mut self, entry: AppEntry) -> bool {
        if let Some(index) = self.position_of(&entry) {
            self.apps[index] = entry;
            return true;
        }
        self.insert(entry);
        false
    }

    /// Remove the app with the same identity; absence is not an error.
    pub fn remove(&mut self, entry: &AppEntry) -> Option<AppEntry> {
        let index = self.position_of(entry)?;
        Some(self.apps.remove(index))
    }

    /// Stable full sort with a fresh priority cache.
    ///
    /// A collator that breaks total order yields some permutation of the
    /// entries, never a panic.
    pub fn resort(&mut self) {
        let mut cmp = self.policy.comparator();
        let apps = std::mem::take(&mut self.apps);
        let mut by_policy = |a: &AppEntry, b: &AppEntry| cmp.compare(a, b);
        self.apps = merge_sort(apps, &mut by_policy);
    }

    #[must_use]
    pub fn is_sorted(&self) -> bool {
        let mut cmp = self.policy.comparator();
        self.apps
            .windows(2)
            .all(|pair| cmp.compare(&pair[0], &pair[1]) != Ordering::Greater)
    }

    fn position_of(&self, entry: &AppEntry) -> Option<usize> {
        self.apps.iter().position(|probe| probe.same_identity(entry))
    }
}

/// Top-down stable merge sort. Each element is moved exactly once per level
/// and the comparator result is only used to pick a side, so inconsistent
/// answers cannot lose or duplicate entries.
fn merge_sort<T>(mut items: Vec<T>, cmp: &mut impl FnMut(&T, &T) -> Ordering) -> Vec<T> {
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp);
    let right = merge_sort(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        // Ties go left to keep the sort stable.
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        merged.extend(if take_right { right.next() } else { left.next() });
    }
    merged
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::catalog::entry::{ComponentName, UserHandle};
    use crate::catalog::ordering::CaseInsensitiveCollator;
    use crate::catalog::users::StaticUserDirectory;

    fn registry() -> SortedRegistry {
        let users = StaticUserDirectory::new(UserHandle(0))
            .with_priority(UserHandle(0), 0)
            .with_priority(UserHandle(10), 1);
        SortedRegistry::new(OrderingPolicy::new(
            Box::new(CaseInsensitiveCollator),
            Box::new(users),
        ))
    }

    fn app(pkg: &str, user: u32, title: &str) -> AppEntry {
        AppEntry::new(ComponentName::new(pkg, format!("{pkg}.Main")), UserHandle(user), title)
    }

    fn titles(registry: &SortedRegistry) -> Vec<String> {
        registry
            .apps()
            .iter()
            .map(|app| format!("{}@{}", app.title, app.user.0))
            .collect()
    }

    #[test]
    fn insert_keeps_order() {
        let mut reg = registry();
        for title in ["Maps", "Camera", "Zoom", "Books", "Mail"] {
            assert!(reg.insert(app(&title.to_lowercase(), 0, title)));
        }
        assert_eq!(
            titles(&reg),
            vec!["Books@0", "Camera@0", "Mail@0", "Maps@0", "Zoom@0"]
        );
        assert!(reg.is_sorted());
    }

    #[test]
    fn insert_allows_same_component_for_other_user() {
        let mut reg = registry();
        assert!(reg.insert(app("mail", 10, "Mail")));
        assert!(reg.insert(app("mail", 0, "Mail")));
        assert_eq!(titles(&reg), vec!["Mail@0", "Mail@10"]);
    }

    #[test]
    fn insert_skips_exact_duplicate() {
        let mut reg = registry();
        assert!(reg.insert(app("mail", 0, "Mail")));
        assert!(!reg.insert(app("mail", 0, "Mail")));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn upsert_replaces_by_identity() {
        let mut reg = registry();
        reg.insert(app("mail", 0, "Mail"));
        reg.insert(app("zoom", 0, "Zoom"));

        assert!(reg.upsert(app("mail", 0, "Zulu Mail")));
        assert_eq!(reg.len(), 2);
        assert!(!reg.is_sorted(), "replace in place defers ordering to resort");
        reg.resort();
        assert_eq!(titles(&reg), vec!["Zoom@0", "Zulu Mail@0"]);
    }

    #[test]
    fn upsert_inserts_when_absent() {
        let mut reg = registry();
        reg.insert(app("zoom", 0, "Zoom"));
        assert!(!reg.upsert(app("books", 0, "Books")));
        assert_eq!(titles(&reg), vec!["Books@0", "Zoom@0"]);
    }

    #[test]
    fn remove_matches_identity_not_title() {
        let mut reg = registry();
        reg.insert(app("mail", 0, "Mail"));
        reg.insert(app("mail", 10, "Mail"));

        let removed = reg.remove(&app("mail", 10, "Renamed"));
        assert_eq!(removed.map(|app| app.user), Some(UserHandle(10)));
        assert_eq!(titles(&reg), vec!["Mail@0"]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut reg = registry();
        reg.insert(app("mail", 0, "Mail"));
        assert!(reg.remove(&app("maps", 0, "Maps")).is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn resort_is_stable_for_equal_keys() {
        let mut by_key = |x: &(i32, char), y: &(i32, char)| x.0.cmp(&y.0);
        let sorted = merge_sort(vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')], &mut by_key);
        assert_eq!(sorted, vec![(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c')]);
        assert!(merge_sort(Vec::new(), &mut by_key).is_empty());
    }

    #[test]
    fn resort_survives_inconsistent_collator() {
        let state = Cell::new(0x9e37_79b9_7f4a_7c15_u64);
        let coin_flip = move |_: &str, _: &str| {
            let mut x = state.get();
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            state.set(x);
            match x % 3 {
                0 => Ordering::Less,
                1 => Ordering::Equal,
                _ => Ordering::Greater,
            }
        };
        let mut reg = SortedRegistry::new(OrderingPolicy::new(
            Box::new(coin_flip),
            Box::new(StaticUserDirectory::default()),
        ));
        let apps: Vec<AppEntry> = (0..300)
            .map(|n| app(&format!("pkg{n}"), 0, &format!("App {n}")))
            .collect();
        reg.replace_all(apps.clone());
        reg.resort();
        for app in &apps {
            reg.insert(app.clone());
        }
        reg.resort();

        let mut got: Vec<String> = reg.apps().iter().map(|a| a.component.to_string()).collect();
        let mut want: Vec<String> = apps.iter().map(|a| a.component.to_string()).collect();
        got.sort();
        want.sort();
        assert!(got.len() >= want.len());
        got.dedup();
        assert_eq!(got, want);
    }

    #[test]
    fn replace_all_then_resort_sorts() {
        let mut reg = registry();
        reg.replace_all(vec![
            app("zoom", 0, "Zoom"),
            app("mail", 10, "Mail"),
            app("books", 0, "Books"),
            app("mail", 0, "Mail"),
        ]);
        reg.resort();
        assert_eq!(titles(&reg), vec!["Books@0", "Mail@0", "Mail@10", "Zoom@0"]);
    }
}
