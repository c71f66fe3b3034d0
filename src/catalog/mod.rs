//! App catalog: entries, user profiles, ordering policy, sorted registry.

pub mod entry;
pub mod file;
pub mod ordering;
pub mod registry;
pub mod users;
