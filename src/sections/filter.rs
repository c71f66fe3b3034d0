//! Visibility filters applied while building sections.

#![allow(missing_docs)]

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::catalog::entry::AppEntry;
use crate::core::errors::{DrawerError, Result};

/// Decides which apps stay visible. Must answer consistently within one rebuild.
pub trait AppFilter {
    fn retain(&self, entry: &AppEntry, section_name: &str) -> bool;
}

impl<F> AppFilter for F
where
    F: Fn(&AppEntry, &str) -> bool,
{
    fn retain(&self, entry: &AppEntry, section_name: &str) -> bool {
        self(entry, section_name)
    }
}

/// Case-insensitive literal title search, as typed into a launcher search box.
#[derive(Debug, Clone)]
pub struct TitleQueryFilter {
    query: String,
    pattern: Regex,
}

impl TitleQueryFilter {
    pub fn new(query: &str) -> Result<Self> {
        let trimmed = query.trim();
        let pattern = RegexBuilder::new(&regex::escape(trimmed))
            .case_insensitive(true)
            .build()
            .map_err(|error| DrawerError::invalid(format!("filter query {query:?}: {error}")))?;
        Ok(Self {
            query: trimmed.to_string(),
            pattern,
        })
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl AppFilter for TitleQueryFilter {
    fn retain(&self, entry: &AppEntry, _section_name: &str) -> bool {
        self.pattern.is_match(&entry.title)
    }
}

/// Keep only the given section names (e.g. a letter picked from the fast scroller).
#[derive(Debug, Clone, Default)]
pub struct SectionFilter {
    names: HashSet<String>,
}

impl SectionFilter {
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl AppFilter for SectionFilter {
    fn retain(&self, _entry: &AppEntry, section_name: &str) -> bool {
        self.names.contains(section_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::entry::{ComponentName, UserHandle};

    fn app(title: &str) -> AppEntry {
        AppEntry::new(ComponentName::new("pkg", "pkg.Main"), UserHandle(0), title)
    }

    #[test]
    fn title_query_matches_case_insensitively() {
        let filter = TitleQueryFilter::new("  MAIL ").unwrap();
        assert_eq!(filter.query(), "MAIL");
        assert!(filter.retain(&app("Gmail"), "G"));
        assert!(filter.retain(&app("Mailbox"), "M"));
        assert!(!filter.retain(&app("Maps"), "M"));
    }

    #[test]
    fn title_query_treats_metacharacters_literally() {
        let filter = TitleQueryFilter::new("c++").unwrap();
        assert!(filter.retain(&app("C++ Reference"), "C"));
        assert!(!filter.retain(&app("Calculator"), "C"));
    }

    #[test]
    fn section_filter_uses_computed_name() {
        let filter = SectionFilter::new(["A", "B"]);
        assert!(filter.retain(&app("whatever"), "A"));
        assert!(!filter.retain(&app("Apple"), "C"));
    }

    #[test]
    fn closures_act_as_filters() {
        let filter = |entry: &AppEntry, _: &str| entry.title.len() > 3;
        assert!(filter.retain(&app("Camera"), "C"));
        assert!(!filter.retain(&app("Gym"), "G"));
    }
}
