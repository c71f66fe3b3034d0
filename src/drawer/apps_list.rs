//! [`AppsList`]: the engine facade.
//!
//! Every mutating call runs the same synchronous pipeline on the caller's
//! thread:
//!
//! ```text
//! registry mutation -> resort -> section build -> merge -> fast-scroll index -> notify
//! ```
//!
//! Derived state is never patched; each pass replaces the section and item
//! arenas wholesale, so index handles from an older pass must not be reused.

#![allow(missing_docs)]

use std::fmt;
use std::time::{Duration, Instant};

use crate::catalog::entry::AppEntry;
use crate::catalog::ordering::{CaseInsensitiveCollator, OrderingPolicy};
use crate::catalog::registry::SortedRegistry;
use crate::catalog::users::StaticUserDirectory;
use crate::core::config::{Config, LayoutConfig};
use crate::core::errors::Result;
use crate::drawer::observer::DatasetObserver;
use crate::logger::jsonl::{EventType, JsonlWriter, LogEntry, RebuildTrigger, Severity};
use crate::sections::builder::{SectionBuilder, SectionLayout};
use crate::sections::fast_scroll::FastScrollIndex;
use crate::sections::filter::AppFilter;
use crate::sections::merger::SectionMerger;
use crate::sections::model::{AppSlot, DisplayItem, FastScrollSection, SectionInfo};
use crate::sections::naming::{FirstLetterNamer, SectionNamer};

/// Sorted, sectioned, filterable list of launcher apps.
pub struct AppsList {
    registry: SortedRegistry,
    namer: Box<dyn SectionNamer>,
    filter: Option<Box<dyn AppFilter>>,
    layout_config: LayoutConfig,
    merger: SectionMerger,
    observer: Option<Box<dyn DatasetObserver>>,
    activity: Option<JsonlWriter>,
    layout: SectionLayout,
    fast_scroll: FastScrollIndex,
    merged: usize,
}

impl AppsList {
    /// Empty list with the default collaborators: first-letter sections,
    /// case-insensitive titles, and user 0 as the only known profile.
    pub fn new(layout_config: LayoutConfig) -> Result<Self> {
        layout_config.validate()?;
        let merger = SectionMerger::new(layout_config.columns)?;
        let policy = OrderingPolicy::new(
            Box::new(CaseInsensitiveCollator),
            Box::new(StaticUserDirectory::default()),
        );
        Ok(Self {
            registry: SortedRegistry::new(policy),
            namer: Box::new(FirstLetterNamer),
            filter: None,
            layout_config,
            merger,
            observer: None,
            activity: None,
            layout: SectionLayout::default(),
            fast_scroll: FastScrollIndex::default(),
            merged: 0,
        })
    }

    /// Build from a loaded configuration, opening the activity log when enabled.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut list = Self::new(config.layout.clone())?;
        if config.logging.enabled {
            let mut writer = JsonlWriter::open(config.logging.jsonl());
            let mut entry = LogEntry::new(EventType::ConfigLoaded, Severity::Info);
            entry.config_hash = Some(config.stable_hash()?);
            entry.columns = Some(config.layout.columns);
            writer.write_entry(&entry);
            list.activity = Some(writer);
        }
        Ok(list)
    }

    #[must_use]
    pub fn with_namer(mut self, namer: impl SectionNamer + 'static) -> Self {
        self.namer = Box::new(namer);
        self.refresh();
        self
    }

    /// Swap the ordering policy; already registered apps are re-sorted under it.
    #[must_use]
    pub fn with_ordering(mut self, policy: OrderingPolicy) -> Self {
        let apps = self.registry.apps().to_vec();
        self.registry = SortedRegistry::new(policy);
        self.registry.replace_all(apps);
        self.refresh();
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: impl DatasetObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    #[must_use]
    pub fn with_activity_log(mut self, writer: JsonlWriter) -> Self {
        self.activity = Some(writer);
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn DatasetObserver>>) {
        self.observer = observer;
    }

    // ──────────────────── mutations ────────────────────

    /// Replace the whole app set.
    pub fn set_apps(&mut self, apps: impl IntoIterator<Item = AppEntry>) {
        self.registry.replace_all(apps);
        self.rebuild(RebuildTrigger::SetApps);
    }

    /// Insert apps at their sorted positions. Exact duplicates are ignored.
    pub fn add_apps(&mut self, apps: impl IntoIterator<Item = AppEntry>) {
        for app in apps {
            self.registry.insert(app);
        }
        self.rebuild(RebuildTrigger::AddApps);
    }

    /// Replace apps by identity; unknown apps are inserted.
    pub fn update_apps(&mut self, apps: impl IntoIterator<Item = AppEntry>) {
        for app in apps {
            self.registry.upsert(app);
        }
        self.rebuild(RebuildTrigger::UpdateApps);
    }

    /// Remove apps by identity; unknown apps are ignored.
    pub fn remove_apps<'a>(&mut self, apps: impl IntoIterator<Item = &'a AppEntry>) {
        for app in apps {
            self.registry.remove(app);
        }
        self.rebuild(RebuildTrigger::RemoveApps);
    }

    /// Install or clear the visibility filter.
    ///
    /// While a filter is set, headers are hidden and sections are not merged.
    pub fn set_filter(&mut self, filter: Option<Box<dyn AppFilter>>) {
        self.filter = filter;
        self.rebuild(RebuildTrigger::SetFilter);
    }

    /// Change the grid width. On error nothing changes and no one is notified.
    pub fn set_columns(&mut self, columns: usize) -> Result<()> {
        let merger = match SectionMerger::new(columns) {
            Ok(merger) => merger,
            Err(error) => {
                if let Some(writer) = self.activity.as_mut() {
                    let mut entry = LogEntry::rejected(EventType::ConfigRejected, &error);
                    entry.columns = Some(columns);
                    writer.write_entry(&entry);
                }
                return Err(error);
            }
        };
        self.merger = merger;
        self.layout_config.columns = columns;
        self.rebuild(RebuildTrigger::SetColumns);
        Ok(())
    }

    // ──────────────────── accessors ────────────────────

    /// Post-merge sections.
    #[must_use]
    pub fn sections(&self) -> &[SectionInfo] {
        &self.layout.sections
    }

    #[must_use]
    pub fn fast_scroll_sections(&self) -> &[FastScrollSection] {
        self.fast_scroll.sections()
    }

    #[must_use]
    pub fn fast_scroll_index(&self) -> &FastScrollIndex {
        &self.fast_scroll
    }

    /// Flat header/slot sequence; `display_items()[i].position() == i`.
    #[must_use]
    pub fn display_items(&self) -> &[DisplayItem] {
        &self.layout.items
    }

    /// Apps that passed the filter.
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.layout.filtered.len()
    }

    /// Alias of [`AppsList::filtered_count`].
    #[must_use]
    pub fn size(&self) -> usize {
        self.filtered_count()
    }

    #[must_use]
    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// A filter is set and nothing matched it.
    #[must_use]
    pub fn has_empty_filtered_result(&self) -> bool {
        self.has_filter() && self.layout.filtered.is_empty()
    }

    /// Entry behind an app slot of the current pass.
    #[must_use]
    pub fn entry(&self, slot: &AppSlot) -> Option<&AppEntry> {
        self.registry.get(slot.entry)
    }

    /// Every registered app in sort order, filtered or not.
    #[must_use]
    pub fn apps(&self) -> &[AppEntry] {
        self.registry.apps()
    }

    /// Apps that passed the filter, in display order.
    pub fn filtered_apps(&self) -> impl Iterator<Item = &AppEntry> + '_ {
        self.layout
            .filtered
            .iter()
            .filter_map(|&index| self.registry.get(index))
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.layout_config.columns
    }

    #[must_use]
    pub const fn layout_config(&self) -> &LayoutConfig {
        &self.layout_config
    }

    /// Sections absorbed by the merge pass of the last rebuild.
    #[must_use]
    pub const fn merged_sections(&self) -> usize {
        self.merged
    }

    // ──────────────────── pipeline ────────────────────

    fn rebuild(&mut self, trigger: RebuildTrigger) {
        let started = Instant::now();
        self.refresh();
        self.debug_check_invariants();
        self.log_rebuild(trigger, started.elapsed());
        if let Some(observer) = self.observer.as_mut() {
            observer.on_dataset_changed();
        }
    }

    /// Recompute every derived structure from the registry.
    fn refresh(&mut self) {
        self.registry.resort();
        let filter = self.filter.as_deref();
        let mut layout = SectionBuilder::new(&*self.namer)
            .with_filter(filter)
            .with_headers(self.layout_config.section_headers)
            .build(self.registry.apps());
        self.merged = if self.layout_config.merge_sections && filter.is_none() {
            self.merger.merge(&mut layout)
        } else {
            0
        };
        self.fast_scroll = FastScrollIndex::build(&layout.sections);
        self.layout = layout;
    }

    fn log_rebuild(&mut self, trigger: RebuildTrigger, elapsed: Duration) {
        let Some(writer) = self.activity.as_mut() else {
            return;
        };
        let mut entry = LogEntry::new(EventType::ListRebuilt, Severity::Info);
        entry.trigger = Some(trigger);
        entry.apps = Some(self.registry.len());
        entry.filtered = Some(self.layout.filtered.len());
        entry.sections = Some(self.layout.sections.len());
        entry.items = Some(self.layout.items.len());
        entry.merged = Some(self.merged);
        entry.columns = Some(self.layout_config.columns);
        entry.filter_active = Some(self.filter.is_some());
        entry.duration_us = Some(u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX));
        writer.write_entry(&entry);
    }

    fn debug_check_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        // Sort order is only checkable for a consistent collator; structure always is.
        let mut slots_per_section = vec![0usize; self.layout.sections.len()];
        for (index, item) in self.layout.items.iter().enumerate() {
            debug_assert_eq!(item.position(), index, "display positions not contiguous");
            match item {
                DisplayItem::AppSlot(slot) => {
                    if let Some(count) = slots_per_section.get_mut(slot.section.0) {
                        *count += 1;
                    }
                }
                DisplayItem::SectionHeader(_) => debug_assert!(
                    self.layout_config.section_headers && self.filter.is_none(),
                    "header emitted while headers are suppressed"
                ),
            }
        }
        for (section, count) in self.layout.sections.iter().zip(&slots_per_section) {
            debug_assert_eq!(section.num_apps, *count, "section {:?} count drift", section.name);
        }
    }
}

impl fmt::Debug for AppsList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppsList")
            .field("apps", &self.registry.len())
            .field("filtered", &self.layout.filtered.len())
            .field("sections", &self.layout.sections.len())
            .field("layout", &self.layout_config)
            .field("has_filter", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}
