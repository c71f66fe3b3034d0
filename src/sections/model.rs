//! Derived, per-rebuild list model: sections, display items, fast-scroll anchors.
//!
//! Cross references are plain indices into the arenas of one rebuild:
//! [`SectionId`] into `sections`, item indices into `items`, and entry indices
//! into the sorted registry. A rebuild replaces all three arenas at once, so no
//! handle outlives the data it points into.

#![allow(missing_docs)]

use serde::Serialize;

/// Index of a section in the current section list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SectionId(pub usize);

/// One run of apps sharing a section (possibly several merged names).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionInfo {
    /// Name of the first sub-section; absorbed sections keep their names on the slots only.
    pub name: String,
    /// App slots currently assigned to this section.
    pub num_apps: usize,
    /// Header item index, absent when headers are hidden or a filter is active.
    pub header_item: Option<usize>,
    /// First app slot item index.
    pub first_app_item: Option<usize>,
    /// `app_index` of the first slot over the unfiltered registry size.
    pub fraction: f32,
}

impl SectionInfo {
    pub(crate) fn started(name: String, fraction: f32) -> Self {
        Self {
            name,
            num_apps: 0,
            header_item: None,
            first_app_item: None,
            fraction,
        }
    }
}

/// Section break row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionHeader {
    pub position: usize,
    pub section: SectionId,
}

/// One app cell in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSlot {
    pub position: usize,
    pub section: SectionId,
    /// Section name computed for this app; differs from the section's own name after a merge.
    pub section_name: String,
    /// Index of this app within its (merged) section.
    pub section_app_index: usize,
    /// Index into the sorted registry.
    pub entry: usize,
    /// Index among retained apps, headers excluded.
    pub app_index: usize,
}

/// Flat, position-addressable list element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayItem {
    SectionHeader(SectionHeader),
    AppSlot(AppSlot),
}

impl DisplayItem {
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::SectionHeader(header) => header.position,
            Self::AppSlot(slot) => slot.position,
        }
    }

    #[must_use]
    pub const fn section(&self) -> SectionId {
        match self {
            Self::SectionHeader(header) => header.section,
            Self::AppSlot(slot) => slot.section,
        }
    }

    #[must_use]
    pub const fn is_section_header(&self) -> bool {
        matches!(self, Self::SectionHeader(_))
    }

    #[must_use]
    pub const fn as_app_slot(&self) -> Option<&AppSlot> {
        match self {
            Self::AppSlot(slot) => Some(slot),
            Self::SectionHeader(_) => None,
        }
    }

    pub(crate) fn shift_position_back(&mut self) {
        match self {
            Self::SectionHeader(header) => header.position -= 1,
            Self::AppSlot(slot) => slot.position -= 1,
        }
    }

    pub(crate) fn set_section(&mut self, section: SectionId) {
        match self {
            Self::SectionHeader(header) => header.section = section,
            Self::AppSlot(slot) => slot.section = section,
        }
    }
}

/// Fast-scroll anchor: touch fraction → item to jump to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FastScrollSection {
    pub section_name: String,
    pub fraction: f32,
    /// Item index of the section's first app slot.
    pub target_item: usize,
}
