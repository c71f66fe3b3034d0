//! Fast-scroll index: one anchor per final section.

#![allow(missing_docs)]

use crate::sections::model::{FastScrollSection, SectionInfo};

/// Anchors built from post-merge sections, ordered by fraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FastScrollIndex {
    sections: Vec<FastScrollSection>,
}

impl FastScrollIndex {
    /// One anchor per section in `sections`.
    ///
    /// Sections absorbed by a merge are no longer in `sections` and get no anchor.
    /// Anchors are still produced while a filter is active: each keeps its
    /// section's fraction, which is measured against the unfiltered app count,
    /// so the last anchor may sit well below 1.0. Only a filter that hides every
    /// app yields an empty index. Hosts that want no fast scroller while
    /// filtering should check `AppsList::has_filter` themselves.
    #[must_use]
    pub fn build(sections: &[SectionInfo]) -> Self {
        let sections = sections
            .iter()
            .filter_map(|section| {
                section.first_app_item.map(|target_item| FastScrollSection {
                    section_name: section.name.clone(),
                    fraction: section.fraction,
                    target_item,
                })
            })
            .collect();
        Self { sections }
    }

    #[must_use]
    pub fn sections(&self) -> &[FastScrollSection] {
        &self.sections
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Anchor for a touch at `touch_fraction` (0 = top, 1 = bottom of the scrollbar).
    ///
    /// Picks the last anchor starting at or before the touch; touches above the
    /// first anchor resolve to the first one.
    #[must_use]
    pub fn target_for(&self, touch_fraction: f32) -> Option<&FastScrollSection> {
        let touch = if touch_fraction.is_nan() {
            0.0
        } else {
            touch_fraction.clamp(0.0, 1.0)
        };
        let after = self
            .sections
            .partition_point(|section| section.fraction <= touch);
        self.sections.get(after.saturating_sub(1))
    }
}
