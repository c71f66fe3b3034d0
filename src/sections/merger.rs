//! Row-aware section merging for fixed-column grids.
//!
//! A section whose last grid row holds only a few apps looks unfinished. When
//! that happens the following section is pulled up into it (its header row
//! disappears) until the trailing row is full enough, the section is tall
//! enough, or the per-section merge budget runs out.

use crate::core::config::validate_columns;
use crate::core::errors::Result;
use crate::sections::builder::SectionLayout;
use crate::sections::model::{DisplayItem, SectionId};

/// Stop merging once a section spans this many full rows.
pub const MAX_ROWS_IN_MERGED_SECTION: usize = 3;

/// Greedy left-to-right merger for one column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMerger {
    columns: usize,
    min_apps_per_row: usize,
    max_merges_per_section: usize,
}

impl SectionMerger {
    pub fn new(columns: usize) -> Result<Self> {
        validate_columns(columns)?;
        let half = columns.div_ceil(2);
        Ok(Self {
            columns,
            min_apps_per_row: half,
            max_merges_per_section: half,
        })
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn min_apps_per_row(&self) -> usize {
        self.min_apps_per_row
    }

    #[must_use]
    pub const fn max_merges_per_section(&self) -> usize {
        self.max_merges_per_section
    }

    /// Whether a section of `num_apps` ends in an under-filled row and is still short.
    #[must_use]
    pub const fn wants_merge(&self, num_apps: usize) -> bool {
        let trailing = num_apps % self.columns;
        0 < trailing
            && trailing < self.min_apps_per_row
            && num_apps / self.columns < MAX_ROWS_IN_MERGED_SECTION
    }

    /// Merge in place. Returns the number of sections absorbed.
    pub fn merge(&self, layout: &mut SectionLayout) -> usize {
        let mut absorbed = 0;
        let mut index = 0;
        while index < layout.sections.len() {
            let mut merges = 0;
            while merges < self.max_merges_per_section
                && index + 1 < layout.sections.len()
                && self.wants_merge(layout.sections[index].num_apps)
            {
                absorb_next(layout, index);
                merges += 1;
                absorbed += 1;
            }
            index += 1;
        }
        absorbed
    }
}

/// Fold section `index + 1` into section `index`.
fn absorb_next(layout: &mut SectionLayout, index: usize) {
    let next = layout.sections.remove(index + 1);
    let prior_apps = layout.sections[index].num_apps;
    let Some(next_first) = next.first_app_item else {
        debug_assert!(false, "section {} has no app slots", index + 1);
        return;
    };

    let header_removed = next.header_item.inspect(|&header| {
        layout.items.remove(header);
    });
    let scan_from = header_removed.unwrap_or(next_first);
    let absorbed_id = SectionId(index + 1);

    for item in &mut layout.items[scan_from..] {
        if header_removed.is_some() {
            item.shift_position_back();
        }
        let section = item.section();
        if section == absorbed_id {
            item.set_section(SectionId(index));
            if let DisplayItem::AppSlot(slot) = item {
                slot.section_app_index += prior_apps;
            }
        } else if section > absorbed_id {
            item.set_section(SectionId(section.0 - 1));
        }
    }

    if header_removed.is_some() {
        for later in &mut layout.sections[index + 1..] {
            later.header_item = later.header_item.map(|item| item - 1);
            later.first_app_item = later.first_app_item.map(|item| item - 1);
        }
    }

    layout.sections[index].num_apps += next.num_apps;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::entry::{AppEntry, ComponentName, UserHandle};
    use crate::sections::builder::SectionBuilder;

    /// Apps named `<letter><n>` so each letter forms one section of the given size.
    fn layout_with_sizes(sizes: &[usize], headers: bool) -> SectionLayout {
        let mut apps = Vec::new();
        for (letter_index, &size) in sizes.iter().enumerate() {
            let letter = char::from(b'A' + u8::try_from(letter_index).unwrap());
            for n in 0..size {
                let title = format!("{letter}{n:02}");
                apps.push(AppEntry::new(
                    ComponentName::new(title.to_lowercase(), "Main"),
                    UserHandle(0),
                    title,
                ));
            }
        }
        let namer = |title: &str| title[..1].to_string();
        SectionBuilder::new(&namer).with_headers(headers).build(&apps)
    }

    fn assert_consistent(layout: &SectionLayout) {
        for (index, item) in layout.items.iter().enumerate() {
            assert_eq!(item.position(), index, "position drift at {index}");
        }
        for (id, section) in layout.sections.iter().enumerate() {
            let slots: Vec<&DisplayItem> = layout
                .items
                .iter()
                .filter(|item| !item.is_section_header() && item.section() == SectionId(id))
                .collect();
            assert_eq!(slots.len(), section.num_apps, "count drift in section {id}");
            let local: Vec<usize> = slots
                .iter()
                .filter_map(|item| item.as_app_slot())
                .map(|slot| slot.section_app_index)
                .collect();
            assert_eq!(local, (0..section.num_apps).collect::<Vec<_>>());
            let first = section.first_app_item.expect("first item");
            assert_eq!(layout.items[first].section(), SectionId(id));
            if let Some(header) = section.header_item {
                assert!(layout.items[header].is_section_header());
                assert_eq!(layout.items[header].section(), SectionId(id));
                assert_eq!(header + 1, first);
            }
        }
    }

    #[test]
    fn thresholds_follow_column_count() {
        let merger = SectionMerger::new(5).unwrap();
        assert_eq!(merger.min_apps_per_row(), 3);
        assert_eq!(merger.max_merges_per_section(), 3);
        let merger = SectionMerger::new(4).unwrap();
        assert_eq!(merger.min_apps_per_row(), 2);
        assert_eq!(merger.max_merges_per_section(), 2);
    }

    #[test]
    fn zero_columns_rejected() {
        let err = SectionMerger::new(0).unwrap_err();
        assert_eq!(err.code(), "ADR-1001");
    }

    #[test]
    fn six_apps_merge_with_follower_at_five_columns() {
        let mut layout = layout_with_sizes(&[6, 5], true);
        let absorbed = SectionMerger::new(5).unwrap().merge(&mut layout);

        assert_eq!(absorbed, 1);
        assert_eq!(layout.sections.len(), 1);
        assert_eq!(layout.sections[0].num_apps, 11);
        assert_eq!(layout.items.len(), 12, "one header left, eleven slots");
        assert_consistent(&layout);
        // Slots keep the section name they were built with.
        let names: Vec<&str> = layout
            .items
            .iter()
            .filter_map(DisplayItem::as_app_slot)
            .map(|slot| slot.section_name.as_str())
            .collect();
        assert_eq!(names[5], "A");
        assert_eq!(names[6], "B");
    }

    #[test]
    fn full_rows_never_merge() {
        let mut layout = layout_with_sizes(&[5, 1, 10, 2], true);
        let merger = SectionMerger::new(5).unwrap();
        assert!(!merger.wants_merge(5));
        assert!(!merger.wants_merge(10));
        // B (1) absorbs C (10) -> 11, still one trailing app, so it absorbs D (2) -> 13.
        let absorbed = merger.merge(&mut layout);
        assert_eq!(absorbed, 2);
        let sizes: Vec<usize> = layout.sections.iter().map(|s| s.num_apps).collect();
        assert_eq!(sizes, vec![5, 13]);
        assert_consistent(&layout);
    }

    #[test]
    fn row_cap_stops_merging() {
        let merger = SectionMerger::new(5).unwrap();
        // 16 apps: trailing row of 1 but already three full rows.
        assert!(!merger.wants_merge(16));
        assert!(merger.wants_merge(11));
        let mut layout = layout_with_sizes(&[16, 1], true);
        assert_eq!(merger.merge(&mut layout), 0);
    }

    #[test]
    fn merge_budget_limits_chain() {
        // Eight single-app sections at 5 columns: each merge leaves 2..=4 apps,
        // 2 still wants more, 3 stops.
        let mut layout = layout_with_sizes(&[1, 1, 1, 1, 1, 1, 1, 1], true);
        let merger = SectionMerger::new(5).unwrap();
        let absorbed = merger.merge(&mut layout);
        let sizes: Vec<usize> = layout.sections.iter().map(|s| s.num_apps).collect();
        assert_eq!(sizes, vec![3, 3, 2]);
        assert_eq!(absorbed, 5);
        assert_consistent(&layout);
    }

    #[test]
    fn filling_the_row_stops_before_budget() {
        let merger = SectionMerger::new(3).unwrap();
        let mut layout = layout_with_sizes(&[1, 1, 1, 1], true);
        merger.merge(&mut layout);
        let sizes: Vec<usize> = layout.sections.iter().map(|s| s.num_apps).collect();
        assert_eq!(sizes, vec![2, 2]);
        assert_consistent(&layout);
    }

    #[test]
    fn merge_budget_caps_merges_per_section() {
        // 9 columns: min 5 per row, budget 5. Full-row followers keep the
        // trailing row short, so only the budget stops the chain at 22 apps.
        let merger = SectionMerger::new(9).unwrap();
        let mut layout = layout_with_sizes(&[1, 1, 1, 1, 9, 9, 1], true);
        let absorbed = merger.merge(&mut layout);
        assert!(merger.wants_merge(22));
        assert_eq!(absorbed, 5);
        let sizes: Vec<usize> = layout.sections.iter().map(|s| s.num_apps).collect();
        assert_eq!(sizes, vec![22, 1]);
        assert_consistent(&layout);
    }

    #[test]
    fn merging_without_headers_keeps_positions() {
        let mut layout = layout_with_sizes(&[6, 2, 3], false);
        let positions_before: Vec<usize> = layout.items.iter().map(DisplayItem::position).collect();
        let absorbed = SectionMerger::new(5).unwrap().merge(&mut layout);
        assert_eq!(absorbed, 1);
        let positions_after: Vec<usize> = layout.items.iter().map(DisplayItem::position).collect();
        assert_eq!(positions_before, positions_after);
        assert_eq!(layout.sections.len(), 2);
        assert_eq!(layout.sections[0].num_apps, 8);
        assert_eq!(layout.sections[1].first_app_item, Some(8));
        assert_consistent(&layout);
    }

    #[test]
    fn single_column_grids_never_merge() {
        let mut layout = layout_with_sizes(&[1, 1, 1], true);
        assert_eq!(SectionMerger::new(1).unwrap().merge(&mut layout), 0);
        let mut layout = layout_with_sizes(&[1, 1, 1], true);
        assert_eq!(SectionMerger::new(2).unwrap().merge(&mut layout), 0);
    }
}
