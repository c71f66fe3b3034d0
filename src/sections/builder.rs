//! Section building pass: sorted apps → sections + flat display items.

#![allow(clippy::cast_precision_loss)]

use crate::catalog::entry::AppEntry;
use crate::sections::filter::AppFilter;
use crate::sections::model::{AppSlot, DisplayItem, SectionHeader, SectionId, SectionInfo};
use crate::sections::naming::SectionNamer;

/// Output of one section-building pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionLayout {
    pub sections: Vec<SectionInfo>,
    pub items: Vec<DisplayItem>,
    /// Registry indices of retained apps, in display order.
    pub filtered: Vec<usize>,
}

/// Walks sorted apps once, grouping consecutive apps with equal section names.
pub struct SectionBuilder<'a> {
    namer: &'a dyn SectionNamer,
    filter: Option<&'a dyn AppFilter>,
    headers_enabled: bool,
}

impl<'a> SectionBuilder<'a> {
    #[must_use]
    pub fn new(namer: &'a dyn SectionNamer) -> Self {
        Self {
            namer,
            filter: None,
            headers_enabled: true,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Option<&'a dyn AppFilter>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_headers(mut self, enabled: bool) -> Self {
        self.headers_enabled = enabled;
        self
    }

    /// Build sections over `apps`, which must already be sorted.
    #[must_use]
    pub fn build(&self, apps: &[AppEntry]) -> SectionLayout {
        let mut layout = SectionLayout::default();
        let emit_headers = self.headers_enabled && self.filter.is_none();
        // Denominator is the unfiltered registry size.
        let total = apps.len();
        let mut app_index = 0usize;
        let mut last_section_name: Option<String> = None;

        for (entry_index, entry) in apps.iter().enumerate() {
            let section_name = self.namer.section_name(&entry.title);

            if let Some(filter) = self.filter
                && !filter.retain(entry, &section_name)
            {
                continue;
            }

            if last_section_name.as_deref() != Some(section_name.as_str()) {
                let fraction = app_index as f32 / total as f32;
                let mut section = SectionInfo::started(section_name.clone(), fraction);
                let section_id = SectionId(layout.sections.len());
                if emit_headers {
                    let position = layout.items.len();
                    section.header_item = Some(position);
                    layout
                        .items
                        .push(DisplayItem::SectionHeader(SectionHeader {
                            position,
                            section: section_id,
                        }));
                }
                layout.sections.push(section);
                last_section_name = Some(section_name.clone());
            }

            let section_id = SectionId(layout.sections.len() - 1);
            let position = layout.items.len();
            let Some(section) = layout.sections.last_mut() else {
                continue;
            };
            let section_app_index = section.num_apps;
            section.num_apps += 1;
            if section.first_app_item.is_none() {
                section.first_app_item = Some(position);
            }

            layout.items.push(DisplayItem::AppSlot(AppSlot {
                position,
                section: section_id,
                section_name,
                section_app_index,
                entry: entry_index,
                app_index,
            }));
            layout.filtered.push(entry_index);
            app_index += 1;
        }

        layout
    }
}
