//! Section names: the label an app is grouped under (usually its first letter).

use unicode_segmentation::UnicodeSegmentation;

/// Host capability mapping a title to its section name.
///
/// Must be deterministic for a given title within one rebuild.
pub trait SectionNamer {
    fn section_name(&self, title: &str) -> String;
}

/// First grapheme of the trimmed title, upper-cased.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLetterNamer;

impl SectionNamer for FirstLetterNamer {
    fn section_name(&self, title: &str) -> String {
        title
            .trim()
            .graphemes(true)
            .next()
            .map(str::to_uppercase)
            .unwrap_or_default()
    }
}

impl<F> SectionNamer for F
where
    F: Fn(&str) -> String,
{
    fn section_name(&self, title: &str) -> String {
        self(title)
    }
}
