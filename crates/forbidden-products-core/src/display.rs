//! Wants/Refuses annotation of host rich-text fields.
//!
//! The host may refresh a panel several times without resetting its label,
//! and the label may already carry annotations written by an earlier refresh.
//! [`merge_annotations`] strips every annotation line before appending the
//! fresh ones, so running it twice is the same as running it once.

use crate::category::{ForbiddenSet, ProductCategory};
use crate::host::AffinityEntry;
use crate::ranker::PreferenceRanker;

/// Colour of the Wants line.
pub const WANTS_COLOR: &str = "#A6E3A1";
/// Colour of the Refuses line.
pub const REFUSES_COLOR: &str = "#FF6B6B";

const WANTS_MARKER: &str = "<b>Wants:</b>";
const REFUSES_MARKER: &str = "<b>Refuses:</b>";

/// Kind of annotation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Wants,
    Refuses,
}

impl AnnotationKind {
    fn marker(self) -> &'static str {
        match self {
            AnnotationKind::Wants => WANTS_MARKER,
            AnnotationKind::Refuses => REFUSES_MARKER,
        }
    }

    fn color(self) -> &'static str {
        match self {
            AnnotationKind::Wants => WANTS_COLOR,
            AnnotationKind::Refuses => REFUSES_COLOR,
        }
    }
}

/// One rendered annotation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationLine {
    pub kind: AnnotationKind,
    pub text: String,
}

impl AnnotationLine {
    pub fn new(kind: AnnotationKind, names: &[&str]) -> Self {
        let text = format!(
            "<color={}>{} {}</color>",
            kind.color(),
            kind.marker(),
            names.join(", ")
        );
        Self { kind, text }
    }
}

/// Wants line (top preferences) and Refuses line (implemented forbidden
/// categories, sorted case-insensitively). Either may be absent.
pub fn annotation_lines(
    affinities: &[AffinityEntry],
    forbidden: &ForbiddenSet,
    ranker: &PreferenceRanker,
) -> Vec<AnnotationLine> {
    let mut lines = Vec::with_capacity(2);

    let wants = ranker.top_names(affinities, forbidden);
    if !wants.is_empty() {
        lines.push(AnnotationLine::new(AnnotationKind::Wants, &wants));
    }

    let mut refuses: Vec<&str> = forbidden
        .iter()
        .filter(ProductCategory::is_implemented)
        .map(|c| c.name())
        .collect();
    refuses.sort_by_key(|name| name.to_lowercase());
    if !refuses.is_empty() {
        lines.push(AnnotationLine::new(AnnotationKind::Refuses, &refuses));
    }

    lines
}

fn is_annotation(line: &str) -> bool {
    line.contains(WANTS_MARKER) || line.contains(REFUSES_MARKER)
}

/// Remove every annotation line, whoever wrote it, and trailing blank lines.
pub fn strip_annotations(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut kept: Vec<&str> = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !is_annotation(line))
        .collect();

    while kept.last().is_some_and(|line| line.trim().is_empty()) {
        kept.pop();
    }

    kept.join("\n")
}

/// Join a preamble and annotation lines, one blank line apart.
pub fn compose(base: &str, lines: &[AnnotationLine]) -> String {
    let block = lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    match (base.is_empty(), block.is_empty()) {
        (_, true) => base.to_string(),
        (true, false) => block,
        (false, false) => format!("{base}\n\n{block}"),
    }
}

/// [`strip_annotations`] then [`compose`].
pub fn merge_annotations(text: &str, lines: &[AnnotationLine]) -> String {
    compose(&strip_annotations(text), lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ProductCategory::*;

    fn lines() -> Vec<AnnotationLine> {
        vec![
            AnnotationLine::new(AnnotationKind::Wants, &["Marijuana", "Shrooms"]),
            AnnotationLine::new(AnnotationKind::Refuses, &["Cocaine"]),
        ]
    }

    #[test]
    fn test_line_rendering() {
        let line = AnnotationLine::new(AnnotationKind::Refuses, &["Cocaine", "Shrooms"]);
        assert_eq!(
            line.text,
            "<color=#FF6B6B><b>Refuses:</b> Cocaine, Shrooms</color>"
        );
    }

    #[test]
    fn test_merge_preserves_preamble_with_one_blank_line() {
        let merged = merge_annotations("Energizing\nCalming\n\n", &lines());
        assert_eq!(
            merged,
            "Energizing\nCalming\n\n\
             <color=#A6E3A1><b>Wants:</b> Marijuana, Shrooms</color>\n\
             <color=#FF6B6B><b>Refuses:</b> Cocaine</color>"
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge_annotations("Energizing", &lines());
        let twice = merge_annotations(&once, &lines());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_into_empty_field() {
        let merged = merge_annotations("", &lines());
        assert!(merged.starts_with("<color=#A6E3A1>"));
        assert!(!merged.starts_with('\n'));
    }

    #[test]
    fn test_strip_handles_foreign_markers_and_crlf() {
        let text = "Sedating\r\n<b>Wants:</b> Cocaine\r\n<i>x</i> <b>Refuses:</b> y\r\n\r\n";
        assert_eq!(strip_annotations(text), "Sedating");
    }

    #[test]
    fn test_merge_with_no_lines_removes_stale_annotations() {
        let stale = merge_annotations("Calming", &lines());
        assert_eq!(merge_annotations(&stale, &[]), "Calming");
    }

    #[test]
    fn test_annotation_lines() {
        let affinities = [
            AffinityEntry::new(Cocaine, 0.9),
            AffinityEntry::new(Marijuana, 0.7),
            AffinityEntry::new(Shrooms, 0.2),
        ];
        let forbidden: ForbiddenSet = [Shrooms, Cocaine, Heroin].into_iter().collect();
        let lines = annotation_lines(&affinities, &forbidden, &PreferenceRanker::default());

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].text,
            "<color=#A6E3A1><b>Wants:</b> Marijuana</color>"
        );
        assert_eq!(
            lines[1].text,
            "<color=#FF6B6B><b>Refuses:</b> Cocaine, Shrooms</color>"
        );
    }

    #[test]
    fn test_annotation_lines_empty_when_nothing_to_show() {
        let lines = annotation_lines(&[], &ForbiddenSet::empty(), &PreferenceRanker::default());
        assert!(lines.is_empty());
    }

    proptest! {
        #[test]
        fn prop_merge_idempotent(base in "[a-zA-Z <>/:\n\r]{0,60}") {
            let once = merge_annotations(&base, &lines());
            let twice = merge_annotations(&once, &lines());
            prop_assert_eq!(once, twice);
        }
    }
}
