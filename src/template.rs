//! Plain-text argument format.
//!
//! A document is a list of sections joined by `---\n\n`. Each section starts
//! with the upper-case box title on its own line, followed by the content and
//! a trailing blank line:
//!
//! ```text
//! CLAIM
//! Harry is a British subject.
//!
//! ---
//!
//! WARRANT
//! ...
//! ```
//!
//! Content is written verbatim, so a box whose text holds a `---` line
//! followed by a blank line will split into an extra section on import.

use crate::diagram::Diagram;
use crate::error::ImportError;
use crate::ir::BoxKey;
use once_cell::sync::Lazy;
use regex::Regex;

pub const SECTION_DELIMITER: &str = "---\n\n";
pub const EMPTY_PLACEHOLDER: &str = "No content provided.";

static DELIMITER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^---[ \t]*\n[ \t]*\n").unwrap());

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub entries: Vec<(BoxKey, String)>,
    pub ignored: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub applied: Vec<BoxKey>,
    pub ignored: Vec<String>,
}

pub fn template_placeholder(key: BoxKey) -> String {
    format!("Enter your {} here...", key.title().to_lowercase())
}

/// All six boxes in schema order; empty boxes get the "no content" marker.
pub fn export_text(diagram: &Diagram) -> String {
    render_document(|key| {
        let content = diagram.content(key);
        if content.is_empty() {
            EMPTY_PLACEHOLDER.to_string()
        } else {
            content.to_string()
        }
    })
}

/// Blank document with instructional placeholders, showing the import format.
pub fn export_template() -> String {
    render_document(template_placeholder)
}

fn render_document(mut body: impl FnMut(BoxKey) -> String) -> String {
    BoxKey::ALL
        .into_iter()
        .map(|key| format!("{}\n{}\n\n", key.title().to_uppercase(), body(key)))
        .collect::<Vec<_>>()
        .join(SECTION_DELIMITER)
}

pub fn parse_document(input: &str) -> ParsedDocument {
    let normalized = input.replace("\r\n", "\n");
    let mut parsed = ParsedDocument::default();

    for section in DELIMITER_RE.split(&normalized) {
        let section = section.trim_start_matches(['\n', ' ', '\t']);
        if section.trim().is_empty() {
            continue;
        }
        let (title, body) = section.split_once('\n').unwrap_or((section, ""));
        match BoxKey::from_section_title(title) {
            Some(key) => parsed.entries.push((key, normalize_content(key, body))),
            None => {
                tracing::debug!(title = title.trim(), "ignoring unrecognized section");
                parsed.ignored.push(title.trim().to_string());
            }
        }
    }

    parsed
}

/// Best-effort import: recognized sections replace their box content,
/// unrecognized ones are skipped. Fails, leaving the diagram untouched, only
/// when nothing was recognized.
pub fn import_text(diagram: &mut Diagram, input: &str) -> Result<ImportReport, ImportError> {
    let parsed = parse_document(input);
    if parsed.entries.is_empty() {
        return Err(ImportError::NoRecognizedSections);
    }
    let applied = parsed.entries.iter().map(|(key, _)| *key).collect();
    diagram.set_contents(parsed.entries);
    Ok(ImportReport {
        applied,
        ignored: parsed.ignored,
    })
}

fn normalize_content(key: BoxKey, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed == EMPTY_PLACEHOLDER || trimmed == template_placeholder(key) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn diagram() -> Diagram {
        let mut config = Config::default();
        config.layout.fast_text_metrics = true;
        Diagram::new(config)
    }

    #[test]
    fn export_uses_schema_order_and_placeholder() {
        let mut diagram = diagram();
        diagram.set_content(BoxKey::Claim, "Harry is a British subject.");
        let text = export_text(&diagram);
        assert!(text.starts_with(
            "CLAIM\nHarry is a British subject.\n\n---\n\nWARRANT\nNo content provided.\n\n"
        ));
        let titles: Vec<&str> = text
            .split(SECTION_DELIMITER)
            .map(|section| section.lines().next().unwrap())
            .collect();
        assert_eq!(
            titles,
            vec!["CLAIM", "WARRANT", "REBUTTAL", "BACKING", "REBUTTAL BACKING", "DATA"]
        );
        assert!(text.ends_with("DATA\nNo content provided.\n\n"));
    }

    #[test]
    fn template_lists_instructions() {
        let template = export_template();
        assert!(template.contains("REBUTTAL BACKING\nEnter your rebuttal backing here...\n\n"));
        assert!(template.starts_with("CLAIM\nEnter your claim here..."));
        assert_eq!(template.matches(SECTION_DELIMITER).count(), 5);
    }

    #[test]
    fn round_trip_preserves_contents() {
        let mut original = diagram();
        original.set_contents([
            (BoxKey::Claim, "Harry is a British subject."),
            (
                BoxKey::Warrant,
                "A man born in Bermuda will generally be a British subject.\n\nSee the statutes.",
            ),
            (BoxKey::Data, "Harry was born in Bermuda."),
        ]);
        let exported = export_text(&original);

        let mut restored = diagram();
        let report = import_text(&mut restored, &exported).unwrap();
        assert_eq!(report.applied, BoxKey::ALL.to_vec());
        assert!(report.ignored.is_empty());
        assert_eq!(restored.contents(), original.contents());
        assert_eq!(restored.layout(), original.layout());
    }

    #[test]
    fn placeholder_maps_back_to_empty() {
        let mut diagram = diagram();
        import_text(&mut diagram, &export_template()).unwrap();
        for key in BoxKey::ALL {
            assert_eq!(diagram.content(key), "");
        }
    }

    #[test]
    fn unknown_sections_are_ignored() {
        let mut diagram = diagram();
        diagram.set_content(BoxKey::Data, "kept");
        let input = "CLAIM\nNew claim\n\n---\n\nFOOBAR\nwhatever\n\n";
        let report = import_text(&mut diagram, input).unwrap();
        assert_eq!(report.applied, vec![BoxKey::Claim]);
        assert_eq!(report.ignored, vec!["FOOBAR".to_string()]);
        assert_eq!(diagram.content(BoxKey::Claim), "New claim");
        assert_eq!(diagram.content(BoxKey::Data), "kept");
    }

    #[test]
    fn titles_match_case_insensitively_and_content_is_trimmed() {
        let parsed = parse_document("  rebuttal backing  \n\n   spaced out   \n\n\n");
        assert_eq!(parsed.entries, vec![(BoxKey::RebuttalBacking, "spaced out".to_string())]);
    }

    #[test]
    fn crlf_documents_are_accepted() {
        let parsed = parse_document("CLAIM\r\nfirst\r\n\r\n---\r\n\r\nDATA\r\nsecond\r\n\r\n");
        assert_eq!(
            parsed.entries,
            vec![
                (BoxKey::Claim, "first".to_string()),
                (BoxKey::Data, "second".to_string()),
            ]
        );
    }

    #[test]
    fn document_without_known_sections_fails_and_keeps_state() {
        let mut diagram = diagram();
        diagram.set_content(BoxKey::Claim, "unchanged");
        let before = diagram.snapshot();
        let err = import_text(&mut diagram, "hello\nworld").unwrap_err();
        assert_eq!(err, ImportError::NoRecognizedSections);
        assert_eq!(diagram.snapshot(), before);
        assert!(import_text(&mut diagram, "").is_err());
    }

    #[test]
    fn delimiter_inside_content_splits_the_box() {
        let mut original = diagram();
        original.set_content(BoxKey::Warrant, "above\n---\n\nbelow");
        let mut restored = diagram();
        let report = import_text(&mut restored, &export_text(&original)).unwrap();
        assert_eq!(restored.content(BoxKey::Warrant), "above");
        assert_eq!(report.ignored, vec!["below".to_string()]);
    }

    #[test]
    fn title_only_section_clears_box() {
        let mut diagram = diagram();
        diagram.set_content(BoxKey::Warrant, "old");
        import_text(&mut diagram, "WARRANT").unwrap();
        assert_eq!(diagram.content(BoxKey::Warrant), "");
    }
}
