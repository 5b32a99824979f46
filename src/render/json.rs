//! JSON renderer implementation.

use crate::error::Result;
use crate::model::Document;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a Document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(doc),
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
    };
    json.map_err(|e| crate::error::Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Paragraph, Section, SectionKind};

    #[test]
    fn test_to_json_pretty() {
        let mut doc = Document::new();
        doc.metadata.title = Some("Test".to_string());
        let mut section = Section::new(SectionKind::Summary);
        section.add_paragraph(Paragraph::with_text("Hello"));
        doc.add_section(section);

        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\": \"Test\""));
        assert!(json.contains("\"text\": \"Hello\""));
    }

    #[test]
    fn test_to_json_compact() {
        let mut doc = Document::new();
        doc.metadata.title = Some("Test".to_string());

        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"title\":\"Test\""));
    }

    #[test]
    fn test_document_roundtrip() {
        let mut doc = Document::new();
        doc.metadata.author = Some("Test Author".to_string());
        let mut section = Section::new(SectionKind::Skills);
        section.add_paragraph(Paragraph::bullet("Rust"));
        doc.add_section(section);

        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sections, doc.sections);
        assert_eq!(back.metadata.author.as_deref(), Some("Test Author"));
    }
}
