//! Composed document model.

use super::{Paragraph, Resource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Core properties written to `docProps/core.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub keywords: Vec<String>,
}

/// The CV sections, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Header,
    Photo,
    Summary,
    Skills,
    Experience,
    Education,
}

impl SectionKind {
    /// All kinds in rendering order.
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Header,
        SectionKind::Photo,
        SectionKind::Summary,
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Education,
    ];

    /// Bookmark name marking the start of the section in `word/document.xml`.
    pub fn anchor(&self) -> &'static str {
        match self {
            SectionKind::Header => "cv_header",
            SectionKind::Photo => "cv_photo",
            SectionKind::Summary => "cv_summary",
            SectionKind::Skills => "cv_skills",
            SectionKind::Experience => "cv_experience",
            SectionKind::Education => "cv_education",
        }
    }

    /// Inverse of [`SectionKind::anchor`].
    pub fn from_anchor(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.anchor() == name)
    }
}

/// A content block within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    Paragraph(Paragraph),
    /// An inline image in its own paragraph
    Image {
        /// Resource ID for the image
        resource_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alt_text: Option<String>,
        /// Display width in EMUs
        width: u64,
        /// Display height in EMUs
        height: u64,
    },
}

/// One CV section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,

    #[serde(default)]
    pub content: Vec<Block>,
}

impl Section {
    /// Create an empty section.
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            content: Vec::new(),
        }
    }

    /// Add a content block to this section.
    pub fn add_block(&mut self, block: Block) {
        self.content.push(block);
    }

    /// Add a paragraph to this section.
    pub fn add_paragraph(&mut self, para: Paragraph) {
        self.content.push(Block::Paragraph(para));
    }

    /// Iterate over the paragraphs, skipping images.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.content.iter().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            Block::Image { .. } => None,
        })
    }

    /// Text of each paragraph, in order.
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.paragraphs().map(Paragraph::plain_text).collect()
    }

    /// Check if this section is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Get the number of content blocks.
    pub fn len(&self) -> usize {
        self.content.len()
    }
}

/// A composed CV document, ready to be packaged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub metadata: Metadata,

    #[serde(default)]
    pub sections: Vec<Section>,

    /// Embedded media keyed by resource ID
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub resources: BTreeMap<String, Resource>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section to the document.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Add a resource to the document.
    pub fn add_resource(&mut self, id: impl Into<String>, resource: Resource) {
        self.resources.insert(id.into(), resource);
    }

    /// Get a resource by ID.
    pub fn get_resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Find the section of the given kind.
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Check whether a section of the given kind is present.
    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.section(kind).is_some()
    }

    /// Kinds of the present sections, in order.
    pub fn section_kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }

    /// Check whether any section carries an image block.
    pub fn has_images(&self) -> bool {
        self.sections
            .iter()
            .flat_map(|s| s.content.iter())
            .any(|b| matches!(b, Block::Image { .. }))
    }

    /// Get the total number of content blocks across all sections.
    pub fn total_blocks(&self) -> usize {
        self.sections.iter().map(|s| s.len()).sum()
    }

    /// Extract all text content as a single string.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for section in &self.sections {
            for para in section.paragraphs() {
                text.push_str(&para.plain_text());
                text.push('\n');
            }
        }
        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, MediaFormat};

    #[test]
    fn test_document_sections() {
        let mut doc = Document::new();
        let mut header = Section::new(SectionKind::Header);
        header.add_paragraph(Paragraph::heading(HeadingLevel::Title, "Ada Lovelace"));
        doc.add_section(header);

        let mut skills = Section::new(SectionKind::Skills);
        skills.add_paragraph(Paragraph::heading(HeadingLevel::H1, "Skills"));
        skills.add_paragraph(Paragraph::bullet("Analysis"));
        doc.add_section(skills);

        assert_eq!(doc.total_blocks(), 3);
        assert!(doc.has_section(SectionKind::Skills));
        assert!(!doc.has_section(SectionKind::Photo));
        assert_eq!(
            doc.section_kinds(),
            vec![SectionKind::Header, SectionKind::Skills]
        );
        assert_eq!(doc.plain_text(), "Ada Lovelace\nSkills\nAnalysis");
    }

    #[test]
    fn test_anchor_roundtrip() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::from_anchor(kind.anchor()), Some(kind));
        }
        assert_eq!(SectionKind::from_anchor("_GoBack"), None);
    }

    #[test]
    fn test_has_images() {
        let mut doc = Document::new();
        let mut photo = Section::new(SectionKind::Photo);
        photo.add_block(Block::Image {
            resource_id: "image1".to_string(),
            alt_text: None,
            width: 100,
            height: 100,
        });
        doc.add_section(photo);
        doc.add_resource("image1", Resource::image(MediaFormat::Png, vec![]));
        assert!(doc.has_images());
        assert!(doc.get_resource("image1").is_some());
    }

    #[test]
    fn test_metadata_serialization() {
        let meta = Metadata {
            title: Some("Ada Lovelace".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("Ada Lovelace"));
        assert!(!json.contains("subject"));
    }
}
