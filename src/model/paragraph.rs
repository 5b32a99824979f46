//! Paragraph and text run models.

use serde::{Deserialize, Serialize};

/// Text alignment within a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlignment {
    /// WordprocessingML `w:jc` value, `None` for the default.
    pub fn jc_value(&self) -> Option<&'static str> {
        match self {
            TextAlignment::Left => None,
            TextAlignment::Center => Some("center"),
            TextAlignment::Right => Some("right"),
        }
    }

    /// Parse a `w:jc` value.
    pub fn from_jc(value: &str) -> Self {
        match value {
            "center" => TextAlignment::Center,
            "right" | "end" => TextAlignment::Right,
            _ => TextAlignment::Left,
        }
    }
}

/// Outline role of a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingLevel {
    #[default]
    None,
    /// Document title (the candidate's name)
    Title,
    /// Section heading
    H1,
    /// Entry sub-heading within a section
    H2,
}

impl HeadingLevel {
    /// Style ID used for this level in `word/styles.xml`.
    pub fn style_id(&self) -> Option<&'static str> {
        match self {
            HeadingLevel::None => None,
            HeadingLevel::Title => Some("Title"),
            HeadingLevel::H1 => Some("Heading1"),
            HeadingLevel::H2 => Some("Heading2"),
        }
    }

    /// Map a paragraph style ID back to a heading level.
    pub fn from_style_id(style_id: &str) -> Self {
        match style_id {
            "Title" => HeadingLevel::Title,
            "Heading1" => HeadingLevel::H1,
            "Heading2" => HeadingLevel::H2,
            _ => HeadingLevel::None,
        }
    }

    /// Check if this is a heading (not None).
    pub fn is_heading(&self) -> bool {
        !matches!(self, HeadingLevel::None)
    }

    fn is_none(&self) -> bool {
        matches!(self, HeadingLevel::None)
    }
}

/// Bullet list membership for a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    /// Nesting level (0 = top level)
    pub level: u8,
}

/// Text style properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,

    /// Text color (hex, e.g., "5A6B7A")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TextStyle {
    /// Create a bold style.
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Default::default()
        }
    }

    /// Create an italic style.
    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Default::default()
        }
    }

    /// Check if style has any formatting.
    pub fn has_formatting(&self) -> bool {
        self.bold || self.italic || self.color.is_some()
    }
}

/// A run of text with consistent styling.
///
/// Line feeds inside `text` are written as `w:br` breaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,

    #[serde(default, skip_serializing_if = "is_default_style")]
    pub style: TextStyle,
}

fn is_default_style(style: &TextStyle) -> bool {
    *style == TextStyle::default()
}

impl TextRun {
    /// Create a plain text run with no styling.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a styled text run.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A paragraph of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub runs: Vec<TextRun>,

    #[serde(default, skip_serializing_if = "HeadingLevel::is_none")]
    pub heading: HeadingLevel,

    #[serde(default, skip_serializing_if = "is_default_alignment")]
    pub alignment: TextAlignment,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_info: Option<ListInfo>,

    /// Explicit style ID for non-heading paragraphs (e.g. "Subtitle")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
}

fn is_default_alignment(a: &TextAlignment) -> bool {
    *a == TextAlignment::Left
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with the given text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
            ..Default::default()
        }
    }

    /// Create a heading paragraph.
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            runs: if text.is_empty() {
                Vec::new()
            } else {
                vec![TextRun::plain(text)]
            },
            heading: level,
            ..Default::default()
        }
    }

    /// Create a top-level bullet item.
    pub fn bullet(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
            list_info: Some(ListInfo::default()),
            ..Default::default()
        }
    }

    /// Set an explicit paragraph style.
    pub fn with_style(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = Some(style_id.into());
        self
    }

    /// Set the alignment.
    pub fn aligned(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Add a text run to this paragraph.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Style ID written to `w:pStyle`, if any.
    pub fn effective_style_id(&self) -> Option<&str> {
        if let Some(id) = self.heading.style_id() {
            return Some(id);
        }
        if self.list_info.is_some() {
            return Some("ListBullet");
        }
        self.style_id.as_deref()
    }

    /// Get the plain text content.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if this paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.is_empty())
    }

    /// Check if this paragraph is a heading.
    pub fn is_heading(&self) -> bool {
        self.heading.is_heading()
    }

    /// Check if this paragraph is a list item.
    pub fn is_list_item(&self) -> bool {
        self.list_info.is_some()
    }

    /// Merge consecutive runs with the same style.
    ///
    /// Read-back may split one logical run around line breaks; merging
    /// restores the composed shape.
    pub fn merge_adjacent_runs(&mut self) {
        if self.runs.len() <= 1 {
            return;
        }

        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(last) if last.style == run.style => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}
