//! Plain text renderer implementation.

use unicode_width::UnicodeWidthStr;

use crate::error::Result;
use crate::model::{Block, Document, HeadingLevel, Paragraph};

use super::options::RenderOptions;

/// Convert a Document to plain text.
///
/// The title and section headings are underlined to their display width;
/// entry sub-headings and bullets are left as-is.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();

    for section in &doc.sections {
        for block in &section.content {
            match block {
                Block::Paragraph(para) => {
                    let text = render_paragraph_text(para);
                    if text.is_empty() {
                        continue;
                    }
                    output.push_str(&text);
                    output.push('\n');
                    if matches!(para.heading, HeadingLevel::Title | HeadingLevel::H1) {
                        output.push_str(&underline(&text, options.underline_char));
                        output.push('\n');
                    }
                    if options.paragraph_spacing {
                        output.push('\n');
                    }
                }
                Block::Image { alt_text, .. } => {
                    if let Some(alt) = alt_text {
                        output.push_str(&format!("[Image: {}]\n", alt));
                    } else {
                        output.push_str("[Image]\n");
                    }
                    if options.paragraph_spacing {
                        output.push('\n');
                    }
                }
            }
        }
    }

    Ok(output.trim_end().to_string())
}

/// Render a paragraph to plain text.
fn render_paragraph_text(para: &Paragraph) -> String {
    let mut output = String::new();

    if let Some(ref list_info) = para.list_info {
        output.push_str(&"  ".repeat(list_info.level as usize));
        output.push_str("\u{2022} ");
    }

    let text = para.plain_text();
    if text.is_empty() {
        return String::new();
    }
    output.push_str(&text);
    output
}

/// An underline as wide as the longest line of `text`.
fn underline(text: &str, ch: char) -> String {
    let width = text.lines().map(UnicodeWidthStr::width).max().unwrap_or(0);
    std::iter::repeat(ch).take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Section, SectionKind};

    #[test]
    fn test_headings_underlined() {
        let mut doc = Document::new();
        let mut header = Section::new(SectionKind::Header);
        header.add_paragraph(Paragraph::heading(HeadingLevel::Title, "Ada"));
        doc.add_section(header);
        let mut skills = Section::new(SectionKind::Skills);
        skills.add_paragraph(Paragraph::heading(HeadingLevel::H1, "Skills"));
        skills.add_paragraph(Paragraph::bullet("Math"));
        doc.add_section(skills);

        let text = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(text, "Ada\n===\n\nSkills\n======\n\n\u{2022} Math");
    }

    #[test]
    fn test_underline_uses_display_width() {
        assert_eq!(underline("김철수", '-'), "------");
        assert_eq!(underline("José", '-'), "----");
    }

    #[test]
    fn test_empty_title_skipped() {
        let mut doc = Document::new();
        let mut header = Section::new(SectionKind::Header);
        header.add_paragraph(Paragraph::heading(HeadingLevel::Title, ""));
        doc.add_section(header);
        assert_eq!(to_text(&doc, &RenderOptions::default()).unwrap(), "");
    }

    #[test]
    fn test_image_placeholder() {
        let mut doc = Document::new();
        let mut photo = Section::new(SectionKind::Photo);
        photo.add_block(Block::Image {
            resource_id: "image1".to_string(),
            alt_text: Some("Photo of Ada".to_string()),
            width: 1,
            height: 1,
        });
        doc.add_section(photo);
        let opts = RenderOptions::default().with_paragraph_spacing(false);
        assert_eq!(to_text(&doc, &opts).unwrap(), "[Image: Photo of Ada]");
    }
}
