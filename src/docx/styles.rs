//! DOCX style definitions (`word/styles.xml`).

use crate::compose::{CONTACT_STYLE, SUBTITLE_STYLE};
use crate::error::Result;
use crate::xml::XmlWriter;

use super::numbering::BULLET_NUM_ID;
use super::schema::NS_W;

/// Style type (paragraph or character).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    Paragraph,
    Character,
}

impl StyleType {
    fn as_str(&self) -> &'static str {
        match self {
            StyleType::Paragraph => "paragraph",
            StyleType::Character => "character",
        }
    }
}

/// Paragraph-level properties of a style. Distances are in twips.
#[derive(Debug, Clone, Default)]
pub struct ParagraphProps {
    pub spacing_before: Option<u32>,
    pub spacing_after: Option<u32>,
    pub keep_next: bool,
    /// Bottom border color (hex)
    pub border_bottom: Option<&'static str>,
    /// Bullet numbering reference
    pub num_id: Option<u32>,
}

/// Run-level (character) properties of a style.
#[derive(Debug, Clone, Default)]
pub struct RunProps {
    pub bold: bool,
    pub italic: bool,
    pub font_name: Option<&'static str>,
    /// Font size in half-points (e.g., 24 = 12pt)
    pub font_size: Option<u32>,
    pub color: Option<&'static str>,
}

/// A style definition.
#[derive(Debug, Clone)]
pub struct Style {
    /// Style ID (e.g., "Heading1")
    pub id: &'static str,
    /// Style name (e.g., "heading 1")
    pub name: &'static str,
    pub style_type: StyleType,
    pub based_on: Option<&'static str>,
    pub next: Option<&'static str>,
    /// Outline level (for headings, 0-based)
    pub outline_level: Option<u8>,
    pub is_default: bool,
    pub paragraph_props: ParagraphProps,
    pub run_props: RunProps,
}

impl Style {
    fn paragraph(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            style_type: StyleType::Paragraph,
            based_on: Some("Normal"),
            next: Some("Normal"),
            outline_level: None,
            is_default: false,
            paragraph_props: ParagraphProps::default(),
            run_props: RunProps::default(),
        }
    }
}

/// The style sheet written into every exported document.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    pub body_font: &'static str,
    pub styles: Vec<Style>,
}

/// Section heading color.
const ACCENT: &str = "1F3864";
/// Secondary text color.
const MUTED: &str = "5A6B7A";

impl Default for StyleSheet {
    fn default() -> Self {
        let mut normal = Style::paragraph("Normal", "Normal");
        normal.based_on = None;
        normal.next = None;
        normal.is_default = true;
        normal.paragraph_props.spacing_after = Some(120);
        normal.run_props.font_size = Some(22);

        let mut title = Style::paragraph("Title", "Title");
        title.paragraph_props.spacing_after = Some(60);
        title.run_props.bold = true;
        title.run_props.font_size = Some(56);
        title.run_props.color = Some(ACCENT);

        let mut subtitle = Style::paragraph(SUBTITLE_STYLE, "Subtitle");
        subtitle.paragraph_props.spacing_after = Some(60);
        subtitle.run_props.font_size = Some(26);
        subtitle.run_props.color = Some("334155");

        let mut contact = Style::paragraph(CONTACT_STYLE, "Contact");
        contact.paragraph_props.spacing_after = Some(240);
        contact.run_props.font_size = Some(18);
        contact.run_props.color = Some(MUTED);

        let mut heading1 = Style::paragraph("Heading1", "heading 1");
        heading1.outline_level = Some(0);
        heading1.paragraph_props = ParagraphProps {
            spacing_before: Some(240),
            spacing_after: Some(80),
            keep_next: true,
            border_bottom: Some("D0D7E2"),
            num_id: None,
        };
        heading1.run_props.bold = true;
        heading1.run_props.font_size = Some(28);
        heading1.run_props.color = Some(ACCENT);

        let mut heading2 = Style::paragraph("Heading2", "heading 2");
        heading2.outline_level = Some(1);
        heading2.paragraph_props.spacing_before = Some(160);
        heading2.paragraph_props.spacing_after = Some(40);
        heading2.paragraph_props.keep_next = true;
        heading2.run_props.bold = true;
        heading2.run_props.font_size = Some(22);

        let mut list_bullet = Style::paragraph("ListBullet", "List Bullet");
        list_bullet.paragraph_props.spacing_after = Some(40);
        list_bullet.paragraph_props.num_id = Some(BULLET_NUM_ID);

        Self {
            body_font: "Calibri",
            styles: vec![
                normal,
                title,
                subtitle,
                contact,
                heading1,
                heading2,
                list_bullet,
            ],
        }
    }
}

impl StyleSheet {
    /// Look up a style by ID.
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.id == id)
    }

    /// Serialize as `word/styles.xml`.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::new()?;
        xml.start("w:styles", &[("xmlns:w", NS_W)])?;

        xml.start("w:docDefaults", &[])?;
        xml.start("w:rPrDefault", &[])?;
        xml.start("w:rPr", &[])?;
        xml.empty(
            "w:rFonts",
            &[
                ("w:ascii", self.body_font),
                ("w:hAnsi", self.body_font),
                ("w:eastAsia", self.body_font),
                ("w:cs", self.body_font),
            ],
        )?;
        xml.val("w:sz", "22")?;
        xml.val("w:szCs", "22")?;
        xml.val("w:lang", "en-US")?;
        xml.end("w:rPr")?;
        xml.end("w:rPrDefault")?;
        xml.start("w:pPrDefault", &[])?;
        xml.start("w:pPr", &[])?;
        xml.empty("w:spacing", &[("w:after", "120"), ("w:line", "264"), ("w:lineRule", "auto")])?;
        xml.end("w:pPr")?;
        xml.end("w:pPrDefault")?;
        xml.end("w:docDefaults")?;

        for style in &self.styles {
            write_style(&mut xml, style)?;
        }

        xml.end("w:styles")?;
        Ok(xml.into_bytes())
    }
}

fn write_style(xml: &mut XmlWriter, style: &Style) -> Result<()> {
    let mut attrs = vec![("w:type", style.style_type.as_str()), ("w:styleId", style.id)];
    if style.is_default {
        attrs.push(("w:default", "1"));
    }
    xml.start("w:style", &attrs)?;
    xml.val("w:name", style.name)?;
    if let Some(based_on) = style.based_on {
        xml.val("w:basedOn", based_on)?;
    }
    if let Some(next) = style.next {
        xml.val("w:next", next)?;
    }
    xml.empty("w:qFormat", &[])?;

    let p = &style.paragraph_props;
    let has_ppr = p.spacing_before.is_some()
        || p.spacing_after.is_some()
        || p.keep_next
        || p.border_bottom.is_some()
        || p.num_id.is_some()
        || style.outline_level.is_some();
    if has_ppr {
        xml.start("w:pPr", &[])?;
        if p.keep_next {
            xml.empty("w:keepNext", &[])?;
        }
        if let Some(num_id) = p.num_id {
            xml.start("w:numPr", &[])?;
            xml.val("w:numId", &num_id.to_string())?;
            xml.end("w:numPr")?;
        }
        if let Some(color) = p.border_bottom {
            xml.start("w:pBdr", &[])?;
            xml.empty(
                "w:bottom",
                &[("w:val", "single"), ("w:sz", "6"), ("w:space", "1"), ("w:color", color)],
            )?;
            xml.end("w:pBdr")?;
        }
        if p.spacing_before.is_some() || p.spacing_after.is_some() {
            let before = p.spacing_before.map(|v| v.to_string());
            let after = p.spacing_after.map(|v| v.to_string());
            let mut spacing = Vec::new();
            if let Some(ref v) = before {
                spacing.push(("w:before", v.as_str()));
            }
            if let Some(ref v) = after {
                spacing.push(("w:after", v.as_str()));
            }
            xml.empty("w:spacing", &spacing)?;
        }
        if let Some(level) = style.outline_level {
            xml.val("w:outlineLvl", &level.to_string())?;
        }
        xml.end("w:pPr")?;
    }

    let r = &style.run_props;
    xml.start("w:rPr", &[])?;
    if let Some(font) = r.font_name {
        xml.empty("w:rFonts", &[("w:ascii", font), ("w:hAnsi", font)])?;
    }
    if r.bold {
        xml.empty("w:b", &[])?;
    }
    if r.italic {
        xml.empty("w:i", &[])?;
    }
    if let Some(color) = r.color {
        xml.val("w:color", color)?;
    }
    if let Some(size) = r.font_size {
        let size = size.to_string();
        xml.val("w:sz", &size)?;
        xml.val("w:szCs", &size)?;
    }
    xml.end("w:rPr")?;

    xml.end("w:style")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sheet_has_cv_styles() {
        let sheet = StyleSheet::default();
        for id in ["Normal", "Title", "Subtitle", "Contact", "Heading1", "Heading2", "ListBullet"] {
            assert!(sheet.get(id).is_some(), "missing style {}", id);
        }
        assert_eq!(sheet.get("Heading1").unwrap().outline_level, Some(0));
        assert_eq!(
            sheet.get("ListBullet").unwrap().paragraph_props.num_id,
            Some(BULLET_NUM_ID)
        );
    }

    #[test]
    fn test_styles_xml() {
        let xml = String::from_utf8(StyleSheet::default().to_xml().unwrap()).unwrap();
        assert!(xml.contains(r#"<w:style w:type="paragraph" w:styleId="Normal" w:default="1">"#));
        assert!(xml.contains(r#"<w:name w:val="heading 1"/>"#));
        assert!(xml.contains(r#"<w:outlineLvl w:val="1"/>"#));
        assert!(xml.contains("<w:numId w:val=\"1\"/>"));
    }
}
