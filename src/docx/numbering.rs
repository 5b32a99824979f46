//! DOCX numbering definitions (`word/numbering.xml`).

use crate::error::Result;
use crate::xml::XmlWriter;

use super::schema::NS_W;

/// `w:numId` referenced by the `ListBullet` style.
pub const BULLET_NUM_ID: u32 = 1;

/// A numbering level definition.
#[derive(Debug, Clone)]
pub struct NumLevel {
    /// Level index (0-8)
    pub level: u8,
    /// Start value
    pub start: u32,
    /// Number format (decimal, bullet, ...)
    pub num_fmt: &'static str,
    /// Level text; the bullet glyph for bullet lists
    pub level_text: &'static str,
    /// Left indent in twips
    pub indent: u32,
    /// Hanging indent in twips
    pub hanging: u32,
}

/// Abstract numbering definition.
#[derive(Debug, Clone)]
pub struct AbstractNum {
    pub id: u32,
    pub levels: Vec<NumLevel>,
}

impl AbstractNum {
    /// A three-level bullet list.
    pub fn bullets(id: u32) -> Self {
        let glyphs = ["\u{2022}", "\u{25E6}", "\u{25AA}"];
        let levels = glyphs
            .into_iter()
            .enumerate()
            .map(|(i, glyph)| NumLevel {
                level: i as u8,
                start: 1,
                num_fmt: "bullet",
                level_text: glyph,
                indent: 360 * (i as u32 + 1),
                hanging: 360,
            })
            .collect();
        Self { id, levels }
    }
}

/// Concrete numbering instance.
#[derive(Debug, Clone)]
pub struct NumInstance {
    pub num_id: u32,
    pub abstract_num_id: u32,
}

/// Collection of numbering definitions.
#[derive(Debug, Clone)]
pub struct Numbering {
    pub abstract_nums: Vec<AbstractNum>,
    pub instances: Vec<NumInstance>,
}

impl Default for Numbering {
    fn default() -> Self {
        Self {
            abstract_nums: vec![AbstractNum::bullets(0)],
            instances: vec![NumInstance {
                num_id: BULLET_NUM_ID,
                abstract_num_id: 0,
            }],
        }
    }
}

impl Numbering {
    /// Serialize as `word/numbering.xml`.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::new()?;
        xml.start("w:numbering", &[("xmlns:w", NS_W)])?;

        // All abstractNum elements must precede the num elements.
        for abs in &self.abstract_nums {
            xml.start("w:abstractNum", &[("w:abstractNumId", abs.id.to_string().as_str())])?;
            xml.val("w:multiLevelType", "hybridMultilevel")?;
            for lvl in &abs.levels {
                xml.start("w:lvl", &[("w:ilvl", lvl.level.to_string().as_str())])?;
                xml.val("w:start", lvl.start.to_string().as_str())?;
                xml.val("w:numFmt", lvl.num_fmt)?;
                xml.val("w:lvlText", lvl.level_text)?;
                xml.val("w:lvlJc", "left")?;
                xml.start("w:pPr", &[])?;
                xml.empty(
                    "w:ind",
                    &[
                        ("w:left", lvl.indent.to_string().as_str()),
                        ("w:hanging", lvl.hanging.to_string().as_str()),
                    ],
                )?;
                xml.end("w:pPr")?;
                xml.end("w:lvl")?;
            }
            xml.end("w:abstractNum")?;
        }

        for num in &self.instances {
            xml.start("w:num", &[("w:numId", num.num_id.to_string().as_str())])?;
            xml.val("w:abstractNumId", num.abstract_num_id.to_string().as_str())?;
            xml.end("w:num")?;
        }

        xml.end("w:numbering")?;
        Ok(xml.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_levels() {
        let abs = AbstractNum::bullets(0);
        assert_eq!(abs.levels.len(), 3);
        assert!(abs.levels.iter().all(|l| l.num_fmt == "bullet"));
        assert_eq!(abs.levels[0].level_text, "\u{2022}");
        assert_eq!(abs.levels[2].indent, 1080);
    }

    #[test]
    fn test_numbering_xml_order() {
        let xml = String::from_utf8(Numbering::default().to_xml().unwrap()).unwrap();
        let abs = xml.find("<w:abstractNum ").unwrap();
        let num = xml.find("<w:num w:numId=\"1\">").unwrap();
        assert!(abs < num);
        assert!(xml.contains("<w:abstractNumId w:val=\"0\"/>"));
    }
}
