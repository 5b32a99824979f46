//! DOCX read-back.
//!
//! Reconstructs the section/paragraph model from a package. Sections are
//! recovered from the `cv_*` bookmarks written at each section start;
//! content before the first bookmark is treated as header content.

use std::io::Cursor;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};

use crate::container::{OoxmlContainer, Relationships};
use crate::error::{Error, Result};
use crate::model::{
    Block, Document, HeadingLevel, ListInfo, MediaFormat, Paragraph, Resource, Section,
    SectionKind, TextAlignment, TextRun, TextStyle,
};

use super::schema::{PART_DOCUMENT, REL_IMAGE};

/// Reader for `.docx` packages.
#[derive(Debug)]
pub struct DocxReader {
    container: OoxmlContainer,
    relationships: Relationships,
}

impl DocxReader {
    /// Open a `.docx` file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_container(OoxmlContainer::open(path)?)
    }

    /// Read a package from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_container(OoxmlContainer::from_bytes(data)?)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        if !container.exists(PART_DOCUMENT) {
            return Err(Error::MissingComponent(PART_DOCUMENT.to_string()));
        }
        let relationships = container
            .read_relationships(PART_DOCUMENT)
            .unwrap_or_default();
        Ok(Self {
            container,
            relationships,
        })
    }

    /// Parse the package into a [`Document`].
    pub fn read(&self) -> Result<Document> {
        let mut doc = Document::new();
        doc.metadata = self.container.parse_core_metadata()?;

        let xml = self.container.read_xml(PART_DOCUMENT)?;
        for section in self.parse_body(&xml)? {
            doc.add_section(section);
        }

        self.load_resources(&mut doc)?;
        tracing::debug!(
            sections = doc.sections.len(),
            resources = doc.resources.len(),
            "Read document"
        );
        Ok(doc)
    }

    /// Get the underlying container.
    pub fn container(&self) -> &OoxmlContainer {
        &self.container
    }

    fn parse_body(&self, xml: &str) -> Result<Vec<Section>> {
        let mut reader = quick_xml::Reader::from_str(xml);
        // Keep whitespace inside w:t.
        reader.config_mut().trim_text(false);

        let mut sections: Vec<Section> = Vec::new();
        let mut state = ParagraphState::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"w:p" => state = ParagraphState::open(),
                    b"w:pPr" => state.in_ppr = true,
                    b"w:rPr" if state.in_run => state.in_rpr = true,
                    b"w:r" => state.start_run(),
                    b"w:t" if state.in_run => state.in_text = true,
                    b"w:drawing" => state.image = Some(ImageRef::default()),
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"w:bookmarkStart" => {
                        let kind = attr(e, b"w:name").and_then(|n| SectionKind::from_anchor(&n));
                        if let Some(kind) = kind {
                            sections.push(Section::new(kind));
                        }
                    }
                    b"w:p" => push_block(&mut sections, Block::Paragraph(Paragraph::new())),
                    _ => state.empty_element(e, &self.relationships),
                },
                Ok(Event::Text(ref e)) => {
                    if state.in_text {
                        let text = e
                            .unescape()
                            .map_err(|err| Error::XmlParse(err.to_string()))?;
                        state.run_text.push_str(&text);
                    }
                }
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"w:p" => {
                        if let Some(block) = state.finish() {
                            push_block(&mut sections, block);
                        }
                    }
                    b"w:pPr" => state.in_ppr = false,
                    b"w:rPr" => state.in_rpr = false,
                    b"w:r" => state.end_run(),
                    b"w:t" => state.in_text = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(sections)
    }

    fn load_resources(&self, doc: &mut Document) -> Result<()> {
        for rel in self.relationships.get_by_type(REL_IMAGE) {
            let path = resolve_target(&rel.target);
            let target = Path::new(&path);
            let Some(id) = target.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let ext = target
                .extension()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let Some(format) = MediaFormat::from_extension(&ext) else {
                tracing::warn!(target = %rel.target, "Unsupported media type, skipping");
                continue;
            };

            let data = self.container.read_binary(&path)?;
            let dimensions = image::ImageReader::new(Cursor::new(data.as_slice()))
                .with_guessed_format()
                .ok()
                .and_then(|r| r.into_dimensions().ok());

            let mut resource = Resource::image(format, data);
            if let Some((width, height)) = dimensions {
                resource = resource.with_dimensions(width, height);
            }
            doc.add_resource(id, resource);
        }
        Ok(())
    }
}

/// Resolve a relationship target relative to `word/`.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{}", target),
    }
}

fn push_block(sections: &mut Vec<Section>, block: Block) {
    if sections.is_empty() {
        sections.push(Section::new(SectionKind::Header));
    }
    if let Some(section) = sections.last_mut() {
        section.add_block(block);
    }
}

fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// `w:b`/`w:i` toggles; absent `w:val` means on.
fn toggle(e: &BytesStart) -> bool {
    !matches!(attr(e, b"w:val").as_deref(), Some("0" | "false" | "off"))
}

/// Picture reference collected inside a `w:drawing`.
#[derive(Debug, Default)]
struct ImageRef {
    resource_id: Option<String>,
    alt_text: Option<String>,
    width: u64,
    height: u64,
}

#[derive(Debug, Default)]
struct ParagraphState {
    para: Option<Paragraph>,
    in_ppr: bool,
    in_rpr: bool,
    in_run: bool,
    in_text: bool,
    run_style: TextStyle,
    run_text: String,
    image: Option<ImageRef>,
    found_image: Option<ImageRef>,
}

impl ParagraphState {
    fn open() -> Self {
        Self {
            para: Some(Paragraph::new()),
            ..Default::default()
        }
    }

    fn start_run(&mut self) {
        self.in_run = true;
        self.run_style = TextStyle::default();
        self.run_text.clear();
    }

    fn end_run(&mut self) {
        self.in_run = false;
        if let Some(image) = self.image.take() {
            self.found_image = Some(image);
        }
        if self.run_text.is_empty() {
            return;
        }
        if let Some(para) = self.para.as_mut() {
            para.add_run(TextRun::styled(
                std::mem::take(&mut self.run_text),
                std::mem::take(&mut self.run_style),
            ));
        }
    }

    fn empty_element(&mut self, e: &BytesStart, rels: &Relationships) {
        let Some(para) = self.para.as_mut() else {
            return;
        };
        match e.name().as_ref() {
            b"w:pStyle" if self.in_ppr => {
                if let Some(style_id) = attr(e, b"w:val") {
                    let heading = HeadingLevel::from_style_id(&style_id);
                    if heading.is_heading() {
                        para.heading = heading;
                    } else if style_id == "ListBullet" {
                        para.list_info.get_or_insert_with(ListInfo::default);
                    } else {
                        para.style_id = Some(style_id);
                    }
                }
            }
            b"w:ilvl" if self.in_ppr => {
                let level = attr(e, b"w:val").and_then(|v| v.parse().ok()).unwrap_or(0);
                para.list_info = Some(ListInfo { level });
            }
            b"w:numId" if self.in_ppr => {
                // numId 0 removes numbering
                if attr(e, b"w:val").as_deref() == Some("0") {
                    para.list_info = None;
                } else {
                    para.list_info.get_or_insert_with(ListInfo::default);
                }
            }
            b"w:jc" if self.in_ppr => {
                if let Some(val) = attr(e, b"w:val") {
                    para.alignment = TextAlignment::from_jc(&val);
                }
            }
            b"w:b" if self.in_rpr => self.run_style.bold = toggle(e),
            b"w:i" if self.in_rpr => self.run_style.italic = toggle(e),
            b"w:color" if self.in_rpr => {
                self.run_style.color = attr(e, b"w:val").filter(|v| v != "auto");
            }
            b"w:br" if self.in_run => self.run_text.push('\n'),
            b"w:tab" if self.in_run && !self.in_ppr => self.run_text.push('\t'),
            b"wp:extent" => {
                if let Some(image) = self.image.as_mut() {
                    image.width = attr(e, b"cx").and_then(|v| v.parse().ok()).unwrap_or(0);
                    image.height = attr(e, b"cy").and_then(|v| v.parse().ok()).unwrap_or(0);
                }
            }
            b"wp:docPr" => {
                if let Some(image) = self.image.as_mut() {
                    image.alt_text = attr(e, b"descr").filter(|d| !d.is_empty());
                }
            }
            b"a:blip" => {
                if let Some(image) = self.image.as_mut() {
                    image.resource_id = attr(e, b"r:embed")
                        .and_then(|rel_id| rels.get(&rel_id))
                        .and_then(|rel| {
                            Path::new(&rel.target)
                                .file_stem()
                                .map(|s| s.to_string_lossy().into_owned())
                        });
                }
            }
            _ => {}
        }
    }

    /// Close the paragraph. A paragraph holding only a picture becomes an
    /// image block.
    fn finish(&mut self) -> Option<Block> {
        let mut para = self.para.take()?;
        let image = self.found_image.take().or_else(|| self.image.take());

        if let Some(ImageRef {
            resource_id: Some(resource_id),
            alt_text,
            width,
            height,
        }) = image
        {
            if para.is_empty() {
                return Some(Block::Image {
                    resource_id,
                    alt_text,
                    width,
                    height,
                });
            }
        }

        para.merge_adjacent_runs();
        Some(Block::Paragraph(para))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::DocxWriter;
    use crate::options::ExportOptions;

    fn roundtrip(doc: &Document) -> Document {
        let bytes = DocxWriter::new(&ExportOptions::default()).write(doc).unwrap();
        DocxReader::from_bytes(bytes).unwrap().read().unwrap()
    }

    #[test]
    fn test_missing_document_part() {
        let mut package = crate::container::PackageWriter::new();
        package.add_part("word/other.xml", b"<x/>").unwrap();
        let bytes = package.finish().unwrap();
        let err = DocxReader::from_bytes(bytes).unwrap_err();
        assert!(matches!(err, Error::MissingComponent(_)));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(DocxReader::from_bytes(b"plain text".to_vec()).is_err());
    }

    #[test]
    fn test_roundtrip_paragraphs() {
        let mut doc = Document::new();
        let mut header = Section::new(SectionKind::Header);
        header.add_paragraph(Paragraph::heading(HeadingLevel::Title, "Ada"));
        header.add_paragraph(Paragraph::with_text("Analyst").with_style("Subtitle"));
        doc.add_section(header);

        let mut experience = Section::new(SectionKind::Experience);
        let mut heading = Paragraph::heading(HeadingLevel::H2, "Analyst at Babbage");
        heading.add_run(TextRun::styled(
            ", 1842",
            TextStyle {
                color: Some("5A6B7A".to_string()),
                ..Default::default()
            },
        ));
        experience.add_paragraph(heading);
        experience.add_paragraph(Paragraph::with_text("Notes  on\nthe engine"));
        experience.add_paragraph(Paragraph::bullet("First program"));
        doc.add_section(experience);

        let back = roundtrip(&doc);
        assert_eq!(back.sections, doc.sections);
    }

    #[test]
    fn test_roundtrip_empty_title() {
        let mut doc = Document::new();
        let mut header = Section::new(SectionKind::Header);
        header.add_paragraph(Paragraph::heading(HeadingLevel::Title, ""));
        doc.add_section(header);

        let back = roundtrip(&doc);
        assert_eq!(back.section_kinds(), vec![SectionKind::Header]);
        let para = back.section(SectionKind::Header).unwrap().paragraphs().next().unwrap();
        assert_eq!(para.heading, HeadingLevel::Title);
        assert!(para.is_empty());
    }

    #[test]
    fn test_roundtrip_image_block() {
        let mut doc = Document::new();
        doc.add_section(Section::new(SectionKind::Header));
        let mut photo = Section::new(SectionKind::Photo);
        photo.add_block(Block::Image {
            resource_id: "image1".to_string(),
            alt_text: Some("Photo of Ada".to_string()),
            width: 1_097_280,
            height: 548_640,
        });
        doc.add_section(photo);
        doc.add_resource("image1", Resource::image(MediaFormat::Jpeg, vec![0xFF, 0xD8]));

        let back = roundtrip(&doc);
        assert_eq!(back.section(SectionKind::Photo), doc.section(SectionKind::Photo));
        let resource = back.get_resource("image1").unwrap();
        assert_eq!(resource.format, MediaFormat::Jpeg);
        assert_eq!(resource.data, vec![0xFF, 0xD8]);
        assert_eq!(resource.width, None);
    }

    #[test]
    fn test_foreign_document_without_bookmarks() {
        let xml = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b w:val="0"/><w:i/></w:rPr><w:t>Hello</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let mut package = crate::container::PackageWriter::new();
        package.add_part(PART_DOCUMENT, xml.as_bytes()).unwrap();
        let doc = DocxReader::from_bytes(package.finish().unwrap())
            .unwrap()
            .read()
            .unwrap();

        assert_eq!(doc.section_kinds(), vec![SectionKind::Header]);
        let para = doc.sections[0].paragraphs().next().unwrap();
        assert_eq!(para.alignment, TextAlignment::Center);
        assert_eq!(para.runs[0].text, "Hello");
        assert!(para.runs[0].style.italic);
        assert!(!para.runs[0].style.bold);
    }
}
