//! DOCX package writer.

use crate::container::{PackageWriter, Relationships};
use crate::error::Result;
use crate::model::{Block, Document, Metadata, Paragraph, Section, TextRun};
use crate::options::ExportOptions;
use crate::xml::XmlWriter;

use super::numbering::{Numbering, BULLET_NUM_ID};
use super::schema::*;
use super::styles::StyleSheet;

/// Writer producing a `.docx` package from a [`Document`].
pub struct DocxWriter<'a> {
    options: &'a ExportOptions,
    styles: StyleSheet,
    numbering: Numbering,
}

impl<'a> DocxWriter<'a> {
    /// Create a writer with the default style sheet.
    pub fn new(options: &'a ExportOptions) -> Self {
        Self {
            options,
            styles: StyleSheet::default(),
            numbering: Numbering::default(),
        }
    }

    /// Serialize the document into package bytes.
    pub fn write(&self, doc: &Document) -> Result<Vec<u8>> {
        let mut package = PackageWriter::new();

        let mut package_rels = Relationships::new();
        package_rels.push(REL_OFFICE_DOCUMENT, PART_DOCUMENT);
        package_rels.push(REL_CORE_PROPERTIES, PART_CORE);
        package_rels.push(REL_EXTENDED_PROPERTIES, PART_APP);

        let mut doc_rels = Relationships::new();
        doc_rels.push(REL_STYLES, "styles.xml");
        doc_rels.push(REL_NUMBERING, "numbering.xml");

        // Image relationship IDs, keyed by resource ID.
        let mut image_rels = Vec::with_capacity(doc.resources.len());
        for (id, resource) in &doc.resources {
            let rel_id = doc_rels.push(REL_IMAGE, resource.relationship_target(id));
            package
                .content_types_mut()
                .add_default(resource.format.extension(), resource.format.mime_type());
            image_rels.push((id.as_str(), rel_id));
        }

        let body = DocumentXml::new(&image_rels).render(doc)?;

        package.add_part(PART_PACKAGE_RELS, &package_rels.to_xml()?)?;
        package.add_typed_part(PART_DOCUMENT, CT_DOCUMENT, &body)?;
        package.add_part(PART_DOCUMENT_RELS, &doc_rels.to_xml()?)?;
        package.add_typed_part(PART_STYLES, CT_STYLES, &self.styles.to_xml()?)?;
        package.add_typed_part(PART_NUMBERING, CT_NUMBERING, &self.numbering.to_xml()?)?;
        package.add_typed_part(PART_CORE, CT_CORE, &core_xml(&doc.metadata)?)?;
        package.add_typed_part(PART_APP, CT_APP, &app_xml(&self.options.application)?)?;

        for (id, resource) in &doc.resources {
            package.add_part(&resource.part_name(id), &resource.data)?;
        }

        tracing::debug!(parts = package.part_names().len(), "Writing package");
        package.finish()
    }
}

/// Serializer for `word/document.xml`.
struct DocumentXml<'r> {
    image_rels: &'r [(&'r str, String)],
}

impl<'r> DocumentXml<'r> {
    fn new(image_rels: &'r [(&'r str, String)]) -> Self {
        Self { image_rels }
    }

    fn render(&self, doc: &Document) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::new()?;
        xml.start(
            "w:document",
            &[
                ("xmlns:w", NS_W),
                ("xmlns:r", NS_R),
                ("xmlns:wp", NS_WP),
                ("xmlns:a", NS_A),
                ("xmlns:pic", NS_PIC),
            ],
        )?;
        xml.start("w:body", &[])?;

        let mut drawing_id = 0u32;
        for (index, section) in doc.sections.iter().enumerate() {
            self.write_section(&mut xml, index, section, &mut drawing_id)?;
        }

        write_section_properties(&mut xml)?;
        xml.end("w:body")?;
        xml.end("w:document")?;
        Ok(xml.into_bytes())
    }

    fn write_section(
        &self,
        xml: &mut XmlWriter,
        index: usize,
        section: &Section,
        drawing_id: &mut u32,
    ) -> Result<()> {
        // Zero-width bookmark marking where the section starts.
        let id = index.to_string();
        xml.empty(
            "w:bookmarkStart",
            &[("w:id", id.as_str()), ("w:name", section.kind.anchor())],
        )?;
        xml.empty("w:bookmarkEnd", &[("w:id", id.as_str())])?;

        for block in &section.content {
            match block {
                Block::Paragraph(para) => write_paragraph(xml, para)?,
                Block::Image {
                    resource_id,
                    alt_text,
                    width,
                    height,
                } => {
                    let Some(rel_id) = self.rel_id(resource_id) else {
                        tracing::warn!(resource_id = %resource_id, "Image without resource, skipping");
                        continue;
                    };
                    *drawing_id += 1;
                    let image = InlineImage {
                        drawing_id: *drawing_id,
                        rel_id,
                        name: resource_id,
                        description: alt_text.as_deref().unwrap_or_default(),
                        width: *width,
                        height: *height,
                    };
                    write_image_paragraph(xml, &image)?;
                }
            }
        }
        Ok(())
    }

    fn rel_id(&self, resource_id: &str) -> Option<&str> {
        self.image_rels
            .iter()
            .find(|(id, _)| *id == resource_id)
            .map(|(_, rel)| rel.as_str())
    }
}

fn write_paragraph(xml: &mut XmlWriter, para: &Paragraph) -> Result<()> {
    xml.start("w:p", &[])?;

    let style = para.effective_style_id();
    let jc = para.alignment.jc_value();
    if style.is_some() || para.list_info.is_some() || jc.is_some() {
        xml.start("w:pPr", &[])?;
        if let Some(style) = style {
            xml.val("w:pStyle", style)?;
        }
        if let Some(list) = para.list_info {
            xml.start("w:numPr", &[])?;
            xml.val("w:ilvl", &list.level.to_string())?;
            xml.val("w:numId", &BULLET_NUM_ID.to_string())?;
            xml.end("w:numPr")?;
        }
        if let Some(jc) = jc {
            xml.val("w:jc", jc)?;
        }
        xml.end("w:pPr")?;
    }

    for run in para.runs.iter().filter(|r| !r.is_empty()) {
        write_run(xml, run)?;
    }

    xml.end("w:p")
}

fn write_run(xml: &mut XmlWriter, run: &TextRun) -> Result<()> {
    xml.start("w:r", &[])?;

    if run.style.has_formatting() {
        xml.start("w:rPr", &[])?;
        if run.style.bold {
            xml.empty("w:b", &[])?;
        }
        if run.style.italic {
            xml.empty("w:i", &[])?;
        }
        if let Some(ref color) = run.style.color {
            xml.val("w:color", color)?;
        }
        xml.end("w:rPr")?;
    }

    let mut segment = String::new();
    for ch in run.text.chars() {
        match ch {
            '\n' | '\t' => {
                write_text(xml, &segment)?;
                segment.clear();
                if ch == '\n' {
                    xml.empty("w:br", &[])?;
                } else {
                    xml.empty("w:tab", &[])?;
                }
            }
            _ => segment.push(ch),
        }
    }
    write_text(xml, &segment)?;

    xml.end("w:r")
}

fn write_text(xml: &mut XmlWriter, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let needs_preserve = text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
        || text.contains("  ");
    if needs_preserve {
        xml.element("w:t", &[("xml:space", "preserve")], text)
    } else {
        xml.element("w:t", &[], text)
    }
}

/// An inline picture in DrawingML.
struct InlineImage<'a> {
    drawing_id: u32,
    rel_id: &'a str,
    name: &'a str,
    description: &'a str,
    width: u64,
    height: u64,
}

fn write_image_paragraph(xml: &mut XmlWriter, image: &InlineImage<'_>) -> Result<()> {
    let id = image.drawing_id.to_string();
    let cx = image.width.to_string();
    let cy = image.height.to_string();
    let extent = [("cx", cx.as_str()), ("cy", cy.as_str())];
    let doc_pr = [
        ("id", id.as_str()),
        ("name", image.name),
        ("descr", image.description),
    ];

    xml.start("w:p", &[])?;
    xml.start("w:r", &[])?;
    xml.start("w:drawing", &[])?;
    xml.start(
        "wp:inline",
        &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
    )?;
    xml.empty("wp:extent", &extent)?;
    xml.empty("wp:effectExtent", &[("l", "0"), ("t", "0"), ("r", "0"), ("b", "0")])?;
    xml.empty("wp:docPr", &doc_pr)?;
    xml.start("wp:cNvGraphicFramePr", &[])?;
    xml.empty("a:graphicFrameLocks", &[("noChangeAspect", "1")])?;
    xml.end("wp:cNvGraphicFramePr")?;

    xml.start("a:graphic", &[])?;
    xml.start("a:graphicData", &[("uri", NS_PIC)])?;
    xml.start("pic:pic", &[])?;

    xml.start("pic:nvPicPr", &[])?;
    xml.empty("pic:cNvPr", &doc_pr)?;
    xml.empty("pic:cNvPicPr", &[])?;
    xml.end("pic:nvPicPr")?;

    xml.start("pic:blipFill", &[])?;
    xml.empty("a:blip", &[("r:embed", image.rel_id)])?;
    xml.start("a:stretch", &[])?;
    xml.empty("a:fillRect", &[])?;
    xml.end("a:stretch")?;
    xml.end("pic:blipFill")?;

    xml.start("pic:spPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &extent)?;
    xml.end("a:xfrm")?;
    xml.start("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")?;
    xml.end("pic:spPr")?;

    xml.end("pic:pic")?;
    xml.end("a:graphicData")?;
    xml.end("a:graphic")?;
    xml.end("wp:inline")?;
    xml.end("w:drawing")?;
    xml.end("w:r")?;
    xml.end("w:p")
}

fn write_section_properties(xml: &mut XmlWriter) -> Result<()> {
    let width = PAGE_WIDTH_TWIPS.to_string();
    let height = PAGE_HEIGHT_TWIPS.to_string();
    let margin = PAGE_MARGIN_TWIPS.to_string();

    xml.start("w:sectPr", &[])?;
    xml.empty("w:pgSz", &[("w:w", width.as_str()), ("w:h", height.as_str())])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", margin.as_str()),
            ("w:right", margin.as_str()),
            ("w:bottom", margin.as_str()),
            ("w:left", margin.as_str()),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.end("w:sectPr")
}

/// `docProps/core.xml`. Timestamps are left out so identical input gives
/// identical bytes.
fn core_xml(meta: &Metadata) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            ("xmlns:cp", NS_CORE_PROPERTIES),
            ("xmlns:dc", NS_DC),
            ("xmlns:dcterms", NS_DCTERMS),
        ],
    )?;
    if let Some(ref title) = meta.title {
        xml.element("dc:title", &[], title)?;
    }
    if let Some(ref subject) = meta.subject {
        xml.element("dc:subject", &[], subject)?;
    }
    if let Some(ref author) = meta.author {
        xml.element("dc:creator", &[], author)?;
    }
    if !meta.keywords.is_empty() {
        xml.element("cp:keywords", &[], &meta.keywords.join(", "))?;
    }
    xml.end("cp:coreProperties")?;
    Ok(xml.into_bytes())
}

fn app_xml(application: &str) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start("Properties", &[("xmlns", NS_EXTENDED_PROPERTIES)])?;
    xml.element("Application", &[], application)?;
    xml.element("DocSecurity", &[], "0")?;
    xml.end("Properties")?;
    Ok(xml.into_bytes())
}
