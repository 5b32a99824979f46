//! ZIP container abstraction for OOXML packages.
//!
//! [`PackageWriter`] assembles a package in memory; [`OoxmlContainer`] opens
//! one back up for inspection.

use crate::docx::schema::{
    CT_RELATIONSHIPS, CT_XML, NS_CONTENT_TYPES, NS_RELATIONSHIPS, PART_CONTENT_TYPES,
};
use crate::error::{Error, Result};
use crate::model::Metadata;
use crate::xml::XmlWriter;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// A relationship entry from a .rels file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
}

/// Collection of relationships for one source part.
///
/// Insertion order is kept so the written `.rels` part is stable.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
    by_id: HashMap<String, usize>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// Get relationships by type.
    pub fn get_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.entries
            .iter()
            .filter(|r| r.rel_type == rel_type)
            .collect()
    }

    /// Add a relationship, replacing one with the same ID.
    pub fn add(&mut self, rel: Relationship) {
        match self.by_id.get(&rel.id) {
            Some(&i) => self.entries[i] = rel,
            None => {
                self.by_id.insert(rel.id.clone(), self.entries.len());
                self.entries.push(rel);
            }
        }
    }

    /// Add a relationship with the next free `rIdN` and return the ID.
    pub fn push(&mut self, rel_type: &str, target: impl Into<String>) -> String {
        let mut n = self.entries.len() + 1;
        while self.by_id.contains_key(&format!("rId{}", n)) {
            n += 1;
        }
        let id = format!("rId{}", n);
        self.add(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.into(),
        });
        id
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as a `.rels` part.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::new()?;
        xml.start("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
        for rel in &self.entries {
            xml.empty(
                "Relationship",
                &[
                    ("Id", rel.id.as_str()),
                    ("Type", rel.rel_type.as_str()),
                    ("Target", rel.target.as_str()),
                ],
            )?;
        }
        xml.end("Relationships")?;
        Ok(xml.into_bytes())
    }
}

/// `[Content_Types].xml` builder.
#[derive(Debug, Clone)]
pub struct ContentTypes {
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl Default for ContentTypes {
    fn default() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), CT_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), CT_XML.to_string());
        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }
}

impl ContentTypes {
    /// Register a content type for every part with the given extension.
    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        self.defaults
            .insert(extension.to_lowercase(), content_type.to_string());
    }

    /// Register a content type for a single part.
    pub fn add_override(&mut self, part_name: &str, content_type: &str) {
        let key = format!("/{}", part_name.trim_start_matches('/'));
        self.overrides.insert(key, content_type.to_string());
    }

    /// Serialize the content types part.
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlWriter::new()?;
        xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        for (ext, ct) in &self.defaults {
            xml.empty(
                "Default",
                &[("Extension", ext.as_str()), ("ContentType", ct.as_str())],
            )?;
        }
        for (part, ct) in &self.overrides {
            xml.empty(
                "Override",
                &[("PartName", part.as_str()), ("ContentType", ct.as_str())],
            )?;
        }
        xml.end("Types")?;
        Ok(xml.into_bytes())
    }
}

/// Builds an OOXML package in memory.
///
/// Entry timestamps are pinned so identical parts give identical archives.
pub struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    content_types: ContentTypes,
    parts: Vec<String>,
}

impl PackageWriter {
    /// Create an empty package.
    pub fn new() -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options,
            content_types: ContentTypes::default(),
            parts: Vec::new(),
        }
    }

    /// Content types to be written when the package is finished.
    pub fn content_types_mut(&mut self) -> &mut ContentTypes {
        &mut self.content_types
    }

    /// Write a part. Part names are relative to the package root.
    pub fn add_part(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if self.parts.iter().any(|p| p == name) {
            return Err(Error::ZipArchive(format!("duplicate part: {}", name)));
        }
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(data)?;
        self.parts.push(name.to_string());
        Ok(())
    }

    /// Write a part with an override content type.
    pub fn add_typed_part(&mut self, name: &str, content_type: &str, data: &[u8]) -> Result<()> {
        self.content_types.add_override(name, content_type);
        self.add_part(name, data)
    }

    /// Names of the parts written so far.
    pub fn part_names(&self) -> &[String] {
        &self.parts
    }

    /// Write `[Content_Types].xml` and close the archive.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let content_types = self.content_types.to_xml()?;
        self.add_part(PART_CONTENT_TYPES, &content_types)?;
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for PackageWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode XML bytes, stripping a UTF-8 BOM if present.
pub fn decode_xml_bytes(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Read-only view over an existing OOXML package.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Open an OOXML container from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(std::fs::read(path.as_ref())?)
    }

    /// Read an XML part as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        Ok(decode_xml_bytes(&self.read_binary(path)?))
    }

    /// Read a binary part.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }

    /// List all parts in the archive.
    pub fn list_files(&self) -> Vec<String> {
        let archive = self.archive.borrow();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        names
    }

    /// Read the relationships of a part (`word/document.xml` reads
    /// `word/_rels/document.xml.rels`). A missing `.rels` part yields an
    /// empty collection.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let rels_path = if part_path.is_empty() || part_path == "/" {
            "_rels/.rels".to_string()
        } else {
            let path = Path::new(part_path);
            let parent = path.parent().unwrap_or(Path::new(""));
            let filename = path.file_name().unwrap_or_default().to_string_lossy();
            if parent.as_os_str().is_empty() {
                format!("_rels/{}.rels", filename)
            } else {
                format!("{}/_rels/{}.rels", parent.display(), filename)
            }
        };

        let content = match self.read_xml(&rels_path) {
            Ok(c) => c,
            Err(_) => return Ok(Relationships::new()),
        };
        parse_relationships(&content)
    }

    /// Parse core metadata from docProps/core.xml.
    pub fn parse_core_metadata(&self) -> Result<Metadata> {
        let mut meta = Metadata::default();
        let Ok(xml) = self.read_xml("docProps/core.xml") else {
            return Ok(meta);
        };

        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut current_element: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(e)) => {
                    let name = e.name();
                    current_element =
                        Some(String::from_utf8_lossy(name.local_name().as_ref()).to_string());
                }
                Ok(quick_xml::events::Event::Text(e)) => {
                    if let Some(ref elem) = current_element {
                        let text = e.unescape().unwrap_or_default().to_string();
                        match elem.as_str() {
                            "title" => meta.title = Some(text),
                            "creator" => meta.author = Some(text),
                            "subject" => meta.subject = Some(text),
                            "keywords" => {
                                meta.keywords = text
                                    .split([',', ';'])
                                    .map(|s| s.trim().to_string())
                                    .filter(|s| !s.is_empty())
                                    .collect();
                            }
                            _ => {}
                        }
                    }
                }
                Ok(quick_xml::events::Event::End(_)) => {
                    current_element = None;
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(meta)
    }
}

fn parse_relationships(content: &str) -> Result<Relationships> {
    let mut rels = Relationships::new();
    if content.trim().is_empty() {
        return Ok(rels);
    }

    let mut reader = quick_xml::Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Empty(e)) if e.name().as_ref() == b"Relationship" => {
                let mut id = String::new();
                let mut rel_type = String::new();
                let mut target = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }

                if !id.is_empty() {
                    rels.add(Relationship {
                        id,
                        rel_type,
                        target,
                    });
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationships_push_and_lookup() {
        let mut rels = Relationships::new();
        let a = rels.push("type/styles", "styles.xml");
        let b = rels.push("type/image", "media/image1.png");
        assert_eq!(a, "rId1");
        assert_eq!(b, "rId2");
        assert_eq!(rels.get("rId2").unwrap().target, "media/image1.png");
        assert_eq!(rels.get_by_type("type/styles").len(), 1);
    }

    #[test]
    fn test_relationships_roundtrip_through_xml() {
        let mut rels = Relationships::new();
        rels.push("http://example.com/rel", "word/document.xml");
        let xml = String::from_utf8(rels.to_xml().unwrap()).unwrap();
        let parsed = parse_relationships(&xml).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("rId1").unwrap().target, "word/document.xml");
    }

    #[test]
    fn test_content_types_xml() {
        let mut ct = ContentTypes::default();
        ct.add_default("PNG", "image/png");
        ct.add_override("word/document.xml", "application/test+xml");
        let xml = String::from_utf8(ct.to_xml().unwrap()).unwrap();
        assert!(xml.contains("<Default Extension=\"png\" ContentType=\"image/png\"/>"));
        assert!(xml.contains("PartName=\"/word/document.xml\""));
    }

    #[test]
    fn test_package_roundtrip() {
        let mut pkg = PackageWriter::new();
        pkg.add_part("word/document.xml", b"<w:document/>").unwrap();
        pkg.add_part("word/media/a.bin", &[1, 2, 3]).unwrap();
        let bytes = pkg.finish().unwrap();

        let container = OoxmlContainer::from_bytes(bytes).unwrap();
        assert!(container.exists("[Content_Types].xml"));
        assert_eq!(container.read_xml("word/document.xml").unwrap(), "<w:document/>");
        assert_eq!(container.read_binary("word/media/a.bin").unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            container.read_binary("missing.xml"),
            Err(Error::MissingComponent(_))
        ));
    }

    #[test]
    fn test_duplicate_part_rejected() {
        let mut pkg = PackageWriter::new();
        pkg.add_part("a.xml", b"<a/>").unwrap();
        assert!(pkg.add_part("a.xml", b"<a/>").is_err());
    }

    #[test]
    fn test_package_is_stable() {
        let build = || {
            let mut pkg = PackageWriter::new();
            pkg.add_part("word/document.xml", b"<w:document/>").unwrap();
            pkg.finish().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_decode_strips_bom() {
        assert_eq!(decode_xml_bytes(&[0xEF, 0xBB, 0xBF, b'<', b'a', b'/', b'>']), "<a/>");
    }
}
