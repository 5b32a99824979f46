//! Small streaming XML writer used for every package part.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};

/// Thin wrapper over [`quick_xml::Writer`] writing into memory.
///
/// Attribute values and text are escaped by quick-xml.
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Start a standalone UTF-8 XML part.
    pub fn new() -> Result<Self> {
        let mut inner = Writer::new(Vec::new());
        inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(|e| Error::XmlWrite(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Write an opening tag.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.write(Event::Start(tag))
    }

    /// Write a closing tag.
    pub fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Write a self-closing tag.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.write(Event::Empty(tag))
    }

    /// Write escaped character data.
    pub fn text(&mut self, text: &str) -> Result<()> {
        self.write(Event::Text(BytesText::new(text)))
    }

    /// Write `<name attrs>text</name>`.
    pub fn element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    /// Write a self-closing element carrying a single `w:val` attribute.
    pub fn val(&mut self, name: &str, value: &str) -> Result<()> {
        self.empty(name, &[("w:val", value)])
    }

    /// Finish and return the serialized bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.inner.into_inner()
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|e| Error::XmlWrite(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_text_and_attributes() {
        let mut xml = XmlWriter::new().unwrap();
        xml.start("root", &[("name", "a\"b")]).unwrap();
        xml.element("t", &[], "Tom & Jerry <3").unwrap();
        xml.val("w:b", "1").unwrap();
        xml.end("root").unwrap();

        let out = String::from_utf8(xml.into_bytes()).unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(out.contains("name=\"a&quot;b\""));
        assert!(out.contains("<t>Tom &amp; Jerry &lt;3</t>"));
        assert!(out.contains("<w:b w:val=\"1\"/>"));
        assert!(out.ends_with("</root>"));
    }
}
