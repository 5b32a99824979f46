//! # cvdocx
//!
//! Export structured CV records to formatted Word (`.docx`) documents.
//!
//! The exporter is a pure function: a [`CvRecord`] goes in, the bytes of a
//! complete WordprocessingML package come out. Blank fields are left out,
//! sections appear in a fixed order, and the same record always yields the
//! same bytes.
//!
//! ## Quick Start
//!
//! ```
//! use cvdocx::{export, CvRecord, DocxReader, SectionKind};
//!
//! let record = CvRecord::sample();
//! let bytes = export(&record)?;
//! assert_eq!(&bytes[..2], b"PK");
//!
//! // Read the package back
//! let doc = DocxReader::from_bytes(bytes)?.read()?;
//! assert_eq!(doc.sections[0].kind, SectionKind::Header);
//! # Ok::<(), cvdocx::Error>(())
//! ```
//!
//! ## Options
//!
//! ```
//! use cvdocx::{export_with_options, CvRecord, ExportOptions};
//!
//! let options = ExportOptions::new()
//!     .with_contact_separator(" · ")
//!     .with_photo_max_inches(1.5);
//! let bytes = export_with_options(&CvRecord::sample(), &options)?;
//! # Ok::<(), cvdocx::Error>(())
//! ```

pub mod compose;
pub mod container;
pub mod docx;
pub mod error;
pub mod highlights;
pub mod model;
pub mod options;
pub mod photo;
pub mod render;
pub mod sanitize;
mod xml;

// Re-exports
pub use compose::compose;
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use docx::schema::DOCX_MIME_TYPE;
pub use docx::{DocxReader, DocxWriter};
pub use error::{Error, Result};
pub use highlights::HighlightMode;
pub use model::{
    Block, CvRecord, Document, EducationEntry, ExperienceEntry, HeadingLevel, ListInfo,
    MediaFormat, Metadata, Paragraph, Photo, Resource, Section, SectionKind, TextAlignment,
    TextRun, TextStyle,
};
pub use options::{ExportOptions, SectionLabels};

/// Export a record with default options.
///
/// Fails only with [`Error::UnreadablePhoto`] when the photo holds at least
/// one byte and cannot be decoded as an image. A photo with zero bytes is
/// treated as absent.
pub fn export(record: &CvRecord) -> Result<Vec<u8>> {
    export_with_options(record, &ExportOptions::default())
}

/// Export a record with explicit options.
///
/// # Example
///
/// ```
/// use cvdocx::{export_with_options, CvRecord, ExportOptions};
///
/// let record = CvRecord {
///     full_name: "Ada Lovelace".to_string(),
///     ..Default::default()
/// }
/// .with_photo(b"not an image".to_vec());
/// let err = export_with_options(&record, &ExportOptions::default()).unwrap_err();
/// assert!(err.is_photo_error());
///
/// // Skipping the photo never fails
/// let options = ExportOptions::default().with_photo(false);
/// assert!(export_with_options(&record, &options).is_ok());
/// ```
pub fn export_with_options(record: &CvRecord, options: &ExportOptions) -> Result<Vec<u8>> {
    let doc = compose(record, options)?;
    let bytes = DocxWriter::new(options).write(&doc)?;
    tracing::info!(
        sections = doc.sections.len(),
        photo_bytes = doc.resources.values().map(|r| r.size).sum::<usize>(),
        bytes = bytes.len(),
        "Exported CV"
    );
    Ok(bytes)
}

/// Read an exported package back into its section model.
pub fn inspect(bytes: &[u8]) -> Result<Document> {
    DocxReader::from_bytes(bytes.to_vec())?.read()
}

/// Download file name for a record: the name with spaces replaced by
/// underscores, or `candidate` when no name is set.
///
/// # Example
///
/// ```
/// use cvdocx::{suggested_filename, CvRecord};
///
/// let record = CvRecord {
///     full_name: "Ada Lovelace".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(suggested_filename(&record), "Ada_Lovelace_CV.docx");
/// assert_eq!(suggested_filename(&CvRecord::default()), "candidate_CV.docx");
/// ```
pub fn suggested_filename(record: &CvRecord) -> String {
    let name = sanitize::clean_line(&record.full_name);
    let stem: String = name
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        "candidate_CV.docx".to_string()
    } else {
        format!("{}_CV.docx", stem)
    }
}
