//! Error types for the cvdocx library.

use std::io;
use thiserror::Error;

/// Result type alias for cvdocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting or inspecting a CV document.
#[derive(Error, Debug)]
pub enum Error {
    /// The photo bytes could not be decoded as an image.
    #[error("Unreadable photo: {0}")]
    UnreadablePhoto(String),

    /// I/O error while writing the package buffer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error writing or reading the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error producing XML content.
    #[error("XML write error: {0}")]
    XmlWrite(String),

    /// Error parsing XML content of an existing package.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// The serialized record could not be decoded.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error during rendering to a preview format.
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    /// Whether the failure was caused by the photo and a retry without it may succeed.
    pub fn is_photo_error(&self) -> bool {
        matches!(self, Error::UnreadablePhoto(_))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::UnreadablePhoto(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidRecord(err.to_string())
    }
}
