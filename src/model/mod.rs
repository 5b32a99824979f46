//! Data structures for CV export.
//!
//! [`CvRecord`] is the input handed over by the collector. The exporter
//! composes it into a [`Document`], a format-agnostic tree of sections and
//! paragraphs that the package writer and the preview renderers consume.

mod document;
mod paragraph;
mod record;
mod resource;

pub use document::*;
pub use paragraph::*;
pub use record::*;
pub use resource::*;
