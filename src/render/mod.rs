//! Output rendering for composed documents.
//!
//! Besides the `.docx` package itself, a composed [`Document`](crate::Document)
//! can be rendered as plain text, an HTML preview, or JSON.
//!
//! # Example
//!
//! ```
//! use cvdocx::{compose, render::*, CvRecord, ExportOptions};
//!
//! let doc = compose(&CvRecord::sample(), &ExportOptions::default())?;
//!
//! let text = to_text(&doc, &RenderOptions::default())?;
//! assert!(text.starts_with("Jojo Montford"));
//!
//! let html = to_html(&doc, &RenderOptions::default().with_theme(PreviewTheme::Classic))?;
//! assert!(html.contains("class=\"paper\""));
//!
//! let json = to_json(&doc, JsonFormat::Pretty)?;
//! assert!(json.contains("\"kind\": \"header\""));
//! # Ok::<(), cvdocx::Error>(())
//! ```

mod html;
mod json;
mod options;
mod text;

pub use html::to_html;
pub use json::{to_json, JsonFormat};
pub use options::{PreviewTheme, RenderOptions, DEFAULT_ACCENT};
pub use text::to_text;
