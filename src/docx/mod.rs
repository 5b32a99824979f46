//! WordprocessingML (.docx) package writing and read-back.

pub mod schema;

mod numbering;
mod reader;
mod styles;
mod writer;

pub use numbering::{AbstractNum, NumInstance, NumLevel, Numbering, BULLET_NUM_ID};
pub use reader::DocxReader;
pub use styles::{ParagraphProps, RunProps, Style, StyleSheet, StyleType};
pub use writer::DocxWriter;
