//! Text normalization applied to record fields before they reach XML.

use unicode_normalization::UnicodeNormalization;

/// Whitespace-only text counts as absent.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Normalize a single-line field: NFC, XML-safe, inner whitespace collapsed.
pub fn clean_line(text: &str) -> String {
    let text = clean_text(text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a multi-line field.
///
/// Line structure is kept (CRLF folded to LF), trailing spaces on each line
/// and leading/trailing blank lines are dropped.
pub fn clean_text(text: &str) -> String {
    let normalized: String = text
        .nfc()
        .filter(|c| is_xml_char(*c))
        .collect::<String>()
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        // Zero-width characters and BOM
        .replace(['\u{200B}', '\u{FEFF}'], "");

    normalized
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

/// Characters allowed by the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
