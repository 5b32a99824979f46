//! Record-to-document composition.
//!
//! A straight structural transform: each record field maps onto a fixed
//! section, sections appear in a fixed order, and anything blank is left
//! out rather than rendered empty.

use crate::error::Result;
use crate::model::{
    Block, CvRecord, Document, EducationEntry, ExperienceEntry, HeadingLevel, Metadata,
    Paragraph, Section, SectionKind, TextRun, TextStyle,
};
use crate::options::ExportOptions;
use crate::photo::{decode_photo, display_size};
use crate::sanitize::{clean_line, clean_text, is_blank};

/// Resource ID of the embedded photo.
pub const PHOTO_RESOURCE_ID: &str = "image1";

/// Paragraph style of the line under the name.
pub const SUBTITLE_STYLE: &str = "Subtitle";

/// Paragraph style of the contact line.
pub const CONTACT_STYLE: &str = "Contact";

/// Color of the period suffix on entry sub-headings.
const PERIOD_COLOR: &str = "5A6B7A";

/// Compose a record into a document.
///
/// The only failure is an unreadable photo; it is detected before any
/// section is built.
pub fn compose(record: &CvRecord, options: &ExportOptions) -> Result<Document> {
    let mut doc = Document::new();
    doc.metadata = build_metadata(record);

    doc.add_section(header_section(record, &options.contact_separator));

    if options.include_photo {
        if let Some(photo) = record.photo.as_ref().filter(|p| !p.is_empty()) {
            let decoded = decode_photo(photo)?;
            let (width, height) =
                display_size(decoded.width_px, decoded.height_px, options.photo_max_emu);
            tracing::debug!(
                width_px = decoded.width_px,
                height_px = decoded.height_px,
                width_emu = width,
                height_emu = height,
                format = decoded.format.extension(),
                "Embedding photo"
            );

            let mut section = Section::new(SectionKind::Photo);
            section.add_block(Block::Image {
                resource_id: PHOTO_RESOURCE_ID.to_string(),
                alt_text: Some(photo_alt_text(record)),
                width,
                height,
            });
            doc.add_section(section);
            doc.add_resource(PHOTO_RESOURCE_ID, decoded.into_resource());
        }
    }

    let labels = &options.labels;

    let summary = clean_text(&record.summary);
    if !summary.is_empty() {
        let mut section = titled_section(SectionKind::Summary, &labels.summary);
        section.add_paragraph(Paragraph::with_text(summary));
        doc.add_section(section);
    }

    let skills: Vec<String> = record
        .skills
        .iter()
        .map(|s| clean_line(s))
        .filter(|s| !s.is_empty())
        .collect();
    if !skills.is_empty() {
        let mut section = titled_section(SectionKind::Skills, &labels.skills);
        for skill in skills {
            section.add_paragraph(Paragraph::bullet(skill));
        }
        doc.add_section(section);
    }

    let experience = non_blank(&record.experience, ExperienceEntry::is_blank, "experience");
    if !experience.is_empty() {
        let mut section = titled_section(SectionKind::Experience, &labels.experience);
        for entry in experience {
            add_experience_entry(&mut section, entry);
        }
        doc.add_section(section);
    }

    let education = non_blank(&record.education, EducationEntry::is_blank, "education");
    if !education.is_empty() {
        let mut section = titled_section(SectionKind::Education, &labels.education);
        for entry in education {
            let heading = join_non_empty(
                [
                    clean_line(&entry.degree),
                    clean_line(&entry.institution),
                    clean_line(&entry.period),
                ],
                ", ",
            );
            section.add_paragraph(Paragraph::heading(HeadingLevel::H2, heading));
        }
        doc.add_section(section);
    }

    tracing::debug!(sections = ?doc.section_kinds(), "Composed document");
    Ok(doc)
}

/// Assemble the contact line from the non-blank contact fields.
///
/// Returns `None` when every field is blank, so no empty line and no
/// dangling separators are produced.
pub fn contact_line(record: &CvRecord, separator: &str) -> Option<String> {
    let glyph = separator.trim();
    let parts: Vec<String> = record
        .contact_fields()
        .iter()
        .map(|field| strip_separator(&clean_line(field), glyph))
        .filter(|field| !field.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(separator))
    }
}

/// Trim separator glyphs and whitespace from both ends of a contact field.
fn strip_separator(field: &str, glyph: &str) -> String {
    let mut field = field.trim();
    if !glyph.is_empty() {
        loop {
            let stripped = field
                .trim_start_matches(glyph)
                .trim_end_matches(glyph)
                .trim();
            if stripped.len() == field.len() {
                break;
            }
            field = stripped;
        }
    }
    field.to_string()
}

/// Sub-heading text for an experience entry: "role at organization, period".
pub fn experience_heading(entry: &ExperienceEntry) -> String {
    let role = clean_line(&entry.role);
    let organization = clean_line(&entry.organization);
    let lead = match (role.is_empty(), organization.is_empty()) {
        (false, false) => format!("{} at {}", role, organization),
        (false, true) => role,
        (true, false) => organization,
        (true, true) => String::new(),
    };
    join_non_empty([lead, clean_line(&entry.period)], ", ")
}

fn header_section(record: &CvRecord, separator: &str) -> Section {
    let mut section = Section::new(SectionKind::Header);

    // The title paragraph is always present, even for an empty name.
    section.add_paragraph(Paragraph::heading(
        HeadingLevel::Title,
        clean_line(&record.full_name),
    ));

    let title = clean_line(&record.title);
    if !title.is_empty() {
        section.add_paragraph(Paragraph::with_text(title).with_style(SUBTITLE_STYLE));
    }

    if let Some(line) = contact_line(record, separator) {
        section.add_paragraph(Paragraph::with_text(line).with_style(CONTACT_STYLE));
    }

    section
}

fn titled_section(kind: SectionKind, label: &str) -> Section {
    let mut section = Section::new(kind);
    section.add_paragraph(Paragraph::heading(HeadingLevel::H1, clean_line(label)));
    section
}

fn add_experience_entry(section: &mut Section, entry: &ExperienceEntry) {
    let role = clean_line(&entry.role);
    let organization = clean_line(&entry.organization);
    let period = clean_line(&entry.period);

    let lead = experience_heading(&ExperienceEntry {
        period: String::new(),
        ..entry.clone()
    });

    if !lead.is_empty() || !period.is_empty() {
        let mut heading = Paragraph::heading(HeadingLevel::H2, "");
        if !lead.is_empty() {
            heading.add_run(TextRun::plain(lead));
        }
        if !period.is_empty() {
            let text = if role.is_empty() && organization.is_empty() {
                period
            } else {
                format!(", {}", period)
            };
            heading.add_run(TextRun::styled(
                text,
                TextStyle {
                    color: Some(PERIOD_COLOR.to_string()),
                    ..Default::default()
                },
            ));
        }
        section.add_paragraph(heading);
    }

    let description = clean_text(&entry.description);
    if !description.is_empty() {
        section.add_paragraph(Paragraph::with_text(description));
    }

    for highlight in &entry.highlights {
        let highlight = clean_line(highlight);
        if !highlight.is_empty() {
            section.add_paragraph(Paragraph::bullet(highlight));
        }
    }
}

fn non_blank<'a, T>(entries: &'a [T], blank: fn(&T) -> bool, what: &str) -> Vec<&'a T> {
    let kept: Vec<&T> = entries.iter().filter(|e| !blank(e)).collect();
    let skipped = entries.len() - kept.len();
    if skipped > 0 {
        tracing::warn!(skipped, section = what, "Skipping blank entries");
    }
    kept
}

fn join_non_empty<const N: usize>(parts: [String; N], separator: &str) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn photo_alt_text(record: &CvRecord) -> String {
    let name = clean_line(&record.full_name);
    if name.is_empty() {
        "Profile photo".to_string()
    } else {
        format!("Photo of {}", name)
    }
}

fn build_metadata(record: &CvRecord) -> Metadata {
    let non_empty = |s: &str| {
        let cleaned = clean_line(s);
        (!cleaned.is_empty()).then_some(cleaned)
    };

    let name = non_empty(&record.full_name);
    Metadata {
        title: name.as_ref().map(|n| format!("{} - CV", n)),
        author: name,
        subject: non_empty(&record.title),
        keywords: record
            .skills
            .iter()
            .filter(|s| !is_blank(s))
            .map(|s| clean_line(s))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Photo;

    fn record() -> CvRecord {
        CvRecord {
            full_name: "Ada Lovelace".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_record_has_only_title() {
        let doc = compose(&CvRecord::default(), &ExportOptions::default()).unwrap();
        assert_eq!(doc.section_kinds(), vec![SectionKind::Header]);
        let header = doc.section(SectionKind::Header).unwrap();
        assert_eq!(header.len(), 1);
        assert_eq!(header.paragraph_texts(), vec![String::new()]);
        assert!(doc.metadata.title.is_none());
    }

    #[test]
    fn test_contact_line_collapses_blanks() {
        let rec = CvRecord {
            email: "ada@example.com".to_string(),
            phone: "   ".to_string(),
            address: "London".to_string(),
            ..Default::default()
        };
        assert_eq!(
            contact_line(&rec, " | ").as_deref(),
            Some("ada@example.com | London")
        );
        assert_eq!(contact_line(&CvRecord::default(), " | "), None);
    }

    #[test]
    fn test_contact_line_drops_separator_only_fields() {
        let rec = CvRecord {
            email: "a@b.c".to_string(),
            phone: " | ".to_string(),
            address: "London".to_string(),
            linkedin: "|| ".to_string(),
            portfolio: "| https://ada.dev |".to_string(),
            ..Default::default()
        };
        assert_eq!(
            contact_line(&rec, " | ").as_deref(),
            Some("a@b.c | London | https://ada.dev")
        );

        let only_glyphs = CvRecord {
            phone: "|".to_string(),
            ..Default::default()
        };
        assert_eq!(contact_line(&only_glyphs, " | "), None);
        assert_eq!(
            contact_line(&rec, " · ").as_deref(),
            Some("a@b.c · | · London · || · | https://ada.dev |")
        );
    }

    #[test]
    fn test_contact_line_includes_links() {
        let rec = CvRecord {
            phone: "+44 1".to_string(),
            portfolio: "https://ada.dev".to_string(),
            ..Default::default()
        };
        assert_eq!(
            contact_line(&rec, " | ").as_deref(),
            Some("+44 1 | https://ada.dev")
        );
    }

    #[test]
    fn test_experience_heading_variants() {
        assert_eq!(
            experience_heading(&ExperienceEntry::new("Engineer", "Acme", "2020 - 2023")),
            "Engineer at Acme, 2020 - 2023"
        );
        assert_eq!(experience_heading(&ExperienceEntry::new("Engineer", "", "")), "Engineer");
        assert_eq!(experience_heading(&ExperienceEntry::new("", "Acme", "2020")), "Acme, 2020");
        assert_eq!(experience_heading(&ExperienceEntry::new("", "", "2020")), "2020");
    }

    #[test]
    fn test_experience_entry_paragraphs() {
        let mut rec = record();
        rec.experience.push(
            ExperienceEntry::new("Analyst", "Babbage & Co", "1842")
                .with_description("Translated the memoir.\nAdded notes.")
                .with_highlight("Wrote the first program"),
        );
        let doc = compose(&rec, &ExportOptions::default()).unwrap();
        let section = doc.section(SectionKind::Experience).unwrap();
        assert_eq!(
            section.paragraph_texts(),
            vec![
                "Experience".to_string(),
                "Analyst at Babbage & Co, 1842".to_string(),
                "Translated the memoir.\nAdded notes.".to_string(),
                "Wrote the first program".to_string(),
            ]
        );
        let bullets: Vec<_> = section.paragraphs().filter(|p| p.is_list_item()).collect();
        assert_eq!(bullets.len(), 1);
    }

    #[test]
    fn test_blank_entries_skipped_order_kept() {
        let mut rec = record();
        rec.education = vec![
            EducationEntry::new("BSc", "Uni A", "2010"),
            EducationEntry::default(),
            EducationEntry::new("MSc", "Uni B", "2012"),
        ];
        let doc = compose(&rec, &ExportOptions::default()).unwrap();
        assert_eq!(
            doc.section(SectionKind::Education).unwrap().paragraph_texts(),
            vec!["Education", "BSc, Uni A, 2010", "MSc, Uni B, 2012"]
        );
    }

    #[test]
    fn test_blank_skills_dropped() {
        let mut rec = record();
        rec.skills = vec!["  ".to_string()];
        let doc = compose(&rec, &ExportOptions::default()).unwrap();
        assert!(!doc.has_section(SectionKind::Skills));
    }

    #[test]
    fn test_photo_omitted_when_disabled() {
        let rec = record().with_photo(b"garbage".to_vec());
        let doc = compose(&rec, &ExportOptions::default().with_photo(false)).unwrap();
        assert!(!doc.has_section(SectionKind::Photo));
        assert!(doc.resources.is_empty());
    }

    #[test]
    fn test_empty_photo_bytes_treated_as_absent() {
        let mut rec = record();
        rec.photo = Some(Photo::default());
        let doc = compose(&rec, &ExportOptions::default()).unwrap();
        assert!(!doc.has_images());
    }

    #[test]
    fn test_corrupt_photo_fails() {
        let rec = record().with_photo(vec![0x89, b'P', b'N', b'G', 0, 0]);
        let err = compose(&rec, &ExportOptions::default()).unwrap_err();
        assert!(err.is_photo_error());
    }

    #[test]
    fn test_custom_labels() {
        let mut rec = record();
        rec.summary = "Mathematician.".to_string();
        let labels = crate::options::SectionLabels {
            summary: "Profile".to_string(),
            ..Default::default()
        };
        let doc = compose(&rec, &ExportOptions::default().with_labels(labels)).unwrap();
        assert_eq!(
            doc.section(SectionKind::Summary).unwrap().paragraph_texts()[0],
            "Profile"
        );
    }

    #[test]
    fn test_metadata() {
        let mut rec = record();
        rec.title = "Analyst".to_string();
        rec.skills = vec!["Math".to_string(), " ".to_string()];
        let doc = compose(&rec, &ExportOptions::default()).unwrap();
        assert_eq!(doc.metadata.title.as_deref(), Some("Ada Lovelace - CV"));
        assert_eq!(doc.metadata.author.as_deref(), Some("Ada Lovelace"));
        assert_eq!(doc.metadata.subject.as_deref(), Some("Analyst"));
        assert_eq!(doc.metadata.keywords, vec!["Math"]);
    }
}
