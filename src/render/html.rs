//! HTML preview renderer.
//!
//! Produces a standalone page for a quick look at the composed CV before
//! opening the `.docx`. The photo is inlined as a data URI.

use std::fmt::Write as _;

use base64::Engine as _;

use crate::compose::{CONTACT_STYLE, SUBTITLE_STYLE};
use crate::error::{Error, Result};
use crate::model::{Block, Document, HeadingLevel, Paragraph, Section, SectionKind};

use super::options::{PreviewTheme, RenderOptions};

/// Convert a Document to an HTML preview page.
pub fn to_html(doc: &Document, options: &RenderOptions) -> Result<String> {
    let mut out = String::new();
    write_page(&mut out, doc, options).map_err(|e| Error::Render(e.to_string()))?;
    Ok(out)
}

fn write_page(out: &mut String, doc: &Document, options: &RenderOptions) -> std::fmt::Result {
    let title = doc.metadata.title.as_deref().unwrap_or("CV");
    writeln!(out, "<!doctype html>")?;
    writeln!(out, "<html><head><meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{}</title>", escape_html(title))?;
    writeln!(out, "<style>{}</style>", stylesheet(options))?;
    writeln!(out, "</head><body>")?;
    writeln!(out, "<div class=\"{}\">", page_class(options.theme))?;

    let photo = if options.include_photo {
        photo_data_uri(doc)
    } else {
        None
    };

    for section in &doc.sections {
        match section.kind {
            SectionKind::Header => write_header(out, section, photo.as_deref())?,
            // Rendered inside the header.
            SectionKind::Photo => {}
            SectionKind::Skills if options.theme == PreviewTheme::Modern => {
                write_skill_chips(out, section)?
            }
            _ => write_section(out, section, options.theme)?,
        }
    }

    writeln!(out, "</div>")?;
    write!(out, "</body></html>")
}

fn write_header(out: &mut String, section: &Section, photo: Option<&str>) -> std::fmt::Result {
    writeln!(out, "<div class=\"header\">")?;
    if let Some(src) = photo {
        writeln!(out, "<img src=\"{}\" class=\"photo\" alt=\"\"/>", src)?;
    }
    writeln!(out, "<div>")?;
    for para in section.paragraphs() {
        let class = if para.heading == HeadingLevel::Title {
            "name"
        } else {
            match para.style_id.as_deref() {
                Some(SUBTITLE_STYLE) => "title",
                Some(CONTACT_STYLE) => "meta",
                _ => "",
            }
        };
        let text = paragraph_html(para);
        if !text.is_empty() {
            writeln!(out, "<div class=\"{}\">{}</div>", class, text)?;
        }
    }
    writeln!(out, "</div>")?;
    writeln!(out, "</div>")
}

fn write_section(out: &mut String, section: &Section, theme: PreviewTheme) -> std::fmt::Result {
    let mut in_list = false;
    for block in &section.content {
        let Block::Paragraph(para) = block else {
            continue;
        };

        if para.is_list_item() != in_list {
            writeln!(out, "{}", if in_list { "</ul>" } else { "<ul>" })?;
            in_list = !in_list;
        }

        let text = paragraph_html(para);
        match para.heading {
            HeadingLevel::H1 => match theme {
                PreviewTheme::Modern => writeln!(out, "<div class=\"section-title\">{}</div>", text)?,
                PreviewTheme::Classic => writeln!(out, "<h2>{}</h2>", text)?,
            },
            HeadingLevel::H2 | HeadingLevel::Title => {
                writeln!(out, "<div class=\"entry\"><strong>{}</strong></div>", text)?
            }
            HeadingLevel::None if in_list => writeln!(out, "<li>{}</li>", text)?,
            HeadingLevel::None => writeln!(out, "<p>{}</p>", text)?,
        }
    }
    if in_list {
        writeln!(out, "</ul>")?;
    }
    Ok(())
}

fn write_skill_chips(out: &mut String, section: &Section) -> std::fmt::Result {
    for para in section.paragraphs() {
        let text = paragraph_html(para);
        if para.heading == HeadingLevel::H1 {
            writeln!(out, "<div class=\"section-title\">{}</div>", text)?;
        } else {
            writeln!(out, "<span class=\"skill\">{}</span>", text)?;
        }
    }
    Ok(())
}

/// Paragraph text as escaped HTML; colored runs become muted spans.
fn paragraph_html(para: &Paragraph) -> String {
    let mut html = String::new();
    for run in &para.runs {
        let text = escape_html(&run.text).replace('\n', "<br/>");
        if run.style.color.is_some() {
            html.push_str("<span class=\"muted\">");
            html.push_str(&text);
            html.push_str("</span>");
        } else {
            html.push_str(&text);
        }
    }
    html
}

fn photo_data_uri(doc: &Document) -> Option<String> {
    let resource_id = doc.section(SectionKind::Photo)?.content.iter().find_map(|b| match b {
        Block::Image { resource_id, .. } => Some(resource_id.as_str()),
        Block::Paragraph(_) => None,
    })?;
    let resource = doc.get_resource(resource_id)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&resource.data);
    Some(format!("data:{};base64,{}", resource.format.mime_type(), encoded))
}

fn page_class(theme: PreviewTheme) -> &'static str {
    match theme {
        PreviewTheme::Modern => "card",
        PreviewTheme::Classic => "paper",
    }
}

fn stylesheet(options: &RenderOptions) -> String {
    match options.theme {
        PreviewTheme::Modern => format!(
            "body{{font-family:-apple-system,'Segoe UI',Roboto,Arial,sans-serif;color:#1b2b3a}}\
             .card{{background:white;padding:18px;border-radius:10px;box-shadow:0 8px 24px rgba(12,30,60,0.08);max-width:640px}}\
             .header{{display:flex;gap:12px;align-items:center;border-bottom:3px solid #f3f6fb;padding-bottom:10px;margin-bottom:10px}}\
             .name{{font-weight:700;font-size:20px;color:{accent}}}\
             .title{{font-size:13px;color:#334155;margin-top:3px}}\
             .meta{{font-size:12px;color:#64748b;margin-top:8px}}\
             .section-title{{font-weight:700;margin-top:12px;color:#0f172a;font-size:12px;border-bottom:1px solid #eef2ff;padding-bottom:4px}}\
             .entry{{margin-top:8px}}\
             .muted{{color:#64748b}}\
             .skill{{display:inline-block;padding:6px 8px;border-radius:10px;background:#f0faff;margin:4px 4px 0 0;font-size:12px;color:{accent}}}\
             ul{{margin:6px 0 0 18px;padding:0}}li{{margin-bottom:6px;font-size:13px}}\
             .photo{{width:64px;height:64px;border-radius:8px;object-fit:cover}}",
            accent = options.accent
        ),
        PreviewTheme::Classic => "body{font-family:'Times New Roman',Times,serif;color:#000}\
             .paper{padding:16px;background:white;border:1px solid #eee;max-width:640px}\
             .header{display:flex;gap:12px;align-items:center}\
             .name{margin:0;font-size:20px;font-weight:700}\
             h2{margin:12px 0 8px 0;font-size:13px;color:#333}\
             .title,.meta,.muted{color:#555;font-size:12px}\
             ul{margin:6px 0 0 18px;padding:0}li{margin-bottom:6px;font-size:13px}\
             .photo{width:64px;height:64px;object-fit:cover}"
            .to_string(),
    }
}

/// Escape text for HTML content and attribute values.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MediaFormat, Resource};

    fn doc() -> Document {
        let mut doc = Document::new();
        doc.metadata.title = Some("Ada <Lovelace> - CV".to_string());

        let mut header = Section::new(SectionKind::Header);
        header.add_paragraph(Paragraph::heading(HeadingLevel::Title, "Ada <Lovelace>"));
        header.add_paragraph(Paragraph::with_text("Analyst").with_style(SUBTITLE_STYLE));
        doc.add_section(header);

        let mut skills = Section::new(SectionKind::Skills);
        skills.add_paragraph(Paragraph::heading(HeadingLevel::H1, "Skills"));
        skills.add_paragraph(Paragraph::bullet("Math & Logic"));
        doc.add_section(skills);

        let mut experience = Section::new(SectionKind::Experience);
        experience.add_paragraph(Paragraph::heading(HeadingLevel::H1, "Experience"));
        experience.add_paragraph(Paragraph::heading(HeadingLevel::H2, "Analyst"));
        experience.add_paragraph(Paragraph::bullet("Wrote notes"));
        experience.add_paragraph(Paragraph::with_text("After"));
        doc.add_section(experience);
        doc
    }

    #[test]
    fn test_text_is_escaped() {
        let html = to_html(&doc(), &RenderOptions::default()).unwrap();
        assert!(html.contains("<title>Ada &lt;Lovelace&gt; - CV</title>"));
        assert!(html.contains("<div class=\"name\">Ada &lt;Lovelace&gt;</div>"));
        assert!(html.contains("<span class=\"skill\">Math &amp; Logic</span>"));
        assert!(!html.contains("<Lovelace>"));
    }

    #[test]
    fn test_header_classes_follow_document_styles() {
        let sheet = crate::docx::StyleSheet::default();
        assert!(sheet.get(SUBTITLE_STYLE).is_some());
        assert!(sheet.get(CONTACT_STYLE).is_some());

        let mut doc = doc();
        doc.sections[0].add_paragraph(Paragraph::with_text("a@b.c").with_style(CONTACT_STYLE));
        let html = to_html(&doc, &RenderOptions::default()).unwrap();
        assert!(html.contains("<div class=\"title\">Analyst</div>"));
        assert!(html.contains("<div class=\"meta\">a@b.c</div>"));
    }

    #[test]
    fn test_modern_uses_accent() {
        let opts = RenderOptions::default().with_accent("#ff0000");
        let html = to_html(&doc(), &opts).unwrap();
        assert!(html.contains("color:#ff0000"));
        assert!(html.contains("class=\"card\""));
    }

    #[test]
    fn test_classic_lists() {
        let opts = RenderOptions::default().with_theme(PreviewTheme::Classic);
        let html = to_html(&doc(), &opts).unwrap();
        assert!(html.contains("class=\"paper\""));
        assert!(html.contains("<h2>Skills</h2>\n<ul>\n<li>Math &amp; Logic</li>\n</ul>"));
        assert!(html.contains("<li>Wrote notes</li>\n</ul>\n<p>After</p>"));
    }

    #[test]
    fn test_photo_data_uri() {
        let mut doc = doc();
        let mut photo = Section::new(SectionKind::Photo);
        photo.add_block(Block::Image {
            resource_id: "image1".to_string(),
            alt_text: None,
            width: 1,
            height: 1,
        });
        doc.sections.insert(1, photo);
        doc.add_resource("image1", Resource::image(MediaFormat::Png, b"png".to_vec()));

        let html = to_html(&doc, &RenderOptions::default()).unwrap();
        assert!(html.contains("src=\"data:image/png;base64,cG5n\""));

        let html = to_html(&doc, &RenderOptions::default().with_photo(false)).unwrap();
        assert!(!html.contains("data:image/png"));
    }
}
