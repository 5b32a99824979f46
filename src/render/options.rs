//! Rendering options configuration.

/// Default accent color of the modern preview theme.
pub const DEFAULT_ACCENT: &str = "#0b6efd";

/// Visual theme of the HTML preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewTheme {
    /// Card layout with an accent color
    #[default]
    Modern,
    /// Black-on-white serif layout
    Classic,
}

impl PreviewTheme {
    /// Parse a theme name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "modern" => Some(PreviewTheme::Modern),
            "classic" => Some(PreviewTheme::Classic),
            _ => None,
        }
    }
}

/// Options for rendering documents.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// HTML preview theme
    pub theme: PreviewTheme,

    /// Accent color (`#rrggbb`) used by the modern theme
    pub accent: String,

    /// Character used to underline headings in text output
    pub underline_char: char,

    /// Add blank line between paragraphs
    pub paragraph_spacing: bool,

    /// Inline the photo into HTML output
    pub include_photo: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: PreviewTheme::Modern,
            accent: DEFAULT_ACCENT.to_string(),
            underline_char: '=',
            paragraph_spacing: true,
            include_photo: true,
        }
    }
}

impl RenderOptions {
    /// Create new render options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preview theme.
    pub fn with_theme(mut self, theme: PreviewTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the accent color. Anything other than a 6-digit hex color
    /// (with or without `#`) is ignored.
    pub fn with_accent(mut self, accent: &str) -> Self {
        let hex = accent.trim().trim_start_matches('#');
        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            self.accent = format!("#{}", hex.to_lowercase());
        }
        self
    }

    /// Set the heading underline character for text output.
    pub fn with_underline(mut self, ch: char) -> Self {
        self.underline_char = ch;
        self
    }

    /// Toggle blank lines between paragraphs in text output.
    pub fn with_paragraph_spacing(mut self, spacing: bool) -> Self {
        self.paragraph_spacing = spacing;
        self
    }

    /// Toggle the inline photo in HTML output.
    pub fn with_photo(mut self, include: bool) -> Self {
        self.include_photo = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = RenderOptions::default();
        assert_eq!(opts.theme, PreviewTheme::Modern);
        assert_eq!(opts.accent, DEFAULT_ACCENT);
        assert!(opts.include_photo);
    }

    #[test]
    fn test_accent_validation() {
        assert_eq!(RenderOptions::new().with_accent("AA00ff").accent, "#aa00ff");
        assert_eq!(RenderOptions::new().with_accent("#123456").accent, "#123456");
        assert_eq!(RenderOptions::new().with_accent("red").accent, DEFAULT_ACCENT);
        assert_eq!(
            RenderOptions::new().with_accent("#12345g").accent,
            DEFAULT_ACCENT
        );
    }

    #[test]
    fn test_theme_names() {
        assert_eq!(PreviewTheme::from_name("Classic"), Some(PreviewTheme::Classic));
        assert_eq!(PreviewTheme::from_name(" modern "), Some(PreviewTheme::Modern));
        assert_eq!(PreviewTheme::from_name("minimal"), None);
    }
}
