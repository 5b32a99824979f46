//! Export options configuration.

/// EMUs per inch.
pub const EMU_PER_INCH: u64 = 914_400;

/// EMUs per pixel at 96 DPI.
pub const EMU_PER_PIXEL: u64 = 9_525;

/// Longer side of the embedded photo: 1.2 inches.
pub const DEFAULT_PHOTO_MAX_EMU: u64 = EMU_PER_INCH * 6 / 5;

/// Separator between contact fields.
pub const DEFAULT_CONTACT_SEPARATOR: &str = " | ";

/// Labels for the titled sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLabels {
    pub summary: String,
    pub skills: String,
    pub experience: String,
    pub education: String,
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            summary: "Summary".to_string(),
            skills: "Skills".to_string(),
            experience: "Experience".to_string(),
            education: "Education".to_string(),
        }
    }
}

/// Options for exporting a record.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Cap for the longer side of the photo, in EMUs
    pub photo_max_emu: u64,

    /// Embed the photo when the record has one
    pub include_photo: bool,

    /// Separator placed between non-empty contact fields
    pub contact_separator: String,

    /// Section heading labels
    pub labels: SectionLabels,

    /// Application name written to `docProps/app.xml`
    pub application: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            photo_max_emu: DEFAULT_PHOTO_MAX_EMU,
            include_photo: true,
            contact_separator: DEFAULT_CONTACT_SEPARATOR.to_string(),
            labels: SectionLabels::default(),
            application: concat!("cvdocx/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ExportOptions {
    /// Create new export options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the photo cap in inches. Non-positive values keep the default.
    pub fn with_photo_max_inches(mut self, inches: f64) -> Self {
        if inches.is_finite() && inches > 0.0 {
            self.photo_max_emu = (inches * EMU_PER_INCH as f64).round() as u64;
        }
        self
    }

    /// Include or omit the photo.
    pub fn with_photo(mut self, include: bool) -> Self {
        self.include_photo = include;
        self
    }

    /// Set the contact separator. A blank separator keeps the default.
    pub fn with_contact_separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        if !separator.trim().is_empty() {
            self.contact_separator = separator;
        }
        self
    }

    /// Replace the section labels.
    pub fn with_labels(mut self, labels: SectionLabels) -> Self {
        self.labels = labels;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ExportOptions::default();
        assert_eq!(opts.photo_max_emu, 1_097_280);
        assert_eq!(opts.contact_separator, " | ");
        assert!(opts.include_photo);
        assert!(opts.application.starts_with("cvdocx/"));
    }

    #[test]
    fn test_builder_pattern() {
        let opts = ExportOptions::new()
            .with_photo_max_inches(2.0)
            .with_photo(false)
            .with_contact_separator(" / ");

        assert_eq!(opts.photo_max_emu, 1_828_800);
        assert!(!opts.include_photo);
        assert_eq!(opts.contact_separator, " / ");
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let opts = ExportOptions::new()
            .with_photo_max_inches(-1.0)
            .with_photo_max_inches(f64::NAN)
            .with_contact_separator("   ");
        assert_eq!(opts.photo_max_emu, DEFAULT_PHOTO_MAX_EMU);
        assert_eq!(opts.contact_separator, DEFAULT_CONTACT_SEPARATOR);
    }
}
