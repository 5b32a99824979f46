//! The CV record handed to the exporter.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::highlights::{highlights_for, HighlightMode};
use crate::sanitize::is_blank;

/// One position held, in the order the collector supplied it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    /// Employer or organization name
    pub organization: String,
    /// Job title held
    pub role: String,
    /// Free-form period, e.g. "2021 - Present"
    pub period: String,
    /// Description of responsibilities
    pub description: String,
    /// Achievement bullets rendered after the description
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

impl ExperienceEntry {
    /// Create an entry with the three heading fields set.
    pub fn new(
        role: impl Into<String>,
        organization: impl Into<String>,
        period: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            organization: organization.into(),
            period: period.into(),
            ..Default::default()
        }
    }

    /// Set the description text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a highlight bullet.
    pub fn with_highlight(mut self, highlight: impl Into<String>) -> Self {
        self.highlights.push(highlight.into());
        self
    }

    /// Generate highlights from the description when the entry has none.
    ///
    /// Existing non-blank highlights are left untouched.
    pub fn fill_highlights(&mut self, mode: HighlightMode) {
        if self.highlights.iter().all(|h| is_blank(h)) {
            self.highlights = highlights_for(self, mode);
        }
    }

    /// True when no field carries visible text.
    pub fn is_blank(&self) -> bool {
        is_blank(&self.organization)
            && is_blank(&self.role)
            && is_blank(&self.period)
            && is_blank(&self.description)
            && self.highlights.iter().all(|h| is_blank(h))
    }
}

/// One qualification, in the order the collector supplied it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    /// School or university
    pub institution: String,
    /// Degree or qualification name
    pub degree: String,
    /// Year(s) attended or awarded
    pub period: String,
}

impl EducationEntry {
    /// Create an education entry.
    pub fn new(
        degree: impl Into<String>,
        institution: impl Into<String>,
        period: impl Into<String>,
    ) -> Self {
        Self {
            degree: degree.into(),
            institution: institution.into(),
            period: period.into(),
        }
    }

    /// True when no field carries visible text.
    pub fn is_blank(&self) -> bool {
        is_blank(&self.institution) && is_blank(&self.degree) && is_blank(&self.period)
    }
}

/// Raw photo bytes as uploaded. The format is detected at export time.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Photo {
    /// Encoded image data
    pub data: Vec<u8>,
}

impl Photo {
    /// Wrap raw image bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Size of the encoded data in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check whether the photo carries no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for Photo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Photo").field("len", &self.data.len()).finish()
    }
}

/// Structured CV data collected from the form.
///
/// Every field is optional: blank text and empty lists produce omitted
/// sections, never errors. List order is significant and kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvRecord {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linkedin: String,
    pub portfolio: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,

    /// Attached separately from the serialized fields
    #[serde(skip)]
    pub photo: Option<Photo>,
}

impl CvRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a record from its JSON form.
    ///
    /// Missing keys fall back to their defaults, so `{}` is a valid record.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the text fields of this record as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Attach photo bytes.
    pub fn with_photo(mut self, data: Vec<u8>) -> Self {
        self.photo = Some(Photo::new(data));
        self
    }

    /// Fill in highlights for every experience entry that has none.
    pub fn fill_highlights(&mut self, mode: HighlightMode) {
        for entry in &mut self.experience {
            entry.fill_highlights(mode);
        }
    }

    /// Contact fields in contact-line order, blanks included.
    pub fn contact_fields(&self) -> [&str; 5] {
        [
            &self.email,
            &self.phone,
            &self.address,
            &self.linkedin,
            &self.portfolio,
        ]
    }

    /// A filled-in record for demos and smoke tests.
    pub fn sample() -> Self {
        Self {
            full_name: "Jojo Montford".to_string(),
            title: "Senior Sales Representative - Inspection Services".to_string(),
            email: "jojo@example.com".to_string(),
            phone: "+233 123 456 789".to_string(),
            address: "Accra, Ghana".to_string(),
            linkedin: "https://linkedin.com/in/jojo".to_string(),
            portfolio: String::new(),
            summary: "Sales-driven professional with experience in selling inspection and \
                      asset integrity services. Skilled at building client relationships \
                      and improving account revenue."
                .to_string(),
            skills: vec![
                "Sales".to_string(),
                "Client Management".to_string(),
                "NDT".to_string(),
                "Asset Integrity".to_string(),
            ],
            experience: vec![ExperienceEntry::new(
                "Sales Representative",
                "Intertek Geronimo Oil and Gas",
                "2021 - Present",
            )
            .with_description("Managed regional accounts and closed inspection contracts.")
            .with_highlight("Built strong client relationships and expanded key accounts.")],
            education: vec![EducationEntry::new(
                "HND Mechanical Engineering",
                "Accra Technical University",
                "2016",
            )],
            photo: None,
        }
    }
}
