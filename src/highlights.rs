//! Highlight bullets generated from an entry's description.
//!
//! Two modes are supported. [`HighlightMode::Raw`] turns each description
//! line into a bullet. [`HighlightMode::Expanded`] builds achievement-style
//! bullets from a small template set. Template choices are derived from the
//! description text, so the same entry always expands the same way.

use crate::model::ExperienceEntry;
use crate::sanitize::clean_line;

/// Default number of bullets produced by the expanded mode.
pub const DEFAULT_EXPANDED_COUNT: usize = 4;

const ACTION_VERBS: [&str; 20] = [
    "Led",
    "Designed",
    "Implemented",
    "Spearheaded",
    "Managed",
    "Optimized",
    "Increased",
    "Reduced",
    "Improved",
    "Delivered",
    "Built",
    "Coordinated",
    "Developed",
    "Negotiated",
    "Streamlined",
    "Drove",
    "Facilitated",
    "Executed",
    "Mentored",
    "Launched",
];

const METRICS: [&str; 7] = [
    "revenue",
    "efficiency",
    "customer satisfaction",
    "cost",
    "uptime",
    "retention",
    "conversion rate",
];

const IMPROVEMENT_PERCENT: [u32; 7] = [8, 10, 12, 15, 20, 25, 30];

const SALES_BULLET: &str =
    "Built strong client relationships and expanded accounts through consultative selling.";
const ENGINEERING_BULLET: &str =
    "Improved system reliability and deployment velocity through automation and testing.";
const PRODUCT_BULLET: &str =
    "Prioritised features and worked cross-functionally to launch product improvements.";

/// How highlights are generated for entries that have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMode {
    /// One bullet per non-blank description line
    Raw,
    /// Achievement bullets built from verb and metric templates
    Expanded,
}

/// Split a description into bullets, one per non-blank line, each ending
/// with a period.
pub fn raw_highlights(description: &str) -> Vec<String> {
    description
        .lines()
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .map(with_period)
        .collect()
}

/// Expand a short description into `count` achievement bullets.
///
/// Returns an empty list for a blank description.
pub fn expanded_highlights(
    description: &str,
    role: &str,
    organization: &str,
    count: usize,
) -> Vec<String> {
    let desc = clean_line(description);
    if desc.is_empty() {
        return Vec::new();
    }

    let mut picker = Picker::new(&desc);
    let organization = clean_line(organization);

    let metric_bullet = format!(
        "{} {}, achieving ~{}% improvement in {}.",
        picker.verb(),
        desc,
        picker.pick(&IMPROVEMENT_PERCENT[..]),
        picker.pick(&METRICS[..])
    );
    let place_bullet = if organization.is_empty() {
        format!("{} {}.", picker.verb(), desc)
    } else {
        format!("{} {} at {}.", picker.verb(), desc, organization)
    };
    let kpi_bullet = format!(
        "{} {} by focusing on stakeholder needs and measurable KPIs.",
        picker.verb(),
        desc
    );

    let mut candidates = vec![metric_bullet, place_bullet, kpi_bullet];
    let role = role.to_lowercase();
    if ["sales", "account", "business"].iter().any(|k| role.contains(k)) {
        candidates.push(SALES_BULLET.to_string());
    }
    if ["engineer", "developer", "dev", "software"].iter().any(|k| role.contains(k)) {
        candidates.push(ENGINEERING_BULLET.to_string());
    }
    if ["product", "pm"].iter().any(|k| role.contains(k)) {
        candidates.push(PRODUCT_BULLET.to_string());
    }

    let mut bullets: Vec<String> = candidates.into_iter().take(count).collect();
    while bullets.len() < count {
        bullets.push(format!("{} {}.", picker.verb(), desc));
    }
    bullets
}

/// Generate highlights for an entry according to `mode`.
///
/// The expanded mode falls back to the role when the description is blank.
pub fn highlights_for(entry: &ExperienceEntry, mode: HighlightMode) -> Vec<String> {
    match mode {
        HighlightMode::Raw => raw_highlights(&entry.description),
        HighlightMode::Expanded => {
            let source = if clean_line(&entry.description).is_empty() {
                &entry.role
            } else {
                &entry.description
            };
            expanded_highlights(
                source,
                &entry.role,
                &entry.organization,
                DEFAULT_EXPANDED_COUNT,
            )
        }
    }
}

fn with_period(line: String) -> String {
    if line.ends_with('.') {
        line
    } else {
        line + "."
    }
}

/// Walks the template tables from an offset seeded by the description.
struct Picker {
    state: usize,
}

impl Picker {
    fn new(seed_text: &str) -> Self {
        let state = seed_text
            .chars()
            .fold(0usize, |acc, c| acc.wrapping_mul(31).wrapping_add(c as usize));
        Self { state }
    }

    fn pick<T: Copy>(&mut self, table: &[T]) -> T {
        let item = table[self.state % table.len()];
        self.state = self.state / table.len() + 7;
        item
    }

    fn verb(&mut self) -> &'static str {
        self.pick(&ACTION_VERBS[..])
    }
}
