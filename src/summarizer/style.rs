//! Summary styles and their prompt templates.
//!
//! Styles form a closed set; each one maps to a row of [`STYLE_TEMPLATES`].
//! Adding a style means adding a variant and a row, nothing else.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Named preset controlling summary length, structure and tone.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    /// Short, decision-oriented overview.
    #[default]
    Executive,
    /// Thorough multi-paragraph summary.
    Detailed,
    /// Summary written as a bullet list.
    BulletPoints,
    /// Formal, abstract-like summary.
    Academic,
}

/// Prompt descriptor for one style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleTemplate {
    /// Style this row describes.
    pub style: SummaryStyle,
    /// Selector accepted from clients.
    pub name: &'static str,
    /// How the `summary` field should be written.
    pub summary_shape: &'static str,
    /// Tone and focus guidance.
    pub instructions: &'static str,
    /// Fewest insights to request.
    pub min_insights: usize,
    /// Most insights to request.
    pub max_insights: usize,
}

impl StyleTemplate {
    /// Whether `count` falls inside the advised insight range.
    #[must_use]
    pub const fn accepts_insight_count(&self, count: usize) -> bool {
        count >= self.min_insights && count <= self.max_insights
    }
}

/// One row per style, in declaration order.
pub const STYLE_TEMPLATES: [StyleTemplate; 4] = [
    StyleTemplate {
        style: SummaryStyle::Executive,
        name: "executive",
        summary_shape: "a concise summary of the main points in 2-3 sentences",
        instructions: "Write for a busy decision maker: lead with the conclusion, skip background detail, keep the language plain.",
        min_insights: 3,
        max_insights: 5,
    },
    StyleTemplate {
        style: SummaryStyle::Detailed,
        name: "detailed",
        summary_shape: "a comprehensive summary of 3-4 paragraphs covering the arguments, evidence and conclusions",
        instructions: "Preserve the structure of the original, keep important names, figures and examples, and explain how the ideas connect.",
        min_insights: 5,
        max_insights: 7,
    },
    StyleTemplate {
        style: SummaryStyle::BulletPoints,
        name: "bullet_points",
        summary_shape: "a list of 5-8 short bullet points, each starting with \"- \" and separated by newlines",
        instructions: "Keep every bullet to a single line and a single idea, ordered as they appear in the content.",
        min_insights: 4,
        max_insights: 6,
    },
    StyleTemplate {
        style: SummaryStyle::Academic,
        name: "academic",
        summary_shape: "a formal abstract of 150-250 words stating the topic, method or approach, findings and implications",
        instructions: "Use an objective, third-person academic register and avoid colloquial phrasing.",
        min_insights: 2,
        max_insights: 4,
    },
];

impl SummaryStyle {
    /// Resolve a client selector. Matching ignores case and treats `-` and
    /// spaces like `_`; anything unrecognised, blank or missing resolves to
    /// [`SummaryStyle::Executive`].
    #[must_use]
    pub fn from_selector(selector: Option<&str>) -> Self {
        let Some(raw) = selector else {
            return Self::default();
        };
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");

        STYLE_TEMPLATES
            .iter()
            .find(|template| template.name == normalized)
            .map_or_else(Self::default, |template| template.style)
    }

    /// Prompt descriptor for this style.
    #[must_use]
    pub fn template(self) -> &'static StyleTemplate {
        // Every variant has a row; the fallback only guards table edits.
        STYLE_TEMPLATES
            .iter()
            .find(|template| template.style == self)
            .unwrap_or(&STYLE_TEMPLATES[0])
    }

    /// Selector name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.template().name
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_is_case_insensitive() {
        assert_eq!(SummaryStyle::from_selector(Some("DETAILED")), SummaryStyle::Detailed);
        assert_eq!(SummaryStyle::from_selector(Some("Academic")), SummaryStyle::Academic);
        assert_eq!(
            SummaryStyle::from_selector(Some("bullet_points")),
            SummaryStyle::BulletPoints
        );
        assert_eq!(
            SummaryStyle::from_selector(Some("Bullet-Points")),
            SummaryStyle::BulletPoints
        );
    }

    #[test]
    fn test_unknown_selector_falls_back_to_executive() {
        for selector in [None, Some(""), Some("   "), Some("poetic"), Some("executive!")] {
            assert_eq!(SummaryStyle::from_selector(selector), SummaryStyle::Executive);
        }
    }

    #[test]
    fn test_every_style_has_its_own_template() {
        let styles = [
            SummaryStyle::Executive,
            SummaryStyle::Detailed,
            SummaryStyle::BulletPoints,
            SummaryStyle::Academic,
        ];
        for style in styles {
            let template = style.template();
            assert_eq!(template.style, style);
            assert!(template.min_insights >= 2);
            assert!(template.max_insights <= 7);
            assert!(template.min_insights <= template.max_insights);
            assert_eq!(SummaryStyle::from_selector(Some(template.name)), style);
        }
    }

    #[test]
    fn test_insight_range() {
        let template = SummaryStyle::Executive.template();
        assert!(template.accepts_insight_count(3));
        assert!(template.accepts_insight_count(5));
        assert!(!template.accepts_insight_count(2));
        assert!(!template.accepts_insight_count(6));
    }

    #[test]
    fn test_display() {
        assert_eq!(SummaryStyle::BulletPoints.to_string(), "bullet_points");
    }
}
