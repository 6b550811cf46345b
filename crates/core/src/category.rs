//! The closed set of LinkedIn post categories offered by the dropdown.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Content-style label the user picks to bias the analysis framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "Humble Brag")]
    HumbleBrag,
    #[serde(rename = "Career Advice")]
    CareerAdvice,
    #[serde(rename = "Hustle Culture")]
    HustleCulture,
    #[serde(rename = "Corporate Inspiration")]
    CorporateInspiration,
    #[serde(rename = "Failure-to-Success Story")]
    FailureToSuccessStory,
    #[serde(rename = "Generic LinkedIn Post")]
    GenericLinkedInPost,
}

impl Category {
    /// All categories in dropdown order.
    pub const ALL: [Category; 6] = [
        Category::HumbleBrag,
        Category::CareerAdvice,
        Category::HustleCulture,
        Category::CorporateInspiration,
        Category::FailureToSuccessStory,
        Category::GenericLinkedInPost,
    ];

    /// The user-facing label, also substituted into the prompt.
    pub fn label(self) -> &'static str {
        match self {
            Category::HumbleBrag => "Humble Brag",
            Category::CareerAdvice => "Career Advice",
            Category::HustleCulture => "Hustle Culture",
            Category::CorporateInspiration => "Corporate Inspiration",
            Category::FailureToSuccessStory => "Failure-to-Success Story",
            Category::GenericLinkedInPost => "Generic LinkedIn Post",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a label is not one of [`Category::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_categories_in_dropdown_order() {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Humble Brag",
                "Career Advice",
                "Hustle Culture",
                "Corporate Inspiration",
                "Failure-to-Success Story",
                "Generic LinkedIn Post",
            ]
        );
    }

    #[test]
    fn parses_every_label() {
        for c in Category::ALL {
            assert_eq!(c.label().parse::<Category>().unwrap(), c);
        }
    }

    #[test]
    fn rejects_unknown_and_case_mismatched_labels() {
        assert_eq!(
            "Thought Leadership".parse::<Category>(),
            Err(UnknownCategory("Thought Leadership".to_string()))
        );
        assert!("humble brag".parse::<Category>().is_err());
    }

    #[test]
    fn default_is_first_option() {
        assert_eq!(Category::default(), Category::ALL[0]);
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&Category::FailureToSuccessStory).unwrap();
        assert_eq!(json, "\"Failure-to-Success Story\"");
        let back: Category = serde_json::from_str("\"Hustle Culture\"").unwrap();
        assert_eq!(back, Category::HustleCulture);
    }
}
