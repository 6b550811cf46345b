//! Submission validation and the fixed ReverseAI instruction template.

use crate::category::Category;

/// A validated user submission: non-empty post text plus its category.
///
/// The text is kept verbatim (no trimming) so the prompt quotes exactly
/// what the user pasted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    text: String,
    category: Category,
}

/// Returned by [`Submission::new`] when the post text is empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("post text must not be empty")]
pub struct EmptySubmission;

impl Submission {
    pub fn new(text: impl Into<String>, category: Category) -> Result<Self, EmptySubmission> {
        let text = text.into();
        if text.is_empty() {
            return Err(EmptySubmission);
        }
        Ok(Self { text, category })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// Build the instructional prompt sent to the model.
///
/// Deterministic: the same submission always yields the same string.
pub fn build_prompt(submission: &Submission) -> String {
    format!(
        r#"You are ReverseAI, an AI system specialized in decoding unhinged and over-the-top LinkedIn posts.

Analysis Task:
- Content Type: {category}
- Unhinged LinkedIn Post to Analyze:
---
{text}
---

Instructions:
1. Analyze the writing style, dramatic tone, and excessive elements
2. Identify patterns typical of viral or attention-seeking LinkedIn content
3. Reconstruct the likely prompt that would generate this type of content
4. Add humor to your analysis when appropriate
5. Make response short other than the prompt

Format your response as:
📝 PROMPT:
[Write the vague prompt that would generate this type of unhinged LinkedIn post]

💡 UNHINGED SCORE: [includes only numbers 1-10, where 1 is lowest and 10 is maximum LinkedIn cringe]
"#,
        category = submission.category().label(),
        text = submission.text(),
    )
}
