//! The dispatcher: one prompt out, one displayable string back.

use crate::llm::LlmClient;
use crate::prompt::{build_prompt, Submission};

/// Prefix for every failure string returned by [`Dispatcher::dispatch`].
pub const ERROR_PREFIX: &str = "Error: ";

/// Displayable outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Model output, verbatim.
    Answer(String),
    /// A failed call, rendered as a string starting with [`ERROR_PREFIX`].
    Failure(String),
}

impl Reply {
    /// The text to show in place of the result.
    pub fn text(&self) -> &str {
        match self {
            Reply::Answer(text) | Reply::Failure(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Failure(_))
    }

    pub fn into_text(self) -> String {
        match self {
            Reply::Answer(text) | Reply::Failure(text) => text,
        }
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Builds the prompt for a submission and makes a single call to the model.
///
/// Never fails: remote errors come back as [`Reply::Failure`] with a string
/// starting with [`ERROR_PREFIX`], so the caller can render it in place of
/// the result.
pub struct Dispatcher {
    client: Box<dyn LlmClient>,
}

impl Dispatcher {
    pub fn new(client: Box<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Run one analysis. Single attempt, no retries.
    pub async fn dispatch(&self, submission: &Submission) -> Reply {
        let prompt = build_prompt(submission);
        tracing::info!(
            category = %submission.category(),
            text_len = submission.text().len(),
            "dispatching submission"
        );

        match self.client.generate(&prompt).await {
            Ok(text) => {
                tracing::info!(response_len = text.len(), "model responded");
                Reply::Answer(text)
            }
            Err(e) => {
                tracing::warn!(error = %e, "model call failed");
                Reply::Failure(format!("{}{}", ERROR_PREFIX, e))
            }
        }
    }
}
