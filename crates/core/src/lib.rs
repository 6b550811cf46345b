//! reverseai-core: prompt builder and dispatcher for ReverseAI.
//!
//! Turns a pasted LinkedIn post and its category into the fixed ReverseAI
//! instruction prompt, sends it to Gemini, and hands back the text.
//!
//! # Public API
//!
//! - [`Category`] -- the six dropdown labels
//! - [`Submission`] / [`build_prompt()`] -- validated input and the template
//! - [`LlmClient`] / [`GeminiClient`] -- the remote text-generation seam
//! - [`Dispatcher`] / [`Reply`] -- single-attempt call that never fails

/// Crate version reported by the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod category;
pub mod dispatch;
pub mod llm;
pub mod prompt;

pub use category::{Category, UnknownCategory};
pub use dispatch::{Dispatcher, Reply, ERROR_PREFIX};
pub use llm::{GeminiClient, LlmClient, LlmError};
pub use prompt::{build_prompt, EmptySubmission, Submission};
