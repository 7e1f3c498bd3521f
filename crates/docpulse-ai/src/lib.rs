//! Document Q&A connector
//!
//! Abstracts the upstream generative model behind the [`QaClient`] trait so
//! the API layer can be tested with a stub, plus PDF text extraction and the
//! prompt/response format used for grounded document questions.

pub mod client;
pub mod pdf;
pub mod prompt;

pub use client::{GeminiClient, QaClient, QaError, QaResponse};
pub use pdf::extract_text;
pub use prompt::{build_prompt, parse_reply, DEFAULT_TOPIC};
