//! Google Gemini `generateContent` client.
//!
//! Implements the `ModelClient` trait: one non-streaming request per call,
//! with a system instruction and the web-search function declaration.

mod api;
mod client;
mod config;
mod response;

pub use client::{system_instruction_text, GeminiClient};
pub use config::GeminiConfig;
pub use response::{Candidate, Content, GenerateResponse, GroundingChunk, GroundingMetadata, PromptFeedback, UsageMetadata, WebSource};
