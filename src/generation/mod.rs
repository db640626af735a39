//! Persona and post generation via a hosted language model.
//!
//! Two request/response operations back the whole feed: turning a free-text
//! prompt into a persona description, and turning a persona description into
//! one short post. Both are defined by the [`GenerationClient`] trait;
//! [`OpenAiCompatClient`] is the production implementation against any
//! OpenAI-compatible chat completions endpoint.

pub mod client;
pub mod prompts;

pub use client::{GenerationClient, OpenAiCompatClient, PostDraft};
