//! Core pipeline and domain logic for vetdischarge.
//!
//! This crate ties together record loading, prompt rendering, the completion
//! call, and note persistence into a single end-to-end run
//! ([`pipeline::generate_discharge_note`]).

pub mod pipeline;
pub mod prompt;
pub mod record;
