// Proposal pipeline: transcript → model → extract → complete (or fall back).
// All model calls go through llm_client.

pub mod completer;
pub mod defaults;
pub mod extractor;
pub mod fallback;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod record;
