// Document layout: column policy, document model and the page assembler.
// Pure, synchronous code; the assembler is cheap enough to run inline in handlers.

pub mod assembler;
pub mod columns;
pub mod document;

// Re-export the public API consumed by the pipeline and handlers.
pub use assembler::{Assembler, Issuer};
pub use document::Document;
