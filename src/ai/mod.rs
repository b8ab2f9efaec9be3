//! Prescription extraction through the Gemini API

pub mod client;
pub mod prompt;

// Re-export main types for convenience
pub use client::{ExtractionService, GeminiClient, UploadedFile};
