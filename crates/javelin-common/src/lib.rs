//! Common types and utilities for the javelin front end.
//!
//! This crate provides foundational types used across all javelin crates:
//! - Source spans and line lookup (`TextRange`, `LineMap`)
//! - Parse diagnostics (`Diagnostic`, `diagnostic_codes`)
//! - Centralized limits and thresholds
//! - Per-request language options (`LanguageOptions`)

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{LineMap, TextRange};

// Parse diagnostics
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;

// Per-request language options
pub mod options;
pub use options::LanguageOptions;
