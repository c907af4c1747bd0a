//! Error types for the extractor's setup seam.
//!
//! The per-call `extract_rules` path raises no recoverable errors (bound
//! violations and inconsistent alignments are silent filters, per
//! `spec.md` §7); this type exists only for the one place a caller can
//! actually get something wrong, construction of an [`crate::config::ExtractorConfig`].

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractorError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: i64 },
    #[error(
        "min_nonterminal_span ({min}) must not exceed max_nonterminal_span ({max})"
    )]
    NonterminalSpanBoundsInverted { min: usize, max: usize },
}
