//! The alignment oracle interface.
//!
//! Conceptually a relation between source and target positions per sentence.
//! The production-grade alignment store is excluded from this crate (see
//! `spec.md` Non-goals); only the query surface the core needs is defined
//! here, plus a toy in-memory implementation in [`crate::reference`].

use crate::phrases::MatchedHierarchicalPhrases;
use crate::span::Span;

pub trait Alignments {
    /// The minimal target span such that every alignment link inside
    /// `source_span` lands inside it, every link inside the result lands
    /// inside `source_span`, and the result is non-empty. `None` if no such
    /// span exists.
    fn consistent_target_span(&self, sentence_id: usize, source_span: Span) -> Option<Span>;

    /// Whether `target_pos` has at least one alignment link to a source
    /// position inside the terminal runs of occurrence `i`. The sentence is
    /// derived from `occurrences.sentence_number(i)`.
    fn has_aligned_terminal(
        &self,
        target_pos: usize,
        occurrences: &MatchedHierarchicalPhrases,
        i: usize,
    ) -> bool;
}
