//! The lexical-probability oracle interface.
//!
//! Consumption only: estimating `p(s|t)`/`p(t|s)` lexical tables is a
//! Non-goal of this crate (see `spec.md` §1).

use crate::phrases::MatchedHierarchicalPhrases;

/// Per-occurrence lexical probability pair `(p(source|target), p(target|source))`.
pub trait LexicalProbabilities {
    fn calculate_lex_probs(
        &self,
        occurrences: &MatchedHierarchicalPhrases,
        i: usize,
    ) -> (f32, f32);
}
