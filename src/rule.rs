//! Emitted synchronous grammar rules.

use crate::vocabulary::WordId;

/// Sentinel returned in place of `+infinity` log-probabilities.
pub const VERY_UNLIKELY: f32 = 1e6;

/// The single nonterminal label used as every rule's left-hand side.
pub const LHS: &str = "X";

/// A scored SCFG rule `X -> <source, target>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub lhs: &'static str,
    pub source_word_ids: Vec<WordId>,
    pub target_word_ids: Vec<WordId>,
    /// `[p(e|f), lex_p(e|f), lex_p(f|e)]`, each a negative-log10 probability.
    pub features: [f32; 3],
    pub arity: usize,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> <", self.lhs)?;
        for (i, id) in self.source_word_ids.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{id}")?;
        }
        write!(f, ", ")?;
        for (i, id) in self.target_word_ids.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{id}")?;
        }
        write!(
            f,
            "> {:.6} {:.6} {:.6}",
            self.features[0], self.features[1], self.features[2]
        )
    }
}
