//! Source and target patterns: sequences of terminal/nonterminal word ids.

use std::sync::Arc;

use crate::vocabulary::{Vocabulary, WordId};

/// An ordered sequence of word ids, negative ids denoting nonterminals.
///
/// Carries a reference to the vocabulary its terminal ids are drawn from, so
/// a `Pattern` can be rendered back to surface forms without threading a
/// vocabulary handle through every call site.
#[derive(Debug, Clone)]
pub struct Pattern {
    word_ids: Vec<WordId>,
    vocabulary: Arc<Vocabulary>,
}

impl Pattern {
    pub fn new(word_ids: Vec<WordId>, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            word_ids,
            vocabulary,
        }
    }

    pub fn word_ids(&self) -> &[WordId] {
        &self.word_ids
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    /// Number of nonterminal symbols in the pattern.
    pub fn arity(&self) -> usize {
        self.word_ids.iter().filter(|&&id| id < 0).count()
    }

    pub fn len(&self) -> usize {
        self.word_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_ids.is_empty()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.word_ids == other.word_ids
    }
}

impl Eq for Pattern {}

impl std::hash::Hash for Pattern {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.word_ids.hash(state);
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, &id) in self.word_ids.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            if id < 0 {
                write!(f, "[{}]", -id)?;
            } else {
                match self.vocabulary.word(id) {
                    Some(w) => write!(f, "{w}")?,
                    None => write!(f, "<{id}>")?,
                }
            }
        }
        Ok(())
    }
}
