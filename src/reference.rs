//! Toy in-memory implementations of the four external collaborator traits.
//! The real suffix-array corpus, alignment store, and lexical-probability
//! tables are out of scope (`spec.md` §1 Non-goals).

use std::collections::HashMap;
use std::sync::Arc;

use crate::alignment::Alignments;
use crate::corpus::{SourceCorpus, TargetCorpus};
use crate::lexprob::LexicalProbabilities;
use crate::phrases::MatchedHierarchicalPhrases;
use crate::span::Span;
use crate::vocabulary::{Vocabulary, WordId};

pub struct InMemorySourceCorpus {
    // boundaries[s] is the start position of sentence s; boundaries[s + 1] its end.
    boundaries: Vec<usize>,
    vocabulary: Arc<Vocabulary>,
}

impl InMemorySourceCorpus {
    pub fn new(boundaries: Vec<usize>) -> Self {
        Self {
            boundaries,
            vocabulary: Vocabulary::new().shared(),
        }
    }
}

impl SourceCorpus for InMemorySourceCorpus {
    fn sentence_start(&self, sentence_id: usize) -> usize {
        self.boundaries[sentence_id]
    }

    fn sentence_end(&self, sentence_id: usize) -> usize {
        self.boundaries[sentence_id + 1]
    }

    fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }
}

pub struct InMemoryTargetCorpus {
    words: Vec<WordId>,
    vocabulary: Arc<Vocabulary>,
}

impl InMemoryTargetCorpus {
    pub fn new(words: Vec<WordId>) -> Self {
        Self {
            words,
            vocabulary: Vocabulary::new().shared(),
        }
    }

    pub fn with_vocabulary(words: Vec<WordId>, vocabulary: Arc<Vocabulary>) -> Self {
        Self { words, vocabulary }
    }
}

impl TargetCorpus for InMemoryTargetCorpus {
    fn word_id(&self, position: usize) -> WordId {
        self.words[position]
    }

    fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }
}

#[derive(Default)]
pub struct InMemoryAlignments {
    links: HashMap<usize, Vec<(usize, usize)>>,
}

impl InMemoryAlignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_links(links: HashMap<usize, Vec<(usize, usize)>>) -> Self {
        Self { links }
    }

    pub fn add_link(&mut self, sentence_id: usize, source_pos: usize, target_pos: usize) {
        self.links
            .entry(sentence_id)
            .or_default()
            .push((source_pos, target_pos));
    }
}

impl Alignments for InMemoryAlignments {
    fn consistent_target_span(&self, sentence_id: usize, source_span: Span) -> Option<Span> {
        let links = self.links.get(&sentence_id)?;

        let mut target_min = usize::MAX;
        let mut target_max = 0usize;
        for &(s, t) in links {
            if s >= source_span.start && s < source_span.end {
                target_min = target_min.min(t);
                target_max = target_max.max(t + 1);
            }
        }
        if target_min > target_max {
            return None;
        }
        let target_span = Span::new(target_min, target_max);

        let consistent = links.iter().all(|&(s, t)| {
            !(t >= target_span.start && t < target_span.end)
                || (s >= source_span.start && s < source_span.end)
        });
        if !consistent {
            return None;
        }

        Some(target_span)
    }

    fn has_aligned_terminal(
        &self,
        target_pos: usize,
        occurrences: &MatchedHierarchicalPhrases,
        i: usize,
    ) -> bool {
        let sentence_id = occurrences.sentence_number(i);
        let Some(links) = self.links.get(&sentence_id) else {
            return false;
        };
        let n = occurrences.number_of_terminal_sequences(i);
        links.iter().any(|&(s, t)| {
            t == target_pos
                && (0..n).any(|k| {
                    s >= occurrences.terminal_sequence_start_index(i, k)
                        && s < occurrences.terminal_sequence_end_index(i, k)
                })
        })
    }
}

/// A lexical-probability oracle returning the same `(p(s|t), p(t|s))` pair
/// for every occurrence.
pub struct UniformLexicalProbabilities {
    source_given_target: f32,
    target_given_source: f32,
}

impl UniformLexicalProbabilities {
    pub fn new(source_given_target: f32, target_given_source: f32) -> Self {
        Self {
            source_given_target,
            target_given_source,
        }
    }
}

impl LexicalProbabilities for UniformLexicalProbabilities {
    fn calculate_lex_probs(&self, _occurrences: &MatchedHierarchicalPhrases, _i: usize) -> (f32, f32) {
        (self.source_given_target, self.target_given_source)
    }
}

/// A lexical-probability oracle with a distinct, pre-recorded pair per
/// occurrence index; convenient for tests that exercise aggregation across
/// several occurrences.
pub struct TableLexicalProbabilities {
    pairs: Vec<(f32, f32)>,
}

impl TableLexicalProbabilities {
    pub fn new(pairs: Vec<(f32, f32)>) -> Self {
        Self { pairs }
    }
}

impl LexicalProbabilities for TableLexicalProbabilities {
    fn calculate_lex_probs(&self, _occurrences: &MatchedHierarchicalPhrases, i: usize) -> (f32, f32) {
        self.pairs[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistent_span_covers_aligned_targets() {
        let mut alignments = InMemoryAlignments::new();
        alignments.add_link(0, 3, 10);
        alignments.add_link(0, 4, 11);

        let span = alignments
            .consistent_target_span(0, Span::new(3, 5))
            .expect("should be consistent");
        assert_eq!(span, Span::new(10, 12));
    }

    #[test]
    fn inconsistent_when_target_link_escapes_source_span() {
        let mut alignments = InMemoryAlignments::new();
        alignments.add_link(0, 3, 10);
        // Another source position outside [3,5) also aligns into the target
        // range the first link forces, so [3,5) cannot be block-consistent.
        alignments.add_link(0, 99, 10);

        assert_eq!(alignments.consistent_target_span(0, Span::new(3, 5)), None);
    }

    #[test]
    fn no_links_in_span_is_none() {
        let alignments = InMemoryAlignments::new();
        assert_eq!(alignments.consistent_target_span(0, Span::new(3, 5)), None);
    }
}
