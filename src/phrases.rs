//! `MatchedHierarchicalPhrases`: the occurrence records for one source pattern.
//!
//! One backing store (`runs`) owns every terminal-run span across every
//! occurrence; each occurrence is a range into that arena plus a sentence
//! number.

use crate::span::Span;

#[derive(Debug, Clone)]
pub struct MatchedHierarchicalPhrases {
    arity: usize,
    starts_with_nonterminal: bool,
    ends_with_nonterminal: bool,
    sentence_numbers: Vec<usize>,
    runs: Vec<Span>,
    run_offsets: Vec<usize>,
}

pub struct Occurrence {
    pub sentence_number: usize,
    // Terminal runs in source order; must be non-empty, disjoint, and
    // monotonically increasing.
    pub terminal_runs: Vec<Span>,
}

impl MatchedHierarchicalPhrases {
    pub fn from_occurrences(
        arity: usize,
        starts_with_nonterminal: bool,
        ends_with_nonterminal: bool,
        occurrences: Vec<Occurrence>,
    ) -> Self {
        let expected_runs = arity + 1
            - starts_with_nonterminal as usize
            - ends_with_nonterminal as usize;

        let mut sentence_numbers = Vec::with_capacity(occurrences.len());
        let mut runs = Vec::new();
        let mut run_offsets = Vec::with_capacity(occurrences.len() + 1);
        run_offsets.push(0);

        for occ in occurrences {
            debug_assert_eq!(
                occ.terminal_runs.len(),
                expected_runs,
                "occurrence has {} terminal runs, expected {expected_runs} for arity {arity}",
                occ.terminal_runs.len()
            );
            debug_assert!(
                occ.terminal_runs.windows(2).all(|w| w[0].end < w[1].start),
                "terminal runs must be disjoint and strictly increasing"
            );
            debug_assert!(
                occ.terminal_runs.iter().all(|r| !r.is_empty()),
                "terminal runs must be non-empty"
            );

            sentence_numbers.push(occ.sentence_number);
            runs.extend(occ.terminal_runs);
            run_offsets.push(runs.len());
        }

        Self {
            arity,
            starts_with_nonterminal,
            ends_with_nonterminal,
            sentence_numbers,
            runs,
            run_offsets,
        }
    }

    pub fn len(&self) -> usize {
        self.sentence_numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentence_numbers.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn starts_with_nonterminal(&self, _i: usize) -> bool {
        self.starts_with_nonterminal
    }

    pub fn ends_with_nonterminal(&self, _i: usize) -> bool {
        self.ends_with_nonterminal
    }

    pub fn sentence_number(&self, i: usize) -> usize {
        self.sentence_numbers[i]
    }

    fn run_range(&self, i: usize) -> std::ops::Range<usize> {
        self.run_offsets[i]..self.run_offsets[i + 1]
    }

    pub fn number_of_terminal_sequences(&self, i: usize) -> usize {
        self.run_range(i).len()
    }

    pub fn terminal_sequence_start_index(&self, i: usize, k: usize) -> usize {
        self.runs[self.run_offsets[i] + k].start
    }

    pub fn terminal_sequence_end_index(&self, i: usize, k: usize) -> usize {
        self.runs[self.run_offsets[i] + k].end
    }

    pub fn first_terminal_index(&self, i: usize) -> usize {
        self.runs[self.run_offsets[i]].start
    }

    pub fn last_terminal_index(&self, i: usize) -> usize {
        self.runs[self.run_offsets[i + 1] - 1].end
    }

    pub fn span(&self, i: usize) -> Span {
        Span::new(self.first_terminal_index(i), self.last_terminal_index(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MatchedHierarchicalPhrases {
        MatchedHierarchicalPhrases::from_occurrences(
            1,
            false,
            false,
            vec![Occurrence {
                sentence_number: 0,
                terminal_runs: vec![Span::new(2, 3), Span::new(6, 7)],
            }],
        )
    }

    #[test]
    fn terminal_indices_span_all_runs() {
        let occ = sample();
        assert_eq!(occ.first_terminal_index(0), 2);
        assert_eq!(occ.last_terminal_index(0), 7);
        assert_eq!(occ.number_of_terminal_sequences(0), 2);
    }

    #[test]
    fn run_boundaries_are_addressable() {
        let occ = sample();
        assert_eq!(occ.terminal_sequence_end_index(0, 0), 3);
        assert_eq!(occ.terminal_sequence_start_index(0, 1), 6);
    }
}
