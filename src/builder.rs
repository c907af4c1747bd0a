//! The translation builder: `spec.md` §4.3 and §4.4.

use log::trace;

use crate::alignment::Alignments;
use crate::config::ExtractorConfig;
use crate::corpus::{SourceCorpus, TargetCorpus};
use crate::pattern::Pattern;
use crate::phrases::MatchedHierarchicalPhrases;
use crate::span::{LabeledSpan, Span};
use crate::vocabulary::WordId;

pub struct TranslationBuilder<'a> {
    config: ExtractorConfig,
    source_corpus: &'a dyn SourceCorpus,
    target_corpus: &'a dyn TargetCorpus,
    alignments: &'a dyn Alignments,
}

impl<'a> TranslationBuilder<'a> {
    pub fn new(
        config: ExtractorConfig,
        source_corpus: &'a dyn SourceCorpus,
        target_corpus: &'a dyn TargetCorpus,
        alignments: &'a dyn Alignments,
    ) -> Self {
        Self {
            config,
            source_corpus,
            target_corpus,
            alignments,
        }
    }

    pub fn build(&self, occurrences: &MatchedHierarchicalPhrases, i: usize) -> Option<Pattern> {
        let starts = occurrences.starts_with_nonterminal(i);
        let ends = occurrences.ends_with_nonterminal(i);
        match (starts, ends) {
            (false, false) => self.build_c1(occurrences, i),
            (true, false) => self.build_c2(occurrences, i),
            (false, true) => self.build_c3(occurrences, i),
            (true, true) => self.build_c4(occurrences, i),
        }
    }

    fn sentence_of(&self, occurrences: &MatchedHierarchicalPhrases, i: usize) -> usize {
        occurrences.sentence_number(i)
    }

    fn target_span_acceptable(&self, target: Span, arity: usize) -> bool {
        let size = target.size();
        size >= arity + 1 && size <= self.config.max_phrase_span()
    }

    // C1: neither starts nor ends with a nonterminal.
    fn build_c1(&self, occurrences: &MatchedHierarchicalPhrases, i: usize) -> Option<Pattern> {
        let sentence = self.sentence_of(occurrences, i);
        let source_span = Span::new(
            occurrences.first_terminal_index(i),
            occurrences.last_terminal_index(i),
        );
        let target_span = self.alignments.consistent_target_span(sentence, source_span)?;
        if !self.target_span_acceptable(target_span, occurrences.arity()) {
            trace!("C1: target span {target_span:?} out of bounds, rejecting");
            return None;
        }
        self.construct_pattern(occurrences, i, source_span, target_span, false, false)
    }

    // C2: starts with a nonterminal. Scans leftward.
    fn build_c2(&self, occurrences: &MatchedHierarchicalPhrases, i: usize) -> Option<Pattern> {
        let sentence = self.sentence_of(occurrences, i);
        let first_t = occurrences.first_terminal_index(i) as i64;
        let last_t = occurrences.last_terminal_index(i);
        let sent_start = self.source_corpus.sentence_start(sentence) as i64;

        let mut span_start = first_t - 1;
        while span_start >= sent_start
            && first_t - span_start <= self.config.max_nonterminal_span() as i64
            && last_t as i64 - span_start <= self.config.max_phrase_span() as i64
        {
            let source_span = Span::new(span_start as usize, last_t);
            let accepted = self
                .alignments
                .consistent_target_span(sentence, source_span)
                .filter(|&target_span| self.target_span_acceptable(target_span, occurrences.arity()))
                .and_then(|target_span| {
                    self.construct_pattern(occurrences, i, source_span, target_span, true, false)
                });
            if let Some(pattern) = accepted {
                return Some(pattern);
            }
            span_start -= 1;
        }
        None
    }

    // C3: ends with a nonterminal. Scans rightward.
    fn build_c3(&self, occurrences: &MatchedHierarchicalPhrases, i: usize) -> Option<Pattern> {
        let sentence = self.sentence_of(occurrences, i);
        let first_t = occurrences.first_terminal_index(i);
        let last_t = occurrences.last_terminal_index(i);
        let sent_end = self.source_corpus.sentence_end(sentence);

        let mut span_end = last_t + 1;
        while span_end <= sent_end
            && span_end - last_t <= self.config.max_nonterminal_span()
            && span_end - first_t <= self.config.max_phrase_span()
        {
            let source_span = Span::new(first_t, span_end);
            let accepted = self
                .alignments
                .consistent_target_span(sentence, source_span)
                .filter(|&target_span| self.target_span_acceptable(target_span, occurrences.arity()))
                .and_then(|target_span| {
                    self.construct_pattern(occurrences, i, source_span, target_span, false, true)
                });
            if let Some(pattern) = accepted {
                return Some(pattern);
            }
            span_end += 1;
        }
        None
    }

    // C4: starts and ends with a nonterminal. Row-major sweep over (spanStart, spanEnd).
    fn build_c4(&self, occurrences: &MatchedHierarchicalPhrases, i: usize) -> Option<Pattern> {
        let sentence = self.sentence_of(occurrences, i);
        let first_t = occurrences.first_terminal_index(i) as i64;
        let last_t = occurrences.last_terminal_index(i) as i64;
        let sent_start = self.source_corpus.sentence_start(sentence) as i64;
        let sent_end = self.source_corpus.sentence_end(sentence) as i64;
        let max_nt = self.config.max_nonterminal_span() as i64;
        let max_phrase = self.config.max_phrase_span() as i64;

        let mut span_start = first_t - 1;
        let mut span_end = last_t + 1;

        loop {
            let in_bounds = span_start >= sent_start
                && span_end <= sent_end
                && first_t - span_start <= max_nt
                && span_end - last_t <= max_nt
                && span_end - span_start <= max_phrase;
            if !in_bounds {
                return None;
            }

            let source_span = Span::new(span_start as usize, span_end as usize);
            let accepted = self
                .alignments
                .consistent_target_span(sentence, source_span)
                .filter(|&target_span| self.target_span_acceptable(target_span, occurrences.arity()))
                .and_then(|target_span| {
                    self.construct_pattern(occurrences, i, source_span, target_span, true, true)
                });
            if let Some(pattern) = accepted {
                return Some(pattern);
            }

            let can_extend_end =
                span_end < sent_end && span_end + 1 - last_t <= max_nt && span_end + 1 - span_start <= max_phrase;
            if can_extend_end {
                span_end += 1;
            } else {
                span_end = last_t + 1;
                span_start -= 1;
            }
        }
    }

    fn construct_pattern(
        &self,
        occurrences: &MatchedHierarchicalPhrases,
        i: usize,
        source_span: Span,
        target_span: Span,
        source_starts_with_nt: bool,
        source_ends_with_nt: bool,
    ) -> Option<Pattern> {
        if source_span.size() > self.config.max_phrase_span() {
            return None;
        }

        if occurrences.arity() == 0 {
            if source_span.size() > self.config.max_phrase_length() {
                return None;
            }
            let word_ids = (target_span.start..target_span.end)
                .map(|p| self.target_corpus.word_id(p))
                .collect();
            return Some(Pattern::new(word_ids, self.target_corpus.vocabulary().clone()));
        }

        let sentence = self.sentence_of(occurrences, i);
        let mut nt_spans: Vec<LabeledSpan> = Vec::new();
        let mut next_label: i32 = -1;

        let push_nt = |source_nt: Span,
                            nt_spans: &mut Vec<LabeledSpan>,
                            next_label: &mut i32|
         -> Option<()> {
            if source_nt.size() < self.config.min_nonterminal_span() {
                return None;
            }
            let target_nt = self
                .alignments
                .consistent_target_span(sentence, source_nt)?;
            if target_nt == target_span {
                return None;
            }
            nt_spans.push(LabeledSpan::new(target_nt, *next_label));
            *next_label -= 1;
            Some(())
        };

        if source_starts_with_nt {
            let source_nt = Span::new(source_span.start, occurrences.first_terminal_index(i));
            push_nt(source_nt, &mut nt_spans, &mut next_label)?;
        }

        for k in 0..occurrences.number_of_terminal_sequences(i).saturating_sub(1) {
            let source_nt = Span::new(
                occurrences.terminal_sequence_end_index(i, k),
                occurrences.terminal_sequence_start_index(i, k + 1),
            );
            push_nt(source_nt, &mut nt_spans, &mut next_label)?;
        }

        if source_ends_with_nt {
            let source_nt = Span::new(occurrences.last_terminal_index(i), source_span.end);
            push_nt(source_nt, &mut nt_spans, &mut next_label)?;
        }

        let mut pattern_size = target_span.size();
        for nt in &nt_spans {
            pattern_size -= nt.span.size() - 1;
        }

        nt_spans.sort_by_key(|ls| (ls.span.start, ls.span.end));

        if nt_spans[0].span.start == target_span.start {
            let covered: usize = nt_spans.iter().map(|ls| ls.span.size()).sum();
            if covered >= target_span.size() {
                trace!("degenerate NT overlap at target span start, rejecting");
                return None;
            }
        }

        let mut word_ids: Vec<WordId> = Vec::with_capacity(pattern_size);
        let mut found_aligned_terminal = false;

        self.emit_terminal_run(
            target_span.start,
            nt_spans[0].span.start,
            occurrences,
            i,
            &mut word_ids,
            &mut found_aligned_terminal,
        );
        word_ids.push(nt_spans[0].label);

        for k in 1..nt_spans.len() {
            self.emit_terminal_run(
                nt_spans[k - 1].span.end,
                nt_spans[k].span.start,
                occurrences,
                i,
                &mut word_ids,
                &mut found_aligned_terminal,
            );
            word_ids.push(nt_spans[k].label);
        }

        let last_end = nt_spans.last().expect("arity >= 1").span.end;
        self.emit_terminal_run(
            last_end,
            target_span.end,
            occurrences,
            i,
            &mut word_ids,
            &mut found_aligned_terminal,
        );

        if !found_aligned_terminal {
            trace!("no aligned terminal found in candidate translation, rejecting");
            return None;
        }

        debug_assert_eq!(word_ids.len(), pattern_size);
        Some(Pattern::new(word_ids, self.target_corpus.vocabulary().clone()))
    }

    fn emit_terminal_run(
        &self,
        start: usize,
        end: usize,
        occurrences: &MatchedHierarchicalPhrases,
        i: usize,
        word_ids: &mut Vec<WordId>,
        found_aligned_terminal: &mut bool,
    ) {
        for p in start..end {
            word_ids.push(self.target_corpus.word_id(p));
            if !*found_aligned_terminal {
                *found_aligned_terminal = self.alignments.has_aligned_terminal(p, occurrences, i);
            }
        }
    }
}
