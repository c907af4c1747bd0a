//! The extractor driver: `spec.md` §4.1.

use log::{debug, trace};

use crate::aggregator;
use crate::alignment::Alignments;
use crate::builder::TranslationBuilder;
use crate::config::ExtractorConfig;
use crate::corpus::{SourceCorpus, TargetCorpus};
use crate::lexprob::LexicalProbabilities;
use crate::pattern::Pattern;
use crate::phrases::MatchedHierarchicalPhrases;
use crate::rule::Rule;
use crate::vocabulary::WordId;

pub struct Extractor<'a> {
    config: ExtractorConfig,
    source_corpus: &'a dyn SourceCorpus,
    target_corpus: &'a dyn TargetCorpus,
    alignments: &'a dyn Alignments,
    lex_probs: &'a dyn LexicalProbabilities,
}

impl<'a> Extractor<'a> {
    pub fn new(
        config: ExtractorConfig,
        source_corpus: &'a dyn SourceCorpus,
        target_corpus: &'a dyn TargetCorpus,
        alignments: &'a dyn Alignments,
        lex_probs: &'a dyn LexicalProbabilities,
    ) -> Self {
        Self {
            config,
            source_corpus,
            target_corpus,
            alignments,
            lex_probs,
        }
    }

    pub fn extract_rules(
        &self,
        source_word_ids: &[WordId],
        matched_occurrences: &MatchedHierarchicalPhrases,
    ) -> Vec<Rule> {
        let builder = TranslationBuilder::new(
            self.config,
            self.source_corpus,
            self.target_corpus,
            self.alignments,
        );

        let n = matched_occurrences.len();
        let step = sampling_step(&self.config, n);
        debug!("extracting rules: {n} occurrences, sampling step {step}");

        let mut translations: Vec<Pattern> = Vec::new();
        let mut lex_pairs: Vec<(f32, f32)> = Vec::new();

        let mut i = 0;
        while i < n {
            match builder.build(matched_occurrences, i) {
                Some(translation) => {
                    let lex_pair = self.lex_probs.calculate_lex_probs(matched_occurrences, i);
                    translations.push(translation);
                    lex_pairs.push(lex_pair);
                }
                None => trace!("occurrence {i} produced no translation"),
            }
            i += step;
        }

        aggregator::aggregate(source_word_ids, &translations, &lex_pairs)
    }
}

fn sampling_step(config: &ExtractorConfig, n: usize) -> usize {
    if n <= config.sample_size() {
        1
    } else {
        n / config.sample_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrases::Occurrence;
    use crate::reference::{
        InMemoryAlignments, InMemorySourceCorpus, InMemoryTargetCorpus, TableLexicalProbabilities,
    };
    use crate::span::Span;

    #[test]
    fn sampling_step_is_one_below_sample_size() {
        let config = ExtractorConfig::new(100, 10, 10, 1, 5).unwrap();
        assert_eq!(sampling_step(&config, 50), 1);
        assert_eq!(sampling_step(&config, 100), 1);
    }

    #[test]
    fn sampling_step_floors_division_above_sample_size() {
        let config = ExtractorConfig::new(10, 10, 10, 1, 5).unwrap();
        assert_eq!(sampling_step(&config, 101), 10);
    }

    fn target_corpus(len: usize, overrides: &[(usize, i32)]) -> InMemoryTargetCorpus {
        let mut words = vec![0; len];
        for &(pos, id) in overrides {
            words[pos] = id;
        }
        InMemoryTargetCorpus::new(words)
    }

    /// S1: arity-0 pattern, one occurrence, pure terminal translation.
    #[test]
    fn s1_arity_zero_single_occurrence() {
        let config = ExtractorConfig::new(1, 5, 5, 1, 5).unwrap();
        let source_corpus = InMemorySourceCorpus::new(vec![0, 6]);
        let target_corpus = target_corpus(12, &[(10, 100), (11, 101)]);

        let mut alignments = InMemoryAlignments::new();
        alignments.add_link(0, 3, 10);
        alignments.add_link(0, 4, 11);

        let lex_probs = TableLexicalProbabilities::new(vec![(0.5, 0.4)]);

        let occurrences = MatchedHierarchicalPhrases::from_occurrences(
            0,
            false,
            false,
            vec![Occurrence {
                sentence_number: 0,
                terminal_runs: vec![Span::new(3, 5)],
            }],
        );

        let extractor = Extractor::new(config, &source_corpus, &target_corpus, &alignments, &lex_probs);
        let rules = extractor.extract_rules(&[7, 8], &occurrences);

        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert_eq!(rule.target_word_ids, vec![100, 101]);
        assert_eq!(rule.arity, 0);
        assert!((rule.features[0] - 0.0).abs() < 1e-6);
        assert!((rule.features[1] - (-(0.5_f64.log10()) as f32)).abs() < 1e-5);
        assert!((rule.features[2] - (-(0.4_f64.log10()) as f32)).abs() < 1e-5);
    }

    /// S2: a single internal nonterminal between two terminal runs.
    #[test]
    fn s2_single_internal_nonterminal() {
        let config = ExtractorConfig::new(1, 5, 5, 1, 5).unwrap();
        let source_corpus = InMemorySourceCorpus::new(vec![0, 8]);
        let target_corpus = target_corpus(
            25,
            &[(20, 200), (21, 201), (22, 202), (23, 203), (24, 204)],
        );

        let mut alignments = InMemoryAlignments::new();
        alignments.add_link(0, 2, 20);
        alignments.add_link(0, 6, 24);
        alignments.add_link(0, 3, 22);
        alignments.add_link(0, 4, 23);

        let lex_probs = TableLexicalProbabilities::new(vec![(0.6, 0.7)]);

        let occurrences = MatchedHierarchicalPhrases::from_occurrences(
            1,
            false,
            false,
            vec![Occurrence {
                sentence_number: 0,
                terminal_runs: vec![Span::new(2, 3), Span::new(6, 7)],
            }],
        );

        let extractor = Extractor::new(config, &source_corpus, &target_corpus, &alignments, &lex_probs);
        let rules = extractor.extract_rules(&[1, -1, 2], &occurrences);

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].target_word_ids, vec![200, 201, -1, 204]);
        assert_eq!(rules[0].arity, 1);
    }

    /// S3: leading nonterminal; the first candidate span is rejected on
    /// bounds, the second succeeds.
    #[test]
    fn s3_leading_nonterminal_second_candidate_succeeds() {
        let config = ExtractorConfig::new(1, 10, 10, 1, 10).unwrap();
        let source_corpus = InMemorySourceCorpus::new(vec![0, 10]);
        let target_corpus = target_corpus(
            56,
            &[(50, 500), (51, 501), (52, 502), (53, 503), (54, 504), (55, 505)],
        );

        let mut alignments = InMemoryAlignments::new();
        alignments.add_link(0, 5, 55);
        alignments.add_link(0, 3, 50);

        let lex_probs = TableLexicalProbabilities::new(vec![(0.5, 0.5)]);

        let occurrences = MatchedHierarchicalPhrases::from_occurrences(
            1,
            true,
            false,
            vec![Occurrence {
                sentence_number: 0,
                terminal_runs: vec![Span::new(5, 6)],
            }],
        );

        let extractor = Extractor::new(config, &source_corpus, &target_corpus, &alignments, &lex_probs);
        let rules = extractor.extract_rules(&[-1, 9], &occurrences);

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].target_word_ids, vec![-1, 501, 502, 503, 504, 505]);
    }

    /// S4: two occurrences producing identical translations are collapsed
    /// into one rule, with arithmetic-mean lexical scores.
    #[test]
    fn s4_duplicate_translations_collapse() {
        let config = ExtractorConfig::new(2, 5, 5, 1, 5).unwrap();
        let source_corpus = InMemorySourceCorpus::new(vec![0, 22]);
        let target_corpus = target_corpus(22, &[(10, 500), (11, 501), (20, 500), (21, 501)]);

        let mut alignments = InMemoryAlignments::new();
        alignments.add_link(0, 3, 10);
        alignments.add_link(0, 4, 11);
        alignments.add_link(0, 13, 20);
        alignments.add_link(0, 14, 21);

        let lex_probs = TableLexicalProbabilities::new(vec![(0.5, 0.4), (0.3, 0.2)]);

        let occurrences = MatchedHierarchicalPhrases::from_occurrences(
            0,
            false,
            false,
            vec![
                Occurrence {
                    sentence_number: 0,
                    terminal_runs: vec![Span::new(3, 5)],
                },
                Occurrence {
                    sentence_number: 0,
                    terminal_runs: vec![Span::new(13, 15)],
                },
            ],
        );

        let extractor = Extractor::new(config, &source_corpus, &target_corpus, &alignments, &lex_probs);
        let rules = extractor.extract_rules(&[7, 8], &occurrences);

        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert!((rule.features[0] - 0.0).abs() < 1e-6);
        assert!((rule.features[1] - (-(0.4_f64.log10()) as f32)).abs() < 1e-5);
        assert!((rule.features[2] - (-(0.3_f64.log10()) as f32)).abs() < 1e-5);
    }

    /// S5: a translation whose emitted terminal positions have no alignment
    /// back to this occurrence's terminal runs is rejected entirely.
    #[test]
    fn s5_no_aligned_terminal_is_rejected() {
        let config = ExtractorConfig::new(1, 10, 10, 1, 5).unwrap();
        let source_corpus = InMemorySourceCorpus::new(vec![0, 12]);
        let target_corpus = target_corpus(47, &[]);

        let mut alignments = InMemoryAlignments::new();
        // Both nonterminal gaps are aligned; the middle terminal run ("mid")
        // and the outer two terminal runs are entirely unaligned.
        alignments.add_link(0, 3, 40);
        alignments.add_link(0, 4, 41);
        alignments.add_link(0, 7, 45);
        alignments.add_link(0, 8, 46);

        let lex_probs = TableLexicalProbabilities::new(vec![]);

        let occurrences = MatchedHierarchicalPhrases::from_occurrences(
            2,
            false,
            false,
            vec![Occurrence {
                sentence_number: 0,
                terminal_runs: vec![Span::new(2, 3), Span::new(5, 6), Span::new(9, 10)],
            }],
        );

        let extractor = Extractor::new(config, &source_corpus, &target_corpus, &alignments, &lex_probs);
        let rules = extractor.extract_rules(&[10, -1, 11, -2, 12], &occurrences);

        assert!(rules.is_empty());
    }

    /// S6: two nonterminal target spans anchored at the translation's start
    /// and together covering it leave no room for a separating terminal, so
    /// the candidate is rejected.
    #[test]
    fn s6_degenerate_nonterminal_overlap_is_rejected() {
        let config = ExtractorConfig::new(1, 10, 10, 1, 5).unwrap();
        let source_corpus = InMemorySourceCorpus::new(vec![0, 12]);
        let target_corpus = target_corpus(44, &[]);

        let mut alignments = InMemoryAlignments::new();
        alignments.add_link(0, 3, 40);
        alignments.add_link(0, 4, 41);
        alignments.add_link(0, 7, 42);
        alignments.add_link(0, 8, 43);

        let lex_probs = TableLexicalProbabilities::new(vec![]);

        let occurrences = MatchedHierarchicalPhrases::from_occurrences(
            2,
            false,
            false,
            vec![Occurrence {
                sentence_number: 0,
                terminal_runs: vec![Span::new(2, 3), Span::new(5, 6), Span::new(9, 10)],
            }],
        );

        let extractor = Extractor::new(config, &source_corpus, &target_corpus, &alignments, &lex_probs);
        let rules = extractor.extract_rules(&[10, -1, 11, -2, 12], &occurrences);

        assert!(rules.is_empty());
    }

    /// Sampling visitation property from `spec.md` §8 property 2.
    #[test]
    fn sampling_visits_every_occurrence_when_under_sample_size() {
        let config = ExtractorConfig::new(100, 5, 5, 1, 5).unwrap();
        let source_corpus = InMemorySourceCorpus::new(vec![0, 1000]);

        let n = 10;
        let mut overrides = Vec::new();
        let mut alignments = InMemoryAlignments::new();
        let mut runs = Vec::new();
        for i in 0..n {
            let src = i * 3;
            let tgt = i * 3;
            overrides.push((tgt, (100 + i) as i32));
            alignments.add_link(0, src, tgt);
            runs.push(Occurrence {
                sentence_number: 0,
                terminal_runs: vec![Span::new(src, src + 1)],
            });
        }
        let target_corpus = target_corpus(1000, &overrides);
        let lex_probs = TableLexicalProbabilities::new(vec![(1.0, 1.0); n]);
        let occurrences = MatchedHierarchicalPhrases::from_occurrences(0, false, false, runs);

        let extractor = Extractor::new(config, &source_corpus, &target_corpus, &alignments, &lex_probs);
        let rules = extractor.extract_rules(&[1], &occurrences);

        // Every occurrence has a distinct single-word translation, so every
        // one of the n occurrences must surface as its own rule when
        // n <= sampleSize.
        assert_eq!(rules.len(), n);
    }
}
