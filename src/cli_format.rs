//! Parsing for the demo binary's toy scenario format.
//!
//! This is deliberately not a grammar file format (serializing grammars is
//! a Non-goal, `spec.md` §1); it is a small line-oriented description of a
//! corpus/alignment/pattern scenario used only to drive
//! [`crate::Extractor::extract_rules`] from the command line for manual
//! experimentation, the same role the teacher's PTB-tree stdin format plays
//! for grammar induction.

use std::fmt;

use nom::character::complete::{char, digit1, space0};
use nom::combinator::map_res;
use nom::multi::separated_list1;
use nom::sequence::{delimited, separated_pair};
use nom::{IResult, Parser};

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::phrases::{MatchedHierarchicalPhrases, Occurrence};
use crate::reference::{InMemoryAlignments, InMemorySourceCorpus, InMemoryTargetCorpus, TableLexicalProbabilities};
use crate::span::Span;
use crate::vocabulary::{Vocabulary, WordId};

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },
    #[error("missing `config` line")]
    MissingConfig,
    #[error("missing `pattern` line")]
    MissingPattern,
    #[error(transparent)]
    InvalidConfig(#[from] ExtractorError),
}

/// A fully-parsed toy scenario ready to feed an [`crate::Extractor`].
pub struct Scenario {
    pub config: ExtractorConfig,
    pub vocabulary: Vocabulary,
    pub source_pattern: Vec<WordId>,
    pub source_corpus: InMemorySourceCorpus,
    pub target_corpus: InMemoryTargetCorpus,
    pub alignments: InMemoryAlignments,
    pub lex_probs: TableLexicalProbabilities,
    pub occurrences: MatchedHierarchicalPhrases,
}

struct RawOccurrence {
    sentence_id: usize,
    starts: bool,
    ends: bool,
    runs: Vec<(usize, usize)>,
}

/// Parses the scenario format described in the crate-level CLI help.
pub fn parse_scenario(input: &str) -> Result<Scenario, ScenarioError> {
    let mut vocabulary = Vocabulary::new();
    let mut config: Option<ExtractorConfig> = None;
    let mut sentence_bounds: Vec<(usize, usize, usize)> = Vec::new();
    let mut target_words: Vec<WordId> = Vec::new();
    let mut source_pattern: Option<Vec<WordId>> = None;
    let mut raw_occurrences: Vec<RawOccurrence> = Vec::new();
    let mut align_links: Vec<(usize, usize, usize)> = Vec::new();
    let mut lex_pairs: Vec<(f32, f32)> = Vec::new();

    for (line_no, raw_line) in input.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or_default();
        let rest: Vec<&str> = tokens.collect();

        match keyword {
            "config" => {
                let values = parse_usizes(&rest, line_no)?;
                let [sample_size, max_phrase_span, max_phrase_length, min_nt, max_nt] =
                    values.as_slice()
                else {
                    return Err(malformed(line_no, "config needs exactly 5 values"));
                };
                config = Some(ExtractorConfig::new(
                    *sample_size,
                    *max_phrase_span,
                    *max_phrase_length,
                    *min_nt,
                    *max_nt,
                )?);
            }
            "sentence" => {
                let values = parse_usizes(&rest, line_no)?;
                let [id, start, end] = values.as_slice() else {
                    return Err(malformed(line_no, "sentence needs id, start, end"));
                };
                sentence_bounds.push((*id, *start, *end));
            }
            "target" => {
                target_words = rest.iter().map(|w| vocabulary.intern(w)).collect();
            }
            "pattern" => {
                source_pattern = Some(parse_pattern_tokens(&rest, &mut vocabulary));
            }
            "occurrence" => {
                if rest.len() < 4 {
                    return Err(malformed(line_no, "occurrence needs sentence, starts, ends, runs"));
                }
                let sentence_id = parse_one(rest[0], line_no)?;
                let starts = rest[1] != "0";
                let ends = rest[2] != "0";
                let runs_str = rest[3..].join(" ");
                let (_, runs) = parse_pairs(&runs_str)
                    .map_err(|e| malformed(line_no, &format!("bad terminal runs: {e:?}")))?;
                raw_occurrences.push(RawOccurrence {
                    sentence_id,
                    starts,
                    ends,
                    runs,
                });
            }
            "align" => {
                let values = parse_usizes(&rest, line_no)?;
                let [sentence_id, src, tgt] = values.as_slice() else {
                    return Err(malformed(line_no, "align needs sentence, src, tgt"));
                };
                align_links.push((*sentence_id, *src, *tgt));
            }
            "lex" => {
                if rest.len() != 2 {
                    return Err(malformed(line_no, "lex needs source_given_target and target_given_source"));
                }
                let st: f32 = rest[0]
                    .parse()
                    .map_err(|_| malformed(line_no, "lex values must be floats"))?;
                let ts: f32 = rest[1]
                    .parse()
                    .map_err(|_| malformed(line_no, "lex values must be floats"))?;
                lex_pairs.push((st, ts));
            }
            other => return Err(malformed(line_no, &format!("unknown keyword `{other}`"))),
        }
    }

    let config = config.ok_or(ScenarioError::MissingConfig)?;
    let source_pattern = source_pattern.ok_or(ScenarioError::MissingPattern)?;

    sentence_bounds.sort_by_key(|&(id, _, _)| id);
    let mut boundaries = Vec::with_capacity(sentence_bounds.len() + 1);
    for (expected_id, &(id, start, end)) in sentence_bounds.iter().enumerate() {
        debug_assert_eq!(id, expected_id, "sentence ids must be contiguous from 0");
        if boundaries.is_empty() {
            boundaries.push(start);
        }
        boundaries.push(end);
    }
    if boundaries.is_empty() {
        boundaries.push(0);
    }

    let mut alignments = InMemoryAlignments::new();
    for (sentence_id, src, tgt) in align_links {
        alignments.add_link(sentence_id, src, tgt);
    }

    let arity = source_pattern.iter().filter(|&&id| id < 0).count();
    let (starts, ends) = raw_occurrences
        .first()
        .map(|o| (o.starts, o.ends))
        .unwrap_or((false, false));

    let occurrences = MatchedHierarchicalPhrases::from_occurrences(
        arity,
        starts,
        ends,
        raw_occurrences
            .into_iter()
            .map(|o| Occurrence {
                sentence_number: o.sentence_id,
                terminal_runs: o.runs.into_iter().map(|(s, e)| Span::new(s, e)).collect(),
            })
            .collect(),
    );

    Ok(Scenario {
        config,
        source_corpus: InMemorySourceCorpus::new(boundaries),
        target_corpus: InMemoryTargetCorpus::new(target_words),
        alignments,
        lex_probs: TableLexicalProbabilities::new(lex_pairs),
        occurrences,
        source_pattern,
        vocabulary,
    })
}

fn parse_pattern_tokens(tokens: &[&str], vocabulary: &mut Vocabulary) -> Vec<WordId> {
    let mut next_label: i32 = -1;
    tokens
        .iter()
        .map(|&tok| {
            if tok == "[]" {
                let label = next_label;
                next_label -= 1;
                label
            } else {
                vocabulary.intern(tok)
            }
        })
        .collect()
}

fn parse_usizes(tokens: &[&str], line_no: usize) -> Result<Vec<usize>, ScenarioError> {
    tokens
        .iter()
        .map(|t| parse_one(t, line_no))
        .collect()
}

fn parse_one(token: &str, line_no: usize) -> Result<usize, ScenarioError> {
    token
        .parse::<usize>()
        .map_err(|_| malformed(line_no, &format!("expected an integer, got `{token}`")))
}

fn malformed(line: usize, message: &str) -> ScenarioError {
    ScenarioError::Malformed {
        line,
        message: message.to_string(),
    }
}

fn parse_usize_token(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse).parse(input)
}

fn parse_pair(input: &str) -> IResult<&str, (usize, usize)> {
    delimited(
        char('('),
        separated_pair(parse_usize_token, (space0, char(','), space0), parse_usize_token),
        char(')'),
    )
    .parse(input)
}

fn parse_pairs(input: &str) -> IResult<&str, Vec<(usize, usize)>> {
    separated_list1(space0, parse_pair).parse(input.trim())
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("source_pattern", &self.source_pattern)
            .field("occurrences", &self.occurrences.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_scenario() {
        let input = "\
config 10 5 5 1 5
sentence 0 0 10
target a b c d e f g h i j
pattern p q
occurrence 0 0 0 (3,5)
align 0 3 10
align 0 4 11
lex 0.5 0.4
";
        let scenario = parse_scenario(input).expect("should parse");
        assert_eq!(scenario.source_pattern.len(), 2);
        assert_eq!(scenario.occurrences.len(), 1);
    }

    #[test]
    fn rejects_missing_config() {
        let err = parse_scenario("pattern a b").unwrap_err();
        assert!(matches!(err, ScenarioError::MissingConfig));
    }

    #[test]
    fn pattern_tokens_assign_decreasing_labels() {
        let mut voc = Vocabulary::new();
        let ids = parse_pattern_tokens(&["a", "[]", "b", "[]"], &mut voc);
        assert_eq!(ids[1], -1);
        assert_eq!(ids[3], -2);
    }
}
