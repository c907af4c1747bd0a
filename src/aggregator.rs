//! Aggregation and feature computation: `spec.md` §4.2.
//!
//! Deduplicates sampled translations by pattern identity and computes the
//! three log-probability features with Chiang's arithmetic-mean averaging
//! discipline (not Koehn's max).

use std::collections::HashMap;

use crate::pattern::Pattern;
use crate::rule::{Rule, LHS, VERY_UNLIKELY};
use crate::vocabulary::WordId;

struct Accumulator {
    count: u32,
    sum_st: f64,
    sum_ts: f64,
    lex_count: u32,
}

/// Aggregates sampled `(translation, lexProbs)` pairs into scored [`Rule`]s.
pub fn aggregate(
    source_word_ids: &[WordId],
    translations: &[Pattern],
    lex_pairs: &[(f32, f32)],
) -> Vec<Rule> {
    debug_assert_eq!(translations.len(), lex_pairs.len());
    let total = translations.len();
    if total == 0 {
        return Vec::new();
    }

    let mut order: Vec<&Pattern> = Vec::new();
    let mut accumulators: HashMap<&Pattern, Accumulator> = HashMap::new();

    for (translation, &(lex_st, lex_ts)) in translations.iter().zip(lex_pairs) {
        match accumulators.get_mut(translation) {
            Some(acc) => {
                acc.count += 1;
                acc.sum_st += lex_st as f64;
                acc.sum_ts += lex_ts as f64;
                acc.lex_count += 1;
            }
            None => {
                order.push(translation);
                accumulators.insert(
                    translation,
                    Accumulator {
                        count: 1,
                        sum_st: lex_st as f64,
                        sum_ts: lex_ts as f64,
                        lex_count: 1,
                    },
                );
            }
        }
    }

    order
        .into_iter()
        .map(|translation| {
            let acc = &accumulators[translation];
            debug_assert_eq!(acc.lex_count, acc.count);

            let p_e_given_f = neg_log10(acc.count as f64 / total as f64);
            let lex_p_e_given_f = neg_log10(acc.sum_st / acc.lex_count as f64);
            let lex_p_f_given_e = neg_log10(acc.sum_ts / acc.lex_count as f64);

            Rule {
                lhs: LHS,
                source_word_ids: source_word_ids.to_vec(),
                target_word_ids: translation.word_ids().to_vec(),
                features: [p_e_given_f, lex_p_e_given_f, lex_p_f_given_e],
                arity: translation.arity(),
            }
        })
        .collect()
}

fn neg_log10(value: f64) -> f32 {
    let log = -(value.log10());
    if log.is_finite() {
        log as f32
    } else {
        VERY_UNLIKELY
    }
}
