//! Core of a Hiero-style hierarchical rule extractor for statistical
//! machine translation.
//!
//! Given a source pattern and the set of locations where it occurs in a
//! word-aligned bilingual corpus, [`Extractor::extract_rules`] produces
//! scored synchronous context-free grammar rules `X -> <source, target>`.
//!
//! The corpus representation, alignment store, and lexical-probability
//! estimator are external collaborators consumed through the traits in
//! [`corpus`], [`alignment`], and [`lexprob`]; [`reference`] provides toy
//! in-memory implementations for tests and the demo binary.

pub mod aggregator;
pub mod alignment;
pub mod builder;
pub mod cli;
pub mod cli_format;
pub mod config;
pub mod corpus;
pub mod error;
pub mod extractor;
pub mod lexprob;
pub mod pattern;
pub mod phrases;
pub mod reference;
pub mod rule;
pub mod span;
pub mod vocabulary;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use pattern::Pattern;
pub use phrases::{MatchedHierarchicalPhrases, Occurrence};
pub use rule::{Rule, LHS, VERY_UNLIKELY};
pub use span::{LabeledSpan, Span};
pub use vocabulary::{Vocabulary, WordId};
