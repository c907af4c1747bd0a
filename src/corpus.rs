//! Source/target corpus interfaces.
//!
//! These are the well-defined interfaces through which the core consumes the
//! (excluded, suffix-array backed) corpus representation. Only the reads the
//! extractor actually needs are exposed.

use std::sync::Arc;

use crate::vocabulary::{Vocabulary, WordId};

/// Read-only access to the source-side corpus: sentence boundaries only, the
/// actual source word ids are not needed by the core (the caller already
/// supplied the source pattern's word ids directly).
pub trait SourceCorpus {
    fn sentence_start(&self, sentence_id: usize) -> usize;
    fn sentence_end(&self, sentence_id: usize) -> usize;
    fn vocabulary(&self) -> &Arc<Vocabulary>;
}

/// Read-only access to the target-side corpus.
pub trait TargetCorpus {
    fn word_id(&self, position: usize) -> WordId;
    fn vocabulary(&self) -> &Arc<Vocabulary>;
}
