use std::sync::Arc;

use crate::ranker::{rank, FilterCriteria, RankedResult};
use crate::vectorizer::{fit, DocMatrix, QueryVector, TermIndex, VectorizerConfig};
use crate::{Corpus, MatchError};

/// One fitted (term index, document matrix) pair. Never mutated after
/// construction, so it can be shared read-only across threads; a caller
/// still holding an old snapshot after a rebuild keeps getting consistent,
/// if stale, results.
#[derive(Debug)]
pub struct Snapshot {
    pub terms: TermIndex,
    pub matrix: DocMatrix,
}

/// Caching facade over the vectorizer and ranker.
///
/// Fitting is the expensive step, so it runs once per corpus-content-change:
/// [`Recommender::rebuild`] is keyed on the corpus fingerprint and is a
/// no-op when the content is unchanged. Holds no other state; every query
/// is a pure function of (snapshot, corpus, query, filters).
#[derive(Debug, Default)]
pub struct Recommender {
    config: VectorizerConfig,
    fitted: Option<Arc<Snapshot>>,
}

impl Recommender {
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    /// Fit a fresh snapshot if the corpus content changed since the last
    /// build. Idempotent: returns `Ok(false)` without refitting when the
    /// fingerprint matches. The previous snapshot is replaced, never
    /// mutated.
    pub fn rebuild(&mut self, corpus: &Corpus) -> Result<bool, MatchError> {
        let fingerprint = corpus.fingerprint();
        if let Some(snapshot) = &self.fitted {
            if snapshot.terms.fingerprint() == fingerprint {
                tracing::debug!(%fingerprint, "corpus unchanged, keeping fitted index");
                return Ok(false);
            }
        }
        let (terms, matrix) = fit(corpus, &self.config)?;
        self.fitted = Some(Arc::new(Snapshot { terms, matrix }));
        tracing::info!(
            %fingerprint,
            listings = corpus.len(),
            "rebuilt recommendation index"
        );
        Ok(true)
    }

    /// The current snapshot, for callers that pin one across several calls.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.fitted.clone()
    }

    /// Transform free text into the fitted term space.
    pub fn transform(&self, text: &str) -> Result<QueryVector, MatchError> {
        let snapshot = self.fitted.as_ref().ok_or(MatchError::NotBuilt)?;
        Ok(snapshot.terms.transform(text))
    }

    /// Rank `corpus` against `query` and `filters` using the fitted
    /// snapshot. The corpus must be the one the snapshot was built from
    /// (or content-identical); a mismatch surfaces as `StaleIndex`.
    pub fn recommend(
        &self,
        corpus: &Corpus,
        query: &str,
        filters: &FilterCriteria,
    ) -> Result<Vec<RankedResult>, MatchError> {
        let snapshot = self.fitted.as_ref().ok_or(MatchError::NotBuilt)?;
        rank(corpus, &snapshot.terms, &snapshot.matrix, query, filters)
    }
}
