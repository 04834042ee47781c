use thiserror::Error;

/// Contract violations surfaced by the recommendation core.
///
/// "No results after filtering" is not represented here: an empty result
/// list is the normal empty state, not an error.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The corpus was empty, or every listing reduced to zero terms after
    /// stopword removal. Recoverable by supplying a usable corpus.
    #[error("corpus is empty or contains no scorable terms")]
    EmptyCorpus,

    /// `transform` or `rank` was invoked before any successful build.
    #[error("no fitted index; call rebuild before transform or rank")]
    NotBuilt,

    /// The document matrix does not match the corpus it is ranked against;
    /// the caller replaced the corpus without rebuilding.
    #[error("stale index: corpus has {docs} listings but matrix has {rows} rows")]
    StaleIndex { docs: usize, rows: usize },
}
