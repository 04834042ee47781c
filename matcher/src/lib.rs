//! Content-based internship recommendation core.
//!
//! Turns a catalog of postings into TF-IDF vectors in a shared term space,
//! transforms a free-text skills query into the same space, and merges
//! cosine similarity with hard categorical filters into one deterministic
//! ranking. No I/O, no session state: catalog loading and presentation live
//! in the `catalog` and `server` crates.

pub mod error;
pub mod listing;
pub mod ranker;
pub mod recommend;
pub mod tokenizer;
pub mod vectorizer;

pub type TermId = u32;
pub type DocId = u32;

pub use error::MatchError;
pub use listing::{Corpus, Listing};
pub use ranker::{rank, FilterCriteria, FilterTrace, RankedResult, WorkMode};
pub use recommend::{Recommender, Snapshot};
pub use vectorizer::{fit, DocMatrix, QueryVector, SparseVec, TermIndex, VectorizerConfig};
