use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tokenizer::tokenize;
use crate::{Corpus, MatchError, TermId};

/// Sparse vector in vocabulary space: `(term id, weight)` pairs sorted by
/// term id. The zero vector is the empty list.
pub type SparseVec = Vec<(TermId, f32)>;

/// A query transformed into the fitted term space. Ephemeral; recomputed per
/// query, never persisted.
pub type QueryVector = SparseVec;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Vocabulary cap: at most this many terms, chosen by total corpus count
    /// (ties broken lexicographically).
    pub max_terms: usize,
    /// `ln((1+n)/(1+df)) + 1` when set, `ln(n/df)` when not. The smoothed
    /// form never weighs a term at zero, so a document scored against its
    /// own text always reaches similarity 1.0.
    pub smooth_idf: bool,
    /// `1 + ln(count)` when set, raw counts when not.
    pub sublinear_tf: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_terms: 1000,
            smooth_idf: true,
            sublinear_tf: false,
        }
    }
}

/// The fitted vocabulary and idf weights for one corpus snapshot.
/// Immutable once built; a corpus change requires fitting a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermIndex {
    dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
    idf: Vec<f32>,
    config: VectorizerConfig,
    fingerprint: String,
}

/// One L2-normalized sparse row per listing, same dimensionality as the
/// `TermIndex` vocabulary. Fully determined by (index, corpus).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocMatrix {
    pub rows: Vec<SparseVec>,
}

/// Build the term index and document matrix for a corpus.
///
/// Deterministic for a fixed corpus and config. Fails with
/// [`MatchError::EmptyCorpus`] when there is nothing scorable.
pub fn fit(corpus: &Corpus, config: &VectorizerConfig) -> Result<(TermIndex, DocMatrix), MatchError> {
    let token_docs: Vec<Vec<String>> = corpus
        .listings
        .iter()
        .map(|l| tokenize(&l.scoring_text()))
        .collect();
    if corpus.is_empty() || token_docs.iter().all(|t| t.is_empty()) {
        return Err(MatchError::EmptyCorpus);
    }

    // Corpus-wide totals and document frequencies.
    let mut totals: HashMap<&str, u64> = HashMap::new();
    let mut df: HashMap<&str, u32> = HashMap::new();
    for tokens in &token_docs {
        for t in tokens {
            *totals.entry(t).or_insert(0) += 1;
        }
        let mut unique: Vec<&str> = tokens.iter().map(String::as_str).collect();
        unique.sort_unstable();
        unique.dedup();
        for t in unique {
            *df.entry(t).or_insert(0) += 1;
        }
    }

    // Vocabulary cap: keep the most frequent terms, lexicographic on ties,
    // then assign ids in sorted term order so the fit is deterministic.
    let mut by_count: Vec<(&str, u64)> = totals.iter().map(|(t, c)| (*t, *c)).collect();
    by_count.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    by_count.truncate(config.max_terms);
    let mut vocab: Vec<&str> = by_count.into_iter().map(|(t, _)| t).collect();
    vocab.sort_unstable();

    let n = corpus.len() as f32;
    let mut dictionary: HashMap<String, TermId> = HashMap::with_capacity(vocab.len());
    let mut terms: Vec<String> = Vec::with_capacity(vocab.len());
    let mut idf: Vec<f32> = Vec::with_capacity(vocab.len());
    for (id, term) in vocab.iter().enumerate() {
        let df_t = df[term].max(1) as f32;
        let w = if config.smooth_idf {
            ((1.0 + n) / (1.0 + df_t)).ln() + 1.0
        } else {
            (n / df_t).ln()
        };
        dictionary.insert((*term).to_string(), id as TermId);
        terms.push((*term).to_string());
        idf.push(w);
    }

    let index = TermIndex {
        dictionary,
        terms,
        idf,
        config: config.clone(),
        fingerprint: corpus.fingerprint(),
    };

    let rows = token_docs.iter().map(|t| index.vectorize(t)).collect();
    tracing::debug!(
        listings = corpus.len(),
        vocabulary = index.terms.len(),
        "fitted term index"
    );
    Ok((index, DocMatrix { rows }))
}

impl TermIndex {
    /// Transform arbitrary text into the fitted term space. Terms outside
    /// the vocabulary are dropped; empty or whitespace-only text yields the
    /// zero vector ("no preference"), never an error.
    pub fn transform(&self, text: &str) -> QueryVector {
        self.vectorize(&tokenize(text))
    }

    pub fn vocab_len(&self) -> usize {
        self.terms.len()
    }

    /// Term string for a vocabulary id.
    pub fn term(&self, id: TermId) -> &str {
        &self.terms[id as usize]
    }

    /// Fingerprint of the corpus this index was fitted from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    fn vectorize(&self, tokens: &[String]) -> SparseVec {
        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for t in tokens {
            if let Some(&id) = self.dictionary.get(t) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        let mut vec: SparseVec = counts
            .into_iter()
            .map(|(id, count)| {
                let tf = if self.config.sublinear_tf {
                    1.0 + (count as f32).ln()
                } else {
                    count as f32
                };
                (id, tf * self.idf[id as usize])
            })
            .collect();
        vec.sort_unstable_by_key(|(id, _)| *id);

        let norm = vec.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in vec.iter_mut() {
                *w /= norm;
            }
        }
        vec
    }
}

/// Dot product of two sorted sparse vectors. Both sides are L2-normalized
/// here, so this is cosine similarity; either side being the zero vector
/// gives 0.0 without any division.
pub fn dot(a: &SparseVec, b: &SparseVec) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
