use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::vectorizer::{dot, DocMatrix, QueryVector, SparseVec, TermIndex};
use crate::{Corpus, DocId, Listing, MatchError};

/// Categorical work-mode filter. "Online" means remote work; "Offline"
/// means on-site or hybrid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    #[default]
    Any,
    Online,
    Offline,
}

impl FromStr for WorkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "any" => Ok(WorkMode::Any),
            "online" | "remote" => Ok(WorkMode::Online),
            "offline" | "onsite" | "on-site" | "hybrid" => Ok(WorkMode::Offline),
            other => Err(format!("unknown work mode: {other}")),
        }
    }
}

/// User-chosen predicates, evaluated independently of the similarity score.
/// A pure value object; defaults are fully unconstrained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub work_mode: WorkMode,
    /// Case-insensitive substring match on the listing location. `None`,
    /// empty, or "any" leaves the filter open.
    pub location: Option<String>,
    /// Inclusive lower bound; 0 leaves the filter open.
    pub min_stipend: u32,
    /// OR across domains, case-insensitive substring on the scoring text.
    /// If no surviving listing matches any domain, the domain filter is
    /// dropped for that result set rather than returning nothing.
    pub domains: Vec<String>,
    /// When set, `Offline` requires an explicit "on-site"/"hybrid" qualifier
    /// in the location; when unset, anything not remote counts as offline.
    pub offline_strict: bool,
}

/// Per-filter pass/fail record for one listing. `domain` stays false on
/// every result when the domain fallback relaxed the filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilterTrace {
    pub work_mode: bool,
    pub location: bool,
    pub stipend: bool,
    pub domain: bool,
}

/// One ranked hit: corpus position, cosine score, the filter trace, and the
/// vocabulary terms shared between query and listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub doc: DocId,
    pub score: f32,
    pub filters: FilterTrace,
    pub matched_terms: Vec<String>,
}

/// Rank one corpus snapshot against one query and one set of filters.
///
/// Pure function of its inputs: scores every listing (0.0 for an empty
/// query), drops listings failing the hard filters, and stable-sorts by
/// score descending so equal scores keep original corpus order. An empty
/// return is the normal "no matches" outcome.
pub fn rank(
    corpus: &Corpus,
    index: &TermIndex,
    matrix: &DocMatrix,
    query: &str,
    filters: &FilterCriteria,
) -> Result<Vec<RankedResult>, MatchError> {
    if matrix.rows.len() != corpus.len() {
        return Err(MatchError::StaleIndex {
            docs: corpus.len(),
            rows: matrix.rows.len(),
        });
    }

    let query_vec: QueryVector = if query.trim().is_empty() {
        Vec::new()
    } else {
        index.transform(query)
    };

    // Hard filters first, independent of score. Domain matches are recorded
    // but only enforced when at least one survivor matches.
    let domain_constrained = filters.domains.iter().any(|d| !d.trim().is_empty());
    let mut survivors: Vec<(DocId, FilterTrace)> = Vec::new();
    let mut any_domain_match = false;
    for (i, listing) in corpus.listings.iter().enumerate() {
        let matched_domain = domain_constrained && domain_match(filters, listing);
        let trace = FilterTrace {
            work_mode: work_mode_pass(filters, &listing.location),
            location: location_pass(filters, &listing.location),
            stipend: listing.stipend >= filters.min_stipend,
            domain: matched_domain || !domain_constrained,
        };
        if trace.work_mode && trace.location && trace.stipend {
            any_domain_match |= matched_domain;
            survivors.push((i as DocId, trace));
        }
    }
    if domain_constrained && any_domain_match {
        survivors.retain(|(_, trace)| trace.domain);
    }

    let mut results: Vec<RankedResult> = survivors
        .into_iter()
        .map(|(doc, trace)| {
            let row = &matrix.rows[doc as usize];
            RankedResult {
                doc,
                score: dot(&query_vec, row),
                filters: trace,
                matched_terms: shared_terms(index, &query_vec, row),
            }
        })
        .collect();

    // Stable sort: ties keep original corpus order.
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Ok(results)
}

fn work_mode_pass(filters: &FilterCriteria, location: &str) -> bool {
    let loc = location.to_lowercase();
    match filters.work_mode {
        WorkMode::Any => true,
        WorkMode::Online => loc.contains("remote"),
        WorkMode::Offline => {
            if filters.offline_strict {
                loc.contains("on-site") || loc.contains("onsite") || loc.contains("hybrid")
            } else {
                !loc.contains("remote")
            }
        }
    }
}

fn location_pass(filters: &FilterCriteria, location: &str) -> bool {
    match filters.location.as_deref() {
        Some(wanted) if !wanted.trim().is_empty() && !wanted.eq_ignore_ascii_case("any") => {
            location.to_lowercase().contains(&wanted.to_lowercase())
        }
        _ => true,
    }
}

fn domain_match(filters: &FilterCriteria, listing: &Listing) -> bool {
    let text = listing.scoring_text().to_lowercase();
    filters
        .domains
        .iter()
        .filter(|d| !d.trim().is_empty())
        .any(|d| text.contains(&d.to_lowercase()))
}

fn shared_terms(index: &TermIndex, query: &SparseVec, row: &SparseVec) -> Vec<String> {
    let (mut i, mut j) = (0, 0);
    let mut terms = Vec::new();
    while i < query.len() && j < row.len() {
        match query[i].0.cmp(&row[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                terms.push(index.term(query[i].0).to_string());
                i += 1;
                j += 1;
            }
        }
    }
    terms
}
