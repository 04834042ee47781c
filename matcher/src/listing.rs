use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// One internship posting. `description` is the required scoring text;
/// everything else is either presentation metadata or a filter attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Stable external identifier (explicit key, or row index rendered by
    /// the loader).
    pub id: String,
    pub company: String,
    pub role: String,
    /// Free text; may embed a work-mode qualifier such as "Remote",
    /// "On-site", or "Hybrid".
    pub location: String,
    /// Currency-free integer.
    pub stipend: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
}

impl Listing {
    /// The text the vectorizer sees: description first, then skills.
    /// The concatenation order is fixed because it affects term frequencies.
    pub fn scoring_text(&self) -> String {
        match self.skills.as_deref() {
            Some(s) if !s.trim().is_empty() => format!("{} {}", self.description, s),
            _ => self.description.clone(),
        }
    }
}

/// An ordered catalog of listings. Order is significant: it is the tie-break
/// for equal similarity scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    pub listings: Vec<Listing>,
}

impl Corpus {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Listing> {
        self.listings.get(idx)
    }

    /// Content fingerprint over everything that affects ranking: scoring
    /// text and filter attributes. Two corpora with equal fingerprints rank
    /// identically, so the fingerprint is the cache key for index rebuilds.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha1::new();
        for l in &self.listings {
            hasher.update(l.id.as_bytes());
            hasher.update([0x1f]);
            hasher.update(l.location.as_bytes());
            hasher.update([0x1f]);
            hasher.update(l.stipend.to_le_bytes());
            hasher.update([0x1f]);
            hasher.update(l.scoring_text().as_bytes());
            hasher.update([0x1e]);
        }
        format!("{:x}", hasher.finalize())
    }
}
