//! Catalog loading for the recommendation engine.
//!
//! Reads internship catalogs from CSV, JSON, or JSONL files, validates rows
//! at ingestion (a listing without a description never reaches the core),
//! and exposes the built-in sample catalog used when no file is supplied.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use matcher::{Corpus, Listing};
use serde::Deserialize;

/// One CSV row with every column optional; validation decides what survives.
/// Aliases cover the column spellings seen in real catalogs.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default, alias = "Id", alias = "ID")]
    id: Option<String>,
    #[serde(default, alias = "Company")]
    company: Option<String>,
    #[serde(default, alias = "Role", alias = "Title", alias = "title")]
    role: Option<String>,
    #[serde(default, alias = "Location")]
    location: Option<String>,
    #[serde(default, alias = "Stipend")]
    stipend: Option<String>,
    #[serde(default, alias = "Description")]
    description: Option<String>,
    #[serde(default, alias = "Skills")]
    skills: Option<String>,
}

/// JSON/JSONL counterpart of [`CsvRow`]. `id` and `stipend` accept either
/// numbers or strings.
#[derive(Debug, Deserialize)]
struct JsonRow {
    #[serde(default, alias = "Id", alias = "ID")]
    id: Option<serde_json::Value>,
    #[serde(default, alias = "Company")]
    company: Option<String>,
    #[serde(default, alias = "Role", alias = "Title", alias = "title")]
    role: Option<String>,
    #[serde(default, alias = "Location")]
    location: Option<String>,
    #[serde(default, alias = "Stipend")]
    stipend: Option<serde_json::Value>,
    #[serde(default, alias = "Description")]
    description: Option<String>,
    #[serde(default, alias = "Skills")]
    skills: Option<String>,
}

/// Load a catalog file, dispatching on the extension. Fails when the format
/// is unknown or no usable listing survives validation.
pub fn load_catalog(path: &Path) -> Result<Corpus> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    let corpus = match ext {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "jsonl" => load_jsonl(path)?,
        other => bail!("unsupported catalog format {other:?} (expected csv, json, or jsonl)"),
    };
    if corpus.is_empty() {
        bail!("catalog {} contains no usable listings", path.display());
    }
    tracing::info!(path = %path.display(), listings = corpus.len(), "catalog loaded");
    Ok(corpus)
}

fn load_csv(path: &Path) -> Result<Corpus> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers().context("reading CSV headers")?;
    if !headers.iter().any(|h| h.eq_ignore_ascii_case("description")) {
        bail!("catalog CSV must include a description column");
    }

    let mut listings = Vec::new();
    for (row, record) in reader.deserialize::<CsvRow>().enumerate() {
        let record = record.with_context(|| format!("parsing CSV row {}", row + 1))?;
        if let Some(listing) = validate_row(
            row,
            record.id,
            record.company,
            record.role,
            record.location,
            record.stipend.as_deref().map(parse_stipend_text),
            record.description,
            record.skills,
        ) {
            listings.push(listing);
        }
    }
    Ok(Corpus::new(listings))
}

fn load_json(path: &Path) -> Result<Corpus> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    from_json_value(value)
}

fn load_jsonl(path: &Path) -> Result<Corpus> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut listings = Vec::new();
    for (row, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: JsonRow = serde_json::from_str(&line)
            .with_context(|| format!("parsing JSONL line {}", row + 1))?;
        if let Some(listing) = json_row_to_listing(row, parsed) {
            listings.push(listing);
        }
    }
    Ok(Corpus::new(listings))
}

/// Build a corpus from an in-memory JSON value (a single listing object or
/// an array of them). Shared by the JSON file loader and the server's
/// catalog-replacement endpoint.
pub fn from_json_value(value: serde_json::Value) -> Result<Corpus> {
    let rows: Vec<serde_json::Value> = match value {
        serde_json::Value::Array(arr) => arr,
        obj @ serde_json::Value::Object(_) => vec![obj],
        _ => bail!("catalog JSON must be an object or an array of objects"),
    };
    let mut listings = Vec::new();
    for (row, v) in rows.into_iter().enumerate() {
        let parsed: JsonRow =
            serde_json::from_value(v).with_context(|| format!("malformed listing entry {row}"))?;
        if let Some(listing) = json_row_to_listing(row, parsed) {
            listings.push(listing);
        }
    }
    Ok(Corpus::new(listings))
}

fn json_row_to_listing(row: usize, parsed: JsonRow) -> Option<Listing> {
    validate_row(
        row,
        parsed.id.as_ref().map(value_to_text),
        parsed.company,
        parsed.role,
        parsed.location,
        parsed.stipend.as_ref().map(parse_stipend_value),
        parsed.description,
        parsed.skills,
    )
}

/// Ingestion-time validation: a missing or empty description excludes the
/// row; missing optional attributes are defaulted, never rejected.
#[allow(clippy::too_many_arguments)]
fn validate_row(
    row: usize,
    id: Option<String>,
    company: Option<String>,
    role: Option<String>,
    location: Option<String>,
    stipend: Option<u32>,
    description: Option<String>,
    skills: Option<String>,
) -> Option<Listing> {
    let description = description.unwrap_or_default();
    if description.trim().is_empty() {
        tracing::warn!(row, "skipping listing without a description");
        return None;
    }
    Some(Listing {
        id: id
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| row.to_string()),
        company: company.unwrap_or_default(),
        role: role.unwrap_or_default(),
        location: location
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Unspecified".to_string()),
        stipend: stipend.unwrap_or(0),
        description,
        skills: skills.filter(|s| !s.trim().is_empty()),
    })
}

/// Stipend fields arrive as integers, or as text like "₹10,000"; keep the
/// digits and default to 0.
fn parse_stipend_text(s: &str) -> u32 {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

fn parse_stipend_value(v: &serde_json::Value) -> u32 {
    match v {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0).min(u32::MAX as u64) as u32,
        serde_json::Value::String(s) => parse_stipend_text(s),
        _ => 0,
    }
}

fn value_to_text(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The built-in sample catalog, used when no catalog file is supplied.
pub fn sample() -> Corpus {
    let rows = [
        (
            "1",
            "DeepLearn Labs",
            "Machine Learning Intern",
            "Remote",
            10000,
            "Work on machine learning models, Python, pandas, scikit-learn, model evaluation, data cleaning, SQL.",
        ),
        (
            "2",
            "WebWave Studio",
            "Frontend Intern",
            "On-site",
            8000,
            "HTML, CSS, JavaScript, React, UI/UX design, responsive web design.",
        ),
        (
            "3",
            "MarketMinds",
            "Digital Marketing Intern",
            "Hybrid",
            5000,
            "Social media campaigns, content creation, SEO, analytics, communication skills.",
        ),
        (
            "4",
            "FinEdge",
            "Data Analyst Intern",
            "Remote",
            9000,
            "SQL, Excel, Python, data visualization, business analytics, stakeholder communication.",
        ),
        (
            "5",
            "CreativeKids",
            "Educational Content Creator",
            "On-site",
            6000,
            "Create educational cartoons for children, scriptwriting, basic animation tools, creativity.",
        ),
    ];
    Corpus::new(
        rows.into_iter()
            .map(|(id, company, role, location, stipend, description)| Listing {
                id: id.into(),
                company: company.into(),
                role: role.into(),
                location: location.into(),
                stipend,
                description: description.into(),
                skills: None,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stipend_text_keeps_digits_only() {
        assert_eq!(parse_stipend_text("₹10,000"), 10000);
        assert_eq!(parse_stipend_text("8000"), 8000);
        assert_eq!(parse_stipend_text("unpaid"), 0);
    }

    #[test]
    fn sample_catalog_is_usable() {
        let corpus = sample();
        assert_eq!(corpus.len(), 5);
        assert!(corpus.listings.iter().all(|l| !l.description.is_empty()));
    }
}
