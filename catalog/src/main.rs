use std::path::Path;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use matcher::{fit, FilterCriteria, Recommender, VectorizerConfig, WorkMode};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Load, validate, and rank internship catalogs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a catalog file and report what the engine would index
    Validate {
        /// Catalog path (csv, json, or jsonl)
        #[arg(long)]
        input: String,
    },
    /// One-shot ranking of a catalog against a skills query
    Rank {
        /// Catalog path; the built-in sample catalog when omitted
        #[arg(long)]
        input: Option<String>,
        /// Free-text skills/interests query
        #[arg(long, default_value = "")]
        query: String,
        /// any, online (remote), or offline (on-site/hybrid)
        #[arg(long, default_value = "any")]
        work_mode: String,
        /// Location substring filter
        #[arg(long)]
        location: Option<String>,
        /// Minimum stipend, inclusive
        #[arg(long, default_value_t = 0)]
        min_stipend: u32,
        /// Domain keywords, comma separated
        #[arg(long, value_delimiter = ',')]
        domains: Vec<String>,
        /// Require an explicit on-site/hybrid tag for offline mode
        #[arg(long, default_value_t = false)]
        strict_offline: bool,
        /// Number of results to print
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { input } => validate(&input),
        Commands::Rank {
            input,
            query,
            work_mode,
            location,
            min_stipend,
            domains,
            strict_offline,
            top,
        } => {
            let filters = FilterCriteria {
                work_mode: work_mode.parse::<WorkMode>().map_err(|e| anyhow!(e))?,
                location,
                min_stipend,
                domains,
                offline_strict: strict_offline,
            };
            rank_once(input.as_deref(), &query, &filters, top)
        }
    }
}

fn validate(input: &str) -> Result<()> {
    let corpus = catalog::load_catalog(Path::new(input))?;
    let (index, _) = fit(&corpus, &VectorizerConfig::default())?;
    println!(
        "{}",
        serde_json::json!({
            "listings": corpus.len(),
            "vocabulary": index.vocab_len(),
            "fingerprint": corpus.fingerprint(),
        })
    );
    Ok(())
}

fn rank_once(input: Option<&str>, query: &str, filters: &FilterCriteria, top: usize) -> Result<()> {
    let corpus = match input {
        Some(path) => catalog::load_catalog(Path::new(path))?,
        None => catalog::sample(),
    };
    let mut recommender = Recommender::default();
    recommender.rebuild(&corpus)?;
    let results = recommender.recommend(&corpus, query, filters)?;
    tracing::info!(hits = results.len(), "ranked catalog");

    for r in results.into_iter().take(top) {
        let listing = corpus
            .get(r.doc as usize)
            .ok_or_else(|| anyhow!("ranked result out of corpus bounds"))?;
        println!(
            "{}",
            serde_json::json!({
                "id": listing.id,
                "company": listing.company,
                "role": listing.role,
                "location": listing.location,
                "stipend": listing.stipend,
                "score": r.score,
                "matched_terms": r.matched_terms,
            })
        );
    }
    Ok(())
}
