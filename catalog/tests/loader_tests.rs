use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_csv_and_skips_rows_without_description() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir,
        "postings.csv",
        "company,role,location,stipend,description\n\
         DeepLearn Labs,ML Intern,Remote,\"₹10,000\",python pandas sql\n\
         Hollow Corp,Mystery Intern,Remote,5000,\n\
         WebWave Studio,Frontend Intern,On-site,8000,html css javascript\n",
    );
    let corpus = catalog::load_catalog(&path).unwrap();
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus.listings[0].company, "DeepLearn Labs");
    assert_eq!(corpus.listings[0].stipend, 10000);
    assert_eq!(corpus.listings[1].stipend, 8000);
}

#[test]
fn csv_without_description_column_is_rejected() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir,
        "broken.csv",
        "company,role,location,stipend\nAcme,Intern,Remote,5000\n",
    );
    let err = catalog::load_catalog(&path).unwrap_err();
    assert!(err.to_string().contains("description column"));
}

#[test]
fn csv_accepts_capitalized_headers() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir,
        "caps.csv",
        "Title,Skills,Location,Stipend,Description\n\
         Data Science Intern,\"Python, Machine Learning\",Remote,\"₹10,000\",Analyze data with Python\n",
    );
    let corpus = catalog::load_catalog(&path).unwrap();
    assert_eq!(corpus.len(), 1);
    let l = &corpus.listings[0];
    assert_eq!(l.role, "Data Science Intern");
    assert_eq!(l.stipend, 10000);
    assert_eq!(l.skills.as_deref(), Some("Python, Machine Learning"));
    assert!(l.scoring_text().contains("Machine Learning"));
}

#[test]
fn loads_json_array() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir,
        "postings.json",
        r#"[
            {"id": 7, "company": "FinEdge", "role": "Data Analyst Intern",
             "location": "Remote", "stipend": 9000, "description": "sql excel python"},
            {"company": "MarketMinds", "role": "Marketing Intern",
             "location": "Hybrid", "stipend": "₹5,000", "description": "seo analytics"}
        ]"#,
    );
    let corpus = catalog::load_catalog(&path).unwrap();
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus.listings[0].id, "7");
    assert_eq!(corpus.listings[1].stipend, 5000);
}

#[test]
fn loads_jsonl_with_defaults() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir,
        "postings.jsonl",
        "{\"company\": \"Acme\", \"description\": \"rust systems\"}\n\
         \n\
         {\"description\": \"\"}\n",
    );
    let corpus = catalog::load_catalog(&path).unwrap();
    assert_eq!(corpus.len(), 1);
    let l = &corpus.listings[0];
    assert_eq!(l.location, "Unspecified");
    assert_eq!(l.stipend, 0);
    assert_eq!(l.id, "0");
}

#[test]
fn empty_catalog_is_rejected() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir,
        "empty.csv",
        "company,role,location,stipend,description\n",
    );
    let err = catalog::load_catalog(&path).unwrap_err();
    assert!(err.to_string().contains("no usable listings"));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "postings.xlsx", "not a real spreadsheet");
    assert!(catalog::load_catalog(&path).is_err());
}

#[test]
fn from_json_value_accepts_single_object() {
    let corpus = catalog::from_json_value(serde_json::json!({
        "company": "Acme",
        "description": "embedded systems internship",
    }))
    .unwrap();
    assert_eq!(corpus.len(), 1);
}
