use criterion::{criterion_group, criterion_main, Criterion};
use matcher::{fit, rank, Corpus, FilterCriteria, Listing, VectorizerConfig};

fn bench_corpus(n: usize) -> Corpus {
    let pools = [
        "python pandas sql machine learning model evaluation data cleaning",
        "html css javascript react responsive design ui ux",
        "seo social media campaigns content creation analytics communication",
        "sql excel data visualization business analytics stakeholder reporting",
        "scriptwriting animation creativity educational content production",
    ];
    let listings = (0..n)
        .map(|i| Listing {
            id: i.to_string(),
            company: format!("Company {i}"),
            role: "Intern".into(),
            location: if i % 2 == 0 { "Remote" } else { "On-site" }.into(),
            stipend: 4000 + (i as u32 % 8) * 1000,
            description: pools[i % pools.len()].into(),
            skills: None,
        })
        .collect();
    Corpus::new(listings)
}

fn bench_tokenize(c: &mut Criterion) {
    let text = "Work on machine learning models, Python, pandas, scikit-learn, \
                model evaluation, data cleaning, SQL, and stakeholder communication.";
    c.bench_function("tokenize_posting", |b| {
        b.iter(|| matcher::tokenizer::tokenize(text))
    });
}

fn bench_fit(c: &mut Criterion) {
    let corpus = bench_corpus(500);
    let cfg = VectorizerConfig::default();
    c.bench_function("fit_500_listings", |b| b.iter(|| fit(&corpus, &cfg).unwrap()));
}

fn bench_rank(c: &mut Criterion) {
    let corpus = bench_corpus(500);
    let cfg = VectorizerConfig::default();
    let (index, matrix) = fit(&corpus, &cfg).unwrap();
    let filters = FilterCriteria::default();
    c.bench_function("rank_500_listings", |b| {
        b.iter(|| rank(&corpus, &index, &matrix, "python sql analytics", &filters).unwrap())
    });
}

criterion_group!(benches, bench_tokenize, bench_fit, bench_rank);
criterion_main!(benches);
