use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jobsearch_core::SearchEngine;

const WORDS: &[&str] = &[
    "policy", "report", "drafting", "plan", "budget", "management", "welding", "pipe", "inspection",
    "forklift", "safety", "training", "payroll", "audit", "recruitment", "interview", "schedule",
    "compliance", "procurement", "contract", "analysis", "forecast", "review", "coordination",
];

fn corpus_engine(docs: usize) -> SearchEngine {
    let mut e = SearchEngine::new();
    for i in 0..docs {
        let text: Vec<&str> = (0..12).map(|j| WORDS[(i * 7 + j * 5) % WORDS.len()]).collect();
        e.add_document(&format!("job_task:{i}"), &text.join(" "));
    }
    e.build_index();
    e
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_index_5k", |b| b.iter(|| black_box(corpus_engine(5_000))));
}

fn bench_search(c: &mut Criterion) {
    let e = corpus_engine(5_000);
    c.bench_function("search_5k_top10", |b| b.iter(|| e.search(black_box("budget report drafting"), 10)));
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);
