use jobsearch_core::{EngineConfig, EngineState, IdfMode, SearchEngine, SearchError};

const A: &str = "Policy Report Drafting Plan";
const B: &str = "Budget Management Plan Report";
const C: &str = "Welding Pipe Inspection";

fn corpus() -> Vec<(&'static str, &'static str)> {
    vec![
        ("job_task:1", A),
        ("job_task:2", B),
        ("job_task:3", C),
        ("job_position:10", "Forklift Operation Safety Training"),
        ("job_position:11", "Payroll Reconciliation Audit Report"),
        ("job_description:20", "Recruitment Interview Scheduling Coordination"),
    ]
}

fn built(docs: &[(&str, &str)]) -> SearchEngine {
    let mut e = SearchEngine::new();
    for (id, text) in docs {
        e.add_document(id, text);
    }
    e.build_index();
    e
}

fn ids(e: &SearchEngine, q: &str, k: usize) -> Vec<String> {
    e.search(q, k).unwrap().into_iter().map(|h| h.doc_id).collect()
}

#[test]
fn shorter_document_wins_on_matched_terms() {
    let e = built(&[("A", A), ("B", B)]);
    let hits = e.search("report drafting", 2).unwrap();
    assert_eq!(hits.iter().map(|h| h.doc_id.as_str()).collect::<Vec<_>>(), vec!["A", "B"]);
    assert!((hits[0].score - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    // "report" is in both documents, so B only shares a zero-weight term
    assert_eq!(hits[1].score, 0.0);
}

#[test]
fn rebuild_picks_up_new_document_without_matching_it() {
    let mut e = built(&[("A", A), ("B", B)]);
    e.add_document("C", C);
    assert_eq!(e.state(), EngineState::Stale);
    e.build_index();
    assert_eq!(ids(&e, "report drafting", 5), vec!["A", "B"]);
    assert!(e.search("report drafting", 5).unwrap().iter().all(|h| h.score > 0.0));
    assert_eq!(ids(&e, "welding", 5), vec!["C"]);
}

#[test]
fn each_document_finds_itself_first() {
    let docs = corpus();
    let e = built(&docs);
    for (id, text) in &docs {
        let hits = e.search(text, 3).unwrap();
        assert_eq!(hits[0].doc_id, *id, "query: {text}");
        assert!((hits[0].score - 1.0).abs() < 1e-9);
    }
}

#[test]
fn rebuild_without_writes_is_idempotent() {
    let mut e = built(&corpus());
    let before: Vec<_> = corpus().iter().map(|(id, _)| e.weights(id).cloned().unwrap()).collect();
    let idf_before = e.idf("report");
    let ranking_before = e.search("report plan audit", 10).unwrap();

    e.build_index();

    let after: Vec<_> = corpus().iter().map(|(id, _)| e.weights(id).cloned().unwrap()).collect();
    assert_eq!(before, after);
    assert_eq!(idf_before.map(f64::to_bits), e.idf("report").map(f64::to_bits));
    assert_eq!(ranking_before, e.search("report plan audit", 10).unwrap());
}

#[test]
fn smaller_top_k_is_a_prefix() {
    let e = built(&corpus());
    for q in ["report", "plan report audit", "budget management payroll"] {
        let full = e.search(q, 10).unwrap();
        for k in 0..full.len() {
            assert_eq!(e.search(q, k).unwrap(), full[..k].to_vec(), "query {q}, k {k}");
        }
    }
}

#[test]
fn scores_stay_in_unit_interval() {
    for mode in [IdfMode::Standard, IdfMode::Smoothed] {
        let mut e = SearchEngine::with_config(EngineConfig { idf: mode });
        for (id, text) in corpus() {
            e.add_document(id, text);
        }
        e.build_index();
        for q in ["report", "policy report drafting plan", "welding report report", "audit"] {
            for hit in e.search(q, 10).unwrap() {
                assert!((0.0..=1.0).contains(&hit.score), "{q}: {hit:?}");
            }
        }
    }
}

#[test]
fn blank_stopword_and_unknown_queries_return_nothing() {
    let e = built(&corpus());
    assert!(e.search("", 10).unwrap().is_empty());
    assert!(e.search("   ", 10).unwrap().is_empty());
    assert!(e.search("the and of", 10).unwrap().is_empty());
    assert!(e.search("zeppelin quasar", 10).unwrap().is_empty());
    assert!(e.search("2024 !!!", 10).unwrap().is_empty());
}

#[test]
fn disjoint_documents_never_appear() {
    let e = built(&corpus());
    for k in [1, 2, 5, 100] {
        assert!(!ids(&e, "report drafting", k).contains(&"job_task:3".to_string()));
    }
}

#[test]
fn overwrite_replaces_old_text_entirely() {
    let mut e = built(&[("A", A), ("B", B), ("C", C)]);
    e.add_document("A", "Forklift Certification Renewal");
    e.build_index();
    assert_eq!(e.len(), 3);
    assert!(e.search("drafting policy", 5).unwrap().is_empty());
    assert_eq!(ids(&e, "forklift", 5), vec!["A"]);
    assert_eq!(ids(&e, "report", 5), vec!["B"]);
    let weights = e.weights("A").unwrap();
    assert!(!weights.contains_key("drafting"));
    assert_eq!(e.idf("drafting"), None);
}

#[test]
fn not_ready_is_distinct_from_no_matches() {
    let mut e = SearchEngine::new();
    e.add_document("A", A);
    assert_eq!(e.search("report", 5), Err(SearchError::NotReady { state: EngineState::Accumulating }));
    e.build_index();
    assert_eq!(e.search("zeppelin", 5), Ok(vec![]));
    e.add_document("B", B);
    let err = e.search("report", 5).unwrap_err();
    assert_eq!(err, SearchError::NotReady { state: EngineState::Stale });
    assert!(err.to_string().contains("STALE"));
}

#[test]
fn documents_without_terms_are_indexed_but_never_match() {
    let e = built(&[("A", A), ("empty", "... 42 ..."), ("B", B)]);
    assert_eq!(e.stats().unwrap().num_docs, 3);
    assert!(e.weights("empty").unwrap().is_empty());
    assert!(!ids(&e, "report drafting policy", 10).contains(&"empty".to_string()));
}
