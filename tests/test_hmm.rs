extern crate seqrec;

use seqrec::hmm::gaussian::{self, GaussianHmm};
use seqrec::{recognize, Error, ModelBank, TestSequence};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 1-state, 1-feature model centered on `mean`.
fn centered(mean: f64) -> GaussianHmm {
    GaussianHmm::new(1, 1, vec![1.0], vec![1.0], vec![mean], vec![1.0]).unwrap()
}

fn around(mean: f64) -> TestSequence {
    let frames = vec![vec![mean - 0.2], vec![mean + 0.1], vec![mean + 0.3]];
    TestSequence::whole(frames).unwrap()
}

#[test]
fn test_recognize_against_hmm_bank() {
    init();
    let mut bank = ModelBank::new();
    bank.insert("low", centered(0.0));
    bank.insert("mid", centered(5.0));
    bank.insert("high", centered(10.0));
    let test_set = vec![around(5.0), around(0.0), around(10.0), around(4.8)];
    let result = recognize(&bank, &test_set);
    assert_eq!(
        vec!["mid", "low", "high", "mid"],
        result.guesses,
        "scores: {:?}",
        result.score_maps
    );
}

#[test]
fn test_degenerate_model_in_bank_is_tolerated() {
    init();
    /* A collapsed variance fails at scoring time; the rest of the bank
    still competes. */
    let collapsed = GaussianHmm::new(1, 1, vec![1.0], vec![1.0], vec![0.0], vec![0.0]).unwrap();
    let mut bank = ModelBank::new();
    bank.insert("collapsed", collapsed);
    bank.insert("sane", centered(0.0));
    let result = recognize(&bank, &[around(0.0)]);
    assert_eq!("sane", result.guesses[0]);
    assert_eq!(
        Some(&f64::NEG_INFINITY),
        result.score_maps[0].get("collapsed")
    );
}

#[test]
fn test_multisegment_scoring() {
    let model = centered(1.0);
    let frames = vec![vec![1.0], vec![0.9], vec![1.2], vec![1.1]];
    /* Three repeated trials of the same item. */
    let seq = TestSequence::new(frames, vec![1, 2, 1]).unwrap();
    let mut bank = ModelBank::new();
    bank.insert("item", model);
    let result = recognize(&bank, &[seq]);
    assert_eq!("item", result.guesses[0]);
    assert!(result.score_maps[0]["item"].is_finite());
}

const BANK_JSON: &[u8] = br#"[
  {"label": "walk", "model": {"n_states": 1, "n_features": 1, "start": [1.0], "trans": [1.0], "means": [0.0], "vars": [1.0]}},
  {"label": "shop", "model": {"n_states": 1, "n_features": 1, "start": [1.0], "trans": [1.0], "means": [5.0], "vars": [1.0]}},
  {"label": "clean", "model": {"n_states": 1, "n_features": 1, "start": [1.0], "trans": [1.0], "means": [10.0], "vars": [1.0]}}
]"#;

#[test]
fn test_bank_from_memory_preserves_order() {
    let bank = gaussian::bank_from_memory(BANK_JSON).unwrap();
    let labels: Vec<_> = bank.labels().collect();
    assert_eq!(vec!["walk", "shop", "clean"], labels);
    assert_eq!(1, bank.get("shop").unwrap().n_states());
}

#[test]
fn test_bank_from_memory_rejects_duplicates() {
    let json = br#"[
      {"label": "walk", "model": {"n_states": 1, "n_features": 1, "start": [1.0], "trans": [1.0], "means": [0.0], "vars": [1.0]}},
      {"label": "walk", "model": {"n_states": 1, "n_features": 1, "start": [1.0], "trans": [1.0], "means": [1.0], "vars": [1.0]}}
    ]"#;
    match gaussian::bank_from_memory(json) {
        Err(Error::InvalidInput(..)) => {}
        _ => panic!("test fail"),
    }
}

#[test]
fn test_bank_from_memory_invalid_json() {
    match gaussian::bank_from_memory(b"") {
        Err(Error::InvalidModel(..)) => {}
        _ => panic!("test fail"),
    }

    match gaussian::bank_from_memory(b"{\"not\": \"a bank\"}") {
        Err(Error::InvalidModel(..)) => {}
        _ => panic!("test fail"),
    }
}

#[test]
fn test_bank_from_memory_revalidates_models() {
    /* Structurally parsed but probabilistically impossible. */
    let json = br#"[
      {"label": "walk", "model": {"n_states": 1, "n_features": 1, "start": [0.2], "trans": [1.0], "means": [0.0], "vars": [1.0]}}
    ]"#;
    match gaussian::bank_from_memory(json) {
        Err(Error::InvalidInput(..)) => {}
        _ => panic!("test fail"),
    }
}

#[test]
fn test_loaded_bank_recognizes() {
    init();
    let bank = gaussian::bank_from_memory(BANK_JSON).unwrap();
    let result = recognize(&bank, &[around(10.0), around(0.0)]);
    assert_eq!(vec!["clean", "walk"], result.guesses);
}
