//! End-to-end search scenarios

use std::io::Write;

use passgrind::*;
use tempfile::NamedTempFile;

fn write_config(body: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(body.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

fn quiet(rounds: usize) -> SearchParams {
    SearchParams { growth_rounds: rounds, builtin_seeds: false, ..SearchParams::default() }
}

fn lit(s: &str) -> BoxedExpr {
    Box::new(Const::new(ByteBlock::from_ascii(s)))
}

#[test]
fn literal_target_matches_const_on_first_evaluation() {
    let cfg = write_config("HEXA_WPA_PASSPHRASE = 616263\nASCII_STRINGS = abc\nGROWTH_ROUNDS = 0\nBUILTIN_SEEDS = no\n");
    let cfg = SearchConfig::load(cfg.path()).unwrap();
    let SearchOutcome::Found(m) = search(&cfg).unwrap() else { panic!("expected a match") };
    assert_eq!(m.expression.kind(), ExprKind::Const);
    assert_eq!(m.bytes, ByteBlock::from_ascii("abc"));
    assert_eq!(m.tries, 0);
}

#[test]
fn literal_target_is_found_with_default_parameters() {
    let cfg = write_config("HEXA_WPA_PASSPHRASE = 616263\nASCII_STRINGS = abc\n");
    let cfg = SearchConfig::load(cfg.path()).unwrap();
    assert_eq!(cfg.params, SearchParams::default());
    let SearchOutcome::Found(m) = search(&cfg).unwrap() else { panic!("expected a match") };
    assert!(ByteBlock::from_ascii("abc").is_window_of(&m.bytes));
}

#[test]
fn sha1_of_literal_is_found_through_digest_node() {
    let target = ByteBlock::from_hex("a9993e364706816aba3e25717850c26c9cd0d89d").unwrap();
    let mut engine = SearchEngine::new(target.clone(), quiet(0));
    engine.seed_expr(Box::new(GenericDigest::new(lit("abc")))).unwrap();
    let SearchOutcome::Found(m) = engine.run().unwrap() else { panic!("expected a match") };
    assert_eq!(m.expression.kind(), ExprKind::GenericDigest);
    assert!(m.expression.describe().starts_with("sha1()\n"));
    assert_eq!(m.bytes, target);
    // whirlpool, md5, sha and sha224 come first
    assert_eq!(m.tries, 4);
}

#[test]
fn sha1_of_literal_is_found_after_growth() {
    let cfg = write_config(
        "HEXA_WPA_PASSPHRASE = a9993e364706816aba3e25717850c26c9cd0d89d\n\
         ASCII_STRINGS = abc\n\
         GROWTH_ROUNDS = 1\n\
         BUILTIN_SEEDS = false\n",
    );
    let cfg = SearchConfig::load(cfg.path()).unwrap();
    let SearchOutcome::Found(m) = search(&cfg).unwrap() else { panic!("expected a match") };
    assert!(cfg.target.is_window_of(&m.bytes));
    assert!(m.expression.describe().contains("sha1()"));
}

#[test]
fn numeric_counter_reaches_five_after_five_advances() {
    let target = ByteBlock(vec![0x05, 0x00, 0x00, 0x00]);
    let mut engine = SearchEngine::new(target.clone(), quiet(0));
    engine.seed_expr(Box::new(NumericCounter::new(4).unwrap())).unwrap();
    let SearchOutcome::Found(m) = engine.run().unwrap() else { panic!("expected a match") };
    assert_eq!(m.expression.kind(), ExprKind::NumericCounter);
    assert_eq!(m.bytes, target);
    assert_eq!(m.tries, 5);
}

#[test]
fn counter_keeps_its_state_across_resamples() {
    // 261 needs three visits of 100 steps each
    let target = ByteBlock(vec![0x05, 0x01, 0x00, 0x00]);
    let mut engine = SearchEngine::new(target.clone(), quiet(0));
    assert_eq!(engine.params().steps_per_candidate, 100);
    engine.seed_expr(Box::new(NumericCounter::new(4).unwrap())).unwrap();
    let SearchOutcome::Found(m) = engine.run().unwrap() else { panic!("expected a match") };
    assert_eq!(m.bytes, target);
    assert_eq!(m.tries, 261);
}

#[test]
fn numeric_target_is_found_among_builtin_seeds() {
    let cfg = write_config("HEXA_WPA_PASSPHRASE = 05000000\nGROWTH_ROUNDS = 0\nRANDOM_SEED = 3\n");
    let cfg = SearchConfig::load(cfg.path()).unwrap();
    let mut engine = SearchEngine::from_config(&cfg).unwrap();
    assert_eq!(engine.frontier().len(), 3);
    let SearchOutcome::Found(m) = engine.run().unwrap() else { panic!("expected a match") };
    assert_eq!(m.expression.kind(), ExprKind::NumericCounter);
    assert_eq!(m.bytes.0, vec![5, 0, 0, 0]);
}

#[test]
fn unreachable_target_terminates_with_failure() {
    let target = ByteBlock(vec![0x11; 32]);
    let mut engine = SearchEngine::new(target, quiet(0));
    engine.seed_expr(lit("abc")).unwrap();
    let outcome = engine.run().unwrap();
    assert!(matches!(outcome, SearchOutcome::Exhausted { tries: 1 }));
    assert!(engine.frontier().is_empty());
}

#[test]
fn unreachable_target_after_growth_terminates() {
    let cfg = write_config(
        "HEXA_WPA_PASSPHRASE = 1111111111111111111111111111111111111111111111111111111111111111\n\
         ASCII_STRINGS = abc\n\
         GROWTH_ROUNDS = 1\n\
         BUILTIN_SEEDS = 0\n",
    );
    let cfg = SearchConfig::load(cfg.path()).unwrap();
    let outcome = search(&cfg).unwrap();
    assert!(!outcome.is_found());
    assert!(matches!(outcome, SearchOutcome::Exhausted { .. }));
    // at least the literal and its digests were evaluated
    assert!(outcome.tries() >= 11);
}

#[test]
fn matched_node_is_detached_from_the_frontier() {
    let mut engine = SearchEngine::new(ByteBlock::from_ascii("b"), quiet(0));
    engine.seed_expr(lit("abc")).unwrap();
    engine.seed_expr(lit("xyz")).unwrap();
    let SearchOutcome::Found(m) = engine.run().unwrap() else { panic!("expected a match") };
    assert_eq!(m.bytes, ByteBlock::from_ascii("abc"));
    assert!(!engine.frontier().contains(&m.expression.topological_hash()));
}

#[test]
fn config_errors_abort_before_search() {
    let cfg = write_config("ASCII_STRINGS = abc\n");
    assert!(matches!(SearchConfig::load(cfg.path()), Err(SearchError::MissingKey(_))));
    let cfg = write_config("HEXA_WPA_PASSPHRASE 616263\n");
    assert!(matches!(SearchConfig::load(cfg.path()), Err(SearchError::ConfigSyntax { line: 1, .. })));
    let cfg = write_config("HEXA_WPA_PASSPHRASE = 61626\n");
    assert!(matches!(SearchConfig::load(cfg.path()), Err(SearchError::Hex(_))));
}
