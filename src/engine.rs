//! Generate-and-test search over the expression frontier.
//!
//! Three strictly sequential phases: seed the frontier with literals and
//! counters, grow it by random recombination (then drop top-level
//! substrings), and exhaust it by sampling members and stepping through
//! their enumeration states until one output matches the target.

use rand::{rngs::StdRng, Rng};
use rand_core::SeedableRng;

use crate::{
    composite::{Concat, GenericDigest, Substring},
    config::{SearchConfig, SeedLiteral},
    errors::{SearchError, SearchResult},
    expression::{BoxedExpr, ExprKind},
    frontier::Frontier,
    leaves::{AsciiCounter, Const, NumericCounter},
    matching::is_match,
    types::{ByteBlock, GROWTH_ROUNDS, STEPS_PER_CANDIDATE, TRACE_PROBABILITY},
};

/// Tunables of a search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Recombination rounds in the grow phase.
    pub growth_rounds: usize,
    /// Evaluations spent on a sampled member before resampling.
    pub steps_per_candidate: usize,
    pub rng_seed: u64,
    /// Stop after this many non-matching evaluations.
    pub max_tries: Option<u64>,
    /// Seed the numeric and ascii counters alongside configured literals.
    pub builtin_seeds: bool,
    /// Probability of logging a sampled candidate at debug level.
    pub trace_probability: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            growth_rounds: GROWTH_ROUNDS,
            steps_per_candidate: STEPS_PER_CANDIDATE,
            rng_seed: 0,
            max_tries: None,
            builtin_seeds: true,
            trace_probability: TRACE_PROBABILITY,
        }
    }
}

/// A matching expression, detached from the frontier.
#[derive(Debug)]
pub struct Match {
    pub expression: BoxedExpr,
    pub bytes: ByteBlock,
    pub tries: u64,
}

#[derive(Debug)]
pub enum SearchOutcome {
    Found(Match),
    /// Every member was enumerated to exhaustion without a match.
    Exhausted { tries: u64 },
    /// `max_tries` was reached first.
    BudgetSpent { tries: u64 },
}

impl SearchOutcome {
    /// Non-matching evaluations performed.
    #[must_use]
    pub const fn tries(&self) -> u64 {
        match self {
            Self::Found(m) => m.tries,
            Self::Exhausted { tries } | Self::BudgetSpent { tries } => *tries,
        }
    }

    #[must_use]
    pub const fn is_found(&self) -> bool { matches!(self, Self::Found(_)) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Seeding,
    Grown,
    Done,
}

impl Phase {
    const fn name(self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::Grown => "grown",
            Self::Done => "done",
        }
    }
}

// Mixed into `rng_seed` for the trace stream so tracing never perturbs sampling.
const TRACE_SEED_MASK: u64 = 0x7472_6163_655f_7267;

#[derive(Debug)]
pub struct SearchEngine {
    target: ByteBlock,
    params: SearchParams,
    frontier: Frontier,
    rng: StdRng,
    trace_rng: StdRng,
    phase: Phase,
    tries: u64,
}

impl SearchEngine {
    #[must_use]
    pub fn new(target: ByteBlock, params: SearchParams) -> Self {
        let rng = StdRng::seed_from_u64(params.rng_seed);
        let trace_rng = StdRng::seed_from_u64(params.rng_seed ^ TRACE_SEED_MASK);
        Self { target, params, frontier: Frontier::new(), rng, trace_rng, phase: Phase::Seeding, tries: 0 }
    }

    /// Engine seeded from a resolved config: literals first, then the builtin counters if enabled.
    ///
    /// # Errors
    ///
    /// Propagates counter construction errors.
    pub fn from_config(cfg: &SearchConfig) -> SearchResult<Self> {
        let mut engine = Self::new(cfg.target.clone(), cfg.params.clone());
        engine.seed_literals(&cfg.literals)?;
        if cfg.params.builtin_seeds {
            engine.seed_builtin()?;
        }
        Ok(engine)
    }

    #[must_use]
    pub const fn target(&self) -> &ByteBlock { &self.target }

    #[must_use]
    pub const fn params(&self) -> &SearchParams { &self.params }

    #[must_use]
    pub const fn frontier(&self) -> &Frontier { &self.frontier }

    #[must_use]
    pub const fn phase(&self) -> Phase { self.phase }

    #[must_use]
    pub const fn tries(&self) -> u64 { self.tries }

    fn expect_phase(&self, want: Phase, requested: &'static str) -> SearchResult<()> {
        if self.phase == want {
            Ok(())
        } else {
            Err(SearchError::PhaseOrder { current: self.phase.name(), requested })
        }
    }

    /// Insert an arbitrary seed expression. Returns whether it was new.
    ///
    /// # Errors
    ///
    /// `SearchError::PhaseOrder` once growth has started.
    pub fn seed_expr(&mut self, expr: BoxedExpr) -> SearchResult<bool> {
        self.expect_phase(Phase::Seeding, "seed")?;
        Ok(self.frontier.try_insert(expr))
    }

    /// One `Const` per configured literal.
    ///
    /// # Errors
    ///
    /// `SearchError::PhaseOrder` once growth has started.
    pub fn seed_literals(&mut self, literals: &[SeedLiteral]) -> SearchResult<()> {
        for lit in literals {
            tracing::info!("Adding {} constant \"{}\"", lit.encoding, lit.text);
            self.seed_expr(Box::new(Const::new(lit.bytes.clone())))?;
        }
        Ok(())
    }

    /// A 4-byte numeric counter, a digest over a lowercase 4-letter counter
    /// and an uppercase 4-letter counter.
    ///
    /// # Errors
    ///
    /// `SearchError::PhaseOrder` once growth has started.
    pub fn seed_builtin(&mut self) -> SearchResult<()> {
        self.seed_expr(Box::new(NumericCounter::new(4)?))?;
        self.seed_expr(Box::new(GenericDigest::new(Box::new(AsciiCounter::new(4, b'a')?))))?;
        self.seed_expr(Box::new(AsciiCounter::new(4, b'A')?))?;
        tracing::info!(frontier = self.frontier.len(), "seeded builtin counters");
        Ok(())
    }

    /// Random recombination rounds, then removal of top-level substrings.
    ///
    /// # Errors
    ///
    /// `SearchError::PhaseOrder` unless still seeding.
    pub fn grow(&mut self) -> SearchResult<()> {
        self.expect_phase(Phase::Seeding, "grow")?;
        for round in 0..self.params.growth_rounds {
            if !self.grow_round() {
                break;
            }
            tracing::trace!(round, frontier = self.frontier.len(), "growth round");
        }
        self.phase = Phase::Grown;
        let removed = self.prune_top_substrings();
        tracing::info!(frontier = self.frontier.len(), removed, "growth finished");
        Ok(())
    }

    /// One recombination: `Substring(e1)` unless `e1` already is one,
    /// `GenericDigest(e1)`, then `Concat(e1, e2)`. `false` on an empty frontier.
    fn grow_round(&mut self) -> bool {
        let Some(first) = self.sample_copy() else { return false };
        if first.kind() != ExprKind::Substring {
            // an all-empty child has no window to take
            if let Ok(sub) = Substring::new(first.deep_copy()) {
                self.frontier.try_insert(Box::new(sub));
            }
        }
        // digest of a digest is allowed
        self.frontier.try_insert(Box::new(GenericDigest::new(first.deep_copy())));
        let Some(second) = self.sample_copy() else { return false };
        self.frontier.try_insert(Box::new(Concat::new(first, second)));
        true
    }

    /// Drop members whose outermost node is a `Substring`: the matching
    /// predicate already accepts the target as any window of a candidate.
    /// Nested substrings are kept.
    pub fn prune_top_substrings(&mut self) -> usize {
        let removed = self.frontier.remove_kind(ExprKind::Substring);
        for _ in 0..removed {
            tracing::debug!("Removed one expression that is a top substr");
        }
        removed
    }

    fn sample_copy(&mut self) -> Option<BoxedExpr> {
        let key = self.frontier.sample_key(&mut self.rng)?;
        self.frontier.get(&key).map(|e| e.deep_copy())
    }

    /// Sample, evaluate, advance or evict until a match, an empty frontier or the try budget.
    ///
    /// # Errors
    ///
    /// `SearchError::PhaseOrder` unless the frontier has been grown.
    pub fn exhaust(&mut self) -> SearchResult<SearchOutcome> {
        self.expect_phase(Phase::Grown, "exhaust")?;
        self.phase = Phase::Done;

        for e in self.frontier.iter_mut() {
            e.init_state();
            tracing::debug!("Queue element:\n{}", e.describe());
        }

        let steps = self.params.steps_per_candidate.max(1);
        let trace_p = self.params.trace_probability.min(1.0);

        while let Some(key) = self.frontier.sample_key(&mut self.rng) {
            let Some(e) = self.frontier.get_mut(&key) else { break };
            for _ in 0..steps {
                if self.params.max_tries.is_some_and(|max| self.tries >= max) {
                    tracing::info!(tries = self.tries, "try budget spent");
                    return Ok(SearchOutcome::BudgetSpent { tries: self.tries });
                }

                let bytes = e.eval();
                if trace_p > 0.0 && self.trace_rng.gen_bool(trace_p) {
                    tracing::debug!(
                        "Testing {} toward {}\n{}",
                        self.target.to_hex(),
                        bytes.to_hex(),
                        e.describe()
                    );
                }

                if is_match(&self.target, &bytes) {
                    tracing::info!("matched {} with {}", self.target.to_hex(), bytes.to_hex());
                    let Some(expression) = self.frontier.take(&key) else { break };
                    return Ok(SearchOutcome::Found(Match { expression, bytes, tries: self.tries }));
                }

                self.tries += 1;
                if !e.next_state() {
                    self.frontier.take(&key);
                    tracing::debug!(frontier = self.frontier.len(), "Popped expression out of the queue");
                    break;
                }
            }
        }

        tracing::info!(tries = self.tries, "frontier exhausted");
        Ok(SearchOutcome::Exhausted { tries: self.tries })
    }

    /// Grow then exhaust.
    ///
    /// # Errors
    ///
    /// `SearchError::PhaseOrder` if called twice.
    pub fn run(&mut self) -> SearchResult<SearchOutcome> {
        self.grow()?;
        self.exhaust()
    }
}

/// Build an engine from `cfg` and run it to completion.
///
/// # Errors
///
/// Counter construction errors; the search itself does not fail.
pub fn search(cfg: &SearchConfig) -> SearchResult<SearchOutcome> {
    SearchEngine::from_config(cfg)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedEncoding;

    fn params(rounds: usize) -> SearchParams {
        SearchParams { growth_rounds: rounds, builtin_seeds: false, ..SearchParams::default() }
    }

    #[test]
    fn phases_cannot_be_reentered() {
        let mut engine = SearchEngine::new(ByteBlock::from_ascii("x"), params(0));
        assert!(matches!(engine.exhaust(), Err(SearchError::PhaseOrder { .. })));
        engine.grow().unwrap();
        assert!(matches!(engine.grow(), Err(SearchError::PhaseOrder { .. })));
        assert!(matches!(
            engine.seed_expr(Box::new(Const::new(ByteBlock::from_ascii("x")))),
            Err(SearchError::PhaseOrder { .. })
        ));
        engine.exhaust().unwrap();
        assert_eq!(engine.phase(), Phase::Done);
        assert!(engine.exhaust().is_err());
    }

    #[test]
    fn builtin_seeds_are_three_distinct_members() {
        let mut engine = SearchEngine::new(ByteBlock::from_ascii("x"), params(0));
        engine.seed_builtin().unwrap();
        assert_eq!(engine.frontier().len(), 3);
        engine.seed_builtin().unwrap();
        assert_eq!(engine.frontier().len(), 3);
    }

    #[test]
    fn growth_leaves_no_top_level_substring() {
        let mut engine = SearchEngine::new(ByteBlock::from_ascii("zzzz"), params(20));
        let lit = SeedLiteral::decode(SeedEncoding::Ascii, "abc").unwrap();
        engine.seed_literals(&[lit]).unwrap();
        engine.grow().unwrap();
        assert!(engine.frontier().len() > 1);
        assert!(engine.frontier().iter().all(|(_, e)| e.kind() != ExprKind::Substring));
    }

    #[test]
    fn growth_does_not_wrap_a_substring_in_a_substring() {
        let mut engine = SearchEngine::new(ByteBlock::from_ascii("zzzz"), params(0));
        let sub = Substring::new(Box::new(Const::new(ByteBlock::from_ascii("abc")))).unwrap();
        engine.seed_expr(Box::new(sub)).unwrap();
        assert!(engine.grow_round());
        // the seed, its digest and one concatenation
        assert_eq!(engine.frontier().len(), 3);
        let kinds: Vec<ExprKind> = engine.frontier().iter().map(|(_, e)| e.kind()).collect();
        assert_eq!(kinds.iter().filter(|&&k| k == ExprKind::Substring).count(), 1);
        assert!(kinds.contains(&ExprKind::GenericDigest));
        assert!(kinds.contains(&ExprKind::Concat));
    }

    #[test]
    fn growth_round_on_empty_frontier_does_nothing() {
        let mut engine = SearchEngine::new(ByteBlock::from_ascii("x"), params(0));
        assert!(!engine.grow_round());
        assert!(engine.frontier().is_empty());
    }

    #[test]
    fn trace_probability_does_not_change_sampling() {
        let run = |trace_probability: f64| {
            let mut engine = SearchEngine::new(
                ByteBlock(vec![0x05, 0x01]),
                SearchParams { rng_seed: 7, trace_probability, steps_per_candidate: 10, ..params(0) },
            );
            engine.seed_expr(Box::new(NumericCounter::new(2).unwrap())).unwrap();
            engine.seed_expr(Box::new(AsciiCounter::new(2, b'A').unwrap())).unwrap();
            engine.seed_expr(Box::new(Const::new(ByteBlock::from_ascii("xyz")))).unwrap();
            engine.run().unwrap()
        };
        let quiet = run(0.0);
        let traced = run(1.0);
        assert!(quiet.is_found() && traced.is_found());
        assert_eq!(quiet.tries(), traced.tries());
    }

    #[test]
    fn empty_frontier_is_exhausted_immediately() {
        let mut engine = SearchEngine::new(ByteBlock::from_ascii("x"), params(5));
        let outcome = engine.run().unwrap();
        assert!(matches!(outcome, SearchOutcome::Exhausted { tries: 0 }));
    }

    #[test]
    fn try_budget_stops_the_search() {
        let mut engine = SearchEngine::new(
            ByteBlock::from_hex("ffffffffff").unwrap(),
            SearchParams { max_tries: Some(250), ..params(0) },
        );
        engine.seed_expr(Box::new(NumericCounter::new(4).unwrap())).unwrap();
        let outcome = engine.run().unwrap();
        assert!(matches!(outcome, SearchOutcome::BudgetSpent { tries: 250 }));
    }

    #[test]
    fn same_seed_same_frontier() {
        let build = || {
            let mut engine = SearchEngine::new(ByteBlock::from_ascii("zz"), SearchParams { rng_seed: 42, ..params(10) });
            engine.seed_builtin().unwrap();
            engine.grow().unwrap();
            engine.frontier().iter().map(|(k, _)| *k).collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }
}
