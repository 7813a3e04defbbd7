//! Composite expressions wrapping one or two owned children.
//!
//! Enumeration follows an inner/outer discipline: the first-priority
//! dimension advances on every step and the second-priority one only after
//! the first has wrapped around.

use crate::{
    errors::SearchError,
    expression::{describe_line, BoxedExpr, ExprKind, Expression},
    hashers::{h_tag, DigestAlgorithm, TAG_CONCAT, TAG_DIGEST, TAG_SUBSTRING},
    ser::le64,
    types::{ByteBlock, TopoHash, OPERATOR_PENALTY_BITS},
};

/// Applies each of the ten digest algorithms to the child's output.
///
/// Child parameterization is the inner loop, algorithm selection the outer one.
/// Enumeration starts at `start` and wraps modulo the algorithm count.
#[derive(Debug, Clone)]
pub struct GenericDigest {
    child: BoxedExpr,
    start: DigestAlgorithm,
    offset: usize,
}

impl GenericDigest {
    #[must_use]
    pub fn new(child: BoxedExpr) -> Self {
        Self::starting_at(child, DigestAlgorithm::ALL[0])
    }

    #[must_use]
    pub fn starting_at(child: BoxedExpr, start: DigestAlgorithm) -> Self {
        Self { child, start, offset: 0 }
    }

    /// Algorithm selected by the current state.
    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        DigestAlgorithm::ALL[(self.start.index() + self.offset) % DigestAlgorithm::COUNT]
    }
}

impl Expression for GenericDigest {
    fn kind(&self) -> ExprKind { ExprKind::GenericDigest }

    fn entropy(&self) -> f32 { self.child.entropy() + OPERATOR_PENALTY_BITS }

    fn eval(&self) -> ByteBlock { self.algorithm().digest(self.child.eval().as_bytes()) }

    fn length(&self) -> usize { self.algorithm().output_len() }

    fn max_length(&self) -> usize {
        DigestAlgorithm::ALL.iter().map(|a| a.output_len()).max().unwrap_or(0)
    }

    fn init_state(&mut self) {
        self.offset = 0;
        self.child.init_state();
    }

    fn next_state(&mut self) -> bool {
        if self.child.next_state() {
            return true;
        }
        self.child.init_state();
        self.offset = (self.offset + 1) % DigestAlgorithm::COUNT;
        self.offset != 0
    }

    fn deep_copy(&self) -> BoxedExpr { Box::new(self.clone()) }

    fn topological_hash(&self) -> TopoHash {
        h_tag(TAG_DIGEST, &[self.start.name().as_bytes(), &self.child.topological_hash().0])
    }

    fn describe_into(&self, depth: usize, out: &mut String) {
        describe_line(out, depth, format_args!("{}()", self.algorithm()));
        self.child.describe_into(depth + 1, out);
    }
}

/// Contiguous window `[start, start + len)` of the child's output.
///
/// For each `start`, `len` runs from `min_len` up to `max_len` or the end of
/// the child output; then `start` moves on; then the child advances.
#[derive(Debug, Clone)]
pub struct Substring {
    child: BoxedExpr,
    min_len: usize,
    max_len: Option<usize>,
    start: usize,
    len: usize,
}

impl Substring {
    /// Unbounded windows of at least one byte.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidParameter` if the child never produces a byte.
    pub fn new(child: BoxedExpr) -> Result<Self, SearchError> {
        Self::with_bounds(child, 1, 0)
    }

    /// `max_len == 0` means no upper bound beyond the child's length.
    ///
    /// The child is moved forward to its next state long enough to hold a
    /// `min_len` window.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidParameter` if a non-zero `max_len` is below
    /// `min_len`, or if no child state reaches `min_len` bytes.
    pub fn with_bounds(child: BoxedExpr, min_len: usize, max_len: usize) -> Result<Self, SearchError> {
        if max_len != 0 && max_len < min_len {
            return Err(SearchError::InvalidParameter("substring max_len below min_len"));
        }
        if child.max_length() < min_len {
            return Err(SearchError::InvalidParameter("substring min_len exceeds every child output"));
        }
        let max_len = (max_len != 0).then_some(max_len);
        let mut s = Self { child, min_len, max_len, start: 0, len: min_len };
        s.skip_short_child_states();
        Ok(s)
    }

    /// Current `(start, len)` window.
    #[must_use]
    pub const fn window(&self) -> (usize, usize) { (self.start, self.len) }

    /// Advance the child until it can hold a `min_len` window. Terminates
    /// within one child cycle since `max_length() >= min_len`. Returns `false`
    /// if the child wrapped on the way.
    fn skip_short_child_states(&mut self) -> bool {
        let mut more = true;
        while self.child.length() < self.min_len {
            more &= self.child.next_state();
        }
        more
    }

    fn len_cap(&self, avail: usize) -> usize {
        let room = avail.saturating_sub(self.start);
        self.max_len.map_or(room, |m| m.min(room))
    }
}

impl Expression for Substring {
    fn kind(&self) -> ExprKind { ExprKind::Substring }

    #[allow(clippy::cast_precision_loss)]
    fn entropy(&self) -> f32 {
        let inner = self.child.entropy() + OPERATOR_PENALTY_BITS;
        self.max_len.map_or(inner, |m| inner.min((m * 8) as f32 + OPERATOR_PENALTY_BITS))
    }

    fn eval(&self) -> ByteBlock {
        let bytes = self.child.eval();
        debug_assert!(
            self.len >= self.min_len && self.start + self.len <= bytes.len(),
            "substring window ({}, {}) outside {} bytes",
            self.start,
            self.len,
            bytes.len()
        );
        bytes.clamped_window(self.start, self.len)
    }

    fn length(&self) -> usize { self.len }

    fn max_length(&self) -> usize {
        let child = self.child.max_length();
        self.max_len.map_or(child, |m| m.min(child))
    }

    fn init_state(&mut self) {
        self.child.init_state();
        self.skip_short_child_states();
        self.start = 0;
        self.len = self.min_len;
    }

    fn next_state(&mut self) -> bool {
        let avail = self.child.length();
        if self.len < self.len_cap(avail) {
            self.len += 1;
            return true;
        }
        if self.start + 1 + self.min_len <= avail {
            self.start += 1;
            self.len = self.min_len;
            return true;
        }
        self.start = 0;
        self.len = self.min_len;
        let more = self.child.next_state();
        // A wrap while skipping lands on the initial state all the same.
        self.skip_short_child_states() && more
    }

    fn deep_copy(&self) -> BoxedExpr { Box::new(self.clone()) }

    fn topological_hash(&self) -> TopoHash {
        h_tag(
            TAG_SUBSTRING,
            &[
                &le64(self.min_len as u64),
                &le64(self.max_len.unwrap_or(0) as u64),
                &self.child.topological_hash().0,
            ],
        )
    }

    fn describe_into(&self, depth: usize, out: &mut String) {
        describe_line(out, depth, format_args!("Substring({},{})", self.start, self.len));
        self.child.describe_into(depth + 1, out);
    }
}

/// `first || second`. `first` advances on every step; `second` only when `first` wraps.
#[derive(Debug, Clone)]
pub struct Concat {
    first: BoxedExpr,
    second: BoxedExpr,
}

impl Concat {
    #[must_use]
    pub fn new(first: BoxedExpr, second: BoxedExpr) -> Self { Self { first, second } }
}

impl Expression for Concat {
    fn kind(&self) -> ExprKind { ExprKind::Concat }

    fn entropy(&self) -> f32 { OPERATOR_PENALTY_BITS + self.first.entropy() + self.second.entropy() }

    fn eval(&self) -> ByteBlock { self.first.eval().concat(&self.second.eval()) }

    fn length(&self) -> usize { self.first.length() + self.second.length() }

    fn max_length(&self) -> usize { self.first.max_length() + self.second.max_length() }

    fn init_state(&mut self) {
        self.first.init_state();
        self.second.init_state();
    }

    fn next_state(&mut self) -> bool {
        if self.first.next_state() {
            return true;
        }
        self.first.init_state();
        self.second.next_state()
    }

    fn deep_copy(&self) -> BoxedExpr { Box::new(self.clone()) }

    fn topological_hash(&self) -> TopoHash {
        h_tag(TAG_CONCAT, &[&self.first.topological_hash().0, &self.second.topological_hash().0])
    }

    fn describe_into(&self, depth: usize, out: &mut String) {
        describe_line(out, depth, format_args!("Concat()"));
        self.first.describe_into(depth + 1, out);
        self.second.describe_into(depth + 1, out);
    }
}
