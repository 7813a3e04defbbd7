use core::fmt;

use crate::types::{ByteBlock, TopoHash};

/// Owned expression tree node. Children are owned exclusively, never shared.
pub type BoxedExpr = Box<dyn Expression>;

/// Variant tag, used where the engine needs to know the outermost node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Const,
    NumericCounter,
    AsciiCounter,
    GenericDigest,
    Substring,
    Concat,
}

/// A node of the candidate-generation tree.
///
/// Every node carries its own enumeration state machine. `eval` and `length`
/// are pure functions of the current state of the node and its children.
pub trait Expression: fmt::Debug {
    fn kind(&self) -> ExprKind;

    /// Upper bound, in bits, on the variability of the output. Heuristic only.
    fn entropy(&self) -> f32;

    /// Bytes produced by the current enumeration state.
    fn eval(&self) -> ByteBlock;

    /// Byte length of `eval()` for the current state.
    fn length(&self) -> usize;

    /// Longest `eval()` over every enumeration state.
    fn max_length(&self) -> usize;

    /// Reset to the first enumeration state, children included.
    fn init_state(&mut self);

    /// Advance to the next state.
    ///
    /// Returns `false` once the state space is exhausted; the node has then
    /// cycled back to its initial state.
    fn next_state(&mut self) -> bool;

    /// Independent clone with the same structure and the same current state.
    fn deep_copy(&self) -> BoxedExpr;

    /// Structural fingerprint: variant, fixed parameters and children, never the
    /// enumeration state. Recomputed on every call.
    fn topological_hash(&self) -> TopoHash;

    /// Append an indented rendering of this subtree, one node per line.
    fn describe_into(&self, depth: usize, out: &mut String);

    /// Indented rendering of the whole subtree.
    fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_into(0, &mut out);
        out
    }
}

impl Clone for BoxedExpr {
    fn clone(&self) -> Self {
        self.deep_copy()
    }
}

/// Write one description line at the given depth.
pub(crate) fn describe_line(out: &mut String, depth: usize, line: fmt::Arguments<'_>) {
    use fmt::Write as _;
    for _ in 0..depth {
        out.push_str("  ");
    }
    let _ = out.write_fmt(line);
    out.push('\n');
}
