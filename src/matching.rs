use crate::types::ByteBlock;

/// True if `candidate` equals `target`, or is at least as long and contains it
/// as a contiguous window. Longer outputs (digests, concatenations) may carry
/// the target verbatim.
#[must_use]
pub fn is_match(target: &ByteBlock, candidate: &ByteBlock) -> bool {
    if target == candidate {
        return true;
    }
    candidate.len() >= target.len() && target.is_window_of(candidate)
}
