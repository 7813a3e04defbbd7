#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

//! Passgrind - structural passphrase recovery
//!
//! Given a target digest (or bytes known to be embedded in one), this crate
//! searches a space of byte-producing expressions built from literal
//! constants, counters and composition operators (concatenation, sub-range
//! extraction, digest application) until one evaluation matches.

// Search model:
//
// - Expressions are trees of exclusively owned nodes, each with its own
//   enumeration state machine.
// - Identity for deduplication is a BLAKE3 topological hash over node type,
//   fixed parameters and child hashes, never the enumeration state.
// - The frontier is grown by random recombination from a seedable RNG, so a
//   run is reproducible from its seed.

// Core modules
pub mod types;
pub mod errors;
pub mod ser;
pub mod hashers;
pub mod expression;
pub mod leaves;
pub mod composite;
pub mod matching;
pub mod frontier;
pub mod config;
pub mod engine;

// Re-export commonly used types and functions
pub use types::*;
pub use errors::{SearchError, SearchResult};
pub use hashers::{h_tag, sha0, DigestAlgorithm};
pub use expression::{BoxedExpr, ExprKind, Expression};
pub use leaves::{AsciiCounter, Const, NumericCounter};
pub use composite::{Concat, GenericDigest, Substring};
pub use matching::is_match;
pub use frontier::Frontier;
pub use config::{ConfigFile, SearchConfig, SeedEncoding, SeedLiteral};
pub use engine::{search, Match, Phase, SearchEngine, SearchOutcome, SearchParams};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
