//! The pattern-match-and-transform engine.
//!
//! This module provides occurrence scanning over source text (compiled
//! patterns with named captures) and the single-pass scan-and-substitute
//! driver that turns a rule's matches into rewritten text plus counts.

pub mod errors;
pub mod matcher;
pub mod rewriter;

pub use errors::RewriteError;
pub use matcher::{IdiomMatcher, Occurrence};
pub use rewriter::{apply_rule, Replacement, RewriteResult};
