//! Record Patcher: automated idiom repair for generated data-access code
//!
//! A small rewriting engine that locates known-bad idioms in generated
//! Firebase-style service modules, synthesizes corrected replacements from
//! the values captured at each match site, and reports how many sites were
//! changed.
//!
//! # Architecture
//!
//! All rewriting compiles down to a single primitive: [`Replacement`], a
//! byte-span substitution planned against the scanned text. Intelligence
//! lives in the rules (pattern + capture-driven replacement strategy), not in
//! the splice that applies them.
//!
//! Two built-in rules repair the two recurring data-integrity bugs:
//!
//! - [`rules::PreserveStoredId`] rewrites keyed-collection rebuilds so a
//!   stored `id` field wins over the storage key it happens to be filed
//!   under.
//! - [`rules::WriteFullObject`] rewrites partial merge-updates into
//!   full-object replacement writes, so the stored record always equals the
//!   object the caller presented.
//!
//! # Safety
//!
//! - Replacement spans are verified against the scanned text before splicing
//! - Atomic file writes (tempfile + fsync + rename)
//! - Project boundary enforcement (no edits under `node_modules` and friends)
//! - UTF-8 validation
//! - Idempotent passes: rewritten text no longer matches the pattern
//!
//! # Example
//!
//! ```
//! use record_patcher::{apply_rule, rules};
//!
//! let source = "const x = 1;\n";
//! let rule = rules::PreserveStoredId;
//! let result = apply_rule(source, &rule).unwrap();
//!
//! assert_eq!(result.rewritten, 0);
//! assert_eq!(result.text, source);
//! ```

pub mod apply;
pub mod cache;
pub mod rewrite;
pub mod rules;
pub mod safety;

// Re-exports
pub use apply::{check_file, patch_file, rewrite_source, ApplyError, FileReport, RulePass};
pub use rewrite::{
    apply_rule, IdiomMatcher, Occurrence, Replacement, RewriteError, RewriteResult,
};
pub use rules::{builtin_rules, RewriteRule};
pub use safety::{ProjectGuard, SafetyError};
