//! Built-in rewrite rules for generated data-access code.
//!
//! Each rule pairs one idiom pattern with one capture-driven replacement
//! strategy. Rules are constructed once at startup and are immutable; the
//! same rule value is reused across every file scanned in a run.

pub mod fetch;
pub mod update;

pub use fetch::PreserveStoredId;
pub use update::WriteFullObject;

use crate::rewrite::{Occurrence, RewriteError};

/// One idiom pattern paired with its replacement strategy.
pub trait RewriteRule {
    /// Stable identifier used in reports.
    fn name(&self) -> &'static str;

    /// One-line description of what the rule repairs.
    fn description(&self) -> &'static str;

    /// Locate candidate occurrences, non-overlapping and ordered
    /// left-to-right by start offset.
    fn scan(&self, source: &str) -> Result<Vec<Occurrence>, RewriteError>;

    /// Synthesize replacement text from an occurrence's captures.
    ///
    /// Must be a pure function of the captures: no side effects, no
    /// dependence on occurrence order or state outside the occurrence.
    /// Returns `None` when a required capture is absent or inconsistent,
    /// in which case the span is skipped untouched.
    fn replacement(&self, occ: &Occurrence) -> Option<String>;
}

/// The rules applied by the CLI, in pass order.
pub fn builtin_rules() -> Vec<Box<dyn RewriteRule>> {
    vec![Box::new(PreserveStoredId), Box::new(WriteFullObject)]
}
