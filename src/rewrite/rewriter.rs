use crate::rewrite::errors::RewriteError;
use crate::rules::RewriteRule;

/// A planned byte-span substitution against the scanned text.
#[derive(Debug, Clone)]
pub struct Replacement {
    /// Byte range to replace
    pub byte_start: usize,
    pub byte_end: usize,
    /// Original text (for verification)
    pub original: String,
    /// New text
    pub replacement: String,
}

/// Output of applying one rule to one body of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "RewriteResult carries the rewritten text"]
pub struct RewriteResult {
    /// The rewritten text. Equal to the input when `rewritten` is 0.
    pub text: String,
    /// Number of occurrences replaced.
    pub rewritten: usize,
    /// Number of candidate spans skipped for missing or inconsistent
    /// captures. Skipped spans are left byte-for-byte untouched.
    pub skipped: usize,
}

/// Apply a rule to source text: scan, synthesize replacements, splice.
///
/// Occurrences are consumed in left-to-right order. A candidate span whose
/// replacement strategy declines (required capture absent) is skipped rather
/// than aborting the scan; unrelated sites elsewhere in the same text are
/// still rewritten. Substituted text is never re-scanned within the pass, so
/// a replacement containing a sub-idiom resembling the pattern cannot loop.
pub fn apply_rule(source: &str, rule: &dyn RewriteRule) -> Result<RewriteResult, RewriteError> {
    let occurrences = rule.scan(source)?;

    let mut replacements = Vec::new();
    let mut skipped = 0;
    for occ in &occurrences {
        match rule.replacement(occ) {
            Some(new_text) => replacements.push(Replacement {
                byte_start: occ.byte_start,
                byte_end: occ.byte_end,
                original: occ.text.clone(),
                replacement: new_text,
            }),
            None => skipped += 1,
        }
    }

    let rewritten = replacements.len();
    let text = splice(source, &replacements)?;

    Ok(RewriteResult {
        text,
        rewritten,
        skipped,
    })
}

/// Build the output text from ascending, non-overlapping replacements.
///
/// Unmatched spans are copied verbatim. Each replacement's span is validated
/// against the source (bounds, ordering, and that the recorded original text
/// still sits at the span) before it is substituted.
pub fn splice(source: &str, replacements: &[Replacement]) -> Result<String, RewriteError> {
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;

    for r in replacements {
        if r.byte_start > r.byte_end || r.byte_end > source.len() {
            return Err(RewriteError::SpanOutOfBounds {
                byte_start: r.byte_start,
                byte_end: r.byte_end,
                len: source.len(),
            });
        }
        if r.byte_start < cursor {
            return Err(RewriteError::OverlappingSpans {
                byte_start: r.byte_start,
            });
        }
        if &source[r.byte_start..r.byte_end] != r.original {
            return Err(RewriteError::StaleOccurrence {
                byte_start: r.byte_start,
                byte_end: r.byte_end,
            });
        }

        out.push_str(&source[cursor..r.byte_start]);
        out.push_str(&r.replacement);
        cursor = r.byte_end;
    }

    out.push_str(&source[cursor..]);
    Ok(out)
}
