use crate::cache;
use crate::rewrite::errors::RewriteError;
use std::collections::HashMap;

/// One located instance of an idiom with its captured sub-values.
#[derive(Debug, Clone)]
pub struct Occurrence {
    /// Byte range of the entire match
    pub byte_start: usize,
    pub byte_end: usize,
    /// The matched text
    pub text: String,
    /// Captured substrings: capture name -> text. A capture that did not
    /// participate in the match has no entry.
    pub captures: HashMap<String, String>,
}

impl Occurrence {
    /// Look up a capture by name.
    pub fn capture(&self, name: &str) -> Option<&str> {
        self.captures.get(name).map(String::as_str)
    }
}

/// Scanner for one idiom pattern over source text.
///
/// Patterns are written in the `regex` crate's syntax with named capture
/// groups (`(?P<name>...)`). Matching is case-sensitive; patterns tolerate
/// runs of inter-token whitespace via `\s*`/`\s+`, never sub-clause
/// reordering. Compilation goes through the thread-local pattern cache, so a
/// matcher is cheap to construct per scan.
///
/// Scans are linear-time and the occurrence list is always non-overlapping
/// and ordered left-to-right by start offset.
pub struct IdiomMatcher {
    pattern: String,
}

impl IdiomMatcher {
    /// Create a matcher for the given pattern. The pattern is compiled
    /// lazily on first scan.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Find all occurrences, left-to-right.
    pub fn find_all(&self, source: &str) -> Result<Vec<Occurrence>, RewriteError> {
        let re = cache::get_or_compile(&self.pattern)?;
        let names: Vec<&str> = re.capture_names().flatten().collect();

        let mut results = Vec::new();
        for caps in re.captures_iter(source) {
            let whole = caps.get(0).expect("group 0 spans the whole match");

            let mut captures = HashMap::new();
            for name in &names {
                if let Some(m) = caps.name(name) {
                    captures.insert((*name).to_string(), m.as_str().to_string());
                }
            }

            results.push(Occurrence {
                byte_start: whole.start(),
                byte_end: whole.end(),
                text: whole.as_str().to_string(),
                captures,
            });
        }

        Ok(results)
    }

    /// Check whether the pattern has any occurrence at all.
    pub fn has_match(&self, source: &str) -> Result<bool, RewriteError> {
        let re = cache::get_or_compile(&self.pattern)?;
        Ok(re.is_match(source))
    }

    /// The pattern text this matcher scans for.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
