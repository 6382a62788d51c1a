//! Thread-local compilation cache for idiom patterns.
//!
//! Caches compiled patterns to avoid redundant recompilation when the same
//! rules are applied across many files in one run. Cache is capped at 64
//! entries; it is cleared and rebuilt on demand when full.

use crate::rewrite::RewriteError;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;

const MAX_CACHE_ENTRIES: usize = 64;

thread_local! {
    static PATTERN_CACHE: RefCell<HashMap<String, Regex>> =
        RefCell::new(HashMap::new());
}

/// Get a compiled pattern from cache, or compile and cache it.
///
/// Only successful compilations are cached; an invalid pattern is reported
/// on every call.
pub fn get_or_compile(pattern: &str) -> Result<Regex, RewriteError> {
    PATTERN_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();

        if let Some(re) = cache.get(pattern) {
            return Ok(re.clone());
        }

        // Evict all if at capacity (simple but effective for batch workloads)
        if cache.len() >= MAX_CACHE_ENTRIES {
            cache.clear();
        }

        let compiled = Regex::new(pattern).map_err(|e| RewriteError::InvalidPattern {
            message: e.to_string(),
        })?;
        cache.insert(pattern.to_string(), compiled.clone());
        Ok(compiled)
    })
}

/// Clear the pattern cache (mainly for testing).
pub fn clear_cache() {
    PATTERN_CACHE.with(|cache| {
        cache.borrow_mut().clear();
    });
}

/// Get cache statistics for monitoring.
pub fn cache_size() -> usize {
    PATTERN_CACHE.with(|cache| cache.borrow().len())
}
