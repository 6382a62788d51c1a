use crate::rewrite::{IdiomMatcher, Occurrence, RewriteError};
use crate::rules::RewriteRule;

/// The collection-reconstruction idiom emitted by the generator:
///
/// ```text
/// return Object.keys(data).map(key => ({
///   id: key,
///   ...data[key]
/// }));
/// ```
///
/// Every item's `id` field is overwritten with the storage key it happens to
/// be filed under, clobbering any explicit id stored on the record itself.
const RECONSTRUCTION_IDIOM: &str = r"return\s+Object\.keys\(\s*(?P<data>\w+)\s*\)\s*\.map\(\s*\(?\s*(?P<key>\w+)\s*\)?\s*=>\s*\(\s*\{\s*(?P<field>\w+)\s*:\s*(?P<value>\w+)\s*,\s*\.\.\.\s*(?P<spread>\w+)\[\s*(?P<index>\w+)\s*\]\s*,?\s*\}\s*\)\s*\)\s*;";

/// Rewrites keyed-collection rebuilds so a stored `id` field wins over the
/// storage key. The synthesized code keeps an item untouched when it already
/// carries a truthy `id`, and falls back to the iteration key otherwise —
/// the key becomes a fallback instead of an unconditional overwrite.
pub struct PreserveStoredId;

impl RewriteRule for PreserveStoredId {
    fn name(&self) -> &'static str {
        "preserve-stored-id"
    }

    fn description(&self) -> &'static str {
        "keep a stored id field instead of overwriting it with the storage key"
    }

    fn scan(&self, source: &str) -> Result<Vec<Occurrence>, RewriteError> {
        IdiomMatcher::new(RECONSTRUCTION_IDIOM).find_all(source)
    }

    fn replacement(&self, occ: &Occurrence) -> Option<String> {
        let data = occ.capture("data")?;
        let key = occ.capture("key")?;

        // The text matcher cannot express backreferences, so the idiom's
        // equality constraints are enforced here: the overwritten field must
        // be `id`, its value must be the iteration key verbatim, and the
        // spread must pull the value for that key out of the same mapping.
        if occ.capture("field")? != "id" {
            return None;
        }
        if occ.capture("value")? != key {
            return None;
        }
        if occ.capture("spread")? != data {
            return None;
        }
        if occ.capture("index")? != key {
            return None;
        }

        Some(format!(
            "return Object.keys({data}).map({key} => {{\n        \
             const item = {data}[{key}];\n        \
             // Preserve the original 'id' field if it exists, otherwise fall back to the storage key\n        \
             return item.id ? item : {{ id: {key}, ...item }};\n      \
             }});"
        ))
    }
}
