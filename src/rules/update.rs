use crate::rewrite::{IdiomMatcher, Occurrence, RewriteError};
use crate::rules::RewriteRule;

/// The partial-update idiom emitted by the generator:
///
/// ```text
/// export async function updateSite(site: Site): Promise<Site | null> {
///   try {
///     const { id, ...updates } = site;
///     const siteRef = ref(database, `sites/${id}`);
///     await update(siteRef, updates);
/// ```
///
/// `update()` merges only the destructured remainder into the stored record,
/// so any field absent from the partial object silently keeps its old stored
/// value.
const PARTIAL_UPDATE_IDIOM: &str = r"(?P<head>export\s+async\s+function\s+update\w+\s*\(\s*(?P<param>\w+)\s*:\s*(?P<ptype>\w+)\s*\)\s*:\s*Promise\s*<\s*(?P<rtype>\w+)\s*\|\s*null\s*>\s*\{\s*try\s*\{\s*)const\s*\{\s*(?P<bindings>[^}]*)\}\s*=\s*(?P<destructured>\w+)\s*;\s*(?P<refdecl>const\s+(?P<refname>\w+)\s*=\s*ref\(\s*database\s*,\s*`[^`]*`\s*\)\s*;)\s*await\s+update\(\s*(?P<refarg>\w+)\s*,\s*(?P<updatearg>\w+)\s*\)\s*;";

/// Rewrites partial merge-updates into full-object replacement writes.
///
/// The destructuring of `id` away from the parameter is dropped and the
/// partial `update()` becomes a `set()` of the complete parameter object, so
/// the stored record always exactly equals the object the caller presented.
pub struct WriteFullObject;

impl RewriteRule for WriteFullObject {
    fn name(&self) -> &'static str {
        "write-full-object"
    }

    fn description(&self) -> &'static str {
        "replace partial merge-updates with full-object replacement writes"
    }

    fn scan(&self, source: &str) -> Result<Vec<Occurrence>, RewriteError> {
        IdiomMatcher::new(PARTIAL_UPDATE_IDIOM).find_all(source)
    }

    fn replacement(&self, occ: &Occurrence) -> Option<String> {
        let head = occ.capture("head")?;
        let param = occ.capture("param")?;
        let refdecl = occ.capture("refdecl")?;
        let refname = occ.capture("refname")?;

        // Consistency constraints the coarse pattern cannot express. Any
        // mismatch means the candidate is not the generated idiom, and a
        // synthesized replacement could change behavior - skip the span.
        if occ.capture("rtype")? != occ.capture("ptype")? {
            return None;
        }
        if occ.capture("destructured")? != param {
            return None;
        }
        let rest = rest_binding(occ.capture("bindings")?)?;
        if occ.capture("refarg")? != refname {
            return None;
        }
        if occ.capture("updatearg")? != rest {
            return None;
        }

        // With the destructuring gone, a key template interpolating the bare
        // `id` binding must read it off the parameter instead.
        let refdecl = refdecl.replace("${id}", &format!("${{{param}.id}}"));

        Some(format!(
            "{head}{refdecl}\n    \
             // Store the complete object including the id\n    \
             await set({refname}, {param});"
        ))
    }
}

/// Accept exactly `id` plus one rest binding, returning the rest name.
///
/// Anything else - the identifier missing, extra fields pulled out, a bare
/// rest with no `id` - is not the generated idiom.
fn rest_binding(bindings: &str) -> Option<&str> {
    let parts: Vec<&str> = bindings.split(',').map(str::trim).collect();
    match parts.as_slice() {
        ["id", rest] => rest.strip_prefix("...").filter(|name| !name.is_empty()),
        _ => None,
    }
}
