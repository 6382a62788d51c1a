//! End-to-end scenarios over a realistic generated service module.

use record_patcher::{apply_rule, builtin_rules, rewrite_source, rules};

/// A representative slice of the generated module both rules target: two
/// fetch functions with the key-overwrite idiom, two update functions with
/// the partial-write idiom, a lookalike update that destructures without the
/// id, and unrelated code that must come through byte-for-byte.
const SERVICE_MODULE: &str = r#"import { ref, get, update, set } from 'firebase/database';
import { database } from './firebaseConfig';

export async function fetchSites(): Promise<Site[]> {
  try {
    const snapshot = await get(ref(database, 'sites'));
    if (snapshot.exists()) {
      const data = snapshot.val();
      return Object.keys(data).map(key => ({
        id: key,
        ...data[key]
      }));
    }
    return [];
  } catch (error) {
    console.error('Error fetching sites:', error);
    return [];
  }
}

export async function fetchFarmers(): Promise<Farmer[]> {
  try {
    const snapshot = await get(ref(database, 'farmers'));
    if (snapshot.exists()) {
      const data = snapshot.val();
      return Object.keys(data).map(key => ({
        id: key,
        ...data[key]
      }));
    }
    return [];
  } catch (error) {
    console.error('Error fetching farmers:', error);
    return [];
  }
}

export async function updateSite(site: Site): Promise<Site | null> {
  try {
    const { id, ...updates } = site;
    const siteRef = ref(database, `sites/${id}`);
    await update(siteRef, updates);
    return site;
  } catch (error) {
    console.error('Error updating site:', error);
    return null;
  }
}

export async function updateFarmer(farmer: Farmer): Promise<Farmer | null> {
  try {
    const { id, ...updates } = farmer;
    const farmerRef = ref(database, `farmers/${id}`);
    await update(farmerRef, updates);
    return farmer;
  } catch (error) {
    console.error('Error updating farmer:', error);
    return null;
  }
}

export async function updateSettings(settings: Settings): Promise<Settings | null> {
  try {
    const { theme, ...updates } = settings;
    const settingsRef = ref(database, `settings/${theme}`);
    await update(settingsRef, updates);
    return settings;
  } catch (error) {
    return null;
  }
}

export function siteCount(sites: Site[]): number {
  return sites.length;
}
"#;

fn fetch_rule() -> rules::PreserveStoredId {
    rules::PreserveStoredId
}

fn update_rule() -> rules::WriteFullObject {
    rules::WriteFullObject
}

#[test]
fn single_fetch_idiom_is_rewritten_to_conditional_form() {
    let source = r#"return Object.keys(data).map(key => ({
        id: key,
        ...data[key]
      }));"#;

    let result = apply_rule(source, &fetch_rule()).unwrap();

    assert_eq!(result.rewritten, 1);
    assert!(result.text.contains("const item = data[key];"));
    assert!(result
        .text
        .contains("return item.id ? item : { id: key, ...item };"));
}

#[test]
fn source_without_update_idiom_is_unchanged() {
    let source = "export function siteCount(sites: Site[]): number {\n  return sites.length;\n}\n";

    let result = apply_rule(source, &update_rule()).unwrap();

    assert_eq!(result.rewritten, 0);
    assert_eq!(result.skipped, 0);
    assert_eq!(result.text, source);
}

#[test]
fn each_update_function_references_its_own_parameter() {
    let result = apply_rule(SERVICE_MODULE, &update_rule()).unwrap();

    assert_eq!(result.rewritten, 2);
    assert!(result.text.contains("await set(siteRef, site);"));
    assert!(result.text.contains("await set(farmerRef, farmer);"));
}

#[test]
fn lookalike_without_identifier_destructure_is_skipped() {
    let result = apply_rule(SERVICE_MODULE, &update_rule()).unwrap();

    assert_eq!(result.skipped, 1);
    // The skipped span is untouched
    assert!(result
        .text
        .contains("const { theme, ...updates } = settings;"));
    assert!(result.text.contains("await update(settingsRef, updates);"));
}

#[test]
fn full_pipeline_counts_per_rule() {
    let rules = builtin_rules();
    let (text, passes) = rewrite_source(SERVICE_MODULE, &rules).unwrap();

    assert_eq!(passes.len(), 2);
    assert_eq!(passes[0].rule, "preserve-stored-id");
    assert_eq!(passes[0].rewritten, 2);
    assert_eq!(passes[0].skipped, 0);
    assert_eq!(passes[1].rule, "write-full-object");
    assert_eq!(passes[1].rewritten, 2);
    assert_eq!(passes[1].skipped, 1);

    assert!(text.contains("item.id ? item"));
    assert!(text.contains("await set(siteRef, site);"));
}

#[test]
fn text_outside_matched_spans_survives_byte_for_byte() {
    let rules = builtin_rules();
    let (text, _) = rewrite_source(SERVICE_MODULE, &rules).unwrap();

    // Leading imports, error handlers, the lookalike function, and the
    // trailing helper are all outside every matched span.
    assert!(text.starts_with(
        "import { ref, get, update, set } from 'firebase/database';\nimport { database } from './firebaseConfig';"
    ));
    assert!(text.contains("console.error('Error fetching sites:', error);"));
    assert!(text.contains("console.error('Error updating farmer:', error);"));
    assert!(text.contains("const { theme, ...updates } = settings;"));
    assert!(text.ends_with(
        "export function siteCount(sites: Site[]): number {\n  return sites.length;\n}\n"
    ));
}

#[test]
fn full_pipeline_is_idempotent() {
    let rules = builtin_rules();
    let (once, _) = rewrite_source(SERVICE_MODULE, &rules).unwrap();
    let (twice, passes) = rewrite_source(&once, &rules).unwrap();

    assert_eq!(twice, once);
    for pass in passes {
        assert_eq!(pass.rewritten, 0, "pass {} found work twice", pass.rule);
    }
}

#[test]
fn key_interpolation_moves_to_the_parameter() {
    let (text, _) = rewrite_source(SERVICE_MODULE, &builtin_rules()).unwrap();

    assert!(text.contains("const siteRef = ref(database, `sites/${site.id}`);"));
    assert!(text.contains("const farmerRef = ref(database, `farmers/${farmer.id}`);"));
}
