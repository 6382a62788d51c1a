//! Property-based tests for the rewrite engine.

use proptest::prelude::*;
use record_patcher::{apply_rule, builtin_rules, rewrite_source};

proptest! {
    /// Text that cannot contain either idiom comes back byte-for-byte
    /// unchanged with zero counts. The alphabet deliberately excludes the
    /// punctuation every pattern requires.
    #[test]
    fn idiom_free_text_is_returned_unchanged(text in "[A-Za-z0-9_ \n]{0,200}") {
        for rule in builtin_rules() {
            let result = apply_rule(&text, rule.as_ref()).unwrap();
            prop_assert_eq!(&result.text, &text);
            prop_assert_eq!(result.rewritten, 0);
            prop_assert_eq!(result.skipped, 0);
        }
    }

    /// The collection-reconstruction rewrite is idempotent for any pair of
    /// mapping/key identifiers.
    #[test]
    fn fetch_rewrite_is_idempotent(
        data in "[a-z][a-z0-9]{2,7}",
        key in "[a-z][a-z0-9]{2,7}",
    ) {
        prop_assume!(data != key);
        let source = format!(
            "return Object.keys({data}).map({key} => ({{\n        id: {key},\n        ...{data}[{key}]\n      }}));\n"
        );

        let rules = builtin_rules();
        let (once, first) = rewrite_source(&source, &rules).unwrap();
        prop_assert_eq!(first[0].rewritten, 1);

        let (twice, second) = rewrite_source(&once, &rules).unwrap();
        prop_assert_eq!(&twice, &once);
        for pass in second {
            prop_assert_eq!(pass.rewritten, 0);
        }
    }

    /// The full-object-write rewrite is idempotent and always references the
    /// generated function's own parameter name.
    #[test]
    fn update_rewrite_is_idempotent_and_capture_faithful(
        entity in "[A-Z][a-z]{2,8}",
        param in "[a-z]{3,8}",
    ) {
        let source = format!(
            "export async function update{entity}({param}: {entity}): Promise<{entity} | null> {{\n  \
             try {{\n    \
             const {{ id, ...updates }} = {param};\n    \
             const {param}Ref = ref(database, `items/${{id}}`);\n    \
             await update({param}Ref, updates);\n    \
             return {param};\n  \
             }} catch (error) {{\n    \
             return null;\n  \
             }}\n}}\n"
        );

        let rules = builtin_rules();
        let (once, first) = rewrite_source(&source, &rules).unwrap();
        prop_assert_eq!(first[1].rewritten, 1);
        let expected_set = format!("await set({param}Ref, {param});");
        let expected_path = format!("`items/${{{param}.id}}`");
        prop_assert!(once.contains(&expected_set));
        prop_assert!(once.contains(&expected_path));

        let (twice, second) = rewrite_source(&once, &rules).unwrap();
        prop_assert_eq!(&twice, &once);
        for pass in second {
            prop_assert_eq!(pass.rewritten, 0);
        }
    }
}
