//! Property-based tests for survivor ordering
//!
//! Permuting the input declarations must not change the selected sequence,
//! which is always sorted by the private naming form.

use proptest::prelude::*;
use restgen_generation::{private_name, SourcePackage, TagFilter, TypeDeclaration, TypeName};

const API: &str = "github.com/acme/apis/ecs/v1";

fn declaration(name: &str, generate: bool) -> TypeDeclaration {
    let tag = if generate { "+genclient" } else { "+genclient=false" };
    TypeDeclaration::new(TypeName::new(API, name)).with_comment_lines(["Doc comment.", tag])
}

/// Distinct names, each with a generate flag, in a shuffled order
fn shuffled_declarations() -> impl Strategy<Value = (Vec<(String, bool)>, Vec<(String, bool)>)> {
    prop::collection::btree_map("[A-Za-z][a-zA-Z0-9]{0,8}", any::<bool>(), 0..10)
        .prop_flat_map(|entries| {
            let original: Vec<(String, bool)> = entries.into_iter().collect();
            (Just(original.clone()), Just(original).prop_shuffle())
        })
}

fn selected_names(entries: &[(String, bool)]) -> Vec<String> {
    let package = entries
        .iter()
        .fold(SourcePackage::new(API), |p, (name, generate)| {
            p.with_type(declaration(name, *generate))
        });
    TagFilter::new()
        .select(&package)
        .unwrap()
        .into_iter()
        .map(|t| t.base_name().to_string())
        .collect()
}

proptest! {
    #[test]
    fn prop_order_is_independent_of_input_order((original, shuffled) in shuffled_declarations()) {
        prop_assert_eq!(selected_names(&original), selected_names(&shuffled));
    }

    #[test]
    fn prop_order_is_sorted_by_private_name((original, _) in shuffled_declarations()) {
        let selected = selected_names(&original);
        let keys: Vec<String> = selected.iter().map(|n| private_name(n)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }

    #[test]
    fn prop_only_generate_enabled_types_survive((original, _) in shuffled_declarations()) {
        let selected = selected_names(&original);
        let expected = original.iter().filter(|(_, generate)| *generate).count();
        prop_assert_eq!(selected.len(), expected);
    }
}
