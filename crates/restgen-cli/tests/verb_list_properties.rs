//! Property-based tests for --required-verbs parsing

use proptest::prelude::*;
use restgen_cli::commands::parse_verbs;
use restgen_generation::Verb;

fn verb_strategy() -> impl Strategy<Value = Verb> {
    prop::sample::select(Verb::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_parse_keeps_first_occurrence_order(verbs in prop::collection::vec(verb_strategy(), 0..10)) {
        let list = verbs.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(",");
        let mut expected: Vec<Verb> = Vec::new();
        for verb in &verbs {
            if !expected.contains(verb) {
                expected.push(*verb);
            }
        }
        prop_assert_eq!(parse_verbs(&list).unwrap(), expected);
    }

    #[test]
    fn prop_whitespace_around_verbs_is_ignored(
        verbs in prop::collection::vec(verb_strategy(), 1..5),
        pad in " {0,3}",
    ) {
        let plain = verbs.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(",");
        let padded = verbs
            .iter()
            .map(|v| format!("{}{}{}", pad, v.as_str(), pad))
            .collect::<Vec<_>>()
            .join(",");
        prop_assert_eq!(parse_verbs(&plain).unwrap(), parse_verbs(&padded).unwrap());
    }
}
