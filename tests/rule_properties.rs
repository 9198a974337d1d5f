//! Property tests over synthesized rules and their classification

use std::collections::BTreeSet;

use proptest::prelude::*;

use mutation_config_rust::{
    decode_rule_name, ClassPath, Granularity, Op, OperatorClassifier, RuleSet, RuleSynthesizer,
    Settings, Taxonomy, TaxonomyError,
};

fn standard_rules() -> (Taxonomy, RuleSet) {
    let taxonomy = Taxonomy::standard().unwrap();
    let rules = RuleSynthesizer::new(&taxonomy).synthesize().unwrap();
    (taxonomy, rules)
}

fn split_class(class: &str) -> (ClassPath, ClassPath) {
    let (m, r) = class.split_once('!').unwrap();
    (ClassPath::parse(m).unwrap(), ClassPath::parse(r).unwrap())
}

#[test]
fn every_rule_decodes_to_its_own_operators() {
    let (_, rules) = standard_rules();
    for (key, rule) in rules.rules() {
        let decoded = decode_rule_name(rule.name.as_str()).unwrap();
        assert_eq!(decoded.matcher, key.matcher, "{}", rule.name);
        assert_eq!(decoded.replacer, rule.replacer, "{}", rule.name);
        assert_eq!(decoded.matcher_operands.len(), key.operands.len(), "{}", rule.name);
        assert_eq!(decoded.replacer_operands.len(), rule.operands.len(), "{}", rule.name);
    }
}

#[test]
fn every_rule_is_allowed_by_the_taxonomy() {
    let (taxonomy, rules) = standard_rules();
    for (key, rule) in rules.rules() {
        assert!(taxonomy.allows(key.matcher, rule.replacer), "{}", rule.name);
    }
}

#[test]
fn coarser_levels_are_prefixes_of_finer_ones() {
    let (taxonomy, rules) = standard_rules();
    let classifier = OperatorClassifier::new(&taxonomy);
    let levels = [
        Granularity::Category,
        Granularity::Group,
        Granularity::Operator,
        Granularity::OperatorSwap,
    ];

    for (_, rule) in rules.rules() {
        let paths: Vec<(ClassPath, ClassPath)> = levels
            .iter()
            .map(|&g| split_class(&classifier.class_of(rule.name.as_str(), g).unwrap()))
            .collect();
        for pair in paths.windows(2) {
            assert!(pair[1].0.starts_with(&pair[0].0), "{}", rule.name);
            assert!(pair[1].1.starts_with(&pair[0].1), "{}", rule.name);
        }
    }
}

#[test]
fn swapped_rules_only_come_from_binary_pairs() {
    let (taxonomy, rules) = standard_rules();
    let classifier = OperatorClassifier::new(&taxonomy);
    let mut swapped = 0;
    for (key, rule) in rules.rules() {
        let decoded = classifier.decode(rule.name.as_str()).unwrap();
        if decoded.is_swapped() {
            swapped += 1;
            assert_eq!(key.operands.len(), 2);
            assert!(!taxonomy.is_commutative(rule.replacer), "{}", rule.name);
        }
    }
    assert!(swapped > 0);
}

#[test]
fn commutative_replacers_get_one_orientation_per_slot_pair() {
    let (taxonomy, rules) = standard_rules();
    let mut seen = BTreeSet::new();
    for (key, rule) in rules.rules() {
        // literal-parameterized rules (C --> ADD(C, k)) carry no slot pair
        let slotted = rule.operands.iter().all(|o| o.slot.is_some());
        if rule.operands.len() != 2 || !slotted || !taxonomy.is_commutative(rule.replacer) {
            continue;
        }
        let mut slots: Vec<Option<usize>> = rule.operands.iter().map(|o| o.slot).collect();
        slots.sort();
        assert!(
            seen.insert((key.to_string(), rule.replacer, slots)),
            "both orientations emitted: {}",
            rule.name
        );
    }
}

#[test]
fn constant_offsets_are_distinct_rules() {
    let (_, rules) = standard_rules();
    let offsets: Vec<&str> = rules
        .groups_for(Op::ArithConst)
        .flat_map(|g| g.rules.iter())
        .filter(|r| r.replacer == Op::Add)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(offsets, vec!["C!ADD$C$-1$", "C!ADD$C$1$"]);
}

fn literal_list(pattern: &'static str) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(pattern, 1..4)
}

proptest! {
    #[test]
    fn valid_settings_always_synthesize(
        scalar_constants in literal_list("-?[1-9][0-9]{0,2}"),
        shuffle_counters in literal_list("[2-9]"),
        case_remove_counters in literal_list("[1-9]"),
        callee_names in literal_list("[a-z_]{1,10}"),
    ) {
        let settings = Settings {
            scalar_constants,
            shuffle_counters,
            case_remove_counters,
            callee_names: callee_names.clone(),
        };
        let taxonomy = Taxonomy::build(&settings).unwrap();
        let rules = RuleSynthesizer::new(&taxonomy).synthesize().unwrap();

        let names: BTreeSet<&str> = rules.rules().map(|(_, r)| r.name.as_str()).collect();
        prop_assert_eq!(names.len(), rules.rule_count());

        let callees: BTreeSet<&String> = callee_names.iter().collect();
        for matched in &callees {
            for replacement in callees.iter().filter(|c| *c != matched) {
                let name = format!("CALL!NEWCALLEE${}${}$", matched, replacement);
                prop_assert!(rules.find(&name).is_some(), "missing {}", name);
            }
        }
        let callee_rules = rules.rules().filter(|(_, r)| r.replacer == Op::NewCallee).count();
        prop_assert_eq!(callee_rules, callees.len() * (callees.len() - 1));
    }

    #[test]
    fn reserved_characters_are_rejected(
        prefix in "[a-z]{0,4}",
        reserved in prop::sample::select(vec![',', '(', ')', '$', '!']),
        suffix in "[a-z]{0,4}",
    ) {
        let settings = Settings {
            callee_names: vec![format!("{prefix}{reserved}{suffix}")],
            ..Settings::default()
        };
        let is_invalid_literal = matches!(
            Taxonomy::build(&settings),
            Err(TaxonomyError::InvalidLiteral { .. })
        );
        prop_assert!(is_invalid_literal);
    }

    #[test]
    fn exact_level_returns_the_name(index in 0usize..10_000) {
        let (taxonomy, rules) = standard_rules();
        let classifier = OperatorClassifier::new(&taxonomy);
        let (_, rule) = rules.rules().nth(index % rules.rule_count()).unwrap();
        let class = classifier.class_of(rule.name.as_str(), Granularity::Exact).unwrap();
        prop_assert_eq!(class.as_str(), rule.name.as_str());
    }
}
