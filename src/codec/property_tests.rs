//! Property tests for the codec module
//!
//! Leaf and tree round trips over forms reachable through the editor, and
//! canonicalization of interleaved stored trees.

use once_cell::sync::Lazy;
use proptest::prelude::*;

use crate::catalogue::{default_config, AttributeConfig, Catalogue, ValueKind};
use crate::codec::{decode_condition, encode_condition, fold_query, unfold_query};
use crate::form::{FieldValue, FlatCondition, FlatGroup};
use crate::query::{
    Action, Combinator, Group, ItemValue, Node, QueryTree, AGE_OPERATORS, DEFAULT_OPERATORS,
};

static CATALOGUE: Lazy<Catalogue> = Lazy::new(|| {
    let mut config = default_config();
    config
        .attributes
        .push(AttributeConfig::new("Tags", ValueKind::MultiSelect));
    Catalogue::from_config(&config).expect("test catalogue is valid")
});

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

fn word_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// Scalar payloads; floats are left out so equality stays exact
fn scalar_strategy() -> impl Strategy<Value = ItemValue> {
    prop_oneof![
        word_strategy().prop_map(ItemValue::Text),
        (0i64..100_000).prop_map(ItemValue::Integer),
    ]
}

fn combinator_strategy() -> impl Strategy<Value = Combinator> {
    prop::sample::select(Combinator::ALL.to_vec())
}

fn contain_strategy() -> impl Strategy<Value = Action> {
    prop::sample::select(DEFAULT_OPERATORS.to_vec())
}

fn age_strategy() -> impl Strategy<Value = Option<u32>> {
    prop::option::of(1u32..=150)
}

/// Appointment fields, the terminal options of a two-level drill-down
fn appointment_field_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Appointment Date", "Appointment ID", "Doctor Name", "Call Type"])
        .prop_map(str::to_string)
}

fn channel_field_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Date & Time", "Content", "Status"]).prop_map(str::to_string)
}

/// Leaves in one of the three depth patterns, with or without a payload
fn reachable_leaf_strategy() -> BoxedStrategy<FlatCondition> {
    let status = (contain_strategy(), prop::option::of(scalar_strategy())).prop_map(
        |(contain, value)| FlatCondition {
            query_attribute: Some("Status".to_string()),
            query_contain: Some(contain),
            query_value: value.map(FieldValue::Scalar),
            ..Default::default()
        },
    );

    let tags = (contain_strategy(), prop::collection::vec(scalar_strategy(), 1..4)).prop_map(
        |(contain, items)| FlatCondition {
            query_attribute: Some("Tags".to_string()),
            query_contain: Some(contain),
            query_value: Some(FieldValue::List(items)),
            ..Default::default()
        },
    );

    let two_levels = (appointment_field_strategy(), contain_strategy(), scalar_strategy())
        .prop_map(|(value, contain, sub_value)| FlatCondition {
            query_attribute: Some("Appointment".to_string()),
            query_contain: Some(contain),
            query_value: Some(FieldValue::text(value)),
            query_sub_value: Some(FieldValue::Scalar(sub_value)),
            ..Default::default()
        });

    let three_levels = (
        prop::sample::select(vec!["Whatsapp", "SMS", "Email"]),
        channel_field_strategy(),
        contain_strategy(),
        scalar_strategy(),
    )
        .prop_map(|(channel, field, contain, final_value)| FlatCondition {
            query_attribute: Some("Communication".to_string()),
            query_contain: Some(contain),
            query_value: Some(FieldValue::text(channel)),
            query_sub_value: Some(FieldValue::text(field)),
            query_final_value: Some(FieldValue::Scalar(final_value)),
            ..Default::default()
        });

    let age = (
        prop::sample::select(AGE_OPERATORS.to_vec()),
        age_strategy(),
        age_strategy(),
    )
        .prop_map(|(contain, min_age, max_age)| FlatCondition {
            query_attribute: Some("Profile holder age".to_string()),
            query_contain: Some(contain),
            min_age,
            max_age,
            ..Default::default()
        });

    prop_oneof![status, tags, two_levels, three_levels, age].boxed()
}

fn flat_group_strategy() -> impl Strategy<Value = FlatGroup> {
    let leaves = || prop::collection::vec(reachable_leaf_strategy(), 0..4);
    let base = (combinator_strategy(), leaves()).prop_map(|(query_type, condition)| FlatGroup {
        query_type: Some(query_type),
        condition,
        nested_condition: Vec::new(),
    });
    base.prop_recursive(3, 32, 3, move |inner| {
        (
            combinator_strategy(),
            leaves(),
            prop::collection::vec(inner, 0..3),
        )
            .prop_map(|(query_type, condition, nested_condition)| FlatGroup {
                query_type: Some(query_type),
                condition,
                nested_condition,
            })
    })
}

/// Stored groups whose leaves and nested groups are freely interleaved
fn interleaved_group_strategy() -> impl Strategy<Value = Group> {
    let leaf = || {
        reachable_leaf_strategy().prop_map(|flat| {
            Node::Leaf(encode_condition(&flat).expect("reachable leaves encode"))
        })
    };
    let base = (combinator_strategy(), prop::collection::vec(leaf(), 0..4))
        .prop_map(|(query_type, condition)| Group { query_type: Some(query_type), condition });
    base.prop_recursive(3, 32, 4, move |inner| {
        (
            combinator_strategy(),
            prop::collection::vec(prop_oneof![leaf(), inner.prop_map(Node::Group)], 0..5),
        )
            .prop_map(|(query_type, condition)| Group { query_type: Some(query_type), condition })
    })
}

/// Leaves first, then groups, at every level
fn canonicalize(nodes: &[Node]) -> Vec<Node> {
    let leaves = nodes.iter().filter(|node| !node.is_group()).cloned();
    let groups = nodes.iter().filter_map(Node::as_group).map(|group| {
        Node::Group(Group {
            query_type: group.query_type,
            condition: canonicalize(&group.condition),
        })
    });
    leaves.chain(groups).collect()
}

fn tree_of(group: Group, query_id: u64) -> QueryTree {
    QueryTree {
        query_id,
        query_type: group.query_type,
        condition: group.condition,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Decoding an encoded reachable leaf gives back the same leaf
    #[test]
    fn prop_leaf_round_trip(leaf in reachable_leaf_strategy()) {
        let encoded = encode_condition(&leaf).expect("reachable leaves encode");
        prop_assert_eq!(decode_condition(&encoded, &CATALOGUE), leaf);
    }

    /// The title has one segment per populated attribute-chain field above the payload
    #[test]
    fn prop_title_depth(leaf in reachable_leaf_strategy()) {
        let encoded = encode_condition(&leaf).expect("reachable leaves encode");
        let expected = if leaf.query_final_value.is_some() {
            3
        } else if leaf.query_sub_value.is_some() {
            2
        } else {
            1
        };
        prop_assert_eq!(encoded.segments().len(), expected);
    }

    /// Unfolding a folded form gives back the form
    #[test]
    fn prop_form_round_trip(form in flat_group_strategy(), query_id in 1u64..1000) {
        let tree = fold_query(&form, query_id).expect("generated forms are complete");
        prop_assert_eq!(tree.query_id, query_id);
        prop_assert_eq!(tree.node_count(), form.node_count());
        prop_assert_eq!(unfold_query(&tree, &CATALOGUE), form);
    }

    /// A folded tree survives unfold then fold unchanged
    #[test]
    fn prop_tree_round_trip(form in flat_group_strategy()) {
        let tree = fold_query(&form, 1).expect("generated forms are complete");
        let again = fold_query(&unfold_query(&tree, &CATALOGUE), 1).expect("unfolded forms are complete");
        prop_assert_eq!(again, tree);
    }

    /// Interleaved stored trees come back with leaves before groups, and only once
    #[test]
    fn prop_canonicalization_idempotent(group in interleaved_group_strategy()) {
        let stored = tree_of(group, 1);
        let once = fold_query(&unfold_query(&stored, &CATALOGUE), 1).expect("unfolded forms are complete");
        prop_assert_eq!(&once.condition, &canonicalize(&stored.condition));
        prop_assert_eq!(once.node_count(), stored.node_count());

        let twice = fold_query(&unfold_query(&once, &CATALOGUE), 1).expect("unfolded forms are complete");
        prop_assert_eq!(twice, once);
    }

    /// Folded trees read back from their JSON text
    #[test]
    fn prop_tree_json(form in flat_group_strategy()) {
        let tree = fold_query(&form, 1).expect("generated forms are complete");
        let json = tree.to_json().expect("trees serialize");
        prop_assert_eq!(QueryTree::from_json_str(&json).expect("trees deserialize"), tree);
    }
}
