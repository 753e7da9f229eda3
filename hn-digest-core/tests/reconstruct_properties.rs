//! Property-based tests for thread reconstruction.

use hn_digest_core::thread::{reconstruct, CommentNode, CommentRecord, ReconstructPolicy};
use proptest::prelude::*;

const MAX_TEST_DEPTH: u32 = 6;
const MAX_TEST_RECORDS: usize = 60;
const MAX_TEST_CAP: usize = 6;

fn record_strategy() -> impl Strategy<Value = CommentRecord> {
    (
        0..MAX_TEST_DEPTH,
        proptest::option::of("[a-z]{0,6}"),
        "[a-z ]{0,12}",
    )
        .prop_map(|(depth, author, text)| CommentRecord {
            depth,
            author,
            text,
        })
}

fn policy_strategy() -> impl Strategy<Value = ReconstructPolicy> {
    (
        1..=MAX_TEST_CAP,
        proptest::collection::btree_set(0..MAX_TEST_DEPTH, 0..4),
    )
        .prop_map(|(cap, depths)| {
            ReconstructPolicy::new(cap, depths).expect("cap is positive")
        })
}

fn max_breadth(nodes: &[CommentNode]) -> usize {
    nodes
        .iter()
        .map(|n| n.replies.len().max(max_breadth(&n.replies)))
        .max()
        .unwrap_or(0)
        .max(nodes.len())
}

fn max_depth(nodes: &[CommentNode]) -> Option<u32> {
    nodes
        .iter()
        .map(|n| max_depth(&n.replies).unwrap_or(n.depth).max(n.depth))
        .max()
}

/// Every child sits exactly one level below its parent.
fn depths_are_consistent(nodes: &[CommentNode], expected: u32) -> bool {
    nodes
        .iter()
        .all(|n| n.depth == expected && depths_are_consistent(&n.replies, expected + 1))
}

fn flatten<'a>(nodes: &'a [CommentNode], out: &mut Vec<&'a CommentNode>) {
    for n in nodes {
        out.push(n);
        flatten(&n.replies, out);
    }
}

proptest! {
    #[test]
    fn prop_breadth_never_exceeds_cap(
        records in proptest::collection::vec(record_strategy(), 0..MAX_TEST_RECORDS),
        policy in policy_strategy(),
    ) {
        let roots = reconstruct(records, &policy);
        prop_assert!(max_breadth(&roots) <= policy.max_children());
    }

    #[test]
    fn prop_default_policy_keeps_at_most_two_levels(
        records in proptest::collection::vec(record_strategy(), 0..MAX_TEST_RECORDS),
    ) {
        let roots = reconstruct(records, &ReconstructPolicy::default());
        prop_assert!(max_depth(&roots).unwrap_or(0) <= 1);
    }

    #[test]
    fn prop_tree_shape_follows_input_order(
        records in proptest::collection::vec(record_strategy(), 0..MAX_TEST_RECORDS),
        policy in policy_strategy(),
    ) {
        let roots = reconstruct(records.clone(), &policy);
        prop_assert!(depths_are_consistent(&roots, 0));

        // Pre-order traversal of the tree is a subsequence of the input.
        let mut kept = Vec::new();
        flatten(&roots, &mut kept);
        let mut input = records.iter();
        for node in kept {
            let found = input.any(|r| {
                r.depth == node.depth && r.author == node.author && r.text == node.text
            });
            prop_assert!(found, "kept node {:?} out of input order", node.text);
        }
    }

    #[test]
    fn prop_reconstruct_is_idempotent(
        records in proptest::collection::vec(record_strategy(), 0..MAX_TEST_RECORDS),
        policy in policy_strategy(),
    ) {
        prop_assert_eq!(
            reconstruct(records.clone(), &policy),
            reconstruct(records, &policy)
        );
    }

    #[test]
    fn prop_roots_are_a_prefix_of_top_level_records(
        records in proptest::collection::vec(record_strategy(), 0..MAX_TEST_RECORDS),
        policy in policy_strategy(),
    ) {
        let expected: Vec<String> = records
            .iter()
            .filter(|r| r.depth == 0)
            .take(policy.max_children())
            .map(|r| r.text.clone())
            .collect();
        let roots = reconstruct(records, &policy);
        let actual: Vec<String> = roots.into_iter().map(|r| r.text).collect();
        prop_assert_eq!(actual, expected);
    }
}
