#![allow(dead_code)]

use alloctrie::{Entries, FrameNode, TrieBuilder};
use proptest::prelude::*;

/// `common` with two leaves of 30 and 40 bytes.
pub fn split_tree(common_direct: u64) -> Entries {
    Entries::from([(
        "common".to_string(),
        FrameNode::with_children(
            common_direct,
            [("leaf1", FrameNode::leaf(30)), ("leaf2", FrameNode::leaf(40))],
        ),
    )])
}

/// Every node of the forest, without recursing.
pub fn all_nodes(entries: &Entries) -> Vec<&FrameNode> {
    let mut nodes = Vec::new();
    let mut pending: Vec<&FrameNode> = entries.values().collect();
    while let Some(node) = pending.pop() {
        nodes.push(node);
        pending.extend(node.children().values());
    }
    nodes
}

pub fn address(node: &FrameNode) -> usize {
    node as *const FrameNode as usize
}

pub fn sorted_addresses<'a>(nodes: impl IntoIterator<Item = &'a FrameNode>) -> Vec<usize> {
    let mut addresses: Vec<_> = nodes.into_iter().map(address).collect();
    addresses.sort_unstable();
    addresses
}

/// Random forests built from stack samples over a small frame alphabet, so
/// samples share prefixes.
pub fn arb_entries() -> impl Strategy<Value = Entries> {
    let frame = prop::sample::select(vec!["a", "b", "c", "d", "e"]);
    let stack = prop::collection::vec(frame, 1..8);
    prop::collection::vec((stack, 0u64..4096), 0..24).prop_map(|samples| {
        let mut builder = TrieBuilder::new();
        for (stack, bytes) in samples {
            builder.record(stack, bytes);
        }
        builder.build()
    })
}
