//! Eager check of the accumulation invariant.
//!
//! The walks in [`crate::traversal`] trust whatever they are handed. Run
//! [`validate`] first when the producer is not trusted, so a broken dump
//! fails loudly instead of rendering a report with wrong totals.

use crate::error::ValidationError;
use crate::node::{Entries, FrameNode};

/// Checks `accumulated == direct + Σ children.accumulated` for every node.
pub fn validate(entries: &Entries) -> Result<(), ValidationError> {
    // (key, parent index) for every node checked so far; only read back to
    // name the offending path.
    let mut checked: Vec<(&str, Option<usize>)> = Vec::new();
    let mut pending: Vec<(&str, &FrameNode, Option<usize>)> = entries
        .iter()
        .map(|(key, node)| (key.as_str(), node, None))
        .collect();

    while let Some((key, node, parent)) = pending.pop() {
        let index = checked.len();
        checked.push((key, parent));

        let expected = node
            .children()
            .values()
            .try_fold(node.direct_allocation(), |total, child| {
                total.checked_add(child.accumulated_allocation())
            });

        match expected {
            None => {
                return Err(ValidationError::Overflow {
                    path: describe_path(&checked, index),
                })
            }
            Some(expected) if expected != node.accumulated_allocation() => {
                return Err(ValidationError::Inconsistent {
                    path: describe_path(&checked, index),
                    expected,
                    actual: node.accumulated_allocation(),
                })
            }
            Some(_) => {}
        }

        pending.extend(
            node.children()
                .iter()
                .map(|(key, child)| (key.as_str(), child, Some(index))),
        );
    }

    tracing::debug!(nodes = checked.len(), "allocation trie is consistent");
    Ok(())
}

fn describe_path(checked: &[(&str, Option<usize>)], mut index: usize) -> String {
    let mut keys = Vec::new();
    loop {
        let (key, parent) = checked[index];
        keys.push(key);
        match parent {
            Some(parent) => index = parent,
            None => break,
        }
    }
    keys.reverse();
    keys.join(" > ")
}
