use std::collections::HashMap;

use crate::node::{Entries, FrameNode};

#[derive(Debug)]
struct Slot {
    direct: u64,
    children: HashMap<String, usize>,
}

/// Aggregates stack samples into an allocation trie.
///
/// Samples are recorded as a sequence of frame-keys, top-level entry first,
/// plus the bytes allocated at the last frame. Nodes live in a flat arena
/// until [`TrieBuilder::build`], so nothing here recurses over depth.
#[derive(Debug, Default)]
pub struct TrieBuilder {
    slots: Vec<Slot>,
    roots: HashMap<String, usize>,
}

impl TrieBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `bytes` to the last frame of `path`, creating frames as needed.
    ///
    /// Returns `false` and records nothing for an empty path.
    pub fn record<I, S>(&mut self, path: I, bytes: u64) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut current: Option<usize> = None;
        for key in path {
            let key = key.as_ref();
            let existing = match current {
                None => self.roots.get(key),
                Some(parent) => self.slots[parent].children.get(key),
            }
            .copied();

            let index = match existing {
                Some(index) => index,
                None => {
                    let index = self.slots.len();
                    self.slots.push(Slot {
                        direct: 0,
                        children: HashMap::new(),
                    });
                    match current {
                        None => self.roots.insert(key.to_string(), index),
                        Some(parent) => self.slots[parent].children.insert(key.to_string(), index),
                    };
                    index
                }
            };
            current = Some(index);
        }

        match current {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.direct = slot.direct.saturating_add(bytes);
                true
            }
            None => false,
        }
    }

    /// Number of distinct frames recorded so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Freezes the recorded samples into a forest of immutable nodes.
    pub fn build(self) -> Entries {
        // A child is always pushed after its parent, so walking the arena
        // backwards finishes every child before the node that owns it.
        let mut built: Vec<Option<FrameNode>> = self.slots.iter().map(|_| None).collect();
        for (index, slot) in self.slots.iter().enumerate().rev() {
            let children: Vec<(String, FrameNode)> = slot
                .children
                .iter()
                .map(|(key, &child)| (key.clone(), built[child].take().unwrap_or_default()))
                .collect();
            built[index] = Some(FrameNode::with_children(slot.direct, children));
        }

        self.roots
            .into_iter()
            .map(|(key, index)| (key, built[index].take().unwrap_or_default()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_common_prefixes() {
        let mut builder = TrieBuilder::new();
        assert!(builder.record(["common", "leaf1"], 30));
        assert!(builder.record(["common", "leaf2"], 40));

        assert_eq!(builder.len(), 3);

        let entries = builder.build();
        let common = &entries["common"];
        assert_eq!(common.direct_allocation(), 0);
        assert_eq!(common.accumulated_allocation(), 70);
        assert_eq!(common.children()["leaf1"], FrameNode::leaf(30));
        assert_eq!(common.children()["leaf2"], FrameNode::leaf(40));
    }

    #[test]
    fn repeated_samples_add_up() {
        let mut builder = TrieBuilder::new();
        builder.record(["a", "b"], 8);
        builder.record(["a", "b"], 8);
        builder.record(["a"], 4);

        let entries = builder.build();
        let a = &entries["a"];
        assert_eq!(a.direct_allocation(), 4);
        assert_eq!(a.accumulated_allocation(), 20);
        assert_eq!(a.children()["b"].direct_allocation(), 16);
    }

    #[test]
    fn empty_path_is_ignored() {
        let mut builder = TrieBuilder::new();

        assert!(!builder.record(Vec::<String>::new(), 10));
        assert!(builder.is_empty());
        assert!(builder.build().is_empty());
    }

    #[test]
    fn builds_deep_chains() {
        let depth = 50_000;
        let mut builder = TrieBuilder::new();
        builder.record((0..depth).map(|i| format!("frame{i}")), 1);

        let entries = builder.build();
        assert_eq!(entries["frame0"].accumulated_allocation(), 1);
    }
}
