use std::collections::HashMap;
use std::fmt;

/// Child nodes keyed by frame-key.
pub type Children = HashMap<String, FrameNode>;

/// The top-level forest handed over by a producer: one entry per distinct
/// allocating frame.
pub type Entries = Children;

/// One frame of an inverted allocation trie.
///
/// Stack traces are stored innermost-frame-first so call sites that allocate
/// the same way share their common suffix. A node is immutable once built.
///
/// `Clone`, `PartialEq` and `Drop` walk the subtree with an explicit work list
/// and `Debug` only lists child keys, so none of them recurse over depth.
#[derive(Default, serde_derive::Deserialize)]
pub struct FrameNode {
    /// Frames that called into this one and allocated along the way.
    #[serde(default)]
    children: Children,
    /// Bytes allocated exactly at this frame.
    #[serde(rename = "direct")]
    direct_allocation: u64,
    /// Bytes allocated at this frame and all of its children.
    #[serde(rename = "accumulated")]
    accumulated_allocation: u64,
}

impl FrameNode {
    /// Builds a node from producer-supplied totals without checking them.
    ///
    /// Use [`crate::validate::validate`] if the producer is not trusted.
    pub fn new(children: Children, direct_allocation: u64, accumulated_allocation: u64) -> Self {
        Self {
            children,
            direct_allocation,
            accumulated_allocation,
        }
    }

    pub fn leaf(direct_allocation: u64) -> Self {
        Self::new(Children::new(), direct_allocation, direct_allocation)
    }

    /// Builds a node whose accumulated total is derived from its already
    /// built children.
    ///
    /// Saturates instead of wrapping if the totals exceed `u64::MAX`.
    pub fn with_children<I, K>(direct_allocation: u64, children: I) -> Self
    where
        I: IntoIterator<Item = (K, FrameNode)>,
        K: Into<String>,
    {
        let children: Children = children
            .into_iter()
            .map(|(key, child)| (key.into(), child))
            .collect();
        let accumulated_allocation = children
            .values()
            .fold(direct_allocation, |total, child| {
                total.saturating_add(child.accumulated_allocation)
            });
        Self::new(children, direct_allocation, accumulated_allocation)
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn direct_allocation(&self) -> u64 {
        self.direct_allocation
    }

    pub fn accumulated_allocation(&self) -> u64 {
        self.accumulated_allocation
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl Clone for FrameNode {
    fn clone(&self) -> Self {
        // Breadth-first numbering puts every child after its parent, so
        // cloning backwards finishes each child before its parent needs it.
        let mut nodes: Vec<&FrameNode> = vec![self];
        let mut links: Vec<Vec<(&str, usize)>> = vec![Vec::new()];
        let mut next = 0;
        while next < nodes.len() {
            let node = nodes[next];
            for (key, child) in &node.children {
                links[next].push((key.as_str(), nodes.len()));
                nodes.push(child);
                links.push(Vec::new());
            }
            next += 1;
        }

        let mut cloned: Vec<Option<FrameNode>> = nodes.iter().map(|_| None).collect();
        for (index, node) in nodes.iter().enumerate().rev() {
            let children = links[index]
                .iter()
                .map(|&(key, child)| (key.to_string(), cloned[child].take().unwrap_or_default()))
                .collect();
            cloned[index] = Some(FrameNode::new(
                children,
                node.direct_allocation,
                node.accumulated_allocation,
            ));
        }
        cloned.swap_remove(0).unwrap_or_default()
    }
}

impl PartialEq for FrameNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.direct_allocation != right.direct_allocation
                || left.accumulated_allocation != right.accumulated_allocation
                || left.children.len() != right.children.len()
            {
                return false;
            }
            for (key, child) in &left.children {
                match right.children.get(key) {
                    Some(other_child) => pending.push((child, other_child)),
                    None => return false,
                }
            }
        }
        true
    }
}

impl Eq for FrameNode {}

impl fmt::Debug for FrameNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.children.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("FrameNode")
            .field("direct_allocation", &self.direct_allocation)
            .field("accumulated_allocation", &self.accumulated_allocation)
            .field("children", &keys)
            .finish()
    }
}

impl Drop for FrameNode {
    fn drop(&mut self) {
        let mut pending: Vec<FrameNode> = self.children.drain().map(|(_, child)| child).collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.children.drain().map(|(_, child)| child));
        }
    }
}
