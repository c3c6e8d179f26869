//! Depth-first walks over an allocation trie.
//!
//! Both walks keep their state in an explicit stack of [`TraversalFrame`]s
//! instead of recursing, so trie depth never translates into call-stack
//! depth. Paths handed to visitors are always outer-to-inner: the top-level
//! entry first, the visited node last.

use std::collections::hash_map;

use crate::node::{Entries, FrameNode};

/// One element of a delivered path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathFrame<'a> {
    pub key: &'a str,
    pub node: &'a FrameNode,
}

/// Receives the paths produced by a walk.
///
/// Implemented for every `FnMut(Vec<PathFrame>) -> Result<(), E>`. An error
/// aborts the walk and is returned to the caller unchanged.
pub trait TrieVisitor<'a> {
    type Error;

    fn visit(&mut self, path: Vec<PathFrame<'a>>) -> Result<(), Self::Error>;
}

impl<'a, F, E> TrieVisitor<'a> for F
where
    F: FnMut(Vec<PathFrame<'a>>) -> Result<(), E>,
{
    type Error = E;

    fn visit(&mut self, path: Vec<PathFrame<'a>>) -> Result<(), E> {
        self(path)
    }
}

/// Visits every leaf, passing the path from its top-level entry down to it.
pub fn enumerate_leaf_paths<'a, V>(entries: &'a Entries, mut visitor: V) -> Result<(), V::Error>
where
    V: TrieVisitor<'a>,
{
    Walk::leaves(entries).try_for_each(|path| visitor.visit(path))
}

/// Visits every leaf and every internal node that allocated directly.
///
/// An internal node is visited once all of its children are done.
pub fn enumerate_self_allocators<'a, V>(
    entries: &'a Entries,
    mut visitor: V,
) -> Result<(), V::Error>
where
    V: TrieVisitor<'a>,
{
    Walk::self_allocators(entries).try_for_each(|path| visitor.visit(path))
}

/// Progress of a single node during a walk.
#[derive(Debug)]
struct TraversalFrame<'a> {
    key: &'a str,
    node: &'a FrameNode,
    /// Snapshot of `node.children()` taken when the frame was pushed.
    children: Vec<(&'a str, &'a FrameNode)>,
    /// Index of the last child descended into; `None` before the first.
    cursor: Option<usize>,
}

impl<'a> TraversalFrame<'a> {
    fn new(key: &'a str, node: &'a FrameNode) -> Self {
        Self {
            key,
            node,
            children: node
                .children()
                .iter()
                .map(|(key, child)| (key.as_str(), child))
                .collect(),
            cursor: None,
        }
    }

    fn next_child(&mut self) -> Option<(&'a str, &'a FrameNode)> {
        let next = self.cursor.map_or(0, |cursor| cursor + 1);
        let child = self.children.get(next).copied()?;
        self.cursor = Some(next);
        Some(child)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitRule {
    Leaves,
    SelfAllocators,
}

/// A resumable walk yielding one freshly built path per visited node.
///
/// Each top-level entry is walked to exhaustion before the next one starts.
#[derive(Debug)]
pub struct Walk<'a> {
    rule: VisitRule,
    entries: hash_map::Iter<'a, String, FrameNode>,
    stack: Vec<TraversalFrame<'a>>,
}

impl<'a> Walk<'a> {
    pub fn leaves(entries: &'a Entries) -> Self {
        Self::new(entries, VisitRule::Leaves)
    }

    pub fn self_allocators(entries: &'a Entries) -> Self {
        Self::new(entries, VisitRule::SelfAllocators)
    }

    fn new(entries: &'a Entries, rule: VisitRule) -> Self {
        Self {
            rule,
            entries: entries.iter(),
            stack: Vec::new(),
        }
    }

    /// Copies the stack, which is already stored entry-first.
    fn path(&self) -> Vec<PathFrame<'a>> {
        self.stack
            .iter()
            .map(|frame| PathFrame {
                key: frame.key,
                node: frame.node,
            })
            .collect()
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Vec<PathFrame<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(top) = self.stack.last_mut() else {
                let (key, node) = self.entries.next()?;
                tracing::trace!(entry = %key, "walking top-level entry");
                self.stack.push(TraversalFrame::new(key, node));
                continue;
            };

            if top.children.is_empty() {
                let path = self.path();
                self.stack.pop();
                return Some(path);
            }

            match top.next_child() {
                Some((key, child)) => self.stack.push(TraversalFrame::new(key, child)),
                None => {
                    let fires = self.rule == VisitRule::SelfAllocators
                        && top.node.direct_allocation() > 0;
                    let path = fires.then(|| self.path());
                    self.stack.pop();
                    if path.is_some() {
                        return path;
                    }
                }
            }
        }
    }
}
