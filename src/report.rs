//! Plain-text allocation reports.
//!
//! Every delivered path becomes one `"<frame-key> - <direct> <accumulated>"`
//! line per frame, outer frame first, followed by a blank line.

use std::fmt;
use std::io::{self, Write};

use crate::node::Entries;
use crate::traversal::{enumerate_leaf_paths, enumerate_self_allocators, PathFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Leaves,
    SelfAllocators,
}

/// A report over a borrowed trie, rendered through [`fmt::Display`].
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    entries: &'a Entries,
    selection: Selection,
}

impl<'a> Report<'a> {
    /// One block per leaf path.
    pub fn leaves(entries: &'a Entries) -> Self {
        Self {
            entries,
            selection: Selection::Leaves,
        }
    }

    /// One block per self-allocator path.
    pub fn self_allocators(entries: &'a Entries) -> Self {
        Self {
            entries,
            selection: Selection::SelfAllocators,
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write = |path: Vec<PathFrame<'_>>| write_block(f, &path);
        match self.selection {
            Selection::Leaves => enumerate_leaf_paths(self.entries, write),
            Selection::SelfAllocators => enumerate_self_allocators(self.entries, write),
        }
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, path: &[PathFrame<'_>]) -> fmt::Result {
    for frame in path {
        writeln!(
            f,
            "{} - {} {}",
            frame.key,
            frame.node.direct_allocation(),
            frame.node.accumulated_allocation()
        )?;
    }
    writeln!(f)
}

/// Writes the leaf-path report.
pub fn write_report<W: Write>(entries: &Entries, mut out: W) -> io::Result<()> {
    write!(out, "{}", Report::leaves(entries))
}

/// Writes the self-allocator report in the same format.
pub fn write_self_allocators<W: Write>(entries: &Entries, mut out: W) -> io::Result<()> {
    write!(out, "{}", Report::self_allocators(entries))
}

pub fn render_report(entries: &Entries) -> String {
    Report::leaves(entries).to_string()
}

pub fn render_self_allocators(entries: &Entries) -> String {
    Report::self_allocators(entries).to_string()
}
