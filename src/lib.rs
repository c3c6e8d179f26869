//! Reports over inverted allocation tries.
//!
//! A sampling memory profiler records every allocation against the call
//! stack that made it. Storing those stacks innermost frame first lets call
//! sites that allocate the same way share their common suffix, which keeps
//! the trie small. This crate takes such a trie once it is fully built and
//! walks it, without recursion, into per-path and per-allocator reports.

pub mod builder;
pub mod config;
pub mod error;
pub mod exporters;
pub mod node;
pub mod report;
pub mod source;
pub mod traversal;
pub mod ui;
pub mod validate;

pub use builder::TrieBuilder;
pub use error::{SourceError, UiError, ValidationError};
pub use node::{Children, Entries, FrameNode};
pub use report::{render_report, render_self_allocators, write_report, write_self_allocators, Report};
pub use traversal::{enumerate_leaf_paths, enumerate_self_allocators, PathFrame, TrieVisitor, Walk};
pub use validate::validate;
