//! Folded stacks (`frame;frame;frame bytes`), the input format of flame graph
//! tools such as inferno.

use std::io::{self, Write};

use crate::node::Entries;
use crate::traversal::{enumerate_self_allocators, PathFrame};

/// Writes one line per self-allocator that allocated directly.
///
/// Zero-byte leaves are skipped since they would not add any width. Type
/// descriptors end frame-keys with `;`, which is the frame separator here, so
/// it is written as `,` instead.
pub fn write_folded<W: Write>(entries: &Entries, mut out: W) -> io::Result<()> {
    let mut lines = 0usize;
    enumerate_self_allocators(entries, |path: Vec<PathFrame<'_>>| {
        let Some(last) = path.last() else {
            return Ok(());
        };
        let bytes = last.node.direct_allocation();
        if bytes == 0 {
            return Ok(());
        }
        for (i, frame) in path.iter().enumerate() {
            if i > 0 {
                out.write_all(b";")?;
            }
            out.write_all(frame.key.replace(';', ",").as_bytes())?;
        }
        lines += 1;
        writeln!(out, " {bytes}")
    })?;
    tracing::debug!(lines, "wrote folded stacks");
    Ok(())
}
