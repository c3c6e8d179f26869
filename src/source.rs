use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SourceError;
use crate::node::Entries;

/// Something that can hand over a fully built allocation trie.
pub trait TrieSource {
    fn load(&self) -> Result<Entries, SourceError>;
}

/// A JSON dump written by the sampling agent.
///
/// The document is an object mapping top-level frame-keys to nodes of the
/// form `{ "direct": u64, "accumulated": u64, "children": { ... } }`, where
/// `children` may be left out for leaves. Nesting depth is not limited.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrieSource for JsonSource {
    fn load(&self) -> Result<Entries, SourceError> {
        let file = File::open(&self.path)?;
        let entries = from_reader(BufReader::new(file))?;
        tracing::info!(
            path = %self.path.display(),
            entries = entries.len(),
            "loaded allocation trie"
        );
        Ok(entries)
    }
}

pub fn from_reader<R: Read>(reader: R) -> Result<Entries, SourceError> {
    deserialize(serde_json::Deserializer::from_reader(reader))
}

pub fn from_str(json: &str) -> Result<Entries, SourceError> {
    deserialize(serde_json::Deserializer::from_str(json))
}

// Every trie level is two JSON levels deep, so serde_json's recursion limit
// is lifted and serde_stacker grows the stack as the nesting gets deeper.
fn deserialize<'de, R>(mut deserializer: serde_json::Deserializer<R>) -> Result<Entries, SourceError>
where
    R: serde_json::de::Read<'de>,
{
    deserializer.disable_recursion_limit();
    let entries = Entries::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(entries)
}
