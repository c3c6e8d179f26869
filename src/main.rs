use std::io::{self, BufWriter, Write};
use std::net::SocketAddr;
use std::path::PathBuf;

use alloctrie::config::ViewerConfig;
use alloctrie::exporters::{d3js, folded};
use alloctrie::source::{JsonSource, TrieSource};
use alloctrie::Entries;
use anyhow::Context;
use tracing_subscriber::EnvFilter;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// One block per leaf path.
    Report,
    /// One block per frame that allocated directly, plus every leaf.
    SelfAllocators,
    /// Folded stacks for flame graph tools.
    Folded,
    /// d3 hierarchy JSON, as served to the viewer.
    Json,
    /// Print nothing.
    #[value(name = "none")]
    Quiet,
}

#[derive(clap::Parser, Debug)]
#[command(
    version,
    about = "Print reports from the allocation trie dumped by a sampling memory profiler.",
    long_about = "Print reports from the allocation trie dumped by a sampling memory profiler. \
                  Set RUST_LOG to control diagnostics, which go to stderr."
)]
#[command(flatten_help = true)]
pub struct Args {
    /// Path to the JSON allocation dump.
    #[arg()]
    path: PathBuf,

    /// What to print to stdout.
    #[arg(long, value_enum, default_value_t = Format::Report)]
    format: Format,

    /// Maximum depth of the treemap and of `--format json`.
    #[arg(long, default_value_t = 16)]
    max_depth: u64,

    /// Skip checking that accumulated totals add up.
    #[arg(long)]
    no_validate: bool,

    /// Serve the treemap viewer after printing.
    #[arg(long)]
    serve: bool,

    /// Address for the treemap viewer.
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = <Args as clap::Parser>::parse();

    let stdout = io::stdout();
    let entries = run(&args, &JsonSource::new(&args.path), BufWriter::new(stdout.lock()))?;

    if args.serve {
        let config = ViewerConfig::default()
            .with_addr(args.addr)
            .with_title(args.path.to_string_lossy());
        alloctrie::ui::serve(d3js::export(&entries, args.max_depth), &config)
            .context("treemap viewer failed")?;
    }

    Ok(())
}

/// Loads and checks the trie, then prints it in the chosen format.
fn run<S: TrieSource, W: Write>(args: &Args, source: &S, mut out: W) -> anyhow::Result<Entries> {
    let entries = source
        .load()
        .with_context(|| format!("failed to load {}", args.path.display()))?;

    if args.no_validate {
        tracing::warn!("skipping validation, totals are trusted as given");
    } else {
        alloctrie::validate(&entries)
            .with_context(|| format!("{} is not a consistent allocation trie", args.path.display()))?;
    }

    match args.format {
        Format::Report => alloctrie::write_report(&entries, &mut out)?,
        Format::SelfAllocators => alloctrie::write_self_allocators(&entries, &mut out)?,
        Format::Folded => folded::write_folded(&entries, &mut out)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &d3js::export(&entries, args.max_depth))?;
            writeln!(out)?;
        }
        Format::Quiet => {}
    }
    out.flush()?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloctrie::{Children, FrameNode, SourceError};

    struct FixedSource(Entries);

    impl TrieSource for FixedSource {
        fn load(&self) -> Result<Entries, SourceError> {
            Ok(self.0.clone())
        }
    }

    fn args(flags: &[&str]) -> Args {
        let argv = ["alloctrie", "dump.json"].iter().chain(flags).copied();
        <Args as clap::Parser>::try_parse_from(argv).unwrap()
    }

    fn consistent() -> FixedSource {
        FixedSource(Entries::from([(
            "common".to_string(),
            FrameNode::with_children(0, [("leaf1", FrameNode::leaf(30))]),
        )]))
    }

    /// `common` claims 99 bytes but its only child holds 30.
    fn inconsistent() -> FixedSource {
        FixedSource(Entries::from([(
            "common".to_string(),
            FrameNode::new(
                Children::from([("leaf1".to_string(), FrameNode::leaf(30))]),
                0,
                99,
            ),
        )]))
    }

    fn output(args: &Args, source: &FixedSource) -> anyhow::Result<String> {
        let mut out = Vec::new();
        run(args, source, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn rejects_inconsistent_dump_by_default() {
        let mut out = Vec::new();

        let err = run(&args(&[]), &inconsistent(), &mut out).unwrap_err();

        assert!(format!("{err:#}").contains("dump.json is not a consistent allocation trie"));
        assert!(out.is_empty());
    }

    #[test]
    fn no_validate_prints_totals_as_given() {
        let printed = output(&args(&["--no-validate"]), &inconsistent()).unwrap();

        assert!(printed.starts_with("common - 0 99\n"));
        assert!(printed.contains("leaf1 - 30 30\n"));
    }

    #[test]
    fn default_format_is_the_leaf_report() {
        let printed = output(&args(&[]), &consistent()).unwrap();

        assert_eq!(printed, "common - 0 30\nleaf1 - 30 30\n\n");
    }

    #[test]
    fn folded_format() {
        let printed = output(&args(&["--format", "folded"]), &consistent()).unwrap();

        assert_eq!(printed, "common;leaf1 30\n");
    }

    #[test]
    fn json_format_is_the_d3_hierarchy() {
        let printed = output(&args(&["--format", "json"]), &consistent()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(value["name"], "root");
        assert_eq!(value["children"][0]["name"], "common");
    }

    #[test]
    fn none_format_prints_nothing() {
        let printed = output(&args(&["--format", "none"]), &consistent()).unwrap();

        assert!(printed.is_empty());
    }

    #[test]
    fn load_failure_names_the_path() {
        let source = JsonSource::new("/nonexistent/alloctrie/dump.json");

        let err = run(&args(&[]), &source, Vec::new()).unwrap_err();

        assert!(format!("{err:#}").contains("failed to load dump.json"));
    }
}
