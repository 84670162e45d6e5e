//! Flat-file persistence: whitespace-separated edge and tag lists.
//!
//! Edge file, one undirected friendship per line:
//! ```text
//! # comment
//! 1 2
//! 2 3
//! ```
//!
//! Tag file, a user ID followed by zero or more tags:
//! ```text
//! 1 chess hiking
//! 4
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Malformed lines are
//! skipped and counted; the loader never aborts on a bad line.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::GraphError;
use crate::graph::SocialGraph;
use crate::model::UserId;

/// Result of loading one file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub messages: Vec<String>,
}

impl ImportReport {
    fn skip(&mut self, line_no: usize, reason: impl std::fmt::Display) {
        debug!(line = line_no, %reason, "skipping line");
        self.skipped += 1;
        self.messages.push(format!("line {line_no}: {reason}"));
    }
}

/// Independent outcomes for the edge file and the tag file.
///
/// A failure on one file never prevents the other from being processed.
#[derive(Debug)]
pub struct FilePair<T> {
    pub edges: Result<T, GraphError>,
    pub tags: Result<T, GraphError>,
}

impl<T> FilePair<T> {
    pub fn is_ok(&self) -> bool {
        self.edges.is_ok() && self.tags.is_ok()
    }
}

pub type LoadOutcome = FilePair<ImportReport>;
pub type SaveOutcome = FilePair<usize>;

// ── Load ─────────────────────────────────────────────────────────────────────

/// Read `a b` lines, registering both users and linking them.
pub fn load_edges<R: BufRead>(graph: &mut SocialGraph, reader: R) -> ImportReport {
    let mut report = ImportReport::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                report.skip(line_no, format!("read error: {e}"));
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let a = fields.next().and_then(parse_id);
        let b = fields.next().and_then(parse_id);
        match (a, b) {
            (Some(a), Some(b)) if a == b => report.skip(line_no, format!("self-friendship {a}")),
            (Some(a), Some(b)) => {
                graph.link(a, b);
                report.imported += 1;
            }
            _ => report.skip(line_no, format!("expected two user IDs, got {trimmed:?}")),
        }
    }

    report
}

/// Read `id tag1 tag2 …` lines, registering the user and adding its tags.
pub fn load_tags<R: BufRead>(graph: &mut SocialGraph, reader: R) -> ImportReport {
    let mut report = ImportReport::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                report.skip(line_no, format!("read error: {e}"));
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        match fields.next().and_then(parse_id) {
            Some(id) => {
                graph.extend_tags(id, fields.map(str::to_owned));
                report.imported += 1;
            }
            None => report.skip(line_no, format!("expected a user ID, got {trimmed:?}")),
        }
    }

    report
}

/// Load both files into `graph`. Each file is attempted regardless of the
/// other's outcome; whatever was read stays in the graph.
pub fn load_files(
    graph: &mut SocialGraph,
    edge_path: impl AsRef<Path>,
    tag_path: impl AsRef<Path>,
) -> LoadOutcome {
    let edges = open(edge_path.as_ref()).map(|r| load_edges(graph, r));
    let tags = open(tag_path.as_ref()).map(|r| load_tags(graph, r));

    for (what, outcome) in [("edges", &edges), ("tags", &tags)] {
        match outcome {
            Ok(report) => info!(
                file = what,
                imported = report.imported,
                skipped = report.skipped,
                "loaded"
            ),
            Err(e) => warn!(file = what, error = %e, "load failed"),
        }
    }
    info!(users = graph.user_count(), friendships = graph.friendship_count(), "graph ready");

    FilePair { edges, tags }
}

// ── Save ─────────────────────────────────────────────────────────────────────

/// Write each friendship once as `min max`, ascending. Returns lines written.
pub fn save_edges<W: Write>(graph: &SocialGraph, writer: &mut W) -> std::io::Result<usize> {
    let mut count = 0;
    for f in graph.friendships() {
        writeln!(writer, "{} {}", f.low, f.high)?;
        count += 1;
    }
    Ok(count)
}

/// Write one line per user with at least one tag. Returns lines written.
pub fn save_tags<W: Write>(graph: &SocialGraph, writer: &mut W) -> std::io::Result<usize> {
    let mut count = 0;
    for (id, tags) in graph.tag_entries() {
        write!(writer, "{id}")?;
        for tag in tags {
            write!(writer, " {tag}")?;
        }
        writeln!(writer)?;
        count += 1;
    }
    Ok(count)
}

/// Save both files. Each file is attempted regardless of the other's outcome.
pub fn save_files(
    graph: &SocialGraph,
    edge_path: impl AsRef<Path>,
    tag_path: impl AsRef<Path>,
) -> SaveOutcome {
    let edges = write_file(edge_path.as_ref(), |w| save_edges(graph, w));
    let tags = write_file(tag_path.as_ref(), |w| save_tags(graph, w));

    for (what, outcome) in [("edges", &edges), ("tags", &tags)] {
        match outcome {
            Ok(lines) => info!(file = what, lines, "saved"),
            Err(e) => warn!(file = what, error = %e, "save failed"),
        }
    }

    FilePair { edges, tags }
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn parse_id(field: &str) -> Option<UserId> {
    field.parse().ok()
}

fn open(path: &Path) -> Result<BufReader<File>, GraphError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| GraphError::io(path, e))
}

fn write_file<F>(path: &Path, body: F) -> Result<usize, GraphError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<usize>,
{
    let file = File::create(path).map_err(|e| GraphError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let count = body(&mut writer).map_err(|e| GraphError::io(path, e))?;
    writer.flush().map_err(|e| GraphError::io(path, e))?;
    Ok(count)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
