// src/store.rs
//! Batch files on disk: one JSON array of posts per file.
//!
//! `run_directory` annotates every `*.json` batch in a data directory and writes the
//! result under the output directory with the same file name.

use crate::analyze::{Analyzer, BatchReport};
use crate::discussion::Post;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub fn read_batch(path: &Path) -> Result<Vec<Post>> {
    let bytes = fs::read(path).with_context(|| format!("reading batch {}", path.display()))?;
    let posts: Vec<Post> = serde_json::from_slice(&bytes)
        .with_context(|| format!("decoding batch {}", path.display()))?;
    Ok(posts)
}

pub fn write_batch(path: &Path, posts: &[Post]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let json = serde_json::to_vec(posts)?;
    fs::write(path, json).with_context(|| format!("writing batch {}", path.display()))?;
    Ok(())
}

/// `*.json` files directly inside `dir` (no recursion), sorted by path.
pub fn batch_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("listing data dir {}", dir.display()))?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Annotate one batch file and write it to `out_path`.
pub fn process_file(analyzer: &Analyzer, in_path: &Path, out_path: &Path) -> Result<BatchReport> {
    let mut posts = read_batch(in_path)?;
    let report = analyzer
        .annotate_batch(&mut posts)
        .with_context(|| format!("annotating {}", in_path.display()))?;
    write_batch(out_path, &posts)?;
    Ok(report)
}

/// Process every batch in `data_dir`, writing to `out_dir/<file name>`.
/// Returns `(file name, report)` per processed file.
pub fn run_directory(
    analyzer: &Analyzer,
    data_dir: &Path,
    out_dir: &Path,
) -> Result<Vec<(String, BatchReport)>> {
    let files = batch_files(data_dir)?;
    if files.is_empty() {
        warn!(dir = %data_dir.display(), "no batch files found");
    }

    let mut reports = Vec::with_capacity(files.len());
    for in_path in files {
        let Some(file_name) = in_path.file_name() else {
            continue;
        };
        let out_path = out_dir.join(file_name);
        let report = process_file(analyzer, &in_path, &out_path)?;
        info!(
            file = %in_path.display(),
            out = %out_path.display(),
            discussions = report.discussions.len(),
            deltas = report.total_awarded(),
            aborted = report.aborted(),
            "batch written"
        );
        reports.push((file_name.to_string_lossy().to_string(), report));
    }
    Ok(reports)
}
