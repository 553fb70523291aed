//! Bounded garbage collection for run folders, NDJSON ring buffers, and
//! per-run artifacts. Every pruning function supports a dry-run
//! mode so a caller can report what *would* be removed before committing,
//! mirroring the report-then-mutate shape of
//! `coordination::harness::feature_registry`'s recovery path.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::CoreResult;

#[derive(Debug, Clone, Default)]
pub struct GcReport {
    pub removed: Vec<PathBuf>,
    pub kept: usize,
    pub dry_run: bool,
}

/// Keep the `keep` most-recently-modified entries directly under `dir`,
/// removing the rest.
pub fn prune_run_folders(dir: &Path, keep: usize, dry_run: bool) -> CoreResult<GcReport> {
    if !dir.exists() {
        return Ok(GcReport {
            dry_run,
            ..Default::default()
        });
    }
    let mut entries: Vec<(PathBuf, SystemTime)> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.metadata().ok().and_then(|m| m.modified().ok()).map(|m| (e.path(), m)))
        .collect();
    entries.sort_by_key(|(_, modified)| *modified);
    entries.reverse();

    let mut report = GcReport {
        dry_run,
        ..Default::default()
    };
    for (path, _) in entries.into_iter().skip(keep) {
        if !dry_run {
            fs::remove_dir_all(&path)?;
        }
        report.removed.push(path);
    }
    report.kept = keep.min(report.removed.len() + keep);
    Ok(report)
}

/// Keep only the last `keep` lines of an NDJSON file (history/metrics ring
/// buffers).
pub fn prune_ndjson_lines(path: &Path, keep: usize, dry_run: bool) -> CoreResult<usize> {
    if !path.exists() {
        return Ok(0);
    }
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() <= keep {
        return Ok(0);
    }
    let dropped = lines.len() - keep;
    if !dry_run {
        let kept: Vec<&str> = lines[dropped..].to_vec();
        let mut joined = kept.join("\n");
        if !joined.is_empty() {
            joined.push('\n');
        }
        crate::retention::atomic::write_atomic(path, joined.as_bytes())?;
    }
    Ok(dropped)
}

/// Keep the `keep` most-recently-modified files directly under `dir`
/// (spool archives, per-run artifacts).
pub fn prune_files_by_mtime(dir: &Path, keep: usize, dry_run: bool) -> CoreResult<GcReport> {
    if !dir.exists() {
        return Ok(GcReport {
            dry_run,
            ..Default::default()
        });
    }
    let mut entries: Vec<(PathBuf, SystemTime)> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.metadata().ok().and_then(|m| m.modified().ok()).map(|m| (e.path(), m)))
        .collect();
    entries.sort_by_key(|(_, modified)| *modified);
    entries.reverse();

    let mut report = GcReport {
        dry_run,
        ..Default::default()
    };
    for (path, _) in entries.into_iter().skip(keep) {
        if !dry_run {
            fs::remove_file(&path)?;
        }
        report.removed.push(path);
    }
    Ok(report)
}

/// Remove files older than `max_age_days` and any subdirectory left empty
/// by that removal.
pub fn prune_by_age(dir: &Path, max_age_days: u32, now: SystemTime, dry_run: bool) -> CoreResult<GcReport> {
    let mut report = GcReport {
        dry_run,
        ..Default::default()
    };
    if !dir.exists() {
        return Ok(report);
    }
    let max_age = std::time::Duration::from_secs(max_age_days as u64 * 86_400);
    walk_and_prune(dir, max_age, now, dry_run, &mut report)?;
    Ok(report)
}

fn walk_and_prune(
    dir: &Path,
    max_age: std::time::Duration,
    now: SystemTime,
    dry_run: bool,
    report: &mut GcReport,
) -> CoreResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_and_prune(&path, max_age, now, dry_run, report)?;
            if !dry_run && fs::read_dir(&path).map(|mut d| d.next().is_none()).unwrap_or(false) {
                fs::remove_dir(&path)?;
            }
            continue;
        }
        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                if now.duration_since(modified).unwrap_or_default() > max_age {
                    if !dry_run {
                        fs::remove_file(&path)?;
                    }
                    report.removed.push(path);
                }
            }
        }
    }
    Ok(())
}

/// Rotate a log file: `path` -> `path.1`, overwriting any prior `.1`.
pub fn rotate_log(path: &Path) -> CoreResult<()> {
    if !path.exists() {
        return Ok(());
    }
    let rotated = path.with_extension(format!(
        "{}.1",
        path.extension().and_then(|e| e.to_str()).unwrap_or("log")
    ));
    fs::rename(path, rotated)?;
    Ok(())
}
