//! Atomic file writes: write to a temp file, then rename over the target.
//! Grounded on `coordination::harness::feature_registry::FeatureRegistry::save`.

use std::fs;
use std::path::Path;

use crate::error::CoreResult;

/// Write `content` to `path` atomically: a concurrent reader never observes
/// a partially-written file, because the final step is a single rename.
pub fn write_atomic(path: &Path, content: &[u8]) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension(append_tmp_suffix(path));
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

fn append_tmp_suffix(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{ext}.tmp"),
        None => "tmp".to_string(),
    }
}

pub fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> CoreResult<()> {
    let content = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_atomic_creates_parent_dirs_and_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested/deep/file.json");
        write_atomic(&target, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
        assert!(!target.with_extension("json.tmp").exists());
    }

    #[test]
    fn write_atomic_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("file.txt");
        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
    }
}
