//! Session lock — a PID file preventing two sessions from running against
//! the same project concurrently.
//!
//! Acquire succeeds if no lock file exists, or if one exists but its PID is
//! no longer alive (stale lock, stolen). Release only removes the file if
//! it still names this process — another session's acquire-after-steal must
//! never be clobbered by a late release from the session that lost the lock.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::retention::atomic::write_atomic;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LockFile {
    pid: u32,
    acquired_at: chrono::DateTime<chrono::Utc>,
}

pub struct SessionLock {
    path: PathBuf,
    pid: u32,
}

impl SessionLock {
    /// Try to acquire the lock at `path`, stealing it if the owning PID is
    /// no longer alive.
    pub fn acquire(path: impl Into<PathBuf>, pid: u32) -> CoreResult<Self> {
        let path = path.into();
        if let Some(existing) = read_lock(&path)? {
            if is_process_alive(existing.pid) && existing.pid != pid {
                return Err(CoreError::LockHeld(existing.pid));
            }
            tracing::warn!(stale_pid = existing.pid, "stealing stale session lock");
        }
        write_lock(&path, pid)?;
        Ok(Self { path, pid })
    }

    /// Release the lock, but only if it still names this process. Returns
    /// `Ok(false)` without touching the file if another session now owns it.
    pub fn release(&self) -> CoreResult<bool> {
        match read_lock(&self.path)? {
            Some(lock) if lock.pid == self.pid => {
                if self.path.exists() {
                    fs::remove_file(&self.path)?;
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Whether this session still holds the lock (hasn't been stolen).
    pub fn is_still_owner(&self) -> CoreResult<bool> {
        Ok(matches!(read_lock(&self.path)?, Some(lock) if lock.pid == self.pid))
    }
}

fn read_lock(path: &Path) -> CoreResult<Option<LockFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    match serde_json::from_str(&content) {
        Ok(lock) => Ok(Some(lock)),
        Err(_) => Ok(None),
    }
}

fn write_lock(path: &Path, pid: u32) -> CoreResult<()> {
    let lock = LockFile {
        pid,
        acquired_at: chrono::Utc::now(),
    };
    write_json_atomic_lock(path, &lock)
}

fn write_json_atomic_lock(path: &Path, lock: &LockFile) -> CoreResult<()> {
    let content = serde_json::to_vec_pretty(lock)?;
    write_atomic(path, &content)
}

/// Liveness check. On Linux, `/proc/<pid>` existing is a reliable and
/// dependency-free signal; elsewhere we conservatively assume alive so a
/// lock is never stolen out from under a process we can't introspect.
#[cfg(target_os = "linux")]
fn is_process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(not(target_os = "linux"))]
fn is_process_alive(_pid: u32) -> bool {
    true
}
