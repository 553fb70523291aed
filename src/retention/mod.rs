//! Component H — Retention & Lock.

pub mod atomic;
pub mod gc;
pub mod lock;

pub use atomic::{write_atomic, write_json_atomic};
pub use gc::{prune_by_age, prune_files_by_mtime, prune_ndjson_lines, prune_run_folders, rotate_log, GcReport};
pub use lock::SessionLock;
