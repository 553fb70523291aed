//! Goal measurement: run the project's configured goal command and parse a
//! numeric result out of it.
//!
//! Grounded on `coordination::verifier::pipeline::run_with_timeout`: a
//! bounded subprocess, its own process group on unix so a hung child and
//! its descendants die together on timeout.

use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tokio::process::Command;

const GOAL_COMMAND_TIMEOUT_SECS: u64 = 30;

static LAST_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?\d+\.?\d*").unwrap());

/// Parse the last numeric token out of `output`. Returns `None` if there
/// isn't one — a parse failure is not an error, just "no measurement".
pub fn parse_goal_output(output: &str) -> Option<f64> {
    LAST_NUMBER
        .find_iter(output)
        .last()
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Run `command` via `sh -c` in `working_dir`, bounded to
/// [`GOAL_COMMAND_TIMEOUT_SECS`], and parse its stdout for a goal value.
pub async fn measure_goal(command: &str, working_dir: &std::path::Path) -> Option<f64> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let output = tokio::time::timeout(Duration::from_secs(GOAL_COMMAND_TIMEOUT_SECS), cmd.output()).await;
    match output {
        Ok(Ok(out)) if out.status.success() => parse_goal_output(&String::from_utf8_lossy(&out.stdout)),
        _ => None,
    }
}
