//! Failure classification: prioritized regex over the tail of a failing
//! command's output. Grounded on
//! `coordination::feedback::error_parser`'s `LazyLock<Regex>` table,
//! generalized from rustc-specific categories to the coarser categories a
//! QA command's output falls into.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const TAIL_CHARS: usize = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    TypeError,
    CompileError,
    TestAssertion,
    LintError,
    Timeout,
    RuntimeError,
    Unknown,
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::TypeError => "type_error",
            Self::CompileError => "compile_error",
            Self::TestAssertion => "test_assertion",
            Self::LintError => "lint_error",
            Self::Timeout => "timeout",
            Self::RuntimeError => "runtime_error",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

static TIMEOUT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(timed? ?out|deadline exceeded|timeout)").unwrap());
static TYPE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(type mismatch|expected .*, found|E0308|TypeError)").unwrap());
static COMPILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(error\[E\d+\]|cannot find|unresolved import|compilation failed|SyntaxError)").unwrap());
static TEST_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(assertion (failed|error)|test result: FAILED|expect\(|AssertionError)").unwrap());
static LINT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(clippy::|eslint|warning: unused|deny\(warnings\))").unwrap());
static RUNTIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(panicked at|unhandled exception|segmentation fault|stack overflow)").unwrap());

/// Classify a failing command's output by its last [`TAIL_CHARS`] chars,
/// checked in this fixed priority order (timeout first — it masks every
/// other signal; unknown last).
pub fn classify(output: &str) -> FailureCategory {
    let tail = tail_chars(output, TAIL_CHARS);

    if TIMEOUT_PATTERN.is_match(&tail) {
        FailureCategory::Timeout
    } else if TYPE_PATTERN.is_match(&tail) {
        FailureCategory::TypeError
    } else if COMPILE_PATTERN.is_match(&tail) {
        FailureCategory::CompileError
    } else if TEST_PATTERN.is_match(&tail) {
        FailureCategory::TestAssertion
    } else if LINT_PATTERN.is_match(&tail) {
        FailureCategory::LintError
    } else if RUNTIME_PATTERN.is_match(&tail) {
        FailureCategory::RuntimeError
    } else {
        FailureCategory::Unknown
    }
}

/// Finer-grained root-cause tagging than [`FailureCategory`], used only to
/// enrich a learning's `structured.root_cause` — the coarser category above
/// is still what gates the critic and the spindle detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    BorrowChecker,
    Lifetime,
    TraitBound,
    Async,
    Macro,
    ImportResolution,
    Syntax,
    Other,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BorrowChecker => "borrow_checker",
            Self::Lifetime => "lifetime",
            Self::TraitBound => "trait_bound",
            Self::Async => "async",
            Self::Macro => "macro",
            Self::ImportResolution => "import_resolution",
            Self::Syntax => "syntax",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}

static BORROW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(cannot borrow|E0502|E0499|E0506|already borrowed)").unwrap());
static LIFETIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(lifetime|E0106|E0621|does not live long enough)").unwrap());
static TRAIT_BOUND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(trait bound|E0277|the trait .* is not implemented)").unwrap());
static ASYNC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\basync\b|\.await|Future is not|cannot be sent between threads)").unwrap());
static MACRO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(macro expansion|proc.macro|derive\(.*\) failed|no rules expected)").unwrap());
static IMPORT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(unresolved import|E0432|E0433|cannot find (crate|module))").unwrap());
static SYNTAX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(expected one of|SyntaxError|unexpected token)").unwrap());

/// Classify the same tail of output by finer root-cause, checked in this
/// fixed priority order. Import resolution is checked before the broader
/// syntax pattern since an unresolved-import message can otherwise read as
/// a generic parse error.
pub fn classify_root_cause(output: &str) -> ErrorCategory {
    let tail = tail_chars(output, TAIL_CHARS);

    if BORROW_PATTERN.is_match(&tail) {
        ErrorCategory::BorrowChecker
    } else if LIFETIME_PATTERN.is_match(&tail) {
        ErrorCategory::Lifetime
    } else if TRAIT_BOUND_PATTERN.is_match(&tail) {
        ErrorCategory::TraitBound
    } else if IMPORT_PATTERN.is_match(&tail) {
        ErrorCategory::ImportResolution
    } else if ASYNC_PATTERN.is_match(&tail) {
        ErrorCategory::Async
    } else if MACRO_PATTERN.is_match(&tail) {
        ErrorCategory::Macro
    } else if SYNTAX_PATTERN.is_match(&tail) {
        ErrorCategory::Syntax
    } else {
        ErrorCategory::Other
    }
}

fn tail_chars(s: &str, n: usize) -> String {
    if s.chars().count() <= n {
        return s.to_string();
    }
    s.chars().skip(s.chars().count() - n).collect()
}
