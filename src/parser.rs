//! Line classifier for strace event logs
//!
//! Matches a raw log line against the recognized call grammar and extracts
//! (pid, timestamp, call name, normalized arguments, optional result).
//! Everything else in the log (resumed calls, unfinished calls, signal
//! deliveries) is noise and is skipped silently: the classifier never
//! aborts the stream on a line it cannot make sense of.

use regex::Regex;
use std::collections::HashSet;
use tracing::trace;

/// Call names that never carry process-tree information
const IGNORED_CALLS: &[&str] = &["arch_prctl"];

/// One parsed line: a single system call observation
#[derive(Debug, Clone, PartialEq)]
pub struct SyscallEvent {
    pub pid: i32,
    /// Wall-clock timestamp in seconds (strace -ttt)
    pub timestamp: f64,
    pub name: String,
    /// Normalized arguments: quoting and brackets stripped, env-block
    /// marker removed, tokens whitespace-delimited
    pub args: String,
    /// Declared numeric result, when present and non-negative
    pub result: Option<i32>,
}

/// Grammar-driven classifier for one strace log line
#[derive(Debug)]
pub struct LineParser {
    call: Regex,
    arg_chars: Regex,
    env_vars: Regex,
    ignored: HashSet<&'static str>,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    pub fn new() -> Self {
        Self {
            call: Regex::new(
                r"^(?P<pid>\d+)\s+(?P<time>\d+\.\d+)\s+(?P<name>\w+)\((?P<args>.+)\)(?: = (?P<result>\d+))?",
            )
            .expect("call-line pattern is valid"),
            arg_chars: Regex::new(r#"[",\[\]]"#).expect("argument-punctuation pattern is valid"),
            env_vars: Regex::new(r"/\* \d+ vars \*/").expect("env-marker pattern is valid"),
            ignored: IGNORED_CALLS.iter().copied().collect(),
        }
    }

    /// Classify one line. `None` means "not an event" and is always safe
    /// to drop: malformed numeric fields, failed path lookups and ignored
    /// call names all land here.
    pub fn parse_line(&self, line: &str) -> Option<SyscallEvent> {
        // Failed path lookups are not process actions
        if line.contains("= -1 ENOENT") {
            return None;
        }

        let caps = self.call.captures(line)?;
        let name = &caps["name"];
        if self.ignored.contains(name) {
            trace!("ignoring {} line", name);
            return None;
        }

        // A shape-matching line with unparseable numbers degrades to
        // "not an event" rather than aborting the stream
        let pid: i32 = caps["pid"].parse().ok()?;
        let timestamp: f64 = caps["time"].parse().ok()?;
        let result = caps.name("result").and_then(|m| m.as_str().parse().ok());
        let args = self.normalize_args(&caps["args"]);

        Some(SyscallEvent {
            pid,
            timestamp,
            name: name.to_string(),
            args,
            result,
        })
    }

    /// Strip quoting and structural brackets and drop the `/* N vars */`
    /// environment marker. Downstream only needs whitespace-delimited
    /// argv-like tokens, not a faithful re-serialization.
    fn normalize_args(&self, raw: &str) -> String {
        let stripped = self.arg_chars.replace_all(raw, "");
        self.env_vars.replace_all(&stripped, "").into_owned()
    }
}
