//! Process forest builder
//!
//! Owns the growing pid -> record map and consumes classified events one
//! at a time, in file order (the only ordering the log guarantees).
//! The log interleaves lines from many processes; only per-pid ordering is
//! monotonic, so a parent's termination may appear before a child's.
//! Anything that depends on the whole stream (self-time) is therefore
//! derived in `finalize`, never incrementally.

use crate::parser::SyscallEvent;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Display cap for a process's rendered argument string
pub const ARGS_DISPLAY_CAP: usize = 70;

/// One record per distinct process id observed in the trace.
///
/// "Unset" is always a tagged `Option`, never a zero: a record with no
/// observed start has an unknown duration, not a duration since epoch 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Process {
    pub pid: i32,
    /// Lookup key of the creating process, `None` for roots
    pub parent: Option<i32>,
    /// Nesting level, fixed once at creation
    pub depth: u32,
    /// Path of the executable last loaded by an exec, empty until observed
    pub program: String,
    /// Normalized argv tail, capped at [`ARGS_DISPLAY_CAP`] chars
    pub args: String,
    pub started: Option<f64>,
    /// Set while `started` holds a creation timestamp that the child's own
    /// first exec has not yet confirmed
    start_is_provisional: bool,
    pub ended: Option<f64>,
    /// `ended - started`, defined only once both endpoints are known
    pub total_time: Option<f64>,
    /// Sum of total time over direct children terminated so far
    pub children_time: f64,
    /// `total_time - children_time`, defined only after [`ProcessForest::finalize`]
    pub self_time: Option<f64>,
    /// Direct children created, terminated or not
    pub children_count: u32,
}

/// A set of disjoint process trees, keyed by pid
#[derive(Debug, Default)]
pub struct ProcessForest {
    procs: HashMap<i32, Process>,
}

impl ProcessForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lazily-defaulted accessor: the first event referencing a pid, as
    /// actor or as declared child, materializes its record.
    fn get_or_create(&mut self, pid: i32) -> &mut Process {
        self.procs.entry(pid).or_insert_with(|| Process {
            pid,
            ..Process::default()
        })
    }

    pub fn get(&self, pid: i32) -> Option<&Process> {
        self.procs.get(&pid)
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.procs.values()
    }

    /// Apply one classified event. Call names with no state-machine
    /// transition leave the forest untouched.
    pub fn apply(&mut self, event: &SyscallEvent) {
        match event.name.as_str() {
            "execve" | "execveat" => self.image_replaced(event),
            "clone" | "clone3" | "fork" | "vfork" => self.child_created(event),
            "exit_group" | "exit" => self.terminated(event),
            other => trace!("no transition for {}", other),
        }
    }

    /// Image replacement: the process loads a new program without changing
    /// identity. The latest image wins, the original start time survives.
    fn image_replaced(&mut self, event: &SyscallEvent) {
        let mut tokens = event.args.split_whitespace();
        let Some(program) = tokens.next() else {
            debug!(pid = event.pid, "exec with empty argument list");
            return;
        };
        let program = program.to_string();
        // the second token repeats argv[0]; the displayable tail starts after it
        let args = tokens.skip(1).collect::<Vec<_>>().join(" ");

        let proc = self.get_or_create(event.pid);
        // the first exec claims the start; a creation-set start is only
        // provisional and is overwritten here. Later execs keep the
        // original start for duration accounting.
        if proc.started.is_none() || proc.start_is_provisional {
            proc.started = Some(event.timestamp);
            proc.start_is_provisional = false;
        }
        proc.program = program;
        proc.args = truncate_args(&args, ARGS_DISPLAY_CAP);
    }

    /// Creation: the declared result is the new child's pid.
    fn child_created(&mut self, event: &SyscallEvent) {
        let child_pid = match event.result {
            Some(pid) if pid > 0 => pid,
            _ => {
                debug!(pid = event.pid, "creation event without a valid child pid");
                return;
            }
        };

        let parent = self.get_or_create(event.pid);
        parent.children_count += 1;
        let parent_depth = parent.depth;

        let child = self.get_or_create(child_pid);
        child.parent = Some(event.pid);
        child.depth = parent_depth + 1;
        // kept only if the child never performs its own exec
        child.started = Some(event.timestamp);
        child.start_is_provisional = true;
    }

    /// Termination: close the record and roll its total into the parent.
    fn terminated(&mut self, event: &SyscallEvent) {
        let proc = self.get_or_create(event.pid);
        proc.ended = Some(event.timestamp);
        proc.total_time = proc.started.map(|started| event.timestamp - started);

        let parent = proc.parent;
        let total = proc.total_time;
        if let (Some(ppid), Some(total)) = (parent, total) {
            self.get_or_create(ppid).children_time += total;
        }
    }

    /// Single derivation pass over all records, run once after the whole
    /// stream is consumed.
    pub fn finalize(&mut self) {
        for proc in self.procs.values_mut() {
            proc.self_time = proc.total_time.map(|total| total - proc.children_time);
        }
    }
}

/// Cap `args` at `max` characters, marking the cut with an ellipsis.
pub fn truncate_args(args: &str, max: usize) -> String {
    if args.chars().count() > max {
        let mut out: String = args.chars().take(max).collect();
        out.push_str("...");
        out
    } else {
        args.to_string()
    }
}
