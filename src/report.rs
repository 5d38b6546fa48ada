//! Report renderer
//!
//! Runs once over the finished forest: filters records by the significance
//! threshold, sorts them by start time and renders a fixed-width table with
//! tree-depth indentation. Rendering is pure over the collected rows, so
//! running it twice produces byte-identical output.

use crate::forest::ProcessForest;
use std::cmp::Ordering;

/// Default significance threshold in seconds
pub const DEFAULT_THRESHOLD: f64 = 0.2;

/// Display cap for the parent's argument string in the row suffix
const PARENT_ARGS_CAP: usize = 40;

/// Fixed header preceding all report rows
pub const REPORT_HEADER: &str =
    "  started       total     self children        pid program             args                 parent";

/// Compact identification of a row's creating process
#[derive(Debug, Clone, PartialEq)]
pub struct ParentRef {
    pub pid: i32,
    pub program: String,
    /// Already truncated to the display cap
    pub args: String,
}

/// One emitted row of the final report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub pid: i32,
    pub depth: u32,
    pub program: String,
    pub args: String,
    pub started: f64,
    pub total_time: f64,
    pub self_time: f64,
    pub children_time: f64,
    pub children_count: u32,
    pub parent: Option<ParentRef>,
}

/// Derive, filter and sort the emitted rows.
///
/// Excluded entirely: records never observed executing a program, and
/// records whose total time is unknown (stream ended first) or does not
/// exceed `threshold`.
pub fn collect_rows(forest: &ProcessForest, threshold: f64) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = forest
        .processes()
        .filter(|proc| !proc.program.is_empty())
        .filter_map(|proc| {
            let total = proc.total_time?;
            if total <= threshold {
                return None;
            }
            let parent = proc.parent.and_then(|ppid| forest.get(ppid)).map(|par| ParentRef {
                pid: par.pid,
                program: par.program.clone(),
                args: par.args.chars().take(PARENT_ARGS_CAP).collect(),
            });
            Some(ReportRow {
                pid: proc.pid,
                depth: proc.depth,
                program: proc.program.clone(),
                args: proc.args.clone(),
                started: proc.started.unwrap_or_default(),
                total_time: total,
                self_time: proc.self_time.unwrap_or(total - proc.children_time),
                children_time: proc.children_time,
                children_count: proc.children_count,
                parent,
            })
        })
        .collect();

    rows.sort_by(|a, b| a.started.partial_cmp(&b.started).unwrap_or(Ordering::Equal));
    rows
}

/// Render the fixed-width text report: one header line, one line per row.
pub fn render_text(rows: &[ReportRow]) -> String {
    let mut output = String::new();
    output.push_str(REPORT_HEADER);
    output.push('\n');

    for row in rows {
        let parent = match &row.parent {
            Some(parent) => format!(
                "pid={} exec={} args={}",
                parent.pid, parent.program, parent.args
            ),
            None => "(no parent)".to_string(),
        };
        let indent = "  ".repeat(row.depth as usize);
        output.push_str(&format!(
            "{:12.0} {:8.3} {:8.3} {:8.3} {:4} {:5} {}{} {} -- {}\n",
            row.started,
            row.total_time,
            row.self_time,
            row.children_time,
            row.children_count,
            row.pid,
            indent,
            row.program,
            row.args,
            parent,
        ));
    }

    output
}
