//! JSON output format for process-tree reports
//!
//! `--format json` implementation: the same row set as the text report,
//! serialized for machine consumption.

use crate::report::ReportRow;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Parent identification for an emitted process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonParent {
    pub pid: i32,
    pub program: String,
    pub args: String,
}

/// One emitted process record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonProcess {
    pub pid: i32,
    /// Nesting level below the forest roots
    pub depth: u32,
    /// Path of the last executed program
    pub program: String,
    /// Truncated argv tail
    pub args: String,
    /// Start timestamp in seconds (strace -ttt epoch seconds)
    pub started: f64,
    pub total_time: f64,
    pub self_time: f64,
    pub children_time: f64,
    pub children_count: u32,
    /// Creating process, absent for roots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<JsonParent>,
}

/// Complete report payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// Significance threshold the rows were filtered with
    pub threshold: f64,
    pub processes: Vec<JsonProcess>,
}

impl JsonReport {
    pub fn from_rows(rows: &[ReportRow], threshold: f64) -> Self {
        let processes = rows
            .iter()
            .map(|row| JsonProcess {
                pid: row.pid,
                depth: row.depth,
                program: row.program.clone(),
                args: row.args.clone(),
                started: row.started,
                total_time: row.total_time,
                self_time: row.self_time,
                children_time: row.children_time,
                children_count: row.children_count,
                parent: row.parent.as_ref().map(|parent| JsonParent {
                    pid: parent.pid,
                    program: parent.program.clone(),
                    args: parent.args.clone(),
                }),
            })
            .collect();
        Self {
            threshold,
            processes,
        }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ParentRef;

    fn sample_row(pid: i32, parent: Option<ParentRef>) -> ReportRow {
        ReportRow {
            pid,
            depth: if parent.is_some() { 1 } else { 0 },
            program: "/bin/work".to_string(),
            args: "--fast".to_string(),
            started: 100.0,
            total_time: 3.0,
            self_time: 3.0,
            children_time: 0.0,
            children_count: 0,
            parent,
        }
    }

    #[test]
    fn test_json_report_contains_rows() {
        let rows = vec![sample_row(2, Some(ParentRef {
            pid: 1,
            program: "/bin/build".to_string(),
            args: String::new(),
        }))];
        let report = JsonReport::from_rows(&rows, 0.2);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"processes\""));
        assert!(json.contains("\"/bin/work\""));
        assert!(json.contains("\"threshold\": 0.2"));
        assert!(json.contains("\"pid\": 2"));
    }

    #[test]
    fn test_json_omits_absent_parent() {
        let report = JsonReport::from_rows(&[sample_row(1, None)], 0.2);
        let json = report.to_json().unwrap();
        assert!(!json.contains("\"parent\""));
    }

    #[test]
    fn test_json_round_trip() {
        let rows = vec![sample_row(1, None)];
        let report = JsonReport::from_rows(&rows, 0.5);
        let json = report.to_json().unwrap();
        let parsed: JsonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.threshold, 0.5);
        assert_eq!(parsed.processes.len(), 1);
        assert_eq!(parsed.processes[0].program, "/bin/work");
        assert!(parsed.processes[0].parent.is_none());
    }
}
