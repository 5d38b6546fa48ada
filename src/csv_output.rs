//! CSV output format for process-tree reports
//!
//! `--format csv` implementation for spreadsheet analysis and machine
//! parsing. Same row set as the text report, one record per line.

use crate::report::ReportRow;

/// CSV report formatter
#[derive(Debug, Default)]
pub struct CsvOutput {
    rows: Vec<ReportRow>,
}

impl CsvOutput {
    /// Create a new CSV output formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a report row to the output
    pub fn add_row(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    fn header() -> &'static str {
        "started,total,self,children,children_count,pid,depth,program,args,parent_pid"
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Format one row as a CSV record
    fn format_row(row: &ReportRow) -> String {
        let parent_pid = row
            .parent
            .as_ref()
            .map(|parent| parent.pid.to_string())
            .unwrap_or_default();
        [
            row.started.to_string(),
            row.total_time.to_string(),
            row.self_time.to_string(),
            row.children_time.to_string(),
            row.children_count.to_string(),
            row.pid.to_string(),
            row.depth.to_string(),
            Self::escape_field(&row.program),
            Self::escape_field(&row.args),
            parent_pid,
        ]
        .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(Self::header());
        output.push('\n');
        for row in &self.rows {
            output.push_str(&Self::format_row(row));
            output.push('\n');
        }
        output
    }
}
