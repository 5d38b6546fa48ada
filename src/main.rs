use anyhow::{Context, Result};
use arbol::cli::{Cli, OutputFormat};
use arbol::csv_output::CsvOutput;
use arbol::forest::ProcessForest;
use arbol::json_output::JsonReport;
use arbol::parser::LineParser;
use arbol::report;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Consume the whole stream, one line at a time, building the forest.
/// Lines are decoded best-effort: traced string arguments may carry raw
/// bytes that are not valid UTF-8.
fn build_forest(mut reader: impl BufRead) -> Result<ProcessForest> {
    let parser = LineParser::new();
    let mut forest = ProcessForest::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .context("failed to read input stream")?;
        if read == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(event) = parser.parse_line(line.trim_end()) {
            forest.apply(&event);
        }
    }
    forest.finalize();
    Ok(forest)
}

fn render(forest: &ProcessForest, format: OutputFormat, threshold: f64) -> Result<String> {
    let rows = report::collect_rows(forest, threshold);
    match format {
        OutputFormat::Text => Ok(report::render_text(&rows)),
        OutputFormat::Json => JsonReport::from_rows(&rows, threshold).to_json(),
        OutputFormat::Csv => {
            let mut csv = CsvOutput::new();
            for row in rows {
                csv.add_row(row);
            }
            Ok(csv.to_csv())
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let forest = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            build_forest(BufReader::new(file))?
        }
        None => build_forest(io::stdin().lock())?,
    };

    let output = render(&forest, args.format, args.threshold)?;
    io::stdout()
        .write_all(output.as_bytes())
        .context("failed to write report")?;
    Ok(())
}
