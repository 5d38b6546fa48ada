//! Arbol - process-tree profiler for strace logs
//!
//! Rebuilds the process-creation forest from an `strace -qf -ttt
//! -e trace=process` log and attributes wall-clock time to each process,
//! split into self-time and time spent in descendants.
//!
//! The pipeline is strictly forward: raw line -> classified event ->
//! forest mutation -> (after end of stream) derived metrics -> report.

pub mod cli;
pub mod csv_output;
pub mod forest;
pub mod json_output;
pub mod parser;
pub mod report;
