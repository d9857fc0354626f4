/// Utility modules
///
/// File reading and report output.

pub mod file_utils;
pub mod output_formatter;
