/// Core module for f-string scanning
///
/// This module contains the scanner that finds candidate lines, the rule set
/// and classifier that propose rewrites, and the auditor that runs both over
/// a file.

pub mod auditor;
pub mod classifier;
pub mod rules;
pub mod scanner;
