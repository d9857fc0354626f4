/// File auditor: scanner and classifier run over one file
///
/// The auditor reads the target once, picks out candidate lines and
/// classifies each of them in line order. It never writes to the file it
/// scans; the result is a `Report` for the formatter.

use std::path::Path;

use log::info;
use serde::Serialize;

use crate::config::Config;
use crate::core::classifier::{diagnose_miss, Classifier, MissReason, Suggestion};
use crate::core::scanner::{find_candidates, scan_lines, SourceLine};
use crate::utils::file_utils::{read_file_content, ReadError};

/// Outcome for a single candidate line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// 1-based line number
    pub line: usize,
    /// Original line, trimmed
    pub original: String,
    /// Proposed replacement, indentation preserved
    pub suggestion: Option<String>,
    /// Rule that produced the suggestion
    pub rule: Option<String>,
    /// Why no rule matched
    pub reason: Option<MissReason>,
}

impl ReportEntry {
    fn from_classification(line: &SourceLine, suggestion: Suggestion) -> Self {
        match suggestion {
            Suggestion::Matched(rewrite) => Self {
                line: line.number,
                original: line.trimmed().to_string(),
                suggestion: Some(rewrite.text),
                rule: Some(rewrite.rule),
                reason: None,
            },
            Suggestion::NoMatch => Self {
                line: line.number,
                original: line.trimmed().to_string(),
                suggestion: None,
                rule: None,
                reason: Some(diagnose_miss(&line.text)),
            },
        }
    }

    pub fn has_suggestion(&self) -> bool {
        self.suggestion.is_some()
    }
}

/// Result of auditing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Path as given on the command line
    pub path: String,
    /// Number of lines in the file
    pub total_lines: usize,
    /// One entry per candidate, in line order
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn candidate_count(&self) -> usize {
        self.entries.len()
    }

    pub fn suggested_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.has_suggestion()).count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.candidate_count() - self.suggested_count()
    }
}

/// Runs the scan/classify pass over a file
#[derive(Debug, Clone, Default)]
pub struct FileAuditor {
    classifier: Classifier,
}

impl FileAuditor {
    /// Auditor using the built-in rules minus any disabled in `config`
    pub fn new(config: &Config) -> Self {
        Self::with_classifier(Classifier::without_rules(&config.disabled_rules))
    }

    pub fn with_classifier(classifier: Classifier) -> Self {
        Self { classifier }
    }

    /// Read and audit a file
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the file to scan
    ///
    /// # Returns
    ///
    /// The report, or the read failure. Nothing is classified when the read
    /// fails.
    pub fn audit_file(&self, file_path: &Path) -> Result<Report, ReadError> {
        info!("Scanning file: {}", file_path.display());
        let content = read_file_content(file_path)?;
        Ok(self.audit_content(&file_path.display().to_string(), &content))
    }

    /// Audit content that has already been read
    pub fn audit_content(&self, path: &str, content: &str) -> Report {
        let lines = scan_lines(content);
        let candidates = find_candidates(&lines);
        info!(
            "Found {} candidate lines out of {} in {}",
            candidates.len(),
            lines.len(),
            path
        );

        let entries = candidates
            .iter()
            .map(|line| {
                let suggestion = self.classifier.classify(&line.text);
                ReportEntry::from_classification(line, suggestion)
            })
            .collect();

        Report {
            path: path.to_string(),
            total_lines: lines.len(),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"import logging

logger = logging.getLogger(__name__)

def load(items):
    count = len(items)
    logger.info(f"Loaded {count} items")
    s = f"{a}-{b}"
    return count
"#;

    #[test]
    fn test_audit_content_entries() {
        let auditor = FileAuditor::default();
        let report = auditor.audit_content("sample.py", SAMPLE);

        assert_eq!(report.total_lines, 9);
        assert_eq!(report.candidate_count(), 2);
        assert_eq!(report.suggested_count(), 1);
        assert_eq!(report.unresolved_count(), 1);

        let logged = &report.entries[0];
        assert_eq!(logged.line, 7);
        assert_eq!(logged.original, r#"logger.info(f"Loaded {count} items")"#);
        assert_eq!(
            logged.suggestion.as_deref(),
            Some(r#"    logger.info("Loaded %s items", count)"#)
        );
        assert_eq!(logged.rule.as_deref(), Some("logging_call"));

        let unresolved = &report.entries[1];
        assert_eq!(unresolved.line, 8);
        assert_eq!(unresolved.suggestion, None);
        assert_eq!(unresolved.reason, Some(MissReason::MultipleSlots));
    }

    #[test]
    fn test_audit_empty_content() {
        let report = FileAuditor::default().audit_content("empty.py", "");
        assert_eq!(report.total_lines, 0);
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_disabled_rule_from_config() {
        let config = Config {
            disabled_rules: vec!["logging_call".to_string()],
            ..Config::default()
        };
        let report = FileAuditor::new(&config).audit_content("sample.py", SAMPLE);
        assert_eq!(report.suggested_count(), 0);
        assert_eq!(report.entries[0].reason, Some(MissReason::UnsupportedShape));
    }
}
