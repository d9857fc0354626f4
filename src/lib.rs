/// fstring_rewriter - flags f-string literals and suggests %-style rewrites
///
/// This library scans a source file line by line, picks out lines using
/// f-string literals and proposes an equivalent rewrite using `%s`
/// placeholders. Files are only ever read.

pub mod core;
pub mod utils;

// Re-export main types for convenience
pub use crate::core::auditor::{FileAuditor, Report, ReportEntry};
pub use crate::core::classifier::{Classifier, MissReason, Rewrite, Suggestion};
pub use crate::utils::file_utils::ReadError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Audit a single file with the built-in rules
///
/// This is a convenience function for simple use cases.
///
/// # Arguments
///
/// * `file_path` - Path to the file to scan
///
/// # Returns
///
/// One report entry per candidate line
pub fn audit_file<P: AsRef<std::path::Path>>(file_path: P) -> anyhow::Result<Report> {
    let auditor = FileAuditor::new(&config::Config::default());
    Ok(auditor.audit_file(file_path.as_ref())?)
}

/// Configuration file handling
pub mod config {
    use std::path::Path;

    use log::{error, info};
    use serde::Deserialize;

    /// File scanned when no path is given
    pub const DEFAULT_FILE: &str = "file_manager.py";

    /// Settings read from the optional JSON config file
    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    #[serde(default)]
    pub struct Config {
        /// File scanned when no path argument is given
        pub default_file: String,
        /// Built-in rules to skip, by name
        pub disabled_rules: Vec<String>,
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                default_file: DEFAULT_FILE.to_string(),
                disabled_rules: Vec::new(),
            }
        }
    }

    /// Load configuration from file if provided
    ///
    /// A missing, unreadable or malformed file is logged and the defaults
    /// are used instead.
    pub fn load_config(config_path: Option<&Path>) -> Config {
        let path = match config_path {
            Some(path) => path,
            None => return Config::default(),
        };

        if !path.exists() {
            error!("Configuration file not found: {}", path.display());
            return Config::default();
        }

        let config_str = match std::fs::read_to_string(path) {
            Ok(config_str) => config_str,
            Err(e) => {
                error!("Failed to read configuration file {}: {}", path.display(), e);
                return Config::default();
            }
        };

        match serde_json::from_str(&config_str) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                error!("Invalid JSON in configuration file: {}", e);
                Config::default()
            }
        }
    }

}
