/// File handling utilities
///
/// This module reads the scanned file as UTF-8 text. The file is opened once,
/// read to the end and closed before any scanning happens; every failure is
/// reported as a `ReadError`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

/// Error reading the file to scan
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The path is missing or is not a regular file
    #[error("{} is not an existing regular file", .path.display())]
    NotAFile { path: PathBuf },

    /// The file is not valid UTF-8
    #[error("{} is not valid UTF-8 text", .path.display())]
    Encoding { path: PathBuf },

    /// Any other I/O failure, e.g. missing permissions
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Whether the path points at an existing regular file (symlinks followed)
pub fn is_regular_file(file_path: &Path) -> bool {
    fs::metadata(file_path)
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

/// Read the whole file as UTF-8 text
///
/// # Arguments
///
/// * `file_path` - Path to the file
///
/// # Returns
///
/// The file content, line terminators intact
pub fn read_file_content(file_path: &Path) -> Result<String, ReadError> {
    if !is_regular_file(file_path) {
        return Err(ReadError::NotAFile {
            path: file_path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(file_path).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => ReadError::Encoding {
            path: file_path.to_path_buf(),
        },
        _ => ReadError::Io {
            path: file_path.to_path_buf(),
            source: e,
        },
    })?;

    debug!("Read {} bytes from {}", content.len(), file_path.display());
    Ok(content)
}
