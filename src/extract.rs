//! Archive extraction via an external utility
//!
//! Dump archives are 7z-compressed; decompression stays delegated to an
//! external tool rather than being reimplemented. The collaborator is a
//! trait so the pipeline can be exercised in tests without a real binary.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::info;

/// Errors from the extraction collaborator.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extraction utility '{tool}' could not be run: {source}")]
    ToolMissing {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("extraction utility exited with {status} for {archive}")]
    Failed { status: String, archive: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Unpacks one archive into a destination directory.
pub trait ArchiveExtractor: Send {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractionError>;
}

/// Production extractor shelling out to 7-Zip.
///
/// Invocation contract: `7z x -o<dest> -y <archive>`. The tool path comes
/// from configuration so a portable install works the same as a PATH one.
pub struct SevenZipExtractor {
    tool: PathBuf,
}

impl SevenZipExtractor {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }
}

impl ArchiveExtractor for SevenZipExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ExtractionError> {
        std::fs::create_dir_all(dest)?;

        info!(
            "Extracting {} into {}",
            archive.display(),
            dest.display()
        );

        let status = Command::new(&self.tool)
            .arg("x")
            .arg(format!("-o{}", dest.display()))
            .arg("-y")
            .arg(archive)
            .status()
            .map_err(|source| ExtractionError::ToolMissing {
                tool: self.tool.display().to_string(),
                source,
            })?;

        if !status.success() {
            return Err(ExtractionError::Failed {
                status: status.to_string(),
                archive: archive.display().to_string(),
            });
        }

        Ok(())
    }
}
