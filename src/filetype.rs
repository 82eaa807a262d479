// src/filetype.rs

use std::path::{Path, PathBuf};

use crate::errors::{HdError, Result};
use crate::report::ReportFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Bam,
    FastqGz,
}

/// Input format from the file name (case-insensitive).
pub fn input_format(path: &Path) -> Result<InputFormat> {
    let name = path.to_string_lossy().to_lowercase();
    if name.ends_with(".bam") {
        Ok(InputFormat::Bam)
    } else if name.ends_with(".fastq.gz") {
        Ok(InputFormat::FastqGz)
    } else {
        Err(HdError::UnsupportedInput { path: path.display().to_string() })
    }
}

/// Report format from the file name (case-insensitive).
pub fn report_format(path: &Path) -> Result<ReportFormat> {
    let name = path.to_string_lossy().to_lowercase();
    if name.ends_with(".json") {
        Ok(ReportFormat::Json)
    } else if name.ends_with(".csv") {
        Ok(ReportFormat::Csv)
    } else {
        Err(HdError::UnsupportedOutput { path: path.display().to_string() })
    }
}

/// Where filtered reads go: the report path with a `.fastq` extension.
pub fn filtered_reads_path(report_path: &Path) -> PathBuf {
    report_path.with_extension("fastq")
}
