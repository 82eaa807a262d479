// src/lib.rs
pub mod bam;
pub mod classify;
pub mod errors;
pub mod fastq;
pub mod filetype;
pub mod report;
pub mod types;

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::classify::{classify_read_type, count_fastq_records, HdCounts};
use crate::fastq::{open_fastq_gz, FastqAppender, FastqRecords};
use crate::filetype::{filtered_reads_path, input_format, report_format, InputFormat};
use crate::report::{build_report, write_report, ReportFormat};
use crate::types::ReadType;

pub use crate::errors::{HdError, Result};

/// Options for one run of the tool.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub infile: PathBuf,
    pub outfile: PathBuf,
    /// Also write double stranded reads to a `.fastq` next to the report.
    pub filter: bool,
    /// Accepted but not implemented.
    pub mask: bool,
}

/// A validated run: formats resolved, filter target decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub infile: PathBuf,
    pub input_format: InputFormat,
    pub outfile: PathBuf,
    pub report_format: ReportFormat,
    pub filtered_reads: Option<PathBuf>,
}

impl RunOptions {
    /// Check paths and flags before anything is written.
    pub fn plan(&self) -> Result<RunPlan> {
        if !self.infile.exists() {
            return Err(HdError::InputNotFound { path: self.infile.display().to_string() });
        }
        let input = input_format(&self.infile)?;
        let report = report_format(&self.outfile)?;

        let filtered_reads = match (self.filter, input) {
            (false, _) => None,
            (true, InputFormat::Bam) => {
                return Err(HdError::FilterNotSupported { path: self.infile.display().to_string() })
            }
            (true, InputFormat::FastqGz) => Some(filtered_reads_path(&self.outfile)),
        };

        Ok(RunPlan {
            infile: self.infile.clone(),
            input_format: input,
            outfile: self.outfile.clone(),
            report_format: report,
            filtered_reads,
        })
    }
}

/// Count heteroduplex ZMWs and by-strand reads, then write the report.
pub fn count_heteroduplexes(plan: &RunPlan) -> Result<HdCounts> {
    let counts = match plan.input_format {
        InputFormat::Bam => bam::count_bam(&plan.infile)?,
        InputFormat::FastqGz => {
            let mut records = FastqRecords::new(open_fastq_gz(&plan.infile)?);
            let counts = count_fastq_records(records.by_ref())?;
            warn_dangling(&plan.infile, records.dangling_lines());
            counts
        }
    };

    info!("HiFi counts: {:?}", counts.hifi);
    info!("Other CCS counts: {:?}", counts.occs);
    if counts.skipped > 0 {
        info!("Skipped {} reads with negative read quality", counts.skipped);
    }

    write_report(&build_report(&counts), plan.report_format, &plan.outfile)?;
    info!("Wrote report to {}", plan.outfile.display());
    Ok(counts)
}

/// Append the double stranded records of a gzipped FASTQ to `outfile`.
/// Returns (kept, dropped).
pub fn filter_heteroduplexes<P: AsRef<Path>, Q: AsRef<Path>>(
    infile: P,
    outfile: Q,
) -> Result<(u64, u64)> {
    let infile = infile.as_ref();
    let mut records = FastqRecords::new(open_fastq_gz(infile)?);
    let mut out = FastqAppender::open(outfile.as_ref())?;
    let (mut kept, mut dropped) = (0u64, 0u64);

    for record in records.by_ref() {
        let record = record?;
        match classify_read_type(&record.name) {
            ReadType::DoubleStrandedConsensus => {
                out.append(&record)?;
                kept += 1;
            }
            ReadType::SingleStrandedConsensus => dropped += 1,
        }
    }
    warn_dangling(infile, records.dangling_lines());

    info!(
        "Kept {kept} double stranded reads, dropped {dropped} single stranded reads; wrote {}",
        outfile.as_ref().display()
    );
    Ok((kept, dropped))
}

fn warn_dangling(path: &Path, lines: usize) {
    if lines > 0 {
        warn!("Ignored {lines} trailing line(s) of an incomplete record in {}", path.display());
    }
}

/// Stage changes reported by `run_with_progress`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunEvent<'a> {
    CountStarted { infile: &'a Path },
    CountFinished { hifi_zmws: u64, other_zmws: u64 },
    FilterStarted { outfile: &'a Path },
    FilterFinished { outfile: &'a Path, kept: u64, dropped: u64 },
}

/// Validate, count, and optionally filter.
pub fn run(options: &RunOptions) -> Result<HdCounts> {
    run_with_progress(options, |_| {})
}

/// `run`, calling `progress` as each stage starts and finishes.
pub fn run_with_progress<F>(options: &RunOptions, mut progress: F) -> Result<HdCounts>
where
    F: FnMut(RunEvent<'_>),
{
    let plan = options.plan()?;
    info!("Input file: {}", plan.infile.display());
    info!("Output file: {}", plan.outfile.display());
    if options.mask {
        warn!("Masking heteroduplex bases is not implemented; --mask is ignored");
    }

    progress(RunEvent::CountStarted { infile: &plan.infile });
    let counts = count_heteroduplexes(&plan)?;
    progress(RunEvent::CountFinished { hifi_zmws: counts.hifi.zm, other_zmws: counts.occs.zm });

    if let Some(filtered) = &plan.filtered_reads {
        progress(RunEvent::FilterStarted { outfile: filtered });
        let (kept, dropped) = filter_heteroduplexes(&plan.infile, filtered)?;
        progress(RunEvent::FilterFinished { outfile: filtered, kept, dropped });
    }
    Ok(counts)
}
