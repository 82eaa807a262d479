//src/types.rs

use serde::{Serialize, Serializer};

/// One FASTQ record as four right-trimmed lines.
/// The identifier keeps its leading `@`, e.g. `@movie/100/ccs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub name: String,
    pub sequence: String,
    pub optional: String,
    pub quality: String,
}

/// The per-read metadata the counter needs from an alignment record.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerRead {
    pub name: String,
    /// Value of the `zm` tag, rendered as a string.
    pub zmw: Option<String>,
    /// Value of the `rq` tag.
    pub quality: Option<f64>,
}

/// Double stranded (`ds_ccs`) or single stranded (`ss_ccs`) consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadType {
    DoubleStrandedConsensus,
    SingleStrandedConsensus,
}

/// Reads with `rq` at or above this value are HiFi.
pub const HIFI_MIN_QUALITY: f64 = 0.99;

/// Fidelity class a read is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    HiFi,
    OtherCcs,
}

impl Bucket {
    /// Report order.
    pub const ALL: [Bucket; 2] = [Bucket::HiFi, Bucket::OtherCcs];

    pub fn for_quality(quality: f64) -> Self {
        if quality >= HIFI_MIN_QUALITY {
            Bucket::HiFi
        } else {
            Bucket::OtherCcs
        }
    }

    /// Label used in the `data` column of the report.
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::HiFi => "HiFi",
            Bucket::OtherCcs => "Other CCS",
        }
    }

    /// What "proportion single stranded reads" reports when the bucket saw no reads.
    /// HiFi reports null while Other CCS reports zero.
    pub fn empty_read_percent(&self) -> ReportValue {
        match self {
            Bucket::HiFi => ReportValue::Null,
            Bucket::OtherCcs => ReportValue::Integer(0),
        }
    }
}

/// Running tallies for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCounts {
    /// Distinct molecules (ZMWs).
    pub zm: u64,
    /// Molecules with at least one single stranded read.
    pub hd: u64,
    /// Double stranded reads.
    pub ds: u64,
    /// Single stranded reads.
    pub ss: u64,
}

/// A report cell. Integers and floats are kept apart so that a zero
/// short-circuit prints `0` while a computed percentage prints `50.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportValue {
    Integer(u64),
    Float(f64),
    Null,
}

impl Serialize for ReportValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            ReportValue::Integer(v) => serializer.serialize_u64(v),
            ReportValue::Float(v) => serializer.serialize_f64(v),
            ReportValue::Null => serializer.serialize_none(),
        }
    }
}

/// One row of the heteroduplex report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub data: &'static str,
    pub description: &'static str,
    pub value: ReportValue,
}
