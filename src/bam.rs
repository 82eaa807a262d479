// src/bam.rs

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;
use noodles::bam;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::RecordBuf;

use crate::classify::{count_container_reads, HdCounts};
use crate::errors::{HdError, Result};
use crate::types::ContainerRead;

/// ZMW number.
pub const ZMW_TAG: Tag = Tag::new(b'z', b'm');
/// Predicted read accuracy.
pub const READ_QUALITY_TAG: Tag = Tag::new(b'r', b'q');

/// Pull the name, `zm` and `rq` out of an alignment record.
pub fn container_read(record: &RecordBuf) -> Result<ContainerRead> {
    let name = record.name().ok_or(HdError::MissingReadName)?.to_string();

    let zmw = match record.data().get(&ZMW_TAG) {
        None => None,
        Some(Value::String(s)) => Some(s.to_string()),
        Some(value) => Some(
            int_value(value)
                .ok_or_else(|| HdError::InvalidTagType { tag: "zm", read: name.clone() })?
                .to_string(),
        ),
    };

    let quality = match record.data().get(&READ_QUALITY_TAG) {
        None => None,
        Some(Value::Float(f)) => Some(f64::from(*f)),
        Some(value) => Some(
            int_value(value)
                .ok_or_else(|| HdError::InvalidTagType { tag: "rq", read: name.clone() })?
                as f64,
        ),
    };

    Ok(ContainerRead { name, zmw, quality })
}

fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Int8(i) => Some(i64::from(*i)),
        Value::UInt8(i) => Some(i64::from(*i)),
        Value::Int16(i) => Some(i64::from(*i)),
        Value::UInt16(i) => Some(i64::from(*i)),
        Value::Int32(i) => Some(i64::from(*i)),
        Value::UInt32(i) => Some(i64::from(*i)),
        _ => None,
    }
}

/// Count a PacBio CCS BAM in storage order (unaligned BAMs are grouped by ZMW).
pub fn count_bam<P: AsRef<Path>>(path: P) -> Result<HdCounts> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = bam::io::Reader::new(BufReader::new(file));
    let header = reader.read_header()?;
    info!("Reading alignment records from {}", path.display());

    let reads = reader
        .record_bufs(&header)
        .map(|result| result.map_err(HdError::from).and_then(|record| container_read(&record)));
    count_container_reads(reads)
}
