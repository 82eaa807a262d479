// src/classify/counts.rs

use log::debug;

use super::read_type::{classify_read_type, container_molecule_id, fastq_molecule_id};
use super::window::RecencyWindow;
use crate::errors::{HdError, Result};
use crate::types::{Bucket, BucketCounts, ContainerRead, FastqRecord, ReadType};

/// Per-run tallies for both buckets plus the ZMW window.
///
/// One window is shared by both buckets and never reset when reads switch
/// bucket.
#[derive(Debug, Default, Clone)]
pub struct HdCounts {
    pub hifi: BucketCounts,
    pub occs: BucketCounts,
    window: RecencyWindow,
    /// Container reads with a negative `rq`, not counted in any bucket.
    pub skipped: u64,
}

impl HdCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(&self, bucket: Bucket) -> &BucketCounts {
        match bucket {
            Bucket::HiFi => &self.hifi,
            Bucket::OtherCcs => &self.occs,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut BucketCounts {
        match bucket {
            Bucket::HiFi => &mut self.hifi,
            Bucket::OtherCcs => &mut self.occs,
        }
    }

    /// Count one read.
    ///
    /// A ZMW is counted on its first read. If that read is single stranded the
    /// ZMW is heteroduplex. Later reads of the same ZMW only add to `ss`;
    /// later double stranded reads add nothing.
    pub fn update(&mut self, bucket: Bucket, read_type: ReadType, molecule_id: &str) {
        if !self.window.seen_before(molecule_id) {
            self.window.record(molecule_id);
            let counts = self.bucket_mut(bucket);
            counts.zm += 1;
            match read_type {
                ReadType::SingleStrandedConsensus => {
                    counts.hd += 1;
                    counts.ss += 1;
                }
                ReadType::DoubleStrandedConsensus => counts.ds += 1,
            }
        } else if read_type == ReadType::SingleStrandedConsensus {
            self.bucket_mut(bucket).ss += 1;
        }
    }
}

/// Count alignment reads, stored grouped by ZMW.
///
/// Reads with `rq < 0` are skipped; the rest go to HiFi when `rq >= 0.99`,
/// otherwise to Other CCS.
pub fn count_container_reads<I>(reads: I) -> Result<HdCounts>
where
    I: IntoIterator<Item = Result<ContainerRead>>,
{
    let mut counts = HdCounts::new();
    for read in reads {
        let read = read?;
        let quality = read.quality.ok_or_else(|| HdError::MissingTag {
            tag: "rq",
            read: read.name.clone(),
        })?;
        if quality < 0.0 {
            debug!("Skipping non-CCS read {} (rq={quality})", read.name);
            counts.skipped += 1;
            continue;
        }
        let read_type = classify_read_type(&read.name);
        let molecule_id = container_molecule_id(&read)?;
        counts.update(Bucket::for_quality(quality), read_type, molecule_id);
    }
    Ok(counts)
}

/// Count FASTQ records. Every record lands in the HiFi bucket.
pub fn count_fastq_records<I>(records: I) -> Result<HdCounts>
where
    I: IntoIterator<Item = Result<FastqRecord>>,
{
    let mut counts = HdCounts::new();
    for record in records {
        let record = record?;
        let read_type = classify_read_type(&record.name);
        let molecule_id = fastq_molecule_id(&record.name)?;
        counts.update(Bucket::HiFi, read_type, molecule_id);
    }
    Ok(counts)
}
