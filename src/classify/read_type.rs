// src/classify/read_type.rs

use crate::errors::{HdError, Result};
use crate::types::{ContainerRead, ReadType};

/// Classify a read from its identifier.
///
/// The last three characters carry the read type: `ccs` for a double stranded
/// consensus, `fwd`/`rev` (or anything else) for a single strand.
pub fn classify_read_type(identifier: &str) -> ReadType {
    if identifier.ends_with("ccs") {
        ReadType::DoubleStrandedConsensus
    } else {
        ReadType::SingleStrandedConsensus
    }
}

/// ZMW id of a FASTQ identifier: the second `/`-delimited field.
pub fn fastq_molecule_id(identifier: &str) -> Result<&str> {
    identifier.split('/').nth(1).ok_or_else(|| HdError::MalformedIdentifier {
        identifier: identifier.to_string(),
    })
}

/// ZMW id of an alignment record, from its `zm` tag.
pub fn container_molecule_id(read: &ContainerRead) -> Result<&str> {
    read.zmw.as_deref().ok_or_else(|| HdError::MissingTag {
        tag: "zm",
        read: read.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ccs_suffix_is_double_stranded() {
        assert_eq!(classify_read_type("m64011/4391/ccs"), ReadType::DoubleStrandedConsensus);
        assert_eq!(classify_read_type("@m/1/ccs"), ReadType::DoubleStrandedConsensus);
        assert_eq!(classify_read_type("ccs"), ReadType::DoubleStrandedConsensus);
    }

    #[test]
    fn test_other_suffixes_are_single_stranded() {
        for id in ["m/1/ccs/fwd", "m/1/ccs/rev", "m/1/CCS", "m/1/ccs ", "cs", "", "m/1/0_100"] {
            assert_eq!(classify_read_type(id), ReadType::SingleStrandedConsensus, "{id}");
        }
    }

    #[test]
    fn test_fastq_molecule_id() {
        assert_eq!(fastq_molecule_id("@movie/100/ccs").expect("id"), "100");
        assert_eq!(fastq_molecule_id("@movie/100/ccs/fwd").expect("id"), "100");
        assert_eq!(fastq_molecule_id("@movie/").expect("id"), "");
    }

    #[test]
    fn test_fastq_molecule_id_without_slash_fails() {
        let err = fastq_molecule_id("@read_without_zmw").unwrap_err();
        assert!(matches!(err, HdError::MalformedIdentifier { .. }));
    }

    #[test]
    fn test_container_molecule_id() {
        let mut read = ContainerRead {
            name: "movie/7/ccs".to_string(),
            zmw: Some("7".to_string()),
            quality: Some(0.999),
        };
        assert_eq!(container_molecule_id(&read).expect("zm"), "7");

        read.zmw = None;
        let err = container_molecule_id(&read).unwrap_err();
        assert!(matches!(err, HdError::MissingTag { tag: "zm", .. }));
    }
}
