use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use noodles::bam;
use noodles::sam;
use noodles::sam::alignment::io::Write as _;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::record_buf::Data;
use noodles::sam::alignment::RecordBuf;
use tempfile::TempDir;

use pb_hd_tools::types::BucketCounts;
use pb_hd_tools::{filter_heteroduplexes, run, HdError, RunOptions};

const TWO_RECORDS: &str = "@movie/100/ccs\nACGT\n+\n!!!!\n@movie/100/fwd\nACG\n+\n!!!\n";

fn write_gz(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut enc = GzEncoder::new(File::create(&path).expect("create"), Compression::default());
    enc.write_all(text.as_bytes()).expect("write");
    enc.finish().expect("finish");
    path
}

fn options(infile: &Path, outfile: PathBuf, filter: bool) -> RunOptions {
    RunOptions { infile: infile.to_path_buf(), outfile, filter, mask: false }
}

#[test]
fn test_fastq_count_json() {
    let dir = TempDir::new().expect("tempdir");
    let infile = write_gz(&dir, "reads.fastq.gz", TWO_RECORDS);
    let outfile = dir.path().join("report.json");

    let counts = run(&options(&infile, outfile.clone(), false)).expect("run");
    assert_eq!(counts.hifi, BucketCounts { zm: 1, hd: 1, ds: 1, ss: 1 });

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&outfile).expect("read")).expect("parse");
    let rows = json.as_array().expect("array");
    assert_eq!(rows.len(), 12);
    let hifi: Vec<f64> = rows[..6].iter().map(|r| r["value"].as_f64().expect("number")).collect();
    assert_eq!(hifi, [1.0, 1.0, 100.0, 1.0, 1.0, 50.0]);
    assert!(rows[..6].iter().all(|r| r["data"] == "HiFi"));
    assert!(rows[6..].iter().all(|r| r["data"] == "Other CCS"));
    assert!(!dir.path().join("report.fastq").exists());
}

#[test]
fn test_fastq_count_csv() {
    let dir = TempDir::new().expect("tempdir");
    let infile = write_gz(&dir, "reads.fastq.gz", TWO_RECORDS);
    let outfile = dir.path().join("report.csv");

    run(&options(&infile, outfile.clone(), false)).expect("run");
    let text = std::fs::read_to_string(&outfile).expect("read");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "data,description,value");
    assert_eq!(lines[3], "HiFi,Proportion heteroduplex ZMWs (%),100.0");
    assert_eq!(lines[6], "HiFi,Proportion single stranded reads (%),50.0");
    assert_eq!(lines[12], "Other CCS,Proportion single stranded reads (%),0");
}

#[test]
fn test_report_is_reproducible() {
    let dir = TempDir::new().expect("tempdir");
    let infile = write_gz(&dir, "reads.fastq.gz", TWO_RECORDS);
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    run(&options(&infile, first.clone(), false)).expect("first run");
    run(&options(&infile, second.clone(), false)).expect("second run");
    assert_eq!(std::fs::read(first).expect("first"), std::fs::read(second).expect("second"));
}

#[test]
fn test_filter_keeps_double_stranded_reads() {
    let dir = TempDir::new().expect("tempdir");
    let infile = write_gz(&dir, "reads.fastq.gz", TWO_RECORDS);
    let outfile = dir.path().join("report.json");

    run(&options(&infile, outfile.clone(), true)).expect("run");
    assert!(outfile.exists());
    let kept = std::fs::read_to_string(dir.path().join("report.fastq")).expect("filtered");
    assert_eq!(kept, "@movie/100/ccs\nACGT\n+\n!!!!\n");
}

#[test]
fn test_filter_appends_and_preserves_order() {
    let dir = TempDir::new().expect("tempdir");
    let text = "@m/1/ccs\nA\n+\n!\n@m/1/rev\nC\n+\n!\n@m/2/ccs\nG\n+\n!\n@m/3/fwd\nT\n+\n!\n@m/4";
    let infile = write_gz(&dir, "reads.fastq.gz", text);
    let outfile = dir.path().join("kept.fastq");
    std::fs::write(&outfile, "@old/0/ccs\nN\n+\n!\n").expect("seed");

    let (kept, dropped) = filter_heteroduplexes(&infile, &outfile).expect("filter");
    assert_eq!((kept, dropped), (2, 2));
    let out = std::fs::read_to_string(&outfile).expect("read");
    assert_eq!(out, "@old/0/ccs\nN\n+\n!\n@m/1/ccs\nA\n+\n!\n@m/2/ccs\nG\n+\n!\n");
}

#[test]
fn test_partial_record_is_ignored_in_counts() {
    let dir = TempDir::new().expect("tempdir");
    let infile = write_gz(&dir, "reads.fastq.gz", &format!("{TWO_RECORDS}@movie/200/fwd\nAC\n"));
    let counts = run(&options(&infile, dir.path().join("r.json"), false)).expect("run");
    assert_eq!(counts.hifi, BucketCounts { zm: 1, hd: 1, ds: 1, ss: 1 });
}

#[test]
fn test_many_molecules_are_all_counted() {
    let dir = TempDir::new().expect("tempdir");
    let text: String = (0..12).map(|i| format!("@movie/{i}/ccs\nA\n+\n!\n")).collect();
    let infile = write_gz(&dir, "reads.fastq.gz", &text);
    let counts = run(&options(&infile, dir.path().join("r.json"), false)).expect("run");
    assert_eq!(counts.hifi, BucketCounts { zm: 12, hd: 0, ds: 12, ss: 0 });
}

#[test]
fn test_malformed_identifier_fails_run() {
    let dir = TempDir::new().expect("tempdir");
    let infile = write_gz(&dir, "reads.fastq.gz", "@no_slashes_ccs\nA\n+\n!\n");
    let outfile = dir.path().join("r.json");
    let err = run(&options(&infile, outfile.clone(), false)).unwrap_err();
    assert!(matches!(err, HdError::MalformedIdentifier { .. }));
    assert!(!outfile.exists());
}

#[test]
fn test_bad_extensions_fail_before_output() {
    let dir = TempDir::new().expect("tempdir");
    let infile = write_gz(&dir, "reads.fastq.gz", TWO_RECORDS);
    let err = run(&options(&infile, dir.path().join("r.txt"), false)).unwrap_err();
    assert!(matches!(err, HdError::UnsupportedOutput { .. }));

    let fq = dir.path().join("reads.fq");
    std::fs::write(&fq, TWO_RECORDS).expect("write");
    let err = run(&options(&fq, dir.path().join("r.json"), false)).unwrap_err();
    assert!(matches!(err, HdError::UnsupportedInput { .. }));
}

fn unmapped_ccs(name: &str, zmw: i32, rq: f32) -> RecordBuf {
    let data: Data = [
        (Tag::new(b'z', b'm'), Value::Int32(zmw)),
        (Tag::new(b'r', b'q'), Value::Float(rq)),
    ]
    .into_iter()
    .collect();
    RecordBuf::builder().set_name(name).set_flags(Flags::UNMAPPED).set_data(data).build()
}

fn write_bam(dir: &TempDir, name: &str, records: &[RecordBuf]) -> PathBuf {
    let path = dir.path().join(name);
    let header = sam::Header::default();
    let mut writer = bam::io::Writer::new(File::create(&path).expect("create"));
    writer.write_header(&header).expect("header");
    for record in records {
        writer.write_alignment_record(&header, record).expect("record");
    }
    writer.try_finish().expect("finish");
    path
}

#[test]
fn test_bam_count_routes_by_read_quality() {
    let dir = TempDir::new().expect("tempdir");
    let infile = write_bam(
        &dir,
        "reads.bam",
        &[
            unmapped_ccs("m/1/ccs", 1, 0.999),
            unmapped_ccs("m/2/fwd", 2, 0.995),
            unmapped_ccs("m/2/rev", 2, 0.995),
            unmapped_ccs("m/3/ccs", 3, 0.9),
            unmapped_ccs("m/4/ccs", 4, -1.0),
        ],
    );
    let outfile = dir.path().join("report.csv");

    let counts = run(&options(&infile, outfile.clone(), false)).expect("run");
    assert_eq!(counts.hifi, BucketCounts { zm: 2, hd: 1, ds: 1, ss: 2 });
    assert_eq!(counts.occs, BucketCounts { zm: 1, hd: 0, ds: 1, ss: 0 });
    assert_eq!(counts.skipped, 1);

    let text = std::fs::read_to_string(&outfile).expect("read");
    let expected = "data,description,value\n\
        HiFi,All ZMWs (DNA molecules),2\n\
        HiFi,Heteroduplex ZMWs (DNA molecules),1\n\
        HiFi,Proportion heteroduplex ZMWs (%),50.0\n\
        HiFi,Double stranded reads,1\n\
        HiFi,Single stranded reads,2\n\
        HiFi,Proportion single stranded reads (%),66.66666666666666\n\
        Other CCS,All ZMWs (DNA molecules),1\n\
        Other CCS,Heteroduplex ZMWs (DNA molecules),0\n\
        Other CCS,Proportion heteroduplex ZMWs (%),0\n\
        Other CCS,Double stranded reads,1\n\
        Other CCS,Single stranded reads,0\n\
        Other CCS,Proportion single stranded reads (%),0.0\n";
    assert_eq!(text, expected);
}

#[test]
fn test_bam_missing_zm_fails_before_report() {
    let dir = TempDir::new().expect("tempdir");
    let data: Data = [(Tag::new(b'r', b'q'), Value::Float(0.999))].into_iter().collect();
    let record =
        RecordBuf::builder().set_name("m/1/ccs").set_flags(Flags::UNMAPPED).set_data(data).build();
    let infile = write_bam(&dir, "reads.bam", &[record]);
    let outfile = dir.path().join("report.json");

    let err = run(&options(&infile, outfile.clone(), false)).unwrap_err();
    assert!(matches!(err, HdError::MissingTag { tag: "zm", .. }));
    assert!(!outfile.exists());
}

#[test]
fn test_bam_filter_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let infile = write_bam(&dir, "reads.bam", &[unmapped_ccs("m/1/ccs", 1, 0.999)]);
    let outfile = dir.path().join("report.json");

    let err = run(&options(&infile, outfile.clone(), true)).unwrap_err();
    assert!(matches!(err, HdError::FilterNotSupported { .. }));
    assert!(!outfile.exists());
    assert!(!dir.path().join("report.fastq").exists());
}
