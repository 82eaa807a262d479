// src/report.rs

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};

use crate::classify::HdCounts;
use crate::errors::Result;
use crate::types::{Bucket, BucketCounts, ReportRow, ReportValue};

pub const DESC_ALL_ZMWS: &str = "All ZMWs (DNA molecules)";
pub const DESC_HD_ZMWS: &str = "Heteroduplex ZMWs (DNA molecules)";
pub const DESC_HD_PERCENT: &str = "Proportion heteroduplex ZMWs (%)";
pub const DESC_DS_READS: &str = "Double stranded reads";
pub const DESC_SS_READS: &str = "Single stranded reads";
pub const DESC_SS_PERCENT: &str = "Proportion single stranded reads (%)";

/// Output format of the count report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
}

/// Percentage of heteroduplex ZMWs, `0` when there are none.
pub fn heteroduplex_percent(counts: &BucketCounts) -> ReportValue {
    if counts.hd == 0 {
        ReportValue::Integer(0)
    } else {
        // hd only grows together with zm, so zm > 0 here
        ReportValue::Float(100.0 * (counts.hd as f64 / counts.zm as f64))
    }
}

/// Percentage of single stranded reads; an empty bucket reports per its policy.
pub fn single_stranded_percent(bucket: Bucket, counts: &BucketCounts) -> ReportValue {
    let read_sum = counts.ds + counts.ss;
    if read_sum == 0 {
        bucket.empty_read_percent()
    } else {
        ReportValue::Float(100.0 * (counts.ss as f64 / read_sum as f64))
    }
}

/// The six rows for one bucket, in report order.
pub fn bucket_rows(bucket: Bucket, counts: &BucketCounts) -> [ReportRow; 6] {
    let row = |description, value| ReportRow { data: bucket.label(), description, value };
    [
        row(DESC_ALL_ZMWS, ReportValue::Integer(counts.zm)),
        row(DESC_HD_ZMWS, ReportValue::Integer(counts.hd)),
        row(DESC_HD_PERCENT, heteroduplex_percent(counts)),
        row(DESC_DS_READS, ReportValue::Integer(counts.ds)),
        row(DESC_SS_READS, ReportValue::Integer(counts.ss)),
        row(DESC_SS_PERCENT, single_stranded_percent(bucket, counts)),
    ]
}

/// All twelve rows: HiFi then Other CCS.
pub fn build_report(counts: &HdCounts) -> Vec<ReportRow> {
    Bucket::ALL
        .iter()
        .flat_map(|&bucket| bucket_rows(bucket, counts.bucket(bucket)))
        .collect()
}

/// Shortest round-trip digits, laid out like Python's `repr(float)`:
/// positional for exponents in `-4..16` (always with a fractional part),
/// otherwise `d.ddde-05` / `de+16`.
pub fn float_repr(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let sci = format!("{value:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return value.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return value.to_string();
    };
    if (-4..16).contains(&exp) {
        let fixed = value.to_string();
        if fixed.contains('.') {
            fixed
        } else {
            format!("{fixed}.0")
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}

impl ReportValue {
    /// Text form of a cell; null is the empty string.
    pub fn render(&self) -> String {
        match *self {
            ReportValue::Integer(v) => v.to_string(),
            ReportValue::Float(v) => float_repr(v),
            ReportValue::Null => String::new(),
        }
    }
}

/// Pretty printer with 4-space indentation whose floats go through `float_repr`.
struct ReportJsonFormatter<'a>(PrettyFormatter<'a>);

impl Formatter for ReportJsonFormatter<'_> {
    fn write_f64<W: ?Sized + Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(float_repr(value).as_bytes())
    }

    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

/// Pretty JSON array with 4-space indentation, no trailing newline.
pub fn report_to_json(rows: &[ReportRow]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = ReportJsonFormatter(PrettyFormatter::with_indent(b"    "));
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    rows.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[derive(Serialize)]
struct CsvRow<'a> {
    data: &'a str,
    description: &'a str,
    value: String,
}

/// CSV with a `data,description,value` header; null values are empty fields.
pub fn report_to_csv(rows: &[ReportRow]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in rows {
        wtr.serialize(CsvRow {
            data: row.data,
            description: row.description,
            value: row.value.render(),
        })?;
    }
    wtr.flush()?;
    let buf = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the report to `path`, truncating any existing file.
pub fn write_report<P: AsRef<Path>>(
    rows: &[ReportRow],
    format: ReportFormat,
    path: P,
) -> Result<()> {
    let text = match format {
        ReportFormat::Json => report_to_json(rows)?,
        ReportFormat::Csv => report_to_csv(rows)?,
    };
    let mut f = File::create(path)?;
    f.write_all(text.as_bytes())?;
    Ok(())
}
