use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::Result;
use crate::types::FastqRecord;

/// Opens a gzip-compressed FASTQ for line reading.
pub fn open_fastq_gz<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let f = File::open(path)?;
    Ok(Box::new(BufReader::new(MultiGzDecoder::new(f))))
}

/// Bytes `rstrip()` removes: ASCII whitespace plus vertical tab.
fn is_trailing_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

/// Groups lines into 4-line FASTQ records.
///
/// Lines are right-trimmed of ASCII whitespace (vertical tab included) and mapped positionally to
/// name/sequence/optional/quality with no content checks. A partial record at
/// the end of the stream is dropped; `dangling_lines` reports how many lines
/// that was once the iterator is exhausted.
pub struct FastqRecords<R> {
    reader: R,
    line: String,
    dangling: usize,
    done: bool,
}

impl<R: BufRead> FastqRecords<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: String::new(), dangling: 0, done: false }
    }

    pub fn dangling_lines(&self) -> usize {
        self.dangling
    }

    /// Reads one line; `None` at EOF.
    fn next_line(&mut self) -> std::io::Result<Option<String>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.line.trim_end_matches(is_trailing_space).to_string()))
    }
}

impl<R: BufRead> Iterator for FastqRecords<R> {
    type Item = Result<FastqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut lines: Vec<String> = Vec::with_capacity(4);
        while lines.len() < 4 {
            match self.next_line() {
                Ok(Some(line)) => lines.push(line),
                Ok(None) => {
                    self.dangling = lines.len();
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }

        let mut it = lines.into_iter();
        let (Some(name), Some(sequence), Some(optional), Some(quality)) =
            (it.next(), it.next(), it.next(), it.next())
        else {
            return None;
        };
        Some(Ok(FastqRecord { name, sequence, optional, quality }))
    }
}

/// Appends kept records to a FASTQ file, one write per record.
pub struct FastqAppender {
    file: File,
    block: String,
}

impl FastqAppender {
    /// Opens `path` in create+append mode; existing content is kept.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file, block: String::new() })
    }

    pub fn append(&mut self, record: &FastqRecord) -> Result<()> {
        self.block.clear();
        for line in [&record.name, &record.sequence, &record.optional, &record.quality] {
            self.block.push_str(line);
            self.block.push('\n');
        }
        self.file.write_all(self.block.as_bytes())?;
        Ok(())
    }
}
