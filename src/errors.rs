//src/errors.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HdError>;

#[derive(Error, Debug)]
pub enum HdError {
    /// A read lacks a tag needed to count it.
    #[error("read '{read}' has no '{tag}' tag")]
    MissingTag { tag: &'static str, read: String },

    #[error("read '{read}' has a '{tag}' tag of an unexpected type")]
    InvalidTagType { tag: &'static str, read: String },

    #[error("alignment record has no read name")]
    MissingReadName,

    /// Identifier does not follow `movie/zmw/suffix`.
    #[error("read identifier '{identifier}' has no '/'-delimited ZMW field")]
    MalformedIdentifier { identifier: String },

    #[error("input file does not exist: {path}")]
    InputNotFound { path: String },

    #[error("input file must either have .bam or .fastq.gz extension: {path}")]
    UnsupportedInput { path: String },

    #[error("output file must either have .json or .csv extension: {path}")]
    UnsupportedOutput { path: String },

    #[error("filtering is not supported for BAM input: {path}")]
    FilterNotSupported { path: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
