pub mod counts;
pub mod read_type;
pub mod window;

pub use counts::{count_container_reads, count_fastq_records, HdCounts};
pub use read_type::{classify_read_type, container_molecule_id, fastq_molecule_id};
pub use window::RecencyWindow;
