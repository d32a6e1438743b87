//! Stitch circular read paths into contigs.
//!
//! A read path is a cyclic walk of overlapping reads. For every pair
//! of consecutive reads the [`switch::SwitchResolver`] finds the
//! offsets at which the contig stops quoting the first read and starts
//! quoting the second, by taking the median of the shifts of the
//! k-mers both reads share, after discarding those that disagree with
//! the reads' overlap record. The [`contig::ContigGenerator`] walks a
//! path around the circle, slicing every read between the switch
//! points it is entered and left at.
//!
//! Read sequences, k-mer occurrences, and overlaps are provided through
//! the [`sequence::SequenceStore`], [`kmer::KmerIndex`], and
//! [`overlap::OverlapIndex`] traits, and are never modified.

pub mod config;
pub mod contig;
pub mod error;
pub mod kmer;
pub mod overlap;
pub mod path;
pub mod sequence;
pub mod switch;
pub mod writer;

pub use config::ContigConfig;
pub use contig::{Contig, ContigFragment, ContigGenerator, PathOutcome};
pub use error::{ContigError, ContigResult};
pub use path::ReadPath;
pub use switch::{SwitchPoint, SwitchResolver};
pub use writer::EmitPolicy;
