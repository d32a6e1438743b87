use fnv::FnvHashMap;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::sequence::ReadId;

/// A k-mer of up to 32 nucleotides packed two bits per base, first
/// base in the most significant position.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Kmer(pub u64);

impl Kmer {
    pub const MAX_LEN: usize = 32;

    #[inline]
    fn encode_base(base: u8) -> Option<u64> {
        match base {
            b'A' | b'a' => Some(0),
            b'C' | b'c' => Some(1),
            b'G' | b'g' => Some(2),
            b'T' | b't' => Some(3),
            _ => None,
        }
    }

    /// Pack a nucleotide string; returns `None` if it's longer than
    /// `MAX_LEN` or contains anything but ACGT.
    pub fn from_bytes(bases: &[u8]) -> Option<Self> {
        if bases.len() > Self::MAX_LEN {
            return None;
        }
        bases.iter().try_fold(Kmer(0), |Kmer(acc), &b| {
            Self::encode_base(b).map(|v| Kmer((acc << 2) | v))
        })
    }
}

/// An occurrence of a k-mer within one read.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct KmerPosition {
    pub kmer: Kmer,
    pub position: usize,
}

/// An occurrence of one k-mer value in some read.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct ReadPosition {
    pub read_id: ReadId,
    pub position: usize,
}

/// The two read-only views over k-mer occurrences. Both lookups
/// return an empty slice for unknown keys, and both views are sorted
/// by position within their key.
pub trait KmerIndex {
    /// All k-mer occurrences on the given read.
    fn read_kmers(&self, read: ReadId) -> &[KmerPosition];

    /// All occurrences of the given k-mer, across every read.
    fn kmer_reads(&self, kmer: Kmer) -> &[ReadPosition];
}

/// In-memory k-mer index. Occurrences are added with
/// `add_occurrence`, after which `freeze` sorts both views; lookups on
/// an unfrozen index are still valid but not guaranteed to be ordered.
#[derive(Default, Debug, Clone)]
pub struct VertexIndex {
    by_read: FnvHashMap<ReadId, Vec<KmerPosition>>,
    by_kmer: FnvHashMap<Kmer, Vec<ReadPosition>>,
}

impl VertexIndex {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_occurrence(&mut self, read_id: ReadId, kmer: Kmer, position: usize) {
        self.by_read
            .entry(read_id)
            .or_default()
            .push(KmerPosition { kmer, position });
        self.by_kmer
            .entry(kmer)
            .or_default()
            .push(ReadPosition { read_id, position });
    }

    /// Sort both views by position, breaking ties by k-mer value and
    /// read id respectively, so lookups are deterministic.
    pub fn freeze(mut self) -> Self {
        self.by_read
            .values_mut()
            .for_each(|v| v.sort_by_key(|k| (k.position, k.kmer)));
        self.by_kmer
            .values_mut()
            .for_each(|v| v.sort_by_key(|r| (r.position, r.read_id)));
        self
    }

    pub fn num_kmers(&self) -> usize {
        self.by_kmer.len()
    }
}

impl KmerIndex for VertexIndex {
    #[inline]
    fn read_kmers(&self, read: ReadId) -> &[KmerPosition] {
        self.by_read.get(&read).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    fn kmer_reads(&self, kmer: Kmer) -> &[ReadPosition] {
        self.by_kmer.get(&kmer).map(Vec::as_slice).unwrap_or(&[])
    }
}
