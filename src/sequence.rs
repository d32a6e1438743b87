use bstr::{BStr, BString, ByteSlice};
use fnv::FnvHashMap;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Reads are identified by their index in the read set.
pub type ReadId = usize;

/// A single sequenced read: its id, a free-form description (usually
/// the FASTA header it was loaded from), and the nucleotide sequence.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct SequenceRecord {
    pub id: ReadId,
    pub description: BString,
    pub sequence: BString,
}

impl SequenceRecord {
    pub fn new(id: ReadId, description: &[u8], sequence: &[u8]) -> Self {
        SequenceRecord {
            id,
            description: BString::from(description),
            sequence: BString::from(sequence),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The half-open window `[left, right)` of the sequence, or `None`
    /// if it doesn't fit.
    #[inline]
    pub fn window(&self, left: usize, right: usize) -> Option<&BStr> {
        self.sequence.get(left..right).map(|s| s.as_bstr())
    }
}

/// Read-only access to read sequences and descriptions.
pub trait SequenceStore {
    fn record(&self, id: ReadId) -> Option<&SequenceRecord>;
}

/// In-memory sequence store keyed by read id.
#[derive(Default, Debug, Clone)]
pub struct SequenceContainer {
    records: FnvHashMap<ReadId, SequenceRecord>,
}

impl SequenceContainer {
    pub fn new() -> Self {
        Default::default()
    }

    /// Insert a record, replacing any previous record with the same id.
    pub fn insert(&mut self, record: SequenceRecord) {
        self.records.insert(record.id, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SequenceRecord> {
        self.records.values()
    }
}

impl std::iter::FromIterator<SequenceRecord> for SequenceContainer {
    fn from_iter<I: IntoIterator<Item = SequenceRecord>>(iter: I) -> Self {
        let mut container = SequenceContainer::new();
        iter.into_iter().for_each(|r| container.insert(r));
        container
    }
}

impl SequenceStore for SequenceContainer {
    #[inline]
    fn record(&self, id: ReadId) -> Option<&SequenceRecord> {
        self.records.get(&id)
    }
}
