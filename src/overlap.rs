use bstr::ByteSlice;
use fnv::FnvHashMap;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::sequence::ReadId;

/// A precomputed overlap between a source read (`cur`) and an
/// extension read (`ext`): `[cur_begin, cur_end)` on the source aligns
/// to `[ext_begin, ext_end)` on the extension.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct OverlapRecord {
    pub cur_id: ReadId,
    pub ext_id: ReadId,
    pub cur_begin: usize,
    pub cur_end: usize,
    pub ext_begin: usize,
    pub ext_end: usize,
}

impl OverlapRecord {
    pub fn new(
        cur_id: ReadId,
        ext_id: ReadId,
        cur_range: (usize, usize),
        ext_range: (usize, usize),
    ) -> Self {
        OverlapRecord {
            cur_id,
            ext_id,
            cur_begin: cur_range.0,
            cur_end: cur_range.1,
            ext_begin: ext_range.0,
            ext_end: ext_range.1,
        }
    }

    /// The offset between the two reads implied by this overlap: the
    /// mean of the begin and end coordinate differences, truncated
    /// toward zero.
    #[inline]
    pub fn shift(&self) -> i64 {
        let begin = self.cur_begin as i64 - self.ext_begin as i64;
        let end = self.cur_end as i64 - self.ext_end as i64;
        (begin + end) / 2
    }

    /// Parse an overlap from the tab-delimited fields of a PAF line,
    /// where the query is the source read and the target the
    /// extension read, both named by their numeric id. Only
    /// forward-strand records are accepted; reverse complements are
    /// expected to have their own read ids.
    pub fn parse_paf<I>(mut input: I) -> Option<Self>
    where
        I: Iterator,
        I::Item: AsRef<[u8]>,
    {
        let (cur_id, _, cur_range) = parse_seq_fields(&mut input)?;
        let strand = input.next()?;
        if strand.as_ref() != b"+" {
            return None;
        }
        let (ext_id, _, ext_range) = parse_seq_fields(&mut input)?;

        Some(OverlapRecord::new(cur_id, ext_id, cur_range, ext_range))
    }

    /// Parse a whole PAF line.
    pub fn parse_paf_line(line: &[u8]) -> Option<Self> {
        Self::parse_paf(line.trim_end_with(|c| c.is_ascii_whitespace()).split_str(b"\t"))
    }
}

fn parse_next<I, T>(mut input: I) -> Option<T>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
    T: std::str::FromStr,
{
    let tmp = input.next()?;
    let bytes = tmp.as_ref();
    bytes.to_str().ok().and_then(|p| p.parse().ok())
}

fn parse_seq_fields<I>(mut input: I) -> Option<(ReadId, usize, (usize, usize))>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    let id = parse_next(&mut input)?;
    let len = parse_next(&mut input)?;
    let start = parse_next(&mut input)?;
    let end = parse_next(&mut input)?;

    Some((id, len, (start, end)))
}

/// Read-only per-read overlap lookup. Unknown reads have no overlaps.
pub trait OverlapIndex {
    fn overlaps(&self, read: ReadId) -> &[OverlapRecord];

    /// The first overlap of `cur` that extends into `ext`, if any.
    fn find_overlap(&self, cur: ReadId, ext: ReadId) -> Option<&OverlapRecord> {
        self.overlaps(cur).iter().find(|o| o.ext_id == ext)
    }
}

/// In-memory overlap index, records kept in insertion order per
/// source read.
#[derive(Default, Debug, Clone)]
pub struct OverlapContainer {
    index: FnvHashMap<ReadId, Vec<OverlapRecord>>,
}

impl OverlapContainer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert(&mut self, record: OverlapRecord) {
        self.index.entry(record.cur_id).or_default().push(record);
    }

    /// Load overlaps from PAF lines, skipping lines that don't parse.
    /// Returns the number of records added.
    pub fn extend_from_paf<I>(&mut self, lines: I) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut added = 0;
        for line in lines {
            match OverlapRecord::parse_paf_line(line.as_ref()) {
                Some(record) => {
                    self.insert(record);
                    added += 1;
                }
                None => log::debug!(
                    "Skipping overlap line {}",
                    line.as_ref().to_str_lossy()
                ),
            }
        }
        added
    }
}

impl std::iter::FromIterator<OverlapRecord> for OverlapContainer {
    fn from_iter<I: IntoIterator<Item = OverlapRecord>>(iter: I) -> Self {
        let mut container = OverlapContainer::new();
        iter.into_iter().for_each(|o| container.insert(o));
        container
    }
}

impl OverlapIndex for OverlapContainer {
    #[inline]
    fn overlaps(&self, read: ReadId) -> &[OverlapRecord] {
        self.index.get(&read).map(Vec::as_slice).unwrap_or(&[])
    }
}
