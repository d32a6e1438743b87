use nom::{
    bytes::complete::tag, character::complete::digit1, combinator::map_res,
    multi::separated_nonempty_list, IResult,
};

use bstr::ByteSlice;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::sequence::ReadId;

/// The smallest path that can be closed into a circle.
pub const MIN_CIRCULAR_PATH: usize = 3;

/// An ordered walk of reads through the assembly graph, interpreted
/// as a cycle: after the last read the walk returns to the first.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct ReadPath(pub Vec<ReadId>);

impl ReadPath {
    pub fn new(reads: Vec<ReadId>) -> Self {
        ReadPath(reads)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the path has enough reads to be stitched into a contig.
    pub fn is_circular_candidate(&self) -> bool {
        self.len() >= MIN_CIRCULAR_PATH
    }

    fn parse_read_id(i: &[u8]) -> IResult<&[u8], ReadId> {
        map_res(digit1, |bs: &[u8]| {
            bs.to_str()
                .map_err(|_| ())
                .and_then(|s| s.parse::<ReadId>().map_err(|_| ()))
        })(i)
    }

    pub(crate) fn parser(i: &[u8]) -> IResult<&[u8], Self> {
        let (i, reads) = separated_nonempty_list(tag(","), Self::parse_read_id)(i)?;
        Ok((i, ReadPath(reads)))
    }

    /// Parse a comma-separated list of read ids, e.g. `4,17,9`.
    /// Trailing whitespace is ignored; anything else left over makes
    /// the parse fail.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let (rest, path) = Self::parser(bytes.trim_with(|c| c.is_ascii_whitespace())).ok()?;
        if rest.is_empty() {
            Some(path)
        } else {
            None
        }
    }
}

/// Closes a path into a walk that revisits its first two reads, so the
/// last two transitions lead back to where the walk started.
pub fn close_walk(path: &[ReadId]) -> Vec<ReadId> {
    let mut walk = Vec::with_capacity(path.len() + 2);
    walk.extend_from_slice(path);
    walk.extend(path.iter().take(2));
    walk
}

impl AsRef<[ReadId]> for ReadPath {
    fn as_ref(&self) -> &[ReadId] {
        &self.0
    }
}

impl From<Vec<ReadId>> for ReadPath {
    fn from(reads: Vec<ReadId>) -> Self {
        ReadPath(reads)
    }
}

impl std::fmt::Display for ReadPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, read) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", read)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_read_paths() {
        assert_eq!(ReadPath::parse(b"4,17,9"), Some(ReadPath(vec![4, 17, 9])));
        assert_eq!(ReadPath::parse(b"12\n"), Some(ReadPath(vec![12])));
        assert_eq!(ReadPath::parse(b" 3,5\r\n"), Some(ReadPath(vec![3, 5])));
        assert_eq!(ReadPath::parse(b""), None);
        assert_eq!(ReadPath::parse(b"4,,9"), None);
        assert_eq!(ReadPath::parse(b"4,x"), None);
    }

    #[test]
    fn display_matches_parse() {
        let path = ReadPath(vec![1, 20, 300]);
        assert_eq!(path.to_string(), "1,20,300");
    }

    #[test]
    fn closed_walk_revisits_start() {
        assert_eq!(close_walk(&[1, 2, 3]), vec![1, 2, 3, 1, 2]);
        assert_eq!(close_walk(&[5]), vec![5, 5]);
        assert!(!ReadPath(vec![1, 2]).is_circular_candidate());
        assert!(ReadPath(vec![1, 2, 3]).is_circular_candidate());
    }
}
