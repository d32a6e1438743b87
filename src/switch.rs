use crate::{
    config::ContigConfig, kmer::KmerIndex, overlap::OverlapIndex,
    sequence::ReadId,
};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Where a contig leaves one read and enters the next: `left` is the
/// offset on the current read, `right` the offset on the next read.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct SwitchPoint {
    pub left: usize,
    pub right: usize,
}

impl SwitchPoint {
    #[inline]
    pub fn new(left: usize, right: usize) -> Self {
        SwitchPoint { left, right }
    }

    /// The zero-length switch used when no anchor could be found.
    #[inline]
    pub fn stalled(at: usize) -> Self {
        SwitchPoint {
            left: at,
            right: at,
        }
    }

    #[inline]
    fn shift(&self) -> i64 {
        self.left as i64 - self.right as i64
    }
}

/// Finds switch points between consecutive reads of a path, anchoring
/// on k-mers shared by the two reads and using their overlap record to
/// reject anchors from repeats elsewhere in the genome.
pub struct SwitchResolver<'a, K, O> {
    kmers: &'a K,
    overlaps: &'a O,
    config: ContigConfig,
}

impl<'a, K: KmerIndex, O: OverlapIndex> SwitchResolver<'a, K, O> {
    pub fn new(kmers: &'a K, overlaps: &'a O, config: ContigConfig) -> Self {
        SwitchResolver {
            kmers,
            overlaps,
            config,
        }
    }

    /// The shift implied by the overlap of `left` onto `right`, or 0
    /// if the two reads have no overlap record.
    pub fn expected_shift(&self, left: ReadId, right: ReadId) -> i64 {
        self.overlaps
            .find_overlap(left, right)
            .map(|o| o.shift())
            .unwrap_or(0)
    }

    /// All pairs of positions of a k-mer shared by both reads, with the
    /// left position strictly past `prev_switch` and a shift within the
    /// jump tolerance of the expected shift. Pairs are in the order of
    /// the left read's k-mers, then the k-mer's occurrences.
    pub fn candidates(
        &self,
        left: ReadId,
        right: ReadId,
        prev_switch: usize,
    ) -> Vec<SwitchPoint> {
        let expected = self.expected_shift(left, right);
        let tolerance = self.config.jump_tolerance();

        let mut accepted = Vec::new();
        for left_kmer in self.kmers.read_kmers(left) {
            if left_kmer.position <= prev_switch {
                continue;
            }

            let matches = self
                .kmers
                .kmer_reads(left_kmer.kmer)
                .iter()
                .filter(|r| r.read_id == right)
                .map(|r| SwitchPoint::new(left_kmer.position, r.position))
                .filter(|sp| (sp.shift() - expected).abs() < tolerance);

            accepted.extend(matches);
        }
        accepted
    }

    /// The switch point between `left` and `right` that doesn't go
    /// back past `prev_switch` on the left read.
    ///
    /// Returns the candidate with the median shift. If there are no
    /// candidates at all, the switch stalls at `prev_switch` on both
    /// reads so the path can still be stitched, and a warning is
    /// logged.
    pub fn switch_point(
        &self,
        left: ReadId,
        right: ReadId,
        prev_switch: usize,
    ) -> SwitchPoint {
        let candidates = self.candidates(left, right, prev_switch);
        match median_by_shift(candidates) {
            Some(sp) => sp,
            None => {
                log::warn!(
                    "No jump found between reads {} and {} past offset {}",
                    left,
                    right,
                    prev_switch
                );
                SwitchPoint::stalled(prev_switch)
            }
        }
    }
}

/// Selects the element at index `len / 2` when ordered by shift,
/// without sorting the rest. Equal shifts keep their original order.
fn median_by_shift(candidates: Vec<SwitchPoint>) -> Option<SwitchPoint> {
    if candidates.is_empty() {
        return None;
    }
    let mut keyed: Vec<(usize, SwitchPoint)> =
        candidates.into_iter().enumerate().collect();
    let mid = keyed.len() / 2;
    let (_, (_, median), _) =
        keyed.select_nth_unstable_by_key(mid, |(ix, sp)| (sp.shift(), *ix));
    Some(*median)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmer::{Kmer, VertexIndex};
    use crate::overlap::{OverlapContainer, OverlapRecord};

    fn kmer(seed: u64) -> Kmer {
        Kmer(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    fn index(occurrences: &[(ReadId, u64, usize)]) -> VertexIndex {
        let mut index = VertexIndex::new();
        for &(read, seed, pos) in occurrences {
            index.add_occurrence(read, kmer(seed), pos);
        }
        index.freeze()
    }

    #[test]
    fn median_selection() {
        let sps = vec![
            SwitchPoint::new(50, 0),
            SwitchPoint::new(10, 0),
            SwitchPoint::new(30, 0),
            SwitchPoint::new(40, 0),
            SwitchPoint::new(20, 0),
        ];
        assert_eq!(median_by_shift(sps), Some(SwitchPoint::new(30, 0)));

        // even counts take the upper median
        let sps = vec![SwitchPoint::new(7, 0), SwitchPoint::new(3, 0)];
        assert_eq!(median_by_shift(sps), Some(SwitchPoint::new(7, 0)));

        assert_eq!(median_by_shift(Vec::new()), None);
    }

    #[test]
    fn median_ties_follow_first_occurrence() {
        let sps = vec![
            SwitchPoint::new(110, 10),
            SwitchPoint::new(120, 20),
            SwitchPoint::new(130, 30),
            SwitchPoint::new(140, 40),
        ];
        assert_eq!(median_by_shift(sps), Some(SwitchPoint::new(130, 30)));
    }

    #[test]
    fn expected_shift_defaults_to_zero() {
        let kmers = index(&[]);
        let mut overlaps = OverlapContainer::new();
        overlaps.insert(OverlapRecord::new(1, 2, (700, 1000), (0, 300)));
        let resolver =
            SwitchResolver::new(&kmers, &overlaps, ContigConfig::default());

        assert_eq!(resolver.expected_shift(1, 2), 700);
        assert_eq!(resolver.expected_shift(2, 1), 0);
        assert_eq!(resolver.expected_shift(1, 3), 0);
    }

    #[test]
    fn without_overlap_filter_uses_raw_shift() {
        // shifts: 40, 90, -300; tolerance 100 around 0
        let kmers = index(&[
            (1, 1, 140),
            (2, 1, 100),
            (1, 2, 190),
            (2, 2, 100),
            (1, 3, 200),
            (2, 3, 500),
        ]);
        let overlaps = OverlapContainer::new();
        let config = ContigConfig::default().with_maximum_jump(200);
        let resolver = SwitchResolver::new(&kmers, &overlaps, config);

        let cands = resolver.candidates(1, 2, 0);
        assert_eq!(
            cands,
            vec![SwitchPoint::new(140, 100), SwitchPoint::new(190, 100)]
        );
    }

    #[test]
    fn only_kmers_past_previous_switch() {
        let kmers = index(&[(1, 1, 100), (2, 1, 0), (1, 2, 101), (2, 2, 1)]);
        let overlaps: OverlapContainer =
            vec![OverlapRecord::new(1, 2, (100, 200), (0, 100))]
                .into_iter()
                .collect();
        let resolver =
            SwitchResolver::new(&kmers, &overlaps, ContigConfig::default());

        assert_eq!(resolver.candidates(1, 2, 100), vec![SwitchPoint::new(101, 1)]);
        assert_eq!(resolver.switch_point(1, 2, 99), SwitchPoint::new(101, 1));
    }

    #[test]
    fn no_candidates_stalls() {
        let kmers = index(&[(1, 1, 10), (2, 1, 500)]);
        let overlaps = OverlapContainer::new();
        let config = ContigConfig::default().with_maximum_jump(100);
        let resolver = SwitchResolver::new(&kmers, &overlaps, config);

        assert_eq!(resolver.switch_point(1, 2, 5), SwitchPoint::stalled(5));
        assert_eq!(resolver.switch_point(1, 3, 0), SwitchPoint::stalled(0));
    }

    #[test]
    fn repeat_is_rejected() {
        // k-mer 7 anchors reads 2 and 3 at shift 500, and also occurs at
        // a far away repeat on read 3
        let kmers = index(&[(2, 7, 700), (3, 7, 200), (3, 7, 900)]);
        let overlaps: OverlapContainer =
            vec![OverlapRecord::new(2, 3, (500, 1000), (0, 500))]
                .into_iter()
                .collect();
        let config = ContigConfig::default().with_maximum_jump(500);
        let resolver = SwitchResolver::new(&kmers, &overlaps, config);

        assert_eq!(resolver.candidates(2, 3, 100), vec![SwitchPoint::new(700, 200)]);
        assert_eq!(resolver.switch_point(2, 3, 100), SwitchPoint::new(700, 200));
    }
}
