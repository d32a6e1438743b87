use bstr::{BString, ByteVec};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::{
    config::ContigConfig,
    error::{ContigError, ContigResult},
    kmer::KmerIndex,
    overlap::OverlapIndex,
    path::{close_walk, MIN_CIRCULAR_PATH},
    sequence::{ReadId, SequenceRecord, SequenceStore},
    switch::{SwitchPoint, SwitchResolver},
};

/// One slice of a read that contributes to a contig.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct ContigFragment {
    /// 1-based position of the fragment within its contig.
    pub part_id: usize,
    pub read_id: ReadId,
    pub left_cut: usize,
    pub right_cut: usize,
    pub sequence: BString,
    pub label: BString,
}

impl ContigFragment {
    fn from_window(
        part_id: usize,
        record: &SequenceRecord,
        left_cut: usize,
        right_cut: usize,
        sequence: &[u8],
    ) -> Self {
        let mut label = BString::from(format!("part_{}_", part_id));
        label.push_str(&record.description);
        label.push_str(format!("[{}:{}]", left_cut, right_cut));

        ContigFragment {
            part_id,
            read_id: record.id,
            left_cut,
            right_cut,
            sequence: BString::from(sequence),
            label,
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
}

/// The contig assembled from one read path: its fragments, in order.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Contig {
    /// Index of the source path in the path source.
    pub path_index: usize,
    pub fragments: Vec<ContigFragment>,
}

impl Contig {
    /// Total length of the concatenated fragments.
    pub fn len(&self) -> usize {
        self.fragments.iter().map(|f| f.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The contig sequence, i.e. all fragments concatenated.
    pub fn sequence(&self) -> BString {
        let mut seq = Vec::with_capacity(self.len());
        for frag in self.fragments.iter() {
            seq.extend_from_slice(&frag.sequence);
        }
        seq.into()
    }
}

/// The outcome of stitching one path that was long enough to try.
#[derive(Debug)]
pub struct PathOutcome {
    pub path_index: usize,
    pub result: ContigResult<Contig>,
}

/// Stitches circular read paths into contigs, using a sequence store
/// for the read sequences and a k-mer index plus overlap index for
/// the switch points. All three are only read from.
pub struct ContigGenerator<'a, S, K, O> {
    sequences: &'a S,
    resolver: SwitchResolver<'a, K, O>,
}

impl<'a, S, K, O> ContigGenerator<'a, S, K, O>
where
    S: SequenceStore,
    K: KmerIndex,
    O: OverlapIndex,
{
    pub fn new(
        sequences: &'a S,
        kmers: &'a K,
        overlaps: &'a O,
        config: ContigConfig,
    ) -> Self {
        ContigGenerator {
            sequences,
            resolver: SwitchResolver::new(kmers, overlaps, config),
        }
    }

    pub fn resolver(&self) -> &SwitchResolver<'a, K, O> {
        &self.resolver
    }

    fn record(
        &self,
        path_index: usize,
        read_id: ReadId,
    ) -> ContigResult<&'a SequenceRecord> {
        self.sequences.record(read_id).ok_or(ContigError::MissingRead {
            path_index,
            read_id,
        })
    }

    /// Stitch a single path. Paths shorter than three reads are
    /// skipped and produce `Ok(None)`.
    ///
    /// The path is walked as a circle: the first switch point is
    /// searched past the middle of the first read, every following
    /// read is cut between the switch point it was entered at and the
    /// one it is left at, and the first read's final fragment ends
    /// exactly where the contig began.
    pub fn stitch_path(
        &self,
        path_index: usize,
        path: &[ReadId],
    ) -> ContigResult<Option<Contig>> {
        if path.len() < MIN_CIRCULAR_PATH {
            return Ok(None);
        }

        let walk = close_walk(path);
        let closing = walk.len() - 2;

        let init_pivot = self.record(path_index, walk[0])?.len() / 2;
        let first_switch =
            self.resolver.switch_point(walk[0], walk[1], init_pivot);
        let mut prev_switch = first_switch;

        let mut fragments = Vec::with_capacity(path.len());

        for i in 1..walk.len() - 1 {
            let read_id = walk[i];
            let left_cut = prev_switch.right;

            let right_cut = if i == closing {
                let right_cut = first_switch.left;
                if right_cut <= left_cut {
                    return Err(ContigError::UnclosedCircle {
                        path_index,
                        read_id,
                        left_cut,
                        right_cut,
                    });
                }
                right_cut
            } else {
                let cur_switch: SwitchPoint =
                    self.resolver.switch_point(read_id, walk[i + 1], left_cut);
                prev_switch = cur_switch;
                cur_switch.left
            };

            let record = self.record(path_index, read_id)?;
            let window = record.window(left_cut, right_cut).ok_or(
                ContigError::WindowOutOfBounds {
                    path_index,
                    read_id,
                    left_cut,
                    right_cut,
                    read_len: record.len(),
                },
            )?;

            let fragment = ContigFragment::from_window(
                fragments.len() + 1,
                record,
                left_cut,
                right_cut,
                window,
            );
            log::debug!(
                "Path {}: {} ({} bp)",
                path_index,
                fragment.label,
                fragment.len()
            );
            fragments.push(fragment);
        }

        Ok(Some(Contig {
            path_index,
            fragments,
        }))
    }

    fn outcome(&self, path_index: usize, path: &[ReadId]) -> Option<PathOutcome> {
        match self.stitch_path(path_index, path) {
            Ok(None) => None,
            Ok(Some(contig)) => Some(PathOutcome {
                path_index,
                result: Ok(contig),
            }),
            Err(err) => Some(PathOutcome {
                path_index,
                result: Err(err),
            }),
        }
    }

    /// Stitch every path from the source. Each path long enough to be
    /// stitched yields one outcome, in path source order; a failing
    /// path does not affect any other.
    #[cfg(not(feature = "parallel"))]
    pub fn generate_contigs<I, P>(&self, paths: I) -> Vec<PathOutcome>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[ReadId]>,
    {
        log::info!("Generating contig sequences");
        paths
            .into_iter()
            .enumerate()
            .filter_map(|(ix, path)| self.outcome(ix, path.as_ref()))
            .collect()
    }

    /// Stitch every path from the source on the rayon thread pool.
    /// Outcomes keep path source order; a failing path does not affect
    /// any other.
    #[cfg(feature = "parallel")]
    pub fn generate_contigs<I, P>(&self, paths: I) -> Vec<PathOutcome>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[ReadId]> + Send + Sync,
        S: Sync,
        K: Sync,
        O: Sync,
    {
        log::info!("Generating contig sequences");
        let paths: Vec<P> = paths.into_iter().collect();
        paths
            .par_iter()
            .enumerate()
            .filter_map(|(ix, path)| self.outcome(ix, path.as_ref()))
            .collect()
    }

    /// Like `generate_contigs`, but only keeps the contigs, logging
    /// and discarding the paths that failed.
    #[cfg(not(feature = "parallel"))]
    pub fn contigs<I, P>(&self, paths: I) -> Vec<Contig>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[ReadId]>,
    {
        keep_contigs(self.generate_contigs(paths))
    }

    #[cfg(feature = "parallel")]
    pub fn contigs<I, P>(&self, paths: I) -> Vec<Contig>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[ReadId]> + Send + Sync,
        S: Sync,
        K: Sync,
        O: Sync,
    {
        keep_contigs(self.generate_contigs(paths))
    }
}

fn keep_contigs(outcomes: Vec<PathOutcome>) -> Vec<Contig> {
    let attempted = outcomes.len();
    let contigs: Vec<Contig> = outcomes
        .into_iter()
        .filter_map(|outcome| match outcome.result {
            Ok(contig) => Some(contig),
            Err(err) => {
                log::warn!("Skipping path {}: {}", outcome.path_index, err);
                None
            }
        })
        .collect();
    log::info!(
        "Generated {} contigs from {} circular paths",
        contigs.len(),
        attempted
    );
    contigs
}
