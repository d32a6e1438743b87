use crate::contig::{Contig, ContigFragment};
use crate::error::ContigResult;

use anyhow::{Context, Result};
use bstr::{BString, ByteSlice};
use lazy_static::lazy_static;
use regex::bytes::Regex;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Which of the generated contigs get written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitPolicy {
    /// Only the contig of the first stitched path.
    First,
    /// Every contig, in path order.
    All,
    /// The single longest contig; the earliest one wins ties.
    Longest,
}

impl Default for EmitPolicy {
    fn default() -> Self {
        EmitPolicy::First
    }
}

impl EmitPolicy {
    pub fn select<'a>(&self, contigs: &'a [Contig]) -> Vec<&'a Contig> {
        match self {
            EmitPolicy::First => contigs.iter().take(1).collect(),
            EmitPolicy::All => contigs.iter().collect(),
            EmitPolicy::Longest => contigs
                .iter()
                .rev()
                .max_by_key(|c| c.len())
                .into_iter()
                .collect(),
        }
    }
}

/// Select contigs with a caller-supplied predicate instead of a fixed
/// policy.
pub fn select_with<'a, F>(contigs: &'a [Contig], predicate: F) -> Vec<&'a Contig>
where
    F: Fn(&Contig) -> bool,
{
    contigs.iter().filter(|c| predicate(c)).collect()
}

// Write fragment as a FASTA record
pub fn write_fragment<W: Write>(frag: &ContigFragment, stream: &mut W) -> io::Result<()> {
    stream.write_all(b">")?;
    stream.write_all(&frag.label)?;
    stream.write_all(b"\n")?;
    stream.write_all(&frag.sequence)?;
    stream.write_all(b"\n")
}

pub fn fragment_string(frag: &ContigFragment) -> BString {
    let mut result = Vec::with_capacity(frag.label.len() + frag.len() + 3);
    write_fragment(frag, &mut result).expect("Error writing fragment to buffer");
    result.into()
}

// Write every fragment of a contig, in order
pub fn write_contig<W: Write>(contig: &Contig, stream: &mut W) -> io::Result<()> {
    for frag in contig.fragments.iter() {
        write_fragment(frag, stream)?;
    }
    Ok(())
}

/// Write the contigs chosen by `policy` to `stream`, returning how
/// many were written.
pub fn write_contigs<W: Write>(
    stream: &mut W,
    contigs: &[Contig],
    policy: EmitPolicy,
) -> ContigResult<usize> {
    let selected = policy.select(contigs);
    for contig in selected.iter() {
        write_contig(contig, stream)?;
    }
    Ok(selected.len())
}

/// Write the contigs chosen by `policy` to a FASTA file at `path`.
/// Returns the number of contigs written; if the policy selects
/// nothing, no file is created.
pub fn write_contigs_file<P: AsRef<Path>>(
    path: P,
    contigs: &[Contig],
    policy: EmitPolicy,
) -> Result<usize> {
    if policy.select(contigs).is_empty() {
        log::info!("No contigs to write");
        return Ok(0);
    }

    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Error creating contig file {:?}", path))?;
    let mut writer = BufWriter::new(file);

    let written = write_contigs(&mut writer, contigs, policy)
        .with_context(|| format!("Error writing contigs to {:?}", path))?;
    writer
        .flush()
        .with_context(|| format!("Error flushing contig file {:?}", path))?;

    log::info!("Wrote {} contig(s) to {:?}", written, path);
    Ok(written)
}

/// Parses a fragment header (with or without the leading `>`) back
/// into its part id, read description, and window.
pub fn parse_fragment_header(
    header: &[u8],
) -> Option<(usize, BString, usize, usize)> {
    lazy_static! {
        static ref RE: Regex =
            Regex::new(r"(?-u)^>?part_([0-9]+)_(.*)\[([0-9]+):([0-9]+)\]$")
                .unwrap();
    }

    let caps = RE.captures(header.trim_end_with(|c| c.is_ascii_whitespace()))?;
    let num = |i: usize| -> Option<usize> {
        caps.get(i)?.as_bytes().to_str().ok()?.parse().ok()
    };

    let part_id = num(1)?;
    let description = BString::from(caps.get(2)?.as_bytes());
    let left = num(3)?;
    let right = num(4)?;
    Some((part_id, description, left, right))
}
