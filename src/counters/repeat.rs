//! Spaced repeats of a k-mer: direct, inverted and everted pairs.

use super::MotifCounter;
use crate::buffer::SlidingBuffer;
use crate::error::{MotifError, Result};
use crate::kmers::{canonical_map, kmer_to_string, kmers_total, reverse_complement, MAX_DENSE_K};
use crate::motifs::CompactBuilder;
use crate::results::ResultSink;

/// Mutual orientation of the two copies of a repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Direct = 0,
    Inverted = 1,
    Everted = 2,
}

/// Finds pairs of k-mers separated by `min_spacer..=max_spacer` bases.
///
/// A ring of the last `2*(max_spacer+k)+1` windows keeps the candidate under
/// scrutiny at the center. A per-canonical-k-mer table counts how many
/// same-family windows sit downstream of the center, so genes without a
/// partner never pay for the scan. Equal copies form a DIRECT repeat; a
/// reverse-complement pair is INVERTED when the upstream copy is the
/// canonical form and EVERTED when it is not. The emitted position is the
/// end of the downstream copy.
#[derive(Debug, Clone)]
pub struct RepeatCounter<S> {
    k: usize,
    min_spacer: usize,
    max_spacer: usize,
    kmers_total: u64,
    canonical: Vec<u64>,
    builder: CompactBuilder,
    buffer: SlidingBuffer<u64>,
    present: Vec<u32>,
    sink: S,
}

impl<S: ResultSink> RepeatCounter<S> {
    pub fn new(k: usize, min_spacer: usize, max_spacer: usize, sink: S) -> Result<Self> {
        if k == 0 || k > MAX_DENSE_K {
            return Err(MotifError::KmerTooLong {
                k,
                limit: MAX_DENSE_K,
            });
        }
        if min_spacer > max_spacer {
            return Err(MotifError::BadSpacerRange {
                min: min_spacer as i64,
                max: max_spacer as i64,
            });
        }
        let total = kmers_total(k);
        Ok(Self {
            k,
            min_spacer,
            max_spacer,
            kmers_total: total,
            canonical: canonical_map(k),
            builder: CompactBuilder::new(k),
            buffer: SlidingBuffer::new(2 * (max_spacer + k) + 1),
            present: vec![0; total as usize],
            sink,
        })
    }

    /// Dense element id of a classified pair.
    pub fn element_id(&self, kmer: u64, spacer: usize, orientation: Orientation) -> u64 {
        let window = (self.max_spacer - self.min_spacer) as u64;
        self.canonical[kmer as usize]
            + self.kmers_total
                * ((spacer - self.min_spacer) as u64 + orientation as u64 * (window + 1))
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn step(&mut self) {
        if self.builder.ready(self.k) {
            let mut window = [0u64];
            self.builder.write(&mut window, self.k);
            let kmer = window[0];
            self.present[self.canonical[kmer as usize] as usize] += 1;
            self.buffer.put(kmer);
        } else {
            self.buffer.skip();
        }
        if !self.buffer.center_available() {
            return;
        }
        let center = self.buffer.center();
        let canonical_center = self.canonical[center as usize];
        self.present[canonical_center as usize] -= 1;
        if self.present[canonical_center as usize] == 0 {
            return;
        }
        let start = self.buffer.center_index() + self.k + self.min_spacer;
        for i in start..self.buffer.size() {
            if !self.buffer.is_valid(i) {
                continue;
            }
            let kmer = self.buffer.get(i);
            let orientation = if kmer == center {
                Orientation::Direct
            } else if kmer == canonical_center || self.canonical[kmer as usize] == center {
                if center == canonical_center {
                    Orientation::Inverted
                } else {
                    Orientation::Everted
                }
            } else {
                continue;
            };
            let spacer = (self.buffer.pos_from_center(i) - self.k as i64) as usize;
            self.sink.on_occurrence(
                self.element_id(kmer, spacer, orientation),
                self.buffer.abs_position(i + 1),
            );
        }
    }
}

impl<S: ResultSink> MotifCounter for RepeatCounter<S> {
    fn init_gene(&mut self, gene: usize) {
        self.builder.clear();
        self.buffer.reset();
        self.present.fill(0);
        self.sink.on_gene_start(gene);
    }

    fn count(&mut self, code: u8) {
        self.builder.put(code);
        self.step();
    }

    fn skip(&mut self) {
        self.builder.skip();
        self.step();
    }

    fn finalize_gene(&mut self) {
        for _ in 0..self.buffer.size() {
            self.skip();
        }
    }

    fn element_label(&self, element: u64) -> String {
        let window = (self.max_spacer - self.min_spacer) as u64;
        let kmer = element % self.kmers_total;
        let spacer = self.min_spacer as u64 + element / self.kmers_total % (window + 1);
        let orientation = element / self.kmers_total / (window + 1);
        let label = kmer_to_string(kmer, self.k, true);
        let rc = kmer_to_string(reverse_complement(kmer, self.k), self.k, true);
        match orientation {
            0 => format!("{label}_{spacer}_{label}"),
            1 => format!("{rc}_{spacer}_{label}"),
            _ => format!("{label}_{spacer}_{rc}"),
        }
    }
}
