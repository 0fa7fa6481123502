//! Plain k-mer counting, optionally collapsing the two strands.

use super::MotifCounter;
use crate::error::{MotifError, Result};
use crate::kmers::{canonical_map, kmer_to_string, kmers_total, reverse_complement, MAX_DENSE_K};
use crate::motifs::CompactBuilder;
use crate::results::ResultSink;

/// Emits one event per k-window of consecutive valid bases.
///
/// With `collapse`, a k-mer and its reverse complement share the canonical
/// (smaller) id, so occurrences on either strand accumulate together.
#[derive(Debug, Clone)]
pub struct SimpleMotifCounter<S> {
    k: usize,
    collapse: bool,
    canonical: Vec<u64>,
    builder: CompactBuilder,
    sink: S,
}

impl<S: ResultSink> SimpleMotifCounter<S> {
    pub fn new(k: usize, collapse: bool, sink: S) -> Result<Self> {
        if k == 0 || k > MAX_DENSE_K {
            return Err(MotifError::KmerTooLong {
                k,
                limit: MAX_DENSE_K,
            });
        }
        Ok(Self {
            k,
            collapse,
            canonical: if collapse { canonical_map(k) } else { Vec::new() },
            builder: CompactBuilder::new(k),
            sink,
        })
    }

    /// Number of distinct element ids this counter can emit.
    pub fn elements_total(&self) -> u64 {
        kmers_total(self.k)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: ResultSink> MotifCounter for SimpleMotifCounter<S> {
    fn init_gene(&mut self, gene: usize) {
        self.builder.clear();
        self.sink.on_gene_start(gene);
    }

    fn count(&mut self, code: u8) {
        self.builder.put(code);
        if self.builder.full() {
            let mut window = [0u64];
            self.builder.write(&mut window, self.k);
            let kmer = window[0];
            let element = if self.collapse {
                self.canonical[kmer as usize]
            } else {
                kmer
            };
            self.sink.on_occurrence(element, self.builder.pos());
        }
    }

    fn skip(&mut self) {
        self.builder.skip();
    }

    fn finalize_gene(&mut self) {}

    fn element_label(&self, element: u64) -> String {
        let label = kmer_to_string(element, self.k, true);
        if self.collapse {
            let rc = kmer_to_string(reverse_complement(element, self.k), self.k, true);
            format!("{label} | {rc}")
        } else {
            label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::testing::{Event, RecordingSink};
    use crate::kmers::string_to_kmer;

    fn feed(counter: &mut SimpleMotifCounter<RecordingSink>, text: &str) {
        for c in text.chars() {
            match crate::motifs::encodings::compact_code(c) {
                Some(code) => counter.count(code),
                None => counter.skip(),
            }
        }
    }

    #[test]
    fn homopolymer_batches() {
        let mut counter = SimpleMotifCounter::new(4, false, RecordingSink::default()).unwrap();
        counter.init_gene(0);
        feed(&mut counter, "gggggxccccc");
        counter.finalize_gene();

        let gggg = string_to_kmer("gggg").unwrap();
        let cccc = string_to_kmer("cccc").unwrap();
        assert_eq!(
            counter.sink().occurrences(),
            vec![(gggg, 4), (gggg, 5), (cccc, 10), (cccc, 11)]
        );
    }

    #[test]
    fn strand_collapse_shares_the_canonical_id() {
        let mut counter = SimpleMotifCounter::new(4, true, RecordingSink::default()).unwrap();
        counter.init_gene(0);
        feed(&mut counter, "gggggxccccc");
        counter.finalize_gene();

        let cccc = string_to_kmer("cccc").unwrap();
        assert_eq!(
            counter.sink().occurrences(),
            vec![(cccc, 4), (cccc, 5), (cccc, 10), (cccc, 11)]
        );
        assert_eq!(counter.element_label(cccc), "CCCC | GGGG");
    }

    #[test]
    fn overlapping_windows_and_gene_boundaries() {
        let mut counter = SimpleMotifCounter::new(2, false, RecordingSink::default()).unwrap();
        counter.init_gene(0);
        feed(&mut counter, "acg");
        counter.finalize_gene();
        counter.init_gene(1);
        feed(&mut counter, "ta");
        counter.finalize_gene();

        let id = |s| string_to_kmer(s).unwrap();
        assert_eq!(
            counter.sink().events,
            vec![
                Event::Gene(0),
                Event::Occurrence(id("ac"), 2),
                Event::Occurrence(id("cg"), 3),
                Event::Gene(1),
                Event::Occurrence(id("ta"), 2),
            ]
        );
        assert_eq!(counter.element_label(id("cg")), "CG");
    }

    #[test]
    fn rejects_oversize_k() {
        assert!(SimpleMotifCounter::new(17, false, RecordingSink::default()).is_err());
        assert!(SimpleMotifCounter::new(0, false, RecordingSink::default()).is_err());
    }
}
