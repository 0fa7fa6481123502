//! Counting a fixed set of (possibly degenerate) motifs.

use super::MotifCounter;
use crate::error::Result;
use crate::motifs::{IupacBuilder, IupacMotif};
use crate::results::ResultSink;

/// Matches every admitted position against a list of IUPAC motifs.
///
/// Motifs may have different lengths; one builder sized to the longest
/// serves them all, each matching against its own trailing window. The
/// element id of a motif is its index in the list.
#[derive(Debug, Clone)]
pub struct SpecificMotifCounter<S> {
    motifs: Vec<IupacMotif>,
    labels: Vec<String>,
    collapse: bool,
    builder: IupacBuilder,
    sink: S,
}

impl<S: ResultSink> SpecificMotifCounter<S> {
    pub fn new(patterns: &[String], collapse: bool, sink: S) -> Result<Self> {
        let motifs = patterns
            .iter()
            .map(|p| IupacMotif::from_str(p))
            .collect::<Result<Vec<_>>>()?;
        let longest = motifs.iter().map(|m| m.len()).max().unwrap_or(0);
        Ok(Self {
            motifs,
            labels: patterns.to_vec(),
            collapse,
            builder: IupacBuilder::new(longest),
            sink,
        })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: ResultSink> MotifCounter for SpecificMotifCounter<S> {
    fn init_gene(&mut self, gene: usize) {
        self.builder.clear();
        self.sink.on_gene_start(gene);
    }

    fn count(&mut self, code: u8) {
        self.builder.put_compact(code);
        for (index, motif) in self.motifs.iter().enumerate() {
            if self.builder.matches(motif, self.collapse) {
                self.sink.on_occurrence(index as u64, self.builder.pos());
            }
        }
    }

    fn skip(&mut self) {
        self.builder.skip();
    }

    fn finalize_gene(&mut self) {}

    fn element_label(&self, element: u64) -> String {
        self.labels[element as usize].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::testing::RecordingSink;

    fn patterns() -> Vec<String> {
        vec!["aacc".into(), "rrss".into(), "gtagc".into()]
    }

    fn feed(counter: &mut SpecificMotifCounter<RecordingSink>, text: &str) {
        for c in text.chars() {
            match crate::motifs::encodings::compact_code(c) {
                Some(code) => counter.count(code),
                None => counter.skip(),
            }
        }
    }

    #[test]
    fn matches_exact_and_degenerate_patterns() {
        let mut counter =
            SpecificMotifCounter::new(&patterns(), false, RecordingSink::default()).unwrap();
        counter.init_gene(0);
        feed(&mut counter, "aaccgctac");
        counter.finalize_gene();
        counter.init_gene(1);
        feed(&mut counter, "gtagcggtt");
        counter.finalize_gene();

        assert_eq!(
            counter.sink().occurrences(),
            vec![(0, 4), (1, 4), (2, 5), (1, 6)]
        );
        assert_eq!(counter.element_label(2), "gtagc");
    }

    #[test]
    fn reverse_strand_matching() {
        let mut counter =
            SpecificMotifCounter::new(&patterns(), true, RecordingSink::default()).unwrap();
        counter.init_gene(1);
        feed(&mut counter, "gtagcggtt");
        counter.finalize_gene();

        // ggtt is the reverse complement of aacc, which rrss also covers
        assert_eq!(
            counter.sink().occurrences(),
            vec![(2, 5), (1, 6), (0, 9), (1, 9)]
        );
    }

    #[test]
    fn gaps_interrupt_matching() {
        let mut counter =
            SpecificMotifCounter::new(&["aacc".into()], false, RecordingSink::default()).unwrap();
        counter.init_gene(0);
        feed(&mut counter, "aaxccaacc");
        counter.finalize_gene();
        assert_eq!(counter.sink().occurrences(), vec![(0, 9)]);
    }

    #[test]
    fn rejects_bad_pattern_characters() {
        assert!(
            SpecificMotifCounter::new(&["acgu".into()], false, RecordingSink::default()).is_err()
        );
    }
}
