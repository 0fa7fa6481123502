//! Streaming driver: feeds gene sequences through a counter.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::counters::{CounterConfig, CounterKind, MotifCounter};
use crate::error::Result;
use crate::motifs::encodings::compact_code;
use crate::results::{ResultData, ResultLayout};

/// Drives one counter over a set of gene sequences.
///
/// Each gene is independent: the counter is re-initialized, every character
/// is admitted (`count` for `acgt` in either case, one `skip` for anything
/// else), and the gene is finalized to drain buffered lookahead.
#[derive(Debug)]
pub struct Scanner<C> {
    counter: C,
}

impl<C: MotifCounter> Scanner<C> {
    pub fn new(counter: C) -> Self {
        Self { counter }
    }

    pub fn scan_gene(&mut self, gene: usize, sequence: &str) {
        self.counter.init_gene(gene);
        for c in sequence.chars() {
            match compact_code(c) {
                Some(code) => self.counter.count(code),
                None => self.counter.skip(),
            }
        }
        self.counter.finalize_gene();
    }

    /// Scans `sequences[i]` as the gene identified by `gene_ids[i]`.
    ///
    /// Panics when the two slices differ in length.
    pub fn scan(&mut self, sequences: &[String], gene_ids: &[usize]) {
        assert_eq!(
            sequences.len(),
            gene_ids.len(),
            "one gene id per sequence"
        );
        for (sequence, &gene) in sequences.iter().zip(gene_ids) {
            debug!("scanning gene {gene} ({} bases)", sequence.len());
            self.scan_gene(gene, sequence);
        }
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }

    pub fn into_counter(self) -> C {
        self.counter
    }
}

/// A full run description: what to count and how to aggregate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub layout: ResultLayout,
    #[serde(flatten)]
    pub counter: CounterConfig,
}

/// Builds the configured counter, scans every gene and marshals the
/// aggregated result to JSON with readable element and gene labels.
pub fn enumerate_motifs(
    config: &ScanConfig,
    sequences: &[String],
    gene_ids: &[usize],
    gene_names: &[String],
) -> Result<Value> {
    info!(
        "enumerating motifs over {} genes ({:?})",
        sequences.len(),
        config.counter
    );
    let counter = CounterKind::build(&config.counter, ResultData::new(config.layout))?;
    let mut scanner = Scanner::new(counter);
    scanner.scan(sequences, gene_ids);
    let counter = scanner.into_counter();
    let result = counter.sink().to_json(&|element| counter.element_label(element), gene_names);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::testing::{Event, RecordingSink};
    use crate::counters::SimpleMotifCounter;
    use crate::kmers::string_to_kmer;
    use serde_json::json;

    #[test]
    fn unrecognized_characters_skip_exactly_once() {
        let counter = SimpleMotifCounter::new(2, false, RecordingSink::default()).unwrap();
        let mut scanner = Scanner::new(counter);
        scanner.scan_gene(0, "aCxGt");
        let id = |s| string_to_kmer(s).unwrap();
        assert_eq!(
            scanner.counter().sink().events,
            vec![
                Event::Gene(0),
                Event::Occurrence(id("ac"), 2),
                // 'x' is one skip, so the next window only completes at 5
                Event::Occurrence(id("gt"), 5),
            ]
        );
    }

    #[test]
    fn end_to_end_counts() {
        let config: ScanConfig = serde_json::from_value(json!({
            "layout": "counts", "mode": "simple", "k": 4, "rc": true,
        }))
        .unwrap();
        let sequences = vec!["ggggg".to_string(), "ccccc".to_string()];
        let result = enumerate_motifs(
            &config,
            &sequences,
            &[0, 1],
            &["geneA".into(), "geneB".into()],
        )
        .unwrap();
        assert_eq!(result, json!({"CCCC | GGGG": 4}));
    }

    #[test]
    fn end_to_end_positions() {
        let config: ScanConfig = serde_json::from_value(json!({
            "layout": "positions", "mode": "specific_single",
            "patterns": ["aacc"], "rc": false,
        }))
        .unwrap();
        let sequences = vec!["ttaacctt".to_string()];
        let result =
            enumerate_motifs(&config, &sequences, &[0], &["geneA".into()]).unwrap();
        assert_eq!(result, json!({"aacc": {"geneA": [6]}}));
    }

    #[test]
    #[should_panic(expected = "one gene id per sequence")]
    fn mismatched_gene_ids_are_rejected() {
        let counter = SimpleMotifCounter::new(2, false, RecordingSink::default()).unwrap();
        let mut scanner = Scanner::new(counter);
        scanner.scan(&["acgt".to_string()], &[0, 1]);
    }

    #[test]
    fn bad_config_is_reported() {
        let config: ScanConfig = serde_json::from_value(json!({
            "layout": "counts", "mode": "simple", "k": 40,
        }))
        .unwrap();
        assert!(enumerate_motifs(&config, &[], &[], &[]).is_err());
    }
}
