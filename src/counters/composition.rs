//! Spaced dyads: a degenerate pattern co-occurring with a k-mer.

use std::collections::VecDeque;

use super::MotifCounter;
use crate::error::{MotifError, Result};
use crate::kmers::{
    canonical_map, kmer_to_string, kmers_total, reverse_complement, reverse_complement_str,
    MAX_DENSE_K,
};
use crate::motifs::CompactBuilder;
use crate::pattern::Pattern;
use crate::results::ResultSink;

/// Counts pairs (pattern occurrence, k-mer) separated by
/// `min_spacer..=max_spacer` bases, in either order.
///
/// The ring holds the last `2*(max_spacer+k)+1` k-windows with the pattern
/// candidate at the center once warmed up; `center` starts negative so the
/// first scans wait for enough lookahead. When the center window matches a
/// pattern, every in-range valid window that is not itself a pattern
/// occurrence pairs with it. With `rc`, a center matching a pattern's
/// reverse complement pairs too, with the partner k-mer flipped to the
/// pattern's strand and the order bit mirrored.
///
/// The fuzzy flags coarsen the element id space: `fuzzy_spacer` folds all
/// spacer widths together, `fuzzy_order` ignores which side the pattern is
/// on, and `fuzzy_orientation` (under `rc`) collapses the partner k-mer to
/// its canonical form.
#[derive(Debug, Clone)]
pub struct CompositionCounter<S> {
    k: usize,
    min_spacer: i64,
    max_spacer: i64,
    window: u64,
    collapse: bool,
    fuzzy_spacer: bool,
    fuzzy_order: bool,
    fuzzy_orientation: bool,
    kmers_total: u64,
    canonical: Vec<u64>,
    patterns: Vec<Pattern>,
    rc_patterns: Vec<Pattern>,
    labels: Vec<String>,
    builder: CompactBuilder,
    ring: VecDeque<u64>,
    validity: VecDeque<bool>,
    capacity: usize,
    end: i64,
    center: i64,
    pos_offset: i64,
    sink: S,
}

/// Construction parameters for [`CompositionCounter`].
#[derive(Debug, Clone)]
pub struct DyadSpec {
    pub patterns: Vec<String>,
    pub k: usize,
    pub min_spacer: i64,
    pub max_spacer: i64,
    pub rc: bool,
    pub fuzzy_spacer: bool,
    pub fuzzy_order: bool,
    pub fuzzy_orientation: bool,
}

impl<S: ResultSink> CompositionCounter<S> {
    pub fn new(spec: &DyadSpec, sink: S) -> Result<Self> {
        let k = spec.k;
        if k == 0 || k > MAX_DENSE_K {
            return Err(MotifError::KmerTooLong {
                k,
                limit: MAX_DENSE_K,
            });
        }
        if spec.min_spacer < 0 || spec.min_spacer > spec.max_spacer {
            return Err(MotifError::BadSpacerRange {
                min: spec.min_spacer,
                max: spec.max_spacer,
            });
        }
        let mut patterns = Vec::with_capacity(spec.patterns.len());
        let mut rc_patterns = Vec::with_capacity(spec.patterns.len());
        for text in &spec.patterns {
            let pattern = Pattern::new(text)?;
            if pattern.len() != k {
                return Err(MotifError::PatternSizeMismatch {
                    expected: k,
                    found: pattern.len(),
                });
            }
            rc_patterns.push(Pattern::new(&reverse_complement_str(text))?);
            patterns.push(pattern);
        }
        let capacity = 2 * (spec.max_spacer as usize + k) + 1;
        Ok(Self {
            k,
            min_spacer: spec.min_spacer,
            max_spacer: spec.max_spacer,
            window: (spec.max_spacer - spec.min_spacer + 1) as u64,
            collapse: spec.rc,
            fuzzy_spacer: spec.fuzzy_spacer,
            fuzzy_order: spec.fuzzy_order,
            fuzzy_orientation: spec.fuzzy_orientation,
            kmers_total: kmers_total(k),
            canonical: if spec.rc && spec.fuzzy_orientation {
                canonical_map(k)
            } else {
                Vec::new()
            },
            patterns,
            rc_patterns,
            labels: spec.patterns.clone(),
            builder: CompactBuilder::new(k),
            ring: VecDeque::with_capacity(capacity),
            validity: VecDeque::with_capacity(capacity),
            capacity,
            end: 0,
            center: -(spec.max_spacer + k as i64 + 1),
            pos_offset: 0,
            sink,
        })
    }

    /// Dense element id: partner k-mer, pattern index, spacer width and the
    /// pattern's side, folded per the fuzzy flags.
    pub fn element_id(&self, kmer: u64, pattern: usize, spacer: i64, pattern_left: bool) -> u64 {
        let pattern_and_order = pattern as u64
            + self.patterns.len() as u64 * u64::from(!(self.fuzzy_order || pattern_left));
        let kmer = if self.fuzzy_orientation && self.collapse {
            self.canonical[kmer as usize]
        } else {
            kmer
        };
        if self.fuzzy_spacer {
            kmer + self.kmers_total * pattern_and_order
        } else {
            kmer + self.kmers_total
                * ((spacer - self.min_spacer) as u64 + self.window * pattern_and_order)
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn step(&mut self) {
        if self.ring.len() < self.capacity {
            self.center += 1;
            self.end += 1;
        } else {
            self.ring.pop_front();
            self.validity.pop_front();
        }
        let mut window = [0u64];
        self.builder.write(&mut window, self.k);
        self.ring.push_back(window[0]);
        self.validity.push_back(self.builder.ready(self.k));
        if self.center < 0 || !self.validity[self.center as usize] {
            return;
        }
        let center_kmer = self.ring[self.center as usize];
        for pattern in 0..self.patterns.len() {
            if self.patterns[pattern].check(center_kmer) {
                self.scan(pattern, false);
            }
            if self.collapse && self.rc_patterns[pattern].check(center_kmer) {
                self.scan(pattern, true);
            }
        }
    }

    fn scan(&mut self, pattern: usize, rc_frame: bool) {
        for i in 0..self.end as usize {
            // an upstream pattern occurrence owns its own pairs
            if (i as i64) < self.center
                && (self.patterns[pattern].check(self.ring[i])
                    || ((rc_frame || self.collapse)
                        && self.rc_patterns[pattern].check(self.ring[i])))
            {
                continue;
            }
            let distance = (self.center - i as i64).abs();
            if distance < self.k as i64 + self.min_spacer || !self.validity[i] {
                continue;
            }
            let spacer = distance - self.k as i64;
            let (kmer, pattern_left) = if rc_frame {
                (
                    reverse_complement(self.ring[i], self.k),
                    (i as i64) < self.center,
                )
            } else {
                (self.ring[i], (i as i64) > self.center)
            };
            let position =
                self.builder.pos() - self.pos_offset - self.end + (i as i64).max(self.center) + 1;
            self.sink
                .on_occurrence(self.element_id(kmer, pattern, spacer, pattern_left), position);
        }
    }
}

impl<S: ResultSink> MotifCounter for CompositionCounter<S> {
    fn init_gene(&mut self, gene: usize) {
        self.builder.clear();
        self.ring.clear();
        self.validity.clear();
        self.end = 0;
        self.center = -(self.max_spacer + self.k as i64 + 1);
        self.pos_offset = 0;
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
        while self.end > self.center {
            self.end -= 1;
            self.pos_offset += 1;
            self.skip();
        }
    }

    fn element_label(&self, element: u64) -> String {
        let kmer = element % self.kmers_total;
        let rest = element / self.kmers_total;
        let (spacer, pattern_and_order) = if self.fuzzy_spacer {
            (format!("{}..{}", self.min_spacer, self.max_spacer), rest)
        } else {
            (
                (self.min_spacer + (rest % self.window) as i64).to_string(),
                rest / self.window,
            )
        };
        let pattern = (pattern_and_order % self.patterns.len() as u64) as usize;
        let pattern_left = pattern_and_order / self.patterns.len() as u64 == 0;
        let kmer_label = kmer_to_string(kmer, self.k, true);
        let pattern_label = &self.labels[pattern];
        if pattern_left {
            format!("{pattern_label}_{spacer}_{kmer_label}")
        } else {
            format!("{kmer_label}_{spacer}_{pattern_label}")
        }
    }
}
