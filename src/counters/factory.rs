//! Configuration-driven counter construction.

use serde::{Deserialize, Serialize};

use super::composition::{CompositionCounter, DyadSpec};
use super::repeat::RepeatCounter;
use super::simple::SimpleMotifCounter;
use super::specific::SpecificMotifCounter;
use super::MotifCounter;
use crate::error::Result;
use crate::results::ResultData;

fn default_true() -> bool {
    true
}

/// Declarative description of a counting run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CounterConfig {
    /// Every k-mer occurrence.
    Simple {
        k: usize,
        #[serde(default = "default_true")]
        rc: bool,
    },
    /// A fixed list of IUPAC motifs.
    SpecificSingle {
        patterns: Vec<String>,
        #[serde(default = "default_true")]
        rc: bool,
    },
    /// Direct, inverted and everted spaced repeats of a k-mer.
    Repeat {
        k: usize,
        min_spacer: usize,
        max_spacer: usize,
    },
    /// Pattern and k-mer co-occurrences at bounded spacing.
    SpacedDyad {
        patterns: Vec<String>,
        k: usize,
        min_spacer: i64,
        max_spacer: i64,
        #[serde(default = "default_true")]
        rc: bool,
        #[serde(default)]
        fuzzy_spacer: bool,
        #[serde(default)]
        fuzzy_order: bool,
        #[serde(default)]
        fuzzy_orientation: bool,
    },
}

/// A counter of any mode, wired to a [`ResultData`] sink.
#[derive(Debug, Clone)]
pub enum CounterKind {
    Simple(SimpleMotifCounter<ResultData>),
    Specific(SpecificMotifCounter<ResultData>),
    Repeat(RepeatCounter<ResultData>),
    Composition(CompositionCounter<ResultData>),
}

impl CounterKind {
    pub fn build(config: &CounterConfig, sink: ResultData) -> Result<Self> {
        Ok(match config {
            CounterConfig::Simple { k, rc } => {
                Self::Simple(SimpleMotifCounter::new(*k, *rc, sink)?)
            }
            CounterConfig::SpecificSingle { patterns, rc } => {
                Self::Specific(SpecificMotifCounter::new(patterns, *rc, sink)?)
            }
            CounterConfig::Repeat {
                k,
                min_spacer,
                max_spacer,
            } => Self::Repeat(RepeatCounter::new(*k, *min_spacer, *max_spacer, sink)?),
            CounterConfig::SpacedDyad {
                patterns,
                k,
                min_spacer,
                max_spacer,
                rc,
                fuzzy_spacer,
                fuzzy_order,
                fuzzy_orientation,
            } => Self::Composition(CompositionCounter::new(
                &DyadSpec {
                    patterns: patterns.clone(),
                    k: *k,
                    min_spacer: *min_spacer,
                    max_spacer: *max_spacer,
                    rc: *rc,
                    fuzzy_spacer: *fuzzy_spacer,
                    fuzzy_order: *fuzzy_order,
                    fuzzy_orientation: *fuzzy_orientation,
                },
                sink,
            )?),
        })
    }

    pub fn sink(&self) -> &ResultData {
        match self {
            Self::Simple(c) => c.sink(),
            Self::Specific(c) => c.sink(),
            Self::Repeat(c) => c.sink(),
            Self::Composition(c) => c.sink(),
        }
    }

    pub fn into_sink(self) -> ResultData {
        match self {
            Self::Simple(c) => c.into_sink(),
            Self::Specific(c) => c.into_sink(),
            Self::Repeat(c) => c.into_sink(),
            Self::Composition(c) => c.into_sink(),
        }
    }
}

impl MotifCounter for CounterKind {
    fn init_gene(&mut self, gene: usize) {
        match self {
            Self::Simple(c) => c.init_gene(gene),
            Self::Specific(c) => c.init_gene(gene),
            Self::Repeat(c) => c.init_gene(gene),
            Self::Composition(c) => c.init_gene(gene),
        }
    }

    fn count(&mut self, code: u8) {
        match self {
            Self::Simple(c) => c.count(code),
            Self::Specific(c) => c.count(code),
            Self::Repeat(c) => c.count(code),
            Self::Composition(c) => c.count(code),
        }
    }

    fn skip(&mut self) {
        match self {
            Self::Simple(c) => c.skip(),
            Self::Specific(c) => c.skip(),
            Self::Repeat(c) => c.skip(),
            Self::Composition(c) => c.skip(),
        }
    }

    fn finalize_gene(&mut self) {
        match self {
            Self::Simple(c) => c.finalize_gene(),
            Self::Specific(c) => c.finalize_gene(),
            Self::Repeat(c) => c.finalize_gene(),
            Self::Composition(c) => c.finalize_gene(),
        }
    }

    fn element_label(&self, element: u64) -> String {
        match self {
            Self::Simple(c) => c.element_label(element),
            Self::Specific(c) => c.element_label(element),
            Self::Repeat(c) => c.element_label(element),
            Self::Composition(c) => c.element_label(element),
        }
    }
}
