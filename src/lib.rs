//! remotif - Regulatory Element Motif Enumeration
//!
//! A streaming engine for enumerating candidate regulatory elements in DNA
//! sequences: plain oligomers, degenerate IUPAC motifs, spaced repeats and
//! spaced dyads. Counters consume one base at a time, aggregate through
//! pluggable result layouts and hand occurrence lists to an exact Fisher
//! test for enrichment screening.

pub mod buffer;
pub mod counters;
pub mod error;
pub mod kmers;
pub mod motifs;
pub mod pattern;
pub mod results;
pub mod scanner;
pub mod stats;

pub use counters::{CounterConfig, CounterKind, MotifCounter};
pub use error::{MotifError, Result};
pub use results::{ResultData, ResultLayout, ResultSink};
pub use scanner::{enumerate_motifs, ScanConfig, Scanner};
pub use stats::{fisher_test, mass_fisher_test, Alternative};
