//! Streaming occurrence counters.
//!
//! A counter consumes one compact base code per call and pushes
//! `(element id, position)` events into its sink. Positions are 1-based and
//! refer to the last base of the window that triggered the event. Element
//! ids are dense within each counter's own id space; `element_label` maps
//! them back to readable strings.

pub mod composition;
pub mod factory;
pub mod repeat;
pub mod simple;
pub mod specific;

pub use composition::CompositionCounter;
pub use factory::{CounterConfig, CounterKind};
pub use repeat::{Orientation, RepeatCounter};
pub use simple::SimpleMotifCounter;
pub use specific::SpecificMotifCounter;

/// The streaming interface every counter implements.
pub trait MotifCounter {
    /// Starts a new gene; all window state is discarded.
    fn init_gene(&mut self, gene: usize);

    /// Admits one valid base, given as a compact code.
    fn count(&mut self, code: u8);

    /// Admits an unreadable base.
    fn skip(&mut self);

    /// Drains any lookahead still buffered at the end of the gene.
    fn finalize_gene(&mut self);

    /// Readable label of an element id.
    fn element_label(&self, element: u64) -> String;
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::results::ResultSink;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Event {
        Gene(usize),
        Occurrence(u64, i64),
    }

    /// Records the raw event stream for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub events: Vec<Event>,
    }

    impl ResultSink for RecordingSink {
        fn on_gene_start(&mut self, gene: usize) {
            self.events.push(Event::Gene(gene));
        }

        fn on_occurrence(&mut self, element: u64, position: i64) {
            self.events.push(Event::Occurrence(element, position));
        }
    }

    impl RecordingSink {
        pub fn occurrences(&self) -> Vec<(u64, i64)> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Occurrence(element, position) => Some((*element, *position)),
                    Event::Gene(_) => None,
                })
                .collect()
        }
    }
}
