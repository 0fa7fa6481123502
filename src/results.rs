//! Occurrence sinks and marshalled result layouts.
//!
//! Counters report through the [`ResultSink`] trait and know nothing about
//! aggregation. Four layouts cover the usual questions: how often does an
//! element occur, where, in which genes, and what does each gene look like
//! position by position. [`ResultData`] is the tagged union the factory and
//! the scanner work with; it marshals to JSON given the counter's label
//! function and the gene names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Receiver of streaming occurrence events.
pub trait ResultSink {
    fn on_gene_start(&mut self, gene: usize);
    fn on_occurrence(&mut self, element: u64, position: i64);
}

/// Total occurrence count per element.
#[derive(Debug, Default, Clone)]
pub struct ElementCounts {
    counts: BTreeMap<u64, u64>,
}

impl ResultSink for ElementCounts {
    fn on_gene_start(&mut self, _gene: usize) {}

    fn on_occurrence(&mut self, element: u64, _position: i64) {
        *self.counts.entry(element).or_insert(0) += 1;
    }
}

impl ElementCounts {
    pub fn counts(&self) -> &BTreeMap<u64, u64> {
        &self.counts
    }

    pub fn to_json(&self, label: &dyn Fn(u64) -> String, _genes: &[String]) -> Value {
        Value::Object(
            self.counts
                .iter()
                .map(|(&element, &count)| (label(element), json!(count)))
                .collect(),
        )
    }
}

/// Every occurrence position, grouped by element and gene.
#[derive(Debug, Default, Clone)]
pub struct MotifPositions {
    positions: BTreeMap<u64, BTreeMap<usize, Vec<i64>>>,
    current_gene: usize,
}

impl ResultSink for MotifPositions {
    fn on_gene_start(&mut self, gene: usize) {
        self.current_gene = gene;
    }

    fn on_occurrence(&mut self, element: u64, position: i64) {
        self.positions
            .entry(element)
            .or_default()
            .entry(self.current_gene)
            .or_default()
            .push(position);
    }
}

impl MotifPositions {
    pub fn positions(&self) -> &BTreeMap<u64, BTreeMap<usize, Vec<i64>>> {
        &self.positions
    }

    pub fn to_json(&self, label: &dyn Fn(u64) -> String, genes: &[String]) -> Value {
        Value::Object(
            self.positions
                .iter()
                .map(|(&element, per_gene)| {
                    let genes_obj: serde_json::Map<String, Value> = per_gene
                        .iter()
                        .map(|(&gene, positions)| (genes[gene].clone(), json!(positions)))
                        .collect();
                    (label(element), Value::Object(genes_obj))
                })
                .collect(),
        )
    }
}

/// The genes each element occurs in, without positions or multiplicities.
#[derive(Debug, Default, Clone)]
pub struct GenePresence {
    genes: BTreeMap<u64, Vec<usize>>,
    current_gene: usize,
}

impl ResultSink for GenePresence {
    fn on_gene_start(&mut self, gene: usize) {
        self.current_gene = gene;
    }

    fn on_occurrence(&mut self, element: u64, _position: i64) {
        let list = self.genes.entry(element).or_default();
        if list.last() != Some(&self.current_gene) {
            list.push(self.current_gene);
        }
    }
}

impl GenePresence {
    pub fn genes(&self) -> &BTreeMap<u64, Vec<usize>> {
        &self.genes
    }

    pub fn to_json(&self, label: &dyn Fn(u64) -> String, genes: &[String]) -> Value {
        Value::Object(
            self.genes
                .iter()
                .map(|(&element, list)| {
                    let names: Vec<&str> = list.iter().map(|&g| genes[g].as_str()).collect();
                    (label(element), json!(names))
                })
                .collect(),
        )
    }
}

/// Positional profile: for each gene, the element reported at each position.
///
/// Useful with counters that emit at most one element per position, such as
/// the simple k-mer counter. The first reported position across the whole
/// run sets the leading margin trimmed on marshal.
#[derive(Debug, Clone)]
pub struct GeneComposition {
    profiles: BTreeMap<usize, Vec<Option<u64>>>,
    current_gene: usize,
    margin: usize,
}

impl Default for GeneComposition {
    fn default() -> Self {
        Self {
            profiles: BTreeMap::new(),
            current_gene: 0,
            margin: usize::MAX,
        }
    }
}

impl ResultSink for GeneComposition {
    fn on_gene_start(&mut self, gene: usize) {
        self.current_gene = gene;
        self.profiles.entry(gene).or_default();
    }

    fn on_occurrence(&mut self, element: u64, position: i64) {
        debug_assert!(position >= 0);
        let index = position as usize;
        self.margin = self.margin.min(index);
        let profile = self.profiles.entry(self.current_gene).or_default();
        if profile.len() <= index {
            profile.resize(index + 1, None);
        }
        profile[index] = Some(element);
    }
}

impl GeneComposition {
    pub fn profiles(&self) -> &BTreeMap<usize, Vec<Option<u64>>> {
        &self.profiles
    }

    pub fn to_json(&self, label: &dyn Fn(u64) -> String, genes: &[String]) -> Value {
        let margin = if self.margin == usize::MAX { 0 } else { self.margin };
        Value::Object(
            self.profiles
                .iter()
                .map(|(&gene, profile)| {
                    let row: Vec<Value> = profile
                        .iter()
                        .skip(margin)
                        .map(|slot| match slot {
                            Some(element) => json!(label(*element)),
                            None => Value::Null,
                        })
                        .collect();
                    (genes[gene].clone(), json!(row))
                })
                .collect(),
        )
    }
}

/// Selects the aggregation layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultLayout {
    Counts,
    Positions,
    Genes,
    Composition,
}

/// The tagged union of the four layouts.
#[derive(Debug, Clone)]
pub enum ResultData {
    Counts(ElementCounts),
    Positions(MotifPositions),
    Genes(GenePresence),
    Composition(GeneComposition),
}

impl ResultData {
    pub fn new(layout: ResultLayout) -> Self {
        match layout {
            ResultLayout::Counts => Self::Counts(ElementCounts::default()),
            ResultLayout::Positions => Self::Positions(MotifPositions::default()),
            ResultLayout::Genes => Self::Genes(GenePresence::default()),
            ResultLayout::Composition => Self::Composition(GeneComposition::default()),
        }
    }

    pub fn to_json(&self, label: &dyn Fn(u64) -> String, genes: &[String]) -> Value {
        match self {
            Self::Counts(data) => data.to_json(label, genes),
            Self::Positions(data) => data.to_json(label, genes),
            Self::Genes(data) => data.to_json(label, genes),
            Self::Composition(data) => data.to_json(label, genes),
        }
    }
}

impl ResultSink for ResultData {
    fn on_gene_start(&mut self, gene: usize) {
        match self {
            Self::Counts(data) => data.on_gene_start(gene),
            Self::Positions(data) => data.on_gene_start(gene),
            Self::Genes(data) => data.on_gene_start(gene),
            Self::Composition(data) => data.on_gene_start(gene),
        }
    }

    fn on_occurrence(&mut self, element: u64, position: i64) {
        match self {
            Self::Counts(data) => data.on_occurrence(element, position),
            Self::Positions(data) => data.on_occurrence(element, position),
            Self::Genes(data) => data.on_occurrence(element, position),
            Self::Composition(data) => data.on_occurrence(element, position),
        }
    }
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn on_gene_start(&mut self, gene: usize) {
        (**self).on_gene_start(gene);
    }

    fn on_occurrence(&mut self, element: u64, position: i64) {
        (**self).on_occurrence(element, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(element: u64) -> String {
        format!("e{element}")
    }

    fn feed(sink: &mut dyn ResultSink) {
        sink.on_gene_start(0);
        sink.on_occurrence(7, 4);
        sink.on_occurrence(7, 9);
        sink.on_occurrence(2, 5);
        sink.on_gene_start(2);
        sink.on_occurrence(7, 4);
    }

    #[test]
    fn counts_layout() {
        let mut sink = ElementCounts::default();
        feed(&mut sink);
        let genes = vec!["g0".into(), "g1".into(), "g2".into()];
        assert_eq!(
            sink.to_json(&label, &genes),
            json!({"e2": 1, "e7": 3})
        );
    }

    #[test]
    fn positions_layout() {
        let mut sink = MotifPositions::default();
        feed(&mut sink);
        let genes = vec!["g0".into(), "g1".into(), "g2".into()];
        assert_eq!(
            sink.to_json(&label, &genes),
            json!({
                "e2": {"g0": [5]},
                "e7": {"g0": [4, 9], "g2": [4]},
            })
        );
    }

    #[test]
    fn presence_layout_dedupes_consecutive() {
        let mut sink = GenePresence::default();
        feed(&mut sink);
        let genes = vec!["g0".into(), "g1".into(), "g2".into()];
        assert_eq!(
            sink.to_json(&label, &genes),
            json!({"e2": ["g0"], "e7": ["g0", "g2"]})
        );
    }

    #[test]
    fn composition_layout_trims_leading_margin() {
        let mut sink = GeneComposition::default();
        feed(&mut sink);
        let genes = vec!["g0".into(), "g1".into(), "g2".into()];
        assert_eq!(
            sink.to_json(&label, &genes),
            json!({
                "g0": ["e7", "e2", null, null, null, "e7"],
                "g2": ["e7"],
            })
        );
    }
}
