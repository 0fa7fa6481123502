//! Non-degenerate oligomer values in the 2-bit encoding.

use std::cmp::Ordering;
use std::fmt;

use super::encodings::{
    compact_cells, get_compact, put_compact, Cell, COMPACT_BITS, COMPACT_PER_CELL, COMPACT_RC,
    COMPACT_TO_CHAR, COMPACT_TO_IUPAC,
};
use super::iupac::IupacMotif;
use crate::error::Result;
use crate::motifs::encodings::char_to_compact;

/// An owned, fixed-length oligomer over `acgt`.
///
/// Position 0 is the last character of the source string. Two motifs are
/// equal iff they spell the same sequence; unused high bits of the last cell
/// are kept zero so equality and ordering are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompactMotif {
    cells: Vec<Cell>,
    length: usize,
}

impl CompactMotif {
    /// Parses a sequence string, case-insensitively.
    pub fn from_str(sequence: &str) -> Result<Self> {
        let length = sequence.chars().count();
        let mut cells = vec![0; compact_cells(length)];
        for (i, c) in sequence.chars().enumerate() {
            put_compact(&mut cells, length - 1 - i, char_to_compact(c)?);
        }
        Ok(Self { cells, length })
    }

    /// Adopts `length` bases from pre-packed cells; excess bits are masked.
    pub fn from_cells(cells: &[Cell], length: usize) -> Self {
        let n = compact_cells(length);
        let mut own = cells[..n].to_vec();
        let rem = length % COMPACT_PER_CELL;
        if rem != 0 {
            own[n - 1] &= (1 << (rem * COMPACT_BITS)) - 1;
        }
        Self { cells: own, length }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Compact code of the base at `pos` (0 = last character).
    pub fn get(&self, pos: usize) -> u8 {
        debug_assert!(pos < self.length);
        get_compact(&self.cells, pos)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn reverse_complement(&self) -> Self {
        let mut cells = vec![0; self.cells.len()];
        for pos in 0..self.length {
            let rc = COMPACT_RC[self.get(pos) as usize];
            put_compact(&mut cells, self.length - 1 - pos, rc);
        }
        Self {
            cells,
            length: self.length,
        }
    }

    /// Widens to the 4-bit encoding. Always succeeds.
    pub fn to_iupac(&self) -> IupacMotif {
        let mut codes = Vec::with_capacity(self.length);
        for pos in 0..self.length {
            codes.push(COMPACT_TO_IUPAC[self.get(pos) as usize]);
        }
        IupacMotif::from_codes(&codes)
    }
}

impl fmt::Display for CompactMotif {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in (0..self.length).rev() {
            write!(f, "{}", COMPACT_TO_CHAR[self.get(pos) as usize] as char)?;
        }
        Ok(())
    }
}

impl PartialOrd for CompactMotif {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompactMotif {
    /// Shorter motifs first; equal lengths compare as packed values, which
    /// for this layout equals lexicographic order of the sequence strings.
    fn cmp(&self, other: &Self) -> Ordering {
        self.length
            .cmp(&other.length)
            .then_with(|| self.cells.iter().rev().cmp(other.cells.iter().rev()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        for s in ["a", "acgt", "ttgacatgcca", "gggggggggggggggggggggggggggggggggg"] {
            assert_eq!(CompactMotif::from_str(s).unwrap().to_string(), s);
        }
        assert_eq!(
            CompactMotif::from_str("AcGt").unwrap().to_string(),
            "acgt"
        );
        assert!(CompactMotif::from_str("acgn").is_err());
    }

    #[test]
    fn position_zero_is_last_character() {
        let m = CompactMotif::from_str("acgt").unwrap();
        assert_eq!(m.get(0), 3);
        assert_eq!(m.get(3), 0);
    }

    #[test]
    fn reverse_complement_is_involution() {
        for s in ["acgt", "aacc", "ttgacatgcca", "gtagcgtagcgtagcgtagcgtagcgtagcgta"] {
            let m = CompactMotif::from_str(s).unwrap();
            assert_eq!(m.reverse_complement().reverse_complement(), m);
        }
        let m = CompactMotif::from_str("aacc").unwrap();
        assert_eq!(m.reverse_complement().to_string(), "ggtt");
    }

    #[test]
    fn ordering_is_length_then_lexicographic() {
        let a = CompactMotif::from_str("tttt").unwrap();
        let b = CompactMotif::from_str("aaaaa").unwrap();
        assert!(a < b);
        let c = CompactMotif::from_str("acgta").unwrap();
        let d = CompactMotif::from_str("acgtc").unwrap();
        assert!(c < d);
        assert_eq!(c.cmp(&c), Ordering::Equal);

        // crosses the cell boundary: 33 bases need two cells
        let long_a = CompactMotif::from_str(&("a".repeat(32) + "c")).unwrap();
        let long_b = CompactMotif::from_str(&("c".repeat(32) + "a")).unwrap();
        assert!(long_a < long_b);
    }

    #[test]
    fn from_cells_masks_excess_bits() {
        let garbage = [!0u64];
        let m = CompactMotif::from_cells(&garbage, 3);
        assert_eq!(m.to_string(), "ttt");
        assert_eq!(m, CompactMotif::from_str("ttt").unwrap());
    }

    #[test]
    fn widening_preserves_sequence() {
        let m = CompactMotif::from_str("gattaca").unwrap();
        assert_eq!(m.to_iupac().to_string(), "gattaca");
        assert!(!m.to_iupac().is_degenerate());
    }
}
