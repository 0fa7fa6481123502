//! Possibly-degenerate oligomer values in the 4-bit bitmask encoding.

use std::cmp::Ordering;
use std::fmt;

use super::encodings::{
    char_to_iupac, compact_cells, get_iupac, iupac_cells, put_compact, put_iupac, Cell,
    IUPAC_BITS, IUPAC_PER_CELL, IUPAC_RC, IUPAC_TO_CHAR, IUPAC_TO_COMPACT,
};
use crate::error::{MotifError, Result};

/// An owned, fixed-length IUPAC oligomer.
///
/// Each position is a bitmask over `{A, C, G, T}`; a position whose mask has
/// exactly one bit set is a plain base, anything else (including the empty
/// gap mask) makes the motif degenerate. Position 0 is the last character of
/// the source string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IupacMotif {
    cells: Vec<Cell>,
    length: usize,
    degenerate: bool,
}

impl IupacMotif {
    /// Parses a sequence string over the full IUPAC alphabet.
    pub fn from_str(sequence: &str) -> Result<Self> {
        let length = sequence.chars().count();
        let mut cells = vec![0; iupac_cells(length)];
        for (i, c) in sequence.chars().enumerate() {
            put_iupac(&mut cells, length - 1 - i, char_to_iupac(c)?);
        }
        Ok(Self::assemble(cells, length))
    }

    /// Builds from per-position codes (index 0 = last character).
    pub fn from_codes(codes: &[u8]) -> Self {
        let length = codes.len();
        let mut cells = vec![0; iupac_cells(length)];
        for (pos, &code) in codes.iter().enumerate() {
            put_iupac(&mut cells, pos, code);
        }
        Self::assemble(cells, length)
    }

    /// Adopts `length` codes from pre-packed cells; excess bits are masked.
    pub fn from_cells(cells: &[Cell], length: usize) -> Self {
        let n = iupac_cells(length);
        let mut own = cells[..n].to_vec();
        let rem = length % IUPAC_PER_CELL;
        if rem != 0 {
            own[n - 1] &= (1 << (rem * IUPAC_BITS)) - 1;
        }
        Self::assemble(own, length)
    }

    fn assemble(cells: Vec<Cell>, length: usize) -> Self {
        let degenerate = (0..length).any(|pos| get_iupac(&cells, pos).count_ones() != 1);
        Self {
            cells,
            length,
            degenerate,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// True when any position is ambiguous or a gap.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// IUPAC bitmask at `pos` (0 = last character).
    pub fn get(&self, pos: usize) -> u8 {
        debug_assert!(pos < self.length);
        get_iupac(&self.cells, pos)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn reverse_complement(&self) -> Self {
        let mut cells = vec![0; self.cells.len()];
        for pos in 0..self.length {
            let rc = IUPAC_RC[self.get(pos) as usize];
            put_iupac(&mut cells, self.length - 1 - pos, rc);
        }
        Self::assemble(cells, self.length)
    }

    /// Narrows to 2-bit cells; only defined for non-degenerate motifs.
    pub fn encode_compact(&self) -> Result<Vec<Cell>> {
        let mut cells = vec![0; compact_cells(self.length)];
        for pos in 0..self.length {
            let code = self.get(pos);
            let compact = IUPAC_TO_COMPACT[code as usize];
            if compact < 0 {
                return Err(MotifError::DegenerateEncoding {
                    symbol: IUPAC_TO_CHAR[code as usize] as char,
                });
            }
            put_compact(&mut cells, pos, compact as u8);
        }
        Ok(cells)
    }

    /// Set inclusion: every position of `other` is a non-empty subset of the
    /// corresponding position of `self`. Lengths must be equal.
    pub fn includes(&self, other: &IupacMotif) -> bool {
        self.length == other.length && self.includes_cells(&other.cells, self.length)
    }

    /// Inclusion against the low `length` positions of a raw window.
    ///
    /// The window may carry more positions above; only the trailing ones are
    /// compared, which is exactly what a rolling builder needs.
    pub fn includes_cells(&self, window: &[Cell], length: usize) -> bool {
        debug_assert!(length <= self.length);
        for pos in 0..length {
            let own = self.get(pos);
            let candidate = get_iupac(window, pos);
            if candidate & !own != 0 || candidate & own == 0 {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for IupacMotif {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in (0..self.length).rev() {
            write!(f, "{}", IUPAC_TO_CHAR[self.get(pos) as usize] as char)?;
        }
        Ok(())
    }
}

impl PartialOrd for IupacMotif {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IupacMotif {
    /// Shorter first, then non-degenerate before degenerate, then packed
    /// value (lexicographic order of the sequence strings).
    fn cmp(&self, other: &Self) -> Ordering {
        self.length
            .cmp(&other.length)
            .then_with(|| self.degenerate.cmp(&other.degenerate))
            .then_with(|| self.cells.iter().rev().cmp(other.cells.iter().rev()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        for s in ["acgt", "nryswkm", "gat-aca", "acmgrsvtwyhkdbn-"] {
            assert_eq!(IupacMotif::from_str(s).unwrap().to_string(), s);
        }
        assert_eq!(IupacMotif::from_str("AcGtN").unwrap().to_string(), "acgtn");
        assert!(IupacMotif::from_str("acgu").is_err());
    }

    #[test]
    fn degeneracy_detection() {
        assert!(!IupacMotif::from_str("acgt").unwrap().is_degenerate());
        assert!(IupacMotif::from_str("acgn").unwrap().is_degenerate());
        assert!(IupacMotif::from_str("ac-t").unwrap().is_degenerate());
        // 17 bases, forces the check across the cell boundary
        assert!(!IupacMotif::from_str("acgtacgtacgtacgta").unwrap().is_degenerate());
        assert!(IupacMotif::from_str("racgtacgtacgtacgt").unwrap().is_degenerate());
    }

    #[test]
    fn reverse_complement_is_involution() {
        for s in ["acgt", "nryswkm", "gattaca", "mkndbv-hsw"] {
            let m = IupacMotif::from_str(s).unwrap();
            assert_eq!(m.reverse_complement().reverse_complement(), m);
        }
        assert_eq!(
            IupacMotif::from_str("rry").unwrap().reverse_complement().to_string(),
            "ryy"
        );
    }

    #[test]
    fn inclusion_semantics() {
        let n4 = IupacMotif::from_str("nnnn").unwrap();
        let acgt = IupacMotif::from_str("acgt").unwrap();
        let rr = IupacMotif::from_str("rrss").unwrap();
        assert!(n4.includes(&acgt));
        assert!(n4.includes(&n4));
        assert!(acgt.includes(&acgt));
        assert!(!acgt.includes(&n4));
        assert!(!n4.includes(&IupacMotif::from_str("acg").unwrap()));
        assert!(rr.includes(&IupacMotif::from_str("agcc").unwrap()));
        assert!(!rr.includes(&IupacMotif::from_str("ttgg").unwrap()));
        // a gap position can never be included
        let gap = IupacMotif::from_str("a-gt").unwrap();
        assert!(!n4.includes(&gap));
    }

    #[test]
    fn compact_narrowing() {
        let m = IupacMotif::from_str("acgt").unwrap();
        assert!(m.encode_compact().is_ok());
        let err = IupacMotif::from_str("acrt").unwrap().encode_compact();
        assert_eq!(err, Err(MotifError::DegenerateEncoding { symbol: 'r' }));
    }

    #[test]
    fn degenerate_orders_after_plain() {
        let plain = IupacMotif::from_str("tttt").unwrap();
        let fuzzy = IupacMotif::from_str("aaan").unwrap();
        assert!(plain < fuzzy);
        assert!(IupacMotif::from_str("aaaaa").unwrap() > fuzzy);
        let a = IupacMotif::from_str("acga").unwrap();
        let b = IupacMotif::from_str("acgc").unwrap();
        assert!(a < b);
    }
}
