//! Rolling dual-window builders.
//!
//! A builder of window length L consumes one base per call and maintains, in
//! O(1) amortized time, the packed forward window of the last L bases and its
//! reverse complement. The forward window shifts left with the newest base
//! entering at position 0; the complement window is written in place while
//! warming up and afterwards shifts right with the complement of the newest
//! base entering at position L-1. That keeps the complement window equal to
//! the reverse complement of the forward one at every step.
//!
//! `skip` marks an unreadable base: it advances the stream position but
//! resets `accumulated`, so no window spanning the gap is ever reported
//! ready.

use super::compact::CompactMotif;
use super::encodings::{
    compact_cells, iupac_cells, put_compact, put_iupac, Cell, CELL_BITS, COMPACT_BITS,
    COMPACT_MASK, COMPACT_PER_CELL, COMPACT_RC, COMPACT_TO_IUPAC, IUPAC_BITS, IUPAC_MASK,
    IUPAC_PER_CELL, IUPAC_RC, IUPAC_TO_CHAR, IUPAC_TO_COMPACT,
};
use super::iupac::IupacMotif;
use crate::error::{MotifError, Result};

/// Rolling window over the 2-bit encoding.
#[derive(Debug, Clone)]
pub struct CompactBuilder {
    cells: Vec<Cell>,
    complement: Vec<Cell>,
    length: usize,
    accumulated: usize,
    pos: i64,
}

impl CompactBuilder {
    pub fn new(length: usize) -> Self {
        let n = compact_cells(length);
        Self {
            cells: vec![0; n],
            complement: vec![0; n],
            length,
            accumulated: 0,
            pos: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Consecutive valid bases currently in the window, capped at the length.
    pub fn accumulated(&self) -> usize {
        self.accumulated
    }

    /// 1-based position of the last admitted base (skips included).
    pub fn pos(&self) -> i64 {
        self.pos
    }

    /// True once the trailing `size` bases form a gap-free window.
    pub fn ready(&self, size: usize) -> bool {
        self.accumulated >= size && size <= self.length
    }

    /// True once the whole window is gap-free.
    pub fn full(&self) -> bool {
        self.accumulated >= self.length
    }

    /// Admits one base, given as a compact code.
    pub fn put(&mut self, code: u8) {
        let code = code & COMPACT_MASK as u8;
        let mut carry = code as Cell;
        for cell in self.cells.iter_mut() {
            let next = *cell >> ((COMPACT_PER_CELL - 1) * COMPACT_BITS) & COMPACT_MASK;
            *cell = (*cell << COMPACT_BITS) | carry;
            carry = next;
        }
        let rc = COMPACT_RC[code as usize];
        if self.accumulated < self.length {
            put_compact(&mut self.complement, self.accumulated, rc);
        } else {
            let top_shift = (self.length - 1) % COMPACT_PER_CELL * COMPACT_BITS;
            let mut carry = (rc as Cell) << top_shift;
            for cell in self.complement.iter_mut().rev() {
                let next = (*cell & COMPACT_MASK) << ((COMPACT_PER_CELL - 1) * COMPACT_BITS);
                *cell = (*cell >> COMPACT_BITS) | carry;
                carry = next;
            }
        }
        self.accumulated = (self.accumulated + 1).min(self.length);
        self.pos += 1;
    }

    /// Admits one base given as an IUPAC code; degenerate codes and the gap
    /// have no compact form and are rejected.
    pub fn put_iupac(&mut self, code: u8) -> Result<()> {
        let compact = IUPAC_TO_COMPACT[(code & IUPAC_MASK as u8) as usize];
        if compact < 0 {
            return Err(MotifError::DegenerateEncoding {
                symbol: IUPAC_TO_CHAR[(code & IUPAC_MASK as u8) as usize] as char,
            });
        }
        self.put(compact as u8);
        Ok(())
    }

    /// Advances past an unreadable base.
    pub fn skip(&mut self) {
        self.accumulated = 0;
        self.pos += 1;
    }

    /// Resets the builder for a new stream.
    pub fn clear(&mut self) {
        self.accumulated = 0;
        self.pos = 0;
    }

    /// Motif of the trailing `size` bases.
    pub fn build(&self, size: usize) -> Result<CompactMotif> {
        self.check_ready(size)?;
        Ok(CompactMotif::from_cells(&self.cells, size))
    }

    /// Reverse complement of the trailing `size` bases.
    pub fn build_complement(&self, size: usize) -> Result<CompactMotif> {
        self.check_ready(size)?;
        Ok(CompactMotif::from_cells(
            &self.complement_window(size),
            size,
        ))
    }

    /// Copies the trailing `size` bases' packed bits into `out`, masking the
    /// excess bits of the last touched cell.
    pub fn write(&self, out: &mut [Cell], size: usize) {
        debug_assert!(size >= 1 && size <= self.length);
        let last = (size - 1) / COMPACT_PER_CELL;
        out[..=last].copy_from_slice(&self.cells[..=last]);
        let rem = size % COMPACT_PER_CELL;
        if rem != 0 {
            out[last] &= (1 << (rem * COMPACT_BITS)) - 1;
        }
    }

    fn check_ready(&self, size: usize) -> Result<()> {
        if !self.ready(size) {
            return Err(MotifError::NotReady {
                accumulated: self.accumulated,
                requested: size,
            });
        }
        Ok(())
    }

    // The complement of the trailing `size` bases sits `accumulated - size`
    // positions up in the complement window; shift it down to position 0.
    fn complement_window(&self, size: usize) -> Vec<Cell> {
        let shift = (self.accumulated - size) * COMPACT_BITS;
        shift_down(&self.complement, shift, compact_cells(size))
    }
}

/// Rolling window over the 4-bit IUPAC encoding.
#[derive(Debug, Clone)]
pub struct IupacBuilder {
    cells: Vec<Cell>,
    complement: Vec<Cell>,
    length: usize,
    accumulated: usize,
    pos: i64,
}

impl IupacBuilder {
    pub fn new(length: usize) -> Self {
        let n = iupac_cells(length);
        Self {
            cells: vec![0; n],
            complement: vec![0; n],
            length,
            accumulated: 0,
            pos: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn accumulated(&self) -> usize {
        self.accumulated
    }

    pub fn pos(&self) -> i64 {
        self.pos
    }

    pub fn ready(&self, size: usize) -> bool {
        self.accumulated >= size && size <= self.length
    }

    pub fn full(&self) -> bool {
        self.accumulated >= self.length
    }

    /// Admits one base, given as an IUPAC bitmask code.
    pub fn put(&mut self, code: u8) {
        let code = code & IUPAC_MASK as u8;
        let mut carry = code as Cell;
        for cell in self.cells.iter_mut() {
            let next = *cell >> ((IUPAC_PER_CELL - 1) * IUPAC_BITS) & IUPAC_MASK;
            *cell = (*cell << IUPAC_BITS) | carry;
            carry = next;
        }
        let rc = IUPAC_RC[code as usize];
        if self.accumulated < self.length {
            put_iupac(&mut self.complement, self.accumulated, rc);
        } else {
            let top_shift = (self.length - 1) % IUPAC_PER_CELL * IUPAC_BITS;
            let mut carry = (rc as Cell) << top_shift;
            for cell in self.complement.iter_mut().rev() {
                let next = (*cell & IUPAC_MASK) << ((IUPAC_PER_CELL - 1) * IUPAC_BITS);
                *cell = (*cell >> IUPAC_BITS) | carry;
                carry = next;
            }
        }
        self.accumulated = (self.accumulated + 1).min(self.length);
        self.pos += 1;
    }

    /// Admits a base given as a compact code, widening it to its bitmask.
    pub fn put_compact(&mut self, code: u8) {
        self.put(COMPACT_TO_IUPAC[(code & COMPACT_MASK as u8) as usize]);
    }

    pub fn skip(&mut self) {
        self.accumulated = 0;
        self.pos += 1;
    }

    pub fn clear(&mut self) {
        self.accumulated = 0;
        self.pos = 0;
    }

    pub fn build(&self, size: usize) -> Result<IupacMotif> {
        self.check_ready(size)?;
        Ok(IupacMotif::from_cells(&self.cells, size))
    }

    pub fn build_complement(&self, size: usize) -> Result<IupacMotif> {
        self.check_ready(size)?;
        Ok(IupacMotif::from_cells(
            &self.complement_window(size),
            size,
        ))
    }

    /// True when the trailing window matches `pattern`, or, with `rc`, when
    /// its reverse complement does. A window shorter than the pattern never
    /// matches.
    pub fn matches(&self, pattern: &IupacMotif, rc: bool) -> bool {
        let size = pattern.len();
        if self.accumulated < size {
            return false;
        }
        if pattern.includes_cells(&self.cells, size) {
            return true;
        }
        rc && pattern.includes_cells(&self.complement_window(size), size)
    }

    fn check_ready(&self, size: usize) -> Result<()> {
        if !self.ready(size) {
            return Err(MotifError::NotReady {
                accumulated: self.accumulated,
                requested: size,
            });
        }
        Ok(())
    }

    fn complement_window(&self, size: usize) -> Vec<Cell> {
        let shift = (self.accumulated - size) * IUPAC_BITS;
        shift_down(&self.complement, shift, iupac_cells(size))
    }
}

// Extracts `n_out` cells of `cells` shifted down by `shift` bits.
fn shift_down(cells: &[Cell], shift: usize, n_out: usize) -> Vec<Cell> {
    let cell_shift = shift / CELL_BITS;
    let bit_shift = shift % CELL_BITS;
    let mut out = vec![0; n_out];
    for (i, slot) in out.iter_mut().enumerate() {
        let lo = cells.get(i + cell_shift).copied().unwrap_or(0) >> bit_shift;
        let hi = if bit_shift == 0 {
            0
        } else {
            cells.get(i + cell_shift + 1).copied().unwrap_or(0) << (CELL_BITS - bit_shift)
        };
        *slot = lo | hi;
    }
    out
}
