//! Bit-packed nucleotide encodings.
//!
//! Two encodings share the same storage scheme, a slice of `u64` cells with
//! the base at position `p` occupying the bits
//! `(p % per_cell) * width .. (p % per_cell + 1) * width` of cell
//! `p / per_cell`:
//!
//! * compact: 2 bits per base, `a=0 c=1 g=2 t=3`, non-degenerate only;
//! * IUPAC: 4 bits per base, a bitmask over `{A=1, C=2, G=4, T=8}` where
//!   union encodes ambiguity (`r = a|g = 5`) and `0` is the gap character.
//!
//! Position 0 always holds the LAST character of the source string, so a
//! rolling window can admit a new base by shifting left and writing at the
//! low-order end.

use crate::error::{MotifError, Result};

pub type Cell = u64;

pub const CELL_BITS: usize = Cell::BITS as usize;

pub const COMPACT_BITS: usize = 2;
pub const COMPACT_MASK: Cell = 0b11;
pub const COMPACT_PER_CELL: usize = CELL_BITS / COMPACT_BITS;

pub const IUPAC_BITS: usize = 4;
pub const IUPAC_MASK: Cell = 0xf;
pub const IUPAC_PER_CELL: usize = CELL_BITS / IUPAC_BITS;

// A base field must never straddle two cells.
const _: () = assert!(CELL_BITS % COMPACT_BITS == 0);
const _: () = assert!(CELL_BITS % IUPAC_BITS == 0);

/// Compact code -> the IUPAC bitmask of the same base.
pub const COMPACT_TO_IUPAC: [u8; 4] = [1, 2, 4, 8];

/// IUPAC code -> compact code, or -1 where the code is degenerate.
pub const IUPAC_TO_COMPACT: [i8; 16] = [
    -1, 0, 1, -1, 2, -1, -1, -1, 3, -1, -1, -1, -1, -1, -1, -1,
];

pub const COMPACT_TO_CHAR: [u8; 4] = *b"acgt";

pub const IUPAC_TO_CHAR: [u8; 16] = *b"-acmgrsvtwyhkdbn";

/// Complement of an IUPAC bitmask (bit A swaps with T, C with G).
pub const IUPAC_RC: [u8; 16] = [0, 8, 4, 12, 2, 10, 6, 14, 1, 9, 5, 13, 3, 11, 7, 15];

pub const COMPACT_RC: [u8; 4] = [3, 2, 1, 0];

/// Strict conversion; rejects anything outside `acgt` (case-insensitive).
pub fn char_to_compact(c: char) -> Result<u8> {
    compact_code(c).ok_or(MotifError::BadSymbol {
        encoding: "compact",
        symbol: c,
    })
}

/// Lenient conversion used by the scanner, which skips unrecognized symbols.
#[inline]
pub fn compact_code(c: char) -> Option<u8> {
    match c.to_ascii_lowercase() {
        'a' => Some(0),
        'c' => Some(1),
        'g' => Some(2),
        't' => Some(3),
        _ => None,
    }
}

/// Strict conversion over the full IUPAC alphabet including the gap `-`.
pub fn char_to_iupac(c: char) -> Result<u8> {
    let code = match c.to_ascii_lowercase() {
        '-' => 0,
        'a' => 1,
        'c' => 2,
        'm' => 3,
        'g' => 4,
        'r' => 5,
        's' => 6,
        'v' => 7,
        't' => 8,
        'w' => 9,
        'y' => 10,
        'h' => 11,
        'k' => 12,
        'd' => 13,
        'b' => 14,
        'n' => 15,
        _ => {
            return Err(MotifError::BadSymbol {
                encoding: "IUPAC",
                symbol: c,
            })
        }
    };
    Ok(code)
}

#[inline]
pub fn get_compact(cells: &[Cell], pos: usize) -> u8 {
    ((cells[pos / COMPACT_PER_CELL] >> (pos % COMPACT_PER_CELL * COMPACT_BITS)) & COMPACT_MASK)
        as u8
}

#[inline]
pub fn put_compact(cells: &mut [Cell], pos: usize, code: u8) {
    let shift = pos % COMPACT_PER_CELL * COMPACT_BITS;
    let cell = &mut cells[pos / COMPACT_PER_CELL];
    *cell = (*cell & !(COMPACT_MASK << shift)) | ((code as Cell & COMPACT_MASK) << shift);
}

#[inline]
pub fn get_iupac(cells: &[Cell], pos: usize) -> u8 {
    ((cells[pos / IUPAC_PER_CELL] >> (pos % IUPAC_PER_CELL * IUPAC_BITS)) & IUPAC_MASK) as u8
}

#[inline]
pub fn put_iupac(cells: &mut [Cell], pos: usize, code: u8) {
    let shift = pos % IUPAC_PER_CELL * IUPAC_BITS;
    let cell = &mut cells[pos / IUPAC_PER_CELL];
    *cell = (*cell & !(IUPAC_MASK << shift)) | ((code as Cell & IUPAC_MASK) << shift);
}

/// Number of cells needed to hold `len` compact bases (at least one).
#[inline]
pub fn compact_cells(len: usize) -> usize {
    len.div_ceil(COMPACT_PER_CELL).max(1)
}

/// Number of cells needed to hold `len` IUPAC bases (at least one).
#[inline]
pub fn iupac_cells(len: usize) -> usize {
    len.div_ceil(IUPAC_PER_CELL).max(1)
}
