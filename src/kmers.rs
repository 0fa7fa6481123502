//! Arithmetic over dense k-mer codes.
//!
//! A k-mer is a `u64` holding k base-4 digits with the FIRST character most
//! significant, so numeric order equals the order of the sequence strings.
//! Dense id spaces (canonical maps, presence tables, pattern bitsets) are
//! sized `4^k`, which caps k at [`MAX_DENSE_K`].

use crate::error::{MotifError, Result};
use crate::motifs::encodings::{compact_code, COMPACT_RC, COMPACT_TO_CHAR};

/// Largest k for which dense per-k-mer tables are allowed.
pub const MAX_DENSE_K: usize = u32::BITS as usize / 2;

/// Number of distinct k-mers, `4^k`.
pub fn kmers_total(k: usize) -> u64 {
    1 << (2 * k)
}

/// Reverse complement of a dense k-mer code.
pub fn reverse_complement(kmer: u64, k: usize) -> u64 {
    let mut rest = kmer;
    let mut result = 0;
    for _ in 0..k {
        result = (result << 2) | (COMPACT_RC[(rest & 0b11) as usize] as u64);
        rest >>= 2;
    }
    result
}

/// Strict parse of a plain `acgt` string into its dense code.
pub fn string_to_kmer(s: &str) -> Result<u64> {
    let mut result = 0;
    for c in s.chars() {
        let code = compact_code(c).ok_or(MotifError::BadSymbol {
            encoding: "compact",
            symbol: c,
        })?;
        result = (result << 2) | code as u64;
    }
    Ok(result)
}

pub fn kmer_to_string(kmer: u64, k: usize, uppercase: bool) -> String {
    let mut out = String::with_capacity(k);
    for i in (0..k).rev() {
        let c = COMPACT_TO_CHAR[((kmer >> (2 * i)) & 0b11) as usize] as char;
        out.push(if uppercase { c.to_ascii_uppercase() } else { c });
    }
    out
}

/// Strand-collapse map: each k-mer to the smaller of itself and its reverse
/// complement. Palindromes map to themselves.
pub fn canonical_map(k: usize) -> Vec<u64> {
    let total = kmers_total(k);
    (0..total).map(|i| i.min(reverse_complement(i, k))).collect()
}

/// IUPAC-aware reverse complement of a sequence string.
pub fn reverse_complement_str(s: &str) -> String {
    String::from_utf8(bio::alphabets::dna::revcomp(s.as_bytes()))
        .expect("complement of valid UTF-8 is valid UTF-8")
}
