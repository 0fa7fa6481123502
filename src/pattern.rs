//! Degenerate patterns as dense k-mer sets.
//!
//! A `Pattern` expands an IUPAC string into every plain k-mer it covers and
//! stores the set as a bitset over all `4^k` dense codes, giving O(1)
//! membership checks in the counters' hot loops.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{MotifError, Result};
use crate::kmers::{kmers_total, MAX_DENSE_K};

/// Compact codes covered by each IUPAC character.
static BASE_SETS: Lazy<HashMap<char, Vec<u64>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert('a', vec![0]);
    m.insert('c', vec![1]);
    m.insert('g', vec![2]);
    m.insert('t', vec![3]);
    m.insert('m', vec![0, 1]);
    m.insert('r', vec![0, 2]);
    m.insert('w', vec![0, 3]);
    m.insert('s', vec![1, 2]);
    m.insert('y', vec![1, 3]);
    m.insert('k', vec![2, 3]);
    m.insert('v', vec![0, 1, 2]);
    m.insert('h', vec![0, 1, 3]);
    m.insert('d', vec![0, 2, 3]);
    m.insert('b', vec![1, 2, 3]);
    m.insert('n', vec![0, 1, 2, 3]);
    m
});

#[derive(Debug, Clone)]
pub struct Pattern {
    mask: Vec<u64>,
    k: usize,
}

impl Pattern {
    /// Builds the k-mer set of one IUPAC pattern string.
    pub fn new(pattern: &str) -> Result<Self> {
        let k = pattern.chars().count();
        if k > MAX_DENSE_K {
            return Err(MotifError::KmerTooLong {
                k,
                limit: MAX_DENSE_K,
            });
        }
        let blocks = (kmers_total(k) as usize).div_ceil(64);
        let mut result = Self {
            mask: vec![0; blocks],
            k,
        };
        result.add(pattern)?;
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.k
    }

    pub fn is_empty(&self) -> bool {
        self.k == 0
    }

    /// Unions another pattern of the same length into the set.
    pub fn add(&mut self, pattern: &str) -> Result<()> {
        let found = pattern.chars().count();
        if found != self.k {
            return Err(MotifError::PatternSizeMismatch {
                expected: self.k,
                found,
            });
        }
        let mut sets = Vec::with_capacity(self.k);
        for c in pattern.chars() {
            let set = BASE_SETS
                .get(&c.to_ascii_lowercase())
                .ok_or(MotifError::BadSymbol {
                    encoding: "IUPAC",
                    symbol: c,
                })?;
            sets.push(set.as_slice());
        }
        // walk the Cartesian product with an odometer over the digit choices
        let mut digits = vec![0usize; self.k];
        loop {
            let mut kmer = 0;
            for (set, &digit) in sets.iter().zip(&digits) {
                kmer = (kmer << 2) | set[digit];
            }
            self.mark(kmer);
            let mut i = self.k;
            loop {
                if i == 0 {
                    return Ok(());
                }
                i -= 1;
                digits[i] += 1;
                if digits[i] < sets[i].len() {
                    break;
                }
                digits[i] = 0;
            }
        }
    }

    #[inline]
    pub fn check(&self, kmer: u64) -> bool {
        self.mask[(kmer >> 6) as usize] & (1 << (kmer & 63)) != 0
    }

    /// Enumerates the set in ascending dense-code order.
    pub fn kmers(&self) -> Vec<u64> {
        let mut out = Vec::new();
        for (block, &bits) in self.mask.iter().enumerate() {
            let mut rest = bits;
            while rest != 0 {
                let bit = rest.trailing_zeros() as u64;
                out.push((block as u64) << 6 | bit);
                rest &= rest - 1;
            }
        }
        out
    }

    fn mark(&mut self, kmer: u64) {
        self.mask[(kmer >> 6) as usize] |= 1 << (kmer & 63);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmers::string_to_kmer;

    #[test]
    fn expands_the_cartesian_product() {
        let p = Pattern::new("ACANB").unwrap();
        let kmers = p.kmers();
        assert_eq!(kmers.len(), 12);
        for suffix in ["ac", "at", "cc", "ct", "gc", "gt", "tc", "tt", "ag", "cg", "gg", "tg"] {
            let kmer = string_to_kmer(&format!("aca{suffix}")).unwrap();
            assert!(p.check(kmer), "missing aca{suffix}");
            assert!(kmers.contains(&kmer));
        }
        assert!(!p.check(string_to_kmer("acaaa").unwrap()));
        assert!(!p.check(string_to_kmer("ccatt").unwrap()));
    }

    #[test]
    fn plain_pattern_is_a_singleton() {
        let p = Pattern::new("gccg").unwrap();
        assert_eq!(p.kmers(), vec![string_to_kmer("gccg").unwrap()]);
    }

    #[test]
    fn union_and_length_mismatch() {
        let mut p = Pattern::new("aacc").unwrap();
        p.add("ttgg").unwrap();
        assert!(p.check(string_to_kmer("aacc").unwrap()));
        assert!(p.check(string_to_kmer("ttgg").unwrap()));
        assert_eq!(p.kmers().len(), 2);
        assert_eq!(
            p.add("aaccc"),
            Err(MotifError::PatternSizeMismatch {
                expected: 4,
                found: 5
            })
        );
        assert_eq!(
            p.add("aac"),
            Err(MotifError::PatternSizeMismatch {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn rejects_unknown_symbols_and_oversize() {
        assert!(Pattern::new("ac-g").is_err());
        assert!(Pattern::new(&"n".repeat(17)).is_err());
    }
}
