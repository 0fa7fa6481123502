//! Fisher exact tests over element occurrence lists.

use std::str::FromStr;

use log::debug;
use rayon::prelude::*;

use crate::error::{MotifError, Result};

/// Tail of the hypergeometric distribution to test against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alternative {
    Less,
    Greater,
    TwoSided,
}

impl FromStr for Alternative {
    type Err = MotifError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "less" => Ok(Self::Less),
            "greater" => Ok(Self::Greater),
            "two.sided" => Ok(Self::TwoSided),
            other => Err(MotifError::UnknownAlternative(other.to_string())),
        }
    }
}

fn ln_factorial(n: u64) -> f64 {
    (2..=n).map(|i| (i as f64).ln()).sum()
}

/// Exact p-value for the 2x2 table
///
/// ```text
///             effect   no effect
/// group 1      eff1    n1 - eff1
/// group 2      eff2    n2 - eff2
/// ```
///
/// computed from the hypergeometric distribution of `eff1` given the
/// margins. Probabilities across the support are generated by the ratio
/// recurrence from a single log-factorial evaluation at the lower bound.
/// The two-sided p-value sums every outcome no more likely than the
/// observed one, with a small relative slack against round-off, matching
/// R's `fisher.test`.
pub fn fisher_test(eff1: u64, n1: u64, eff2: u64, n2: u64, alternative: Alternative) -> f64 {
    debug_assert!(eff1 <= n1 && eff2 <= n2);
    let total = n1 + n2;
    let effects = eff1 + eff2;
    let lo = effects.saturating_sub(n2);
    let hi = effects.min(n1);

    // ln pmf(lo) = ln C(effects, lo) + ln C(total-effects, n1-lo) - ln C(total, n1)
    let ln_choose = |n: u64, k: u64| ln_factorial(n) - ln_factorial(k) - ln_factorial(n - k);
    let mut pmf = (ln_choose(effects, lo) + ln_choose(total - effects, n1 - lo)
        - ln_choose(total, n1))
    .exp();

    let mut observed_pmf = 0.0;
    let mut less = 0.0;
    let mut greater = 0.0;
    let mut distribution = Vec::with_capacity((hi - lo + 1) as usize);
    for k in lo..=hi {
        distribution.push(pmf);
        if k <= eff1 {
            less += pmf;
        }
        if k >= eff1 {
            greater += pmf;
        }
        if k == eff1 {
            observed_pmf = pmf;
        }
        // pmf(k+1) from pmf(k)
        pmf *= ((effects - k) * (n1 - k)) as f64
            / ((k + 1) * (n2 + k + 1 - effects)) as f64;
    }

    match alternative {
        Alternative::Less => less.min(1.0),
        Alternative::Greater => greater.min(1.0),
        Alternative::TwoSided => {
            let threshold = observed_pmf * (1.0 + 1e-7);
            distribution
                .iter()
                .filter(|&&p| p <= threshold)
                .sum::<f64>()
                .min(1.0)
        }
    }
}

/// Runs [`fisher_test`] for every element against every experiment.
///
/// `element_genes[e]` lists the genes element `e` occurs in (no duplicates)
/// and `experiments[x][g]` flags whether gene `g` belongs to the effect set
/// of experiment `x`. Returns one row of p-values per element. Elements are
/// independent, so the outer loop runs in parallel.
pub fn mass_fisher_test(
    element_genes: &[Vec<usize>],
    experiments: &[Vec<bool>],
    alternative: Alternative,
) -> Vec<Vec<f64>> {
    debug!(
        "testing {} elements against {} experiments",
        element_genes.len(),
        experiments.len()
    );
    let set_sizes: Vec<u64> = experiments
        .iter()
        .map(|set| set.iter().filter(|&&f| f).count() as u64)
        .collect();
    element_genes
        .par_iter()
        .map(|genes| {
            experiments
                .iter()
                .zip(&set_sizes)
                .map(|(set, &n1)| {
                    let n2 = set.len() as u64 - n1;
                    let eff1 = genes.iter().filter(|&&g| set[g]).count() as u64;
                    let eff2 = genes.len() as u64 - eff1;
                    fisher_test(eff1, n1, eff2, n2, alternative)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn tea_tasting_table() {
        // 3/4 vs 1/4, hypergeometric over C(8,4) = 70 outcomes
        assert!(close(
            fisher_test(3, 4, 1, 4, Alternative::TwoSided),
            34.0 / 70.0
        ));
        assert!(close(
            fisher_test(3, 4, 1, 4, Alternative::Greater),
            17.0 / 70.0
        ));
        assert!(close(
            fisher_test(3, 4, 1, 4, Alternative::Less),
            69.0 / 70.0
        ));
    }

    #[test]
    fn extreme_tables() {
        assert!(close(
            fisher_test(4, 4, 0, 4, Alternative::Greater),
            1.0 / 70.0
        ));
        assert!(close(
            fisher_test(4, 4, 0, 4, Alternative::TwoSided),
            2.0 / 70.0
        ));
        // no effects anywhere: every tail has mass one
        assert!(close(fisher_test(0, 5, 0, 7, Alternative::Less), 1.0));
        assert!(close(fisher_test(0, 5, 0, 7, Alternative::TwoSided), 1.0));
    }

    #[test]
    fn mass_test_matches_single_calls() {
        // genes 0 and 1 form the effect set of the only experiment
        let element_genes = vec![vec![0, 1, 3], vec![2]];
        let experiments = vec![vec![true, true, false, false]];
        let p = mass_fisher_test(&element_genes, &experiments, Alternative::Greater);
        assert_eq!(p.len(), 2);
        assert!(close(p[0][0], fisher_test(2, 2, 1, 2, Alternative::Greater)));
        assert!(close(p[1][0], fisher_test(0, 2, 1, 2, Alternative::Greater)));
    }

    #[test]
    fn alternatives_parse() {
        assert_eq!("less".parse::<Alternative>().unwrap(), Alternative::Less);
        assert_eq!(
            "two.sided".parse::<Alternative>().unwrap(),
            Alternative::TwoSided
        );
        assert!(matches!(
            "both".parse::<Alternative>(),
            Err(MotifError::UnknownAlternative(_))
        ));
    }
}
