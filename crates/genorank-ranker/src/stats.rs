//! Null-aware summary statistics for evidence layers.
//!
//! Everything here operates on the non-null values of one layer. Robust
//! statistics (median/MAD) back the outlier check because genomic score
//! distributions are often heavily skewed; mean/std would let a single
//! extreme value mask itself.

/// Arithmetic mean; `None` on empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median over a copy of the input; `None` on empty input.
/// Even-length inputs average the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (n−1 denominator). A single observation
/// reports zero spread; empty input reports `None`.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(0.0);
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(var.sqrt())
}

/// Median absolute deviation: `median(|x − median(x)|)`.
pub fn mad(values: &[f64]) -> Option<f64> {
    let med = median(values)?;
    let deviations: Vec<f64> = values.iter().map(|v| (v - med).abs()).collect();
    median(&deviations)
}

/// Percentile rank of every value within the input population: the
/// fraction of the population at or below the value.
///
/// Tie rule: equal values share one percentile, taken at the top of the
/// tie group (weak ≤ inequality), so a population of identical values
/// ranks uniformly at 1.0. Returned in input order.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return vec![];
    }

    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        // Find group of equal values
        while j < n - 1 && (indexed[j].1 - indexed[j + 1].1).abs() < 1e-12 {
            j += 1;
        }
        // Count at-or-below = index of the last group member + 1
        let pct = (j + 1) as f64 / n as f64;
        for k in i..=j {
            ranks[indexed[k].0] = pct;
        }
        i = j + 1;
    }

    ranks
}
