//! Order Statistics and Summary Computation

use serde::Serialize;

/// Copy and sort values ascending
pub fn sorted_values(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Percentile of ascending-sorted values by linear interpolation between
/// order statistics: rank = p × (n − 1), blended between the floor and
/// ceiling ranks (the R-7 / NumPy default definition).
///
/// Returns `None` for empty input or `p` outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }

    let rank = p * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    let (lo, hi) = (sorted[lower], sorted[upper]);
    if lo == hi {
        return Some(lo);
    }
    // Blend without forming hi - lo, which overflows for opposite-signed extremes
    Some((lo * (1.0 - weight) + hi * weight).max(lo).min(hi))
}

/// Tukey fences of a value set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IqrBounds {
    /// 25th percentile
    pub q1: f64,
    /// 75th percentile
    pub q3: f64,
    /// q3 - q1
    pub iqr: f64,
    /// q1 - multiplier × iqr
    pub lower: f64,
    /// q3 + multiplier × iqr
    pub upper: f64,
}

impl IqrBounds {
    /// Fences for unsorted values, `None` if empty.
    ///
    /// `iqr` is infinite when the quartiles span more than `f64::MAX`;
    /// callers decide whether such fences are usable.
    pub fn compute(values: &[f64], multiplier: f64) -> Option<Self> {
        let sorted = sorted_values(values);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;

        Some(Self {
            q1,
            q3,
            iqr,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    /// Inside `[lower, upper]`
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Distance beyond the nearest fence, zero when inside
    pub fn excess(&self, value: f64) -> f64 {
        if value < self.lower {
            self.lower - value
        } else if value > self.upper {
            value - self.upper
        } else {
            0.0
        }
    }
}

/// Count, mean, and extremes of a value set
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ValueSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl ValueSummary {
    /// Summarize a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        Self {
            count: values.len(),
            mean,
            min,
            max,
        }
    }
}
