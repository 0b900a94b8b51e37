//! Simulation results.

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Final state of an exact simulation: `2^n` complex amplitudes.
///
/// Basis index bit `i` is the value of qubit `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmplitudeVector(Vec<Complex64>);

impl AmplitudeVector {
    /// Wrap raw amplitudes.
    pub fn new(amplitudes: Vec<Complex64>) -> Self {
        Self(amplitudes)
    }

    /// The amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.0
    }

    /// Consume the vector, returning the raw amplitudes.
    pub fn into_inner(self) -> Vec<Complex64> {
        self.0
    }

    /// Number of amplitudes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the vector is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of qubits the vector describes.
    pub fn num_qubits(&self) -> u32 {
        self.0.len().max(1).trailing_zeros()
    }

    /// Squared magnitude of every amplitude.
    pub fn probabilities(&self) -> Vec<f64> {
        self.0.iter().map(Complex64::norm_sqr).collect()
    }

    /// Total probability; 1 for a normalized state.
    pub fn norm_sqr(&self) -> f64 {
        self.0.iter().map(Complex64::norm_sqr).sum()
    }
}

impl Index<usize> for AmplitudeVector {
    type Output = Complex64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<Complex64>> for AmplitudeVector {
    fn from(amplitudes: Vec<Complex64>) -> Self {
        Self(amplitudes)
    }
}

/// Measurement histogram: bitstring → count.
///
/// Bitstrings are written with qubit 0 first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(FxHashMap<String, u64>);

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.0.entry(bitstring.into()).or_default() += count;
    }

    /// Count for a bitstring (zero if never observed).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Outcomes by descending count, ties by bitstring.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.0.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// The most frequent outcome.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.sorted().into_iter().next()
    }

    /// Iterate over outcomes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amplitude_vector() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let v = AmplitudeVector::new(vec![
            Complex64::new(h, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, h),
        ]);
        assert_eq!(v.len(), 4);
        assert_eq!(v.num_qubits(), 2);
        assert!((v.norm_sqr() - 1.0).abs() < 1e-12);
        let p = v.probabilities();
        assert!((p[3] - 0.5).abs() < 1e-12);
        assert_eq!(v[1], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert("00", 1);
        counts.insert("11", 3);
        counts.insert("00", 1);

        assert_eq!(counts.get("00"), 2);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total_shots(), 5);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.most_frequent(), Some(("11", 3)));
    }

    #[test]
    fn test_counts_sorted_ties() {
        let mut counts = Counts::new();
        counts.insert("10", 2);
        counts.insert("01", 2);
        counts.insert("00", 5);
        assert_eq!(counts.sorted(), vec![("00", 5), ("01", 2), ("10", 2)]);
    }

    #[test]
    fn test_counts_serde() {
        let mut counts = Counts::new();
        counts.insert("1", 4);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"1":4}"#);
    }
}
