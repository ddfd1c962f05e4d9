use std::cmp::Ordering;

use num::Num;
use serde::{Deserialize, Serialize};

/// Sparse feature vector: sorted dimension indices with their values,
/// zero everywhere else. Symptom vectors are almost entirely zero (a record
/// carries a handful of tokens against a corpus-wide vocabulary), so only
/// the non-zero pairs are stored.
///
/// Generic over the value type `N` so the parameter width can be chosen per
/// deployment (f32 is the default throughout this crate).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SparseVector<N>
where
    N: Num + Copy,
{
    indices: Vec<u32>,
    values: Vec<N>,
}

impl<N> SparseVector<N>
where
    N: Num + Copy + Into<f64>,
{
    pub fn new() -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from (index, value) pairs.
    /// Pairs must arrive in strictly ascending index order; zero values are
    /// skipped.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, N)>,
    {
        let mut vec = Self::new();
        for (idx, val) in pairs {
            vec.push(idx, val);
        }
        vec
    }

    /// Append one non-zero component. Index must exceed the last stored one.
    pub fn push(&mut self, index: u32, value: N) {
        debug_assert!(
            self.indices.last().map_or(true, |last| *last < index),
            "sparse indices must be strictly ascending"
        );
        if !value.is_zero() {
            self.indices.push(index);
            self.values.push(value);
        }
    }

    /// Number of stored (non-zero) components.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, N)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product via two-cursor merge join over the sorted index lists.
    pub fn dot(&self, other: &Self) -> f64 {
        let mut a = 0usize;
        let mut b = 0usize;
        let mut sum = 0.0_f64;
        while a < self.nnz() && b < other.nnz() {
            match self.indices[a].cmp(&other.indices[b]) {
                Ordering::Equal => {
                    sum += self.values[a].into() * other.values[b].into();
                    a += 1;
                    b += 1;
                }
                Ordering::Less => a += 1,
                Ordering::Greater => b += 1,
            }
        }
        sum
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.values
            .iter()
            .map(|v| {
                let f: f64 = (*v).into();
                f * f
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Cosine similarity; 0 when either vector has zero norm.
    pub fn cosine_similarity(&self, other: &Self) -> f64 {
        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a > 0.0 && norm_b > 0.0 {
            self.dot(other) / (norm_a * norm_b)
        } else {
            0.0
        }
    }

    /// Cosine distance: `1 - cos(u, v)`, defined as 1 (maximal) when either
    /// vector is all-zero.
    pub fn cosine_distance(&self, other: &Self) -> f64 {
        1.0 - self.cosine_similarity(other)
    }
}

impl<N> Default for SparseVector<N>
where
    N: Num + Copy + Into<f64>,
{
    fn default() -> Self {
        Self::new()
    }
}
