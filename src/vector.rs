//! Fixed-length dense vector.
//!
//! The length is set at construction and never changes. Element access is
//! bounds-checked and reports failure through `Option` / `Result` instead of
//! panicking. Binary operations come in two flavours:
//!
//! - `try_*` returns a [`Checked`] value whose error side carries both the
//!   mismatch and the fallback value;
//! - the operators (`&a + &b`, `&a - &b`) and the plain methods (`dot`,
//!   `hadamard`) log the mismatch and return the fallback directly.

use std::fmt;
use std::ops::{Add, Sub};

use num_traits::{Num, Zero};

use crate::error::{Checked, Degraded, Shape, ShapeMismatch, degrade};
use crate::{Error, Matrix, Result};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector<T> {
    data: Vec<T>,
}

impl<T: Copy> Vector<T> {
    /// A vector of `len` copies of `value`.
    pub fn filled(len: usize, value: T) -> Self {
        Self {
            data: vec![value; len],
        }
    }

    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    #[inline]
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::Vector(self.data.len())
    }

    /// Element at `idx`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<T> {
        self.data.get(idx).copied()
    }

    /// Overwrite the element at `idx`.
    pub fn set(&mut self, idx: usize, value: T) -> Result<()> {
        let len = self.data.len();
        match self.data.get_mut(idx) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::OutOfBounds(format!(
                "vector index {idx} out of range for length {len}"
            ))),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` element-wise.
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Vector<U> {
        Vector {
            data: self.data.iter().copied().map(f).collect(),
        }
    }
}

impl<T: Copy + Zero> Vector<T> {
    /// A zero-filled vector of length `len`.
    pub fn zeros(len: usize) -> Self {
        Self::filled(len, T::zero())
    }
}

impl<T: Copy + Zero + PartialEq> Vector<T> {
    /// True iff every element equals zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|v| *v == T::zero())
    }
}

impl<T: Copy + Num> Vector<T> {
    pub fn scale(&self, scalar: T) -> Self {
        self.map(|v| v * scalar)
    }

    fn zip_with(&self, other: &Self, f: impl Fn(T, T) -> T) -> Self {
        Self {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    fn mismatch(&self, op: &'static str, other: &Self) -> ShapeMismatch {
        ShapeMismatch::new(op, self.shape(), other.shape())
    }

    /// Element-wise sum. On mismatch the fallback is `self` unchanged.
    pub fn try_add(&self, other: &Self) -> Checked<Self> {
        if self.len() != other.len() {
            return Err(Degraded::new(self.clone(), self.mismatch("add", other)));
        }
        Ok(self.zip_with(other, |a, b| a + b))
    }

    /// Element-wise difference. On mismatch the fallback is `self` unchanged.
    pub fn try_sub(&self, other: &Self) -> Checked<Self> {
        if self.len() != other.len() {
            return Err(Degraded::new(self.clone(), self.mismatch("sub", other)));
        }
        Ok(self.zip_with(other, |a, b| a - b))
    }

    /// Inner product. On mismatch the fallback is zero.
    pub fn try_dot(&self, other: &Self) -> Checked<T> {
        if self.len() != other.len() {
            return Err(Degraded::new(T::zero(), self.mismatch("dot", other)));
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b))
    }

    pub fn dot(&self, other: &Self) -> T {
        degrade(self.try_dot(other))
    }

    /// Element-wise product. On mismatch the fallback is a zero vector of
    /// `self.len()`.
    pub fn try_hadamard(&self, other: &Self) -> Checked<Self> {
        if self.len() != other.len() {
            return Err(Degraded::new(
                Self::zeros(self.len()),
                self.mismatch("hadamard", other),
            ));
        }
        Ok(self.zip_with(other, |a, b| a * b))
    }

    pub fn hadamard(&self, other: &Self) -> Self {
        degrade(self.try_hadamard(other))
    }

    /// Outer product `self * other^T`, shape `(self.len(), other.len())`.
    pub fn outer(&self, other: &Self) -> Matrix<T> {
        let mut data = Vec::with_capacity(self.len() * other.len());
        for &u in &self.data {
            data.extend(other.data.iter().map(|&v| u * v));
        }
        Matrix::from_raw(self.len(), other.len(), data)
    }
}

impl<T: Copy + Num> Add for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: Self) -> Vector<T> {
        degrade(self.try_add(rhs))
    }
}

impl<T: Copy + Num> Sub for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: Self) -> Vector<T> {
        degrade(self.try_sub(rhs))
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: fmt::Display> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}
