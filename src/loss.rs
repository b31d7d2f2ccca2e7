//! Loss functions.
//!
//! Used like:
//!
//! - run `network.forward(...)`
//! - compute the loss and `dL/d(output)` (`mse`, `mse_derivative`)
//! - backprop the output gradient through the layers
//!
//! Both functions require `pred.len() == target.len()`. On mismatch the
//! permissive forms log the problem and return zero / a zero vector.

use std::fmt;
use std::str::FromStr;

use num_traits::{Float, NumCast};

use crate::error::{Checked, Degraded, ShapeMismatch, degrade};
use crate::{Error, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Supported loss functions.
pub enum Loss {
    /// Mean squared error.
    #[default]
    Mse,
}

impl Loss {
    /// Token used in the model file.
    pub fn name(self) -> &'static str {
        match self {
            Loss::Mse => "meanSquaredError",
        }
    }

    #[inline]
    pub fn forward<T: Float>(self, pred: &Vector<T>, target: &Vector<T>) -> Checked<T> {
        match self {
            Loss::Mse => try_mse(pred, target),
        }
    }

    /// Gradient of the loss with respect to `pred`.
    #[inline]
    pub fn derivative<T: Float>(self, pred: &Vector<T>, target: &Vector<T>) -> Checked<Vector<T>> {
        match self {
            Loss::Mse => try_mse_derivative(pred, target),
        }
    }
}

impl fmt::Display for Loss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Loss {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meanSquaredError" => Ok(Loss::Mse),
            other => Err(Error::InvalidData(format!("unknown loss function {other:?}"))),
        }
    }
}

/// Mean squared error `(1/n) * sum((pred - target)^2)`.
///
/// Empty inputs give zero.
pub fn try_mse<T: Float>(pred: &Vector<T>, target: &Vector<T>) -> Checked<T> {
    if pred.len() != target.len() {
        return Err(Degraded::new(
            T::zero(),
            ShapeMismatch::new("mse", pred.shape(), target.shape()),
        ));
    }
    if pred.is_empty() {
        return Ok(T::zero());
    }

    let sum_sq = pred
        .iter()
        .zip(target.iter())
        .fold(T::zero(), |acc, (&p, &t)| {
            let diff = p - t;
            acc + diff * diff
        });
    Ok(sum_sq / len_as(pred.len()))
}

#[inline]
pub fn mse<T: Float>(pred: &Vector<T>, target: &Vector<T>) -> T {
    degrade(try_mse(pred, target))
}

/// `dL/d(pred)` for [`mse`]: `(2/n) * (pred - target)`.
///
/// On mismatch the fallback is a zero vector of `pred.len()`.
pub fn try_mse_derivative<T: Float>(pred: &Vector<T>, target: &Vector<T>) -> Checked<Vector<T>> {
    if pred.len() != target.len() {
        return Err(Degraded::new(
            Vector::zeros(pred.len()),
            ShapeMismatch::new("mse_derivative", pred.shape(), target.shape()),
        ));
    }

    let scale = (T::one() + T::one()) / len_as(pred.len().max(1));
    Ok(Vector::from_vec(
        pred.iter()
            .zip(target.iter())
            .map(|(&p, &t)| scale * (p - t))
            .collect(),
    ))
}

#[inline]
pub fn mse_derivative<T: Float>(pred: &Vector<T>, target: &Vector<T>) -> Vector<T> {
    degrade(try_mse_derivative(pred, target))
}

#[inline]
fn len_as<T: Float>(n: usize) -> T {
    <T as NumCast>::from(n).unwrap_or_else(T::max_value)
}
