//! Activation functions.
//!
//! A dense layer computes a pre-activation value `z = W a + b` and then applies
//! the activation element-wise. The network caches `z` during the forward pass
//! and feeds it straight to [`Activation::derivative`] during backprop.
//!
//! Only the logistic sigmoid is implemented. The enum exists so the model file
//! can name the function it was trained with.

use std::fmt;
use std::str::FromStr;

use num_traits::Float;

use crate::{Error, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Element-wise activation function.
pub enum Activation {
    #[default]
    Sigmoid,
}

impl Activation {
    /// Token used in the model file.
    pub fn name(self) -> &'static str {
        match self {
            Activation::Sigmoid => "sigmoid",
        }
    }

    #[inline]
    pub fn apply<T: Float>(self, x: T) -> T {
        match self {
            Activation::Sigmoid => sigmoid(x),
        }
    }

    /// Derivative with respect to the pre-activation `z`.
    #[inline]
    pub fn derivative<T: Float>(self, z: T) -> T {
        match self {
            Activation::Sigmoid => sigmoid_derivative(z),
        }
    }

    pub fn apply_vec<T: Float>(self, z: &Vector<T>) -> Vector<T> {
        z.map(|x| self.apply(x))
    }

    pub fn derivative_vec<T: Float>(self, z: &Vector<T>) -> Vector<T> {
        z.map(|x| self.derivative(x))
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sigmoid" => Ok(Activation::Sigmoid),
            other => Err(Error::InvalidData(format!(
                "unknown activation function {other:?}"
            ))),
        }
    }
}

/// Logistic sigmoid `1 / (1 + e^-x)`.
#[inline]
pub fn sigmoid<T: Float>(x: T) -> T {
    // Numerically stable: never exponentiate a large positive number.
    if x >= T::zero() {
        let z = (-x).exp();
        T::one() / (T::one() + z)
    } else {
        let z = x.exp();
        z / (T::one() + z)
    }
}

/// `sigmoid(x) * (1 - sigmoid(x))`.
#[inline]
pub fn sigmoid_derivative<T: Float>(x: T) -> T {
    let s = sigmoid(x);
    s * (T::one() - s)
}

pub fn sigmoid_vec<T: Float>(v: &Vector<T>) -> Vector<T> {
    v.map(sigmoid)
}

pub fn sigmoid_derivative_vec<T: Float>(v: &Vector<T>) -> Vector<T> {
    v.map(sigmoid_derivative)
}

/// [`sigmoid_vec`] over a sequence of vectors.
pub fn sigmoid_all<T: Float>(vs: &[Vector<T>]) -> Vec<Vector<T>> {
    vs.iter().map(sigmoid_vec).collect()
}

/// [`sigmoid_derivative_vec`] over a sequence of vectors.
pub fn sigmoid_derivative_all<T: Float>(vs: &[Vector<T>]) -> Vec<Vector<T>> {
    vs.iter().map(sigmoid_derivative_vec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sigmoid_basic_values() {
        assert_abs_diff_eq!(sigmoid(0.0_f32), 0.5, epsilon = 1e-7);
        assert!(sigmoid(10.0_f32) > 0.999);
        assert!(sigmoid(-10.0_f32) < 0.001);

        // Matches the textbook formula away from the tails.
        for &x in &[-3.0_f64, -0.5, 0.25, 2.0] {
            assert_abs_diff_eq!(sigmoid(x), 1.0 / (1.0 + (-x).exp()), epsilon = 1e-12);
        }
    }

    #[test]
    fn sigmoid_saturates_without_nan() {
        assert_eq!(sigmoid(1000.0_f32), 1.0);
        assert_eq!(sigmoid(-1000.0_f32), 0.0);
        assert_eq!(sigmoid_derivative(-1000.0_f32), 0.0);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let eps = 1e-6_f64;
        for &x in &[-2.0_f64, -0.1, 0.0, 0.7, 3.0] {
            let numeric = (sigmoid(x + eps) - sigmoid(x - eps)) / (2.0 * eps);
            assert_abs_diff_eq!(sigmoid_derivative(x), numeric, epsilon = 1e-8);
        }
        assert_abs_diff_eq!(sigmoid_derivative(0.0_f32), 0.25, epsilon = 1e-7);
    }

    #[test]
    fn vector_forms_broadcast() {
        let v = Vector::from_vec(vec![0.0_f32, 1.0, -1.0]);
        let s = sigmoid_vec(&v);
        assert_eq!(s.len(), 3);
        assert_eq!(s.get(0), Some(0.5));
        assert_eq!(s, Activation::Sigmoid.apply_vec(&v));

        let d = sigmoid_derivative_vec(&v);
        assert_eq!(d, Activation::Sigmoid.derivative_vec(&v));
        assert_abs_diff_eq!(d.get(1).unwrap(), d.get(2).unwrap(), epsilon = 1e-7);

        let all = sigmoid_all(&[v.clone(), Vector::zeros(2)]);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], s);
        assert_eq!(all[1], Vector::filled(2, 0.5));
        assert_eq!(sigmoid_derivative_all(&[v])[0], d);
    }

    #[test]
    fn name_round_trips() {
        assert_eq!(Activation::Sigmoid.to_string(), "sigmoid");
        assert_eq!("sigmoid".parse::<Activation>().unwrap(), Activation::Sigmoid);
        assert!("relu".parse::<Activation>().is_err());
    }
}
