use rand::Rng;

use crate::error::Checked;
use crate::{Error, Matrix, Result, Scalar, Vector};

/// One dense layer: `z = W a + b`.
///
/// `weights` has shape `(out_dim, in_dim)`, `biases` has length `out_dim`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<T> {
    weights: Matrix<T>,
    biases: Vector<T>,
}

impl<T: Scalar> Layer<T> {
    /// A zero-valued layer.
    #[inline]
    pub fn new(in_dim: usize, out_dim: usize) -> Self {
        Self {
            weights: Matrix::zeros(out_dim, in_dim),
            biases: Vector::zeros(out_dim),
        }
    }

    /// Build a layer from explicit parameters.
    ///
    /// Validates shapes and that every parameter is finite.
    pub fn from_parts(weights: Matrix<T>, biases: Vector<T>) -> Result<Self> {
        if weights.rows() == 0 || weights.cols() == 0 {
            return Err(Error::InvalidConfig(format!(
                "layer dims must be > 0, got {}x{}",
                weights.rows(),
                weights.cols()
            )));
        }
        if biases.len() != weights.rows() {
            return Err(Error::InvalidData(format!(
                "biases length {} does not match weight rows {}",
                biases.len(),
                weights.rows()
            )));
        }
        if weights.as_slice().iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "weights must contain only finite values".to_owned(),
            ));
        }
        if biases.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "biases must contain only finite values".to_owned(),
            ));
        }
        Ok(Self { weights, biases })
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.weights.cols()
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.weights.rows()
    }

    #[inline]
    pub fn weights(&self) -> &Matrix<T> {
        &self.weights
    }

    #[inline]
    pub fn biases(&self) -> &Vector<T> {
        &self.biases
    }

    #[cfg(test)]
    pub(crate) fn weights_mut(&mut self) -> &mut [T] {
        self.weights.as_mut_slice()
    }

    #[cfg(test)]
    pub(crate) fn biases_mut(&mut self) -> &mut [T] {
        self.biases.as_mut_slice()
    }

    /// Xavier/Glorot normal init: `W ~ N(0, 2 / (in_dim + out_dim))`, `b = 0`.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let fan = (self.in_dim() + self.out_dim()) as f64;
        let std_dev = T::from_f64((2.0 / fan).sqrt());
        T::fill_normal(rng, std_dev, self.weights.as_mut_slice())?;
        self.biases.as_mut_slice().fill(T::zero());
        Ok(())
    }

    /// Pre-activation `W a + b` for a single input.
    ///
    /// On mismatch the fallback is a zero vector of `out_dim`.
    pub fn pre_activation(&self, input: &Vector<T>) -> Checked<Vector<T>> {
        let wa = self.weights.try_mul_vec(input)?;
        wa.try_add(&self.biases)
    }

    /// `W -= lr * d_weights`, `b -= lr * d_biases`.
    pub fn sgd_step(&mut self, d_weights: &Matrix<T>, d_biases: &Vector<T>, lr: T) -> Result<()> {
        let weights = self.weights.try_sub(&d_weights.scale(lr))?;
        let biases = self.biases.try_sub(&d_biases.scale(lr))?;
        self.weights = weights;
        self.biases = biases;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn new_layer_is_zero_with_expected_shape() {
        let layer = Layer::<f32>::new(3, 2);
        assert_eq!((layer.in_dim(), layer.out_dim()), (3, 2));
        assert_eq!((layer.weights().rows(), layer.weights().cols()), (2, 3));
        assert_eq!(layer.biases().len(), 2);
        assert!(layer.weights().is_zero() && layer.biases().is_zero());
    }

    #[test]
    fn from_parts_validates() {
        let w = Matrix::from_rows(&[[1.0_f32, 2.0]]).unwrap();
        assert!(Layer::from_parts(w.clone(), Vector::zeros(2)).is_err());
        assert!(Layer::from_parts(Matrix::<f32>::zeros(0, 2), Vector::zeros(0)).is_err());

        let nan = Matrix::from_rows(&[[f32::NAN, 2.0]]).unwrap();
        assert!(Layer::from_parts(nan, Vector::zeros(1)).is_err());
        assert!(Layer::from_parts(w, Vector::from_vec(vec![0.5])).is_ok());
    }

    #[test]
    fn initialize_resets_biases_and_fills_weights() {
        let mut layer = Layer::<f64>::from_parts(
            Matrix::filled(4, 3, 9.0),
            Vector::filled(4, 1.0),
        )
        .unwrap();
        layer.initialize(&mut StdRng::seed_from_u64(1)).unwrap();
        assert!(layer.biases().is_zero());
        assert!(layer.weights().as_slice().iter().all(|&w| w != 9.0));
        assert!(!layer.weights().is_zero());
    }

    #[test]
    fn pre_activation_and_step() {
        let mut layer = Layer::from_parts(
            Matrix::from_rows(&[[1.0_f32, -1.0], [0.5, 2.0]]).unwrap(),
            Vector::from_vec(vec![0.25, -0.5]),
        )
        .unwrap();
        let z = layer.pre_activation(&Vector::from_vec(vec![2.0, 1.0])).unwrap();
        assert_eq!(z.as_slice(), &[1.25, 2.5]);
        assert!(layer.pre_activation(&Vector::zeros(3)).is_err());

        layer
            .sgd_step(&Matrix::filled(2, 2, 1.0), &Vector::filled(2, 2.0), 0.5)
            .unwrap();
        assert_eq!(layer.weights().as_slice(), &[0.5, -1.5, 0.0, 1.5]);
        assert_eq!(layer.biases().as_slice(), &[-0.75, -1.5]);
    }
}
