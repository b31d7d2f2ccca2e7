//! The network engine.
//!
//! A [`Network`] owns one [`Layer`] per consecutive pair of layer sizes and a
//! scalar learning rate. Training is plain per-example gradient descent with a
//! sigmoid activation and mean-squared-error loss.
//!
//! The forward pass can be driven two ways:
//!
//! - explicitly: [`Network::forward_pass`] returns a [`ForwardPass`] holding
//!   every activation and pre-activation, which is then handed to
//!   [`Network::gradients`] / [`Network::backward_from`];
//! - ergonomically: [`Network::forward`] and [`Network::backward`] run the pass
//!   themselves and keep the most recent one in [`Network::last_pass`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Checked, Degraded, Shape, ShapeMismatch, degrade};
use crate::{Activation, Error, Layer, Loss, Matrix, Result, Scalar, Vector};

#[derive(Debug, Clone)]
pub struct Network<T> {
    layer_sizes: Vec<usize>,
    layers: Vec<Layer<T>>,
    learning_rate: T,
    activation: Activation,
    loss: Loss,
    last_pass: Option<ForwardPass<T>>,
}

/// Intermediate values of one forward pass.
///
/// `activations` has one entry per layer size (the input first, the network
/// output last); `pre_activations` has one entry per layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass<T> {
    activations: Vec<Vector<T>>,
    pre_activations: Vec<Vector<T>>,
}

/// Per-example gradients (overwrite semantics, nothing is accumulated).
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients<T> {
    loss: T,
    /// `dL/dz` for every layer; also the bias gradient.
    deltas: Vec<Vector<T>>,
    d_weights: Vec<Matrix<T>>,
}

impl<T: Scalar> Network<T> {
    /// Seed used by [`Network::new`].
    pub const DEFAULT_SEED: u64 = 42;

    /// Build a network for `layer_sizes` (input first, output last) and
    /// initialize it with [`Network::DEFAULT_SEED`].
    pub fn new(layer_sizes: &[usize], learning_rate: T) -> Result<Self> {
        Self::new_with_seed(layer_sizes, learning_rate, Self::DEFAULT_SEED)
    }

    pub fn new_with_seed(layer_sizes: &[usize], learning_rate: T, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(layer_sizes, learning_rate, &mut rng)
    }

    pub fn new_with_rng<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        learning_rate: T,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(Error::InvalidConfig(format!(
                "layer sizes must include input and output dims, got {layer_sizes:?}"
            )));
        }
        if layer_sizes.contains(&0) {
            return Err(Error::InvalidConfig(format!(
                "all layer sizes must be > 0, got {layer_sizes:?}"
            )));
        }

        let layers = layer_sizes
            .windows(2)
            .map(|w| Layer::new(w[0], w[1]))
            .collect();
        let mut network = Self::from_layers(layers, learning_rate)?;
        network.initialize_weights_with_rng(rng)?;
        Ok(network)
    }

    /// Assemble a network from already-built layers.
    ///
    /// Consecutive layers must chain: `layers[i].out_dim() == layers[i + 1].in_dim()`.
    pub fn from_layers(layers: Vec<Layer<T>>, learning_rate: T) -> Result<Self> {
        validate_learning_rate(learning_rate)?;
        let Some(first) = layers.first() else {
            return Err(Error::InvalidConfig(
                "network must have at least one layer".to_owned(),
            ));
        };

        let mut layer_sizes = Vec::with_capacity(layers.len() + 1);
        layer_sizes.push(first.in_dim());
        for (i, layer) in layers.iter().enumerate() {
            let prev = layer_sizes[i];
            if layer.in_dim() != prev {
                return Err(Error::InvalidConfig(format!(
                    "layer {i} in_dim {} does not match previous out_dim {prev}",
                    layer.in_dim()
                )));
            }
            layer_sizes.push(layer.out_dim());
        }

        Ok(Self {
            layer_sizes,
            layers,
            learning_rate,
            activation: Activation::Sigmoid,
            loss: Loss::Mse,
            last_pass: None,
        })
    }

    pub(crate) fn with_functions(mut self, activation: Activation, loss: Loss) -> Self {
        self.activation = activation;
        self.loss = loss;
        self
    }

    /// Re-draw every weight from `N(0, 2 / (n_in + n_out))` and zero the biases.
    ///
    /// The same seed always produces the same parameters.
    pub fn initialize_weights(&mut self, seed: u64) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.initialize_weights_with_rng(&mut rng)?;
        tracing::debug!(seed, layers = ?self.layer_sizes, "initialized weights");
        Ok(())
    }

    pub fn initialize_weights_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        for layer in &mut self.layers {
            layer.initialize(rng)?;
        }
        self.last_pass = None;
        Ok(())
    }

    #[inline]
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.layer_sizes[0]
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Number of weight layers (`layer_sizes().len() - 1`).
    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn layers(&self) -> &[Layer<T>] {
        &self.layers
    }

    #[inline]
    pub fn layer(&self, idx: usize) -> Option<&Layer<T>> {
        self.layers.get(idx)
    }

    #[cfg(test)]
    pub(crate) fn layer_mut(&mut self, idx: usize) -> Option<&mut Layer<T>> {
        self.layers.get_mut(idx)
    }

    /// Weight matrix of layer `idx`, shape `(layer_sizes[idx + 1], layer_sizes[idx])`.
    #[inline]
    pub fn weights(&self, idx: usize) -> Option<&Matrix<T>> {
        self.layers.get(idx).map(Layer::weights)
    }

    #[inline]
    pub fn biases(&self, idx: usize) -> Option<&Vector<T>> {
        self.layers.get(idx).map(Layer::biases)
    }

    #[inline]
    pub fn learning_rate(&self) -> T {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: T) -> Result<()> {
        validate_learning_rate(learning_rate)?;
        self.learning_rate = learning_rate;
        Ok(())
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[inline]
    pub fn loss(&self) -> Loss {
        self.loss
    }

    /// The pass recorded by the most recent successful `forward` / `backward`.
    #[inline]
    pub fn last_pass(&self) -> Option<&ForwardPass<T>> {
        self.last_pass.as_ref()
    }

    fn check_input(&self, input: &Vector<T>) -> std::result::Result<(), ShapeMismatch> {
        if input.len() != self.input_dim() {
            return Err(ShapeMismatch::new(
                "forward",
                input.shape(),
                Shape::Vector(self.input_dim()),
            ));
        }
        Ok(())
    }

    /// Run the network on one input and return every intermediate value.
    ///
    /// Does not touch the network state.
    pub fn forward_pass(
        &self,
        input: &Vector<T>,
    ) -> std::result::Result<ForwardPass<T>, ShapeMismatch> {
        self.check_input(input)?;

        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        let mut pre_activations = Vec::with_capacity(self.layers.len());

        let mut current = input.clone();
        for layer in &self.layers {
            let z = layer
                .pre_activation(&current)
                .map_err(Degraded::into_mismatch)?;
            let a = self.activation.apply_vec(&z);
            activations.push(std::mem::replace(&mut current, a));
            pre_activations.push(z);
        }
        activations.push(current);

        Ok(ForwardPass {
            activations,
            pre_activations,
        })
    }

    /// Forward pass that records the pass in [`Network::last_pass`].
    ///
    /// On an input of the wrong length the fallback is a zero vector of
    /// `output_dim()` and the recorded pass is left as it was.
    pub fn try_forward(&mut self, input: &Vector<T>) -> Checked<Vector<T>> {
        match self.forward_pass(input) {
            Ok(pass) => {
                let output = pass.output().clone();
                self.last_pass = Some(pass);
                Ok(output)
            }
            Err(mismatch) => Err(Degraded::new(Vector::zeros(self.output_dim()), mismatch)),
        }
    }

    pub fn forward(&mut self, input: &Vector<T>) -> Vector<T> {
        degrade(self.try_forward(input))
    }

    /// Inference without recording the pass; [`Network::last_pass`] is left untouched.
    pub fn try_predict(&self, input: &Vector<T>) -> Checked<Vector<T>> {
        self.forward_pass(input)
            .map(ForwardPass::into_output)
            .map_err(|mismatch| Degraded::new(Vector::zeros(self.output_dim()), mismatch))
    }

    /// Like [`Network::forward`], but leaves [`Network::last_pass`] untouched.
    pub fn predict(&self, input: &Vector<T>) -> Vector<T> {
        degrade(self.try_predict(input))
    }

    /// Backpropagate the loss of `pass` against `target`.
    ///
    /// - `delta[L-1] = dL/d(output) ⊙ σ'(z[L-1])`
    /// - `delta[i] = (W[i+1]^T delta[i+1]) ⊙ σ'(z[i])`
    /// - `dW[i] = delta[i] ⊗ a[i]`, `db[i] = delta[i]`
    pub fn gradients(&self, pass: &ForwardPass<T>, target: &Vector<T>) -> Result<Gradients<T>> {
        self.check_pass(pass)?;

        let output = pass.output();
        let loss = self.loss.forward(output, target)?;
        let d_output = self.loss.derivative(output, target)?;

        let last = self.layers.len() - 1;
        let mut delta = d_output.try_hadamard(
            &self
                .activation
                .derivative_vec(&pass.pre_activations[last]),
        )?;

        let mut deltas = Vec::with_capacity(self.layers.len());
        for idx in (0..last).rev() {
            let back = self.layers[idx + 1]
                .weights()
                .transpose()
                .try_mul_vec(&delta)?;
            let next = back.try_hadamard(
                &self
                    .activation
                    .derivative_vec(&pass.pre_activations[idx]),
            )?;
            deltas.push(std::mem::replace(&mut delta, next));
        }
        deltas.push(delta);
        deltas.reverse();

        let d_weights = deltas
            .iter()
            .zip(&pass.activations)
            .map(|(delta, a)| delta.outer(a))
            .collect();

        Ok(Gradients {
            loss,
            deltas,
            d_weights,
        })
    }

    /// `W[i] -= lr * dW[i]`, `b[i] -= lr * delta[i]` for every layer.
    ///
    /// All shapes are checked before any parameter is touched.
    pub fn apply_gradients(&mut self, grads: &Gradients<T>) -> Result<()> {
        if grads.deltas.len() != self.layers.len() || grads.d_weights.len() != self.layers.len() {
            return Err(Error::InvalidData(format!(
                "gradients cover {} layers, network has {}",
                grads.deltas.len(),
                self.layers.len()
            )));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            let dw = &grads.d_weights[i];
            if dw.shape() != layer.weights().shape() {
                return Err(
                    ShapeMismatch::new("apply_gradients", layer.weights().shape(), dw.shape())
                        .into(),
                );
            }
            let db = &grads.deltas[i];
            if db.len() != layer.out_dim() {
                return Err(
                    ShapeMismatch::new("apply_gradients", layer.biases().shape(), db.shape())
                        .into(),
                );
            }
        }

        let lr = self.learning_rate;
        for ((layer, dw), db) in self
            .layers
            .iter_mut()
            .zip(&grads.d_weights)
            .zip(&grads.deltas)
        {
            layer.sgd_step(dw, db, lr)?;
        }
        Ok(())
    }

    /// Compute gradients for `pass` and apply them. Returns the loss of `pass`.
    pub fn backward_from(&mut self, pass: &ForwardPass<T>, target: &Vector<T>) -> Result<T> {
        let grads = self.gradients(pass, target)?;
        self.apply_gradients(&grads)?;
        Ok(grads.loss)
    }

    /// One gradient-descent step on a single example.
    ///
    /// Runs the forward pass itself, records it in [`Network::last_pass`],
    /// updates every layer and returns the loss measured before the update.
    /// On error no parameter is modified.
    pub fn try_backward(&mut self, input: &Vector<T>, target: &Vector<T>) -> Result<T> {
        if target.len() != self.output_dim() {
            return Err(ShapeMismatch::new(
                "backward",
                target.shape(),
                Shape::Vector(self.output_dim()),
            )
            .into());
        }
        let pass = self.forward_pass(input)?;
        let loss = self.backward_from(&pass, target)?;
        self.last_pass = Some(pass);
        Ok(loss)
    }

    /// Permissive form of [`Network::try_backward`]: logs failures and returns zero.
    pub fn backward(&mut self, input: &Vector<T>, target: &Vector<T>) -> T {
        self.try_backward(input, target).unwrap_or_else(|err| {
            tracing::error!(%err, "backward skipped; parameters unchanged");
            T::zero()
        })
    }

    fn check_pass(&self, pass: &ForwardPass<T>) -> Result<()> {
        let consistent = pass.pre_activations.len() == self.layers.len()
            && pass.activations.len() == self.layers.len() + 1
            && self.layers.iter().enumerate().all(|(i, layer)| {
                pass.activations[i].len() == layer.in_dim()
                    && pass.pre_activations[i].len() == layer.out_dim()
            });
        if !consistent {
            return Err(Error::InvalidData(
                "forward pass does not match this network's layer sizes".to_owned(),
            ));
        }
        Ok(())
    }
}

impl<T> ForwardPass<T> {
    /// Activations, input first.
    #[inline]
    pub fn activations(&self) -> &[Vector<T>] {
        &self.activations
    }

    #[inline]
    pub fn pre_activations(&self) -> &[Vector<T>] {
        &self.pre_activations
    }

    /// Network output.
    #[inline]
    pub fn output(&self) -> &Vector<T> {
        &self.activations[self.activations.len() - 1]
    }

    #[inline]
    pub fn into_output(mut self) -> Vector<T> {
        self.activations.swap_remove(self.activations.len() - 1)
    }
}

impl<T: Copy> Gradients<T> {
    /// Loss of the example the gradients were computed for.
    #[inline]
    pub fn loss(&self) -> T {
        self.loss
    }

    #[inline]
    pub fn deltas(&self) -> &[Vector<T>] {
        &self.deltas
    }

    #[inline]
    pub fn d_weights(&self, layer_idx: usize) -> &Matrix<T> {
        &self.d_weights[layer_idx]
    }

    #[inline]
    pub fn d_biases(&self, layer_idx: usize) -> &Vector<T> {
        &self.deltas[layer_idx]
    }
}

fn validate_learning_rate<T: Scalar>(lr: T) -> Result<()> {
    if !(lr.is_finite() && lr > T::zero()) {
        return Err(Error::InvalidConfig(format!(
            "learning rate must be finite and > 0, got {lr}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loss_for(net: &Network<f64>, input: &Vector<f64>, target: &Vector<f64>) -> f64 {
        crate::loss::mse(&net.predict(input), target)
    }

    fn assert_close(analytic: f64, numeric: f64, abs_tol: f64, rel_tol: f64) {
        let diff = (analytic - numeric).abs();
        let scale = analytic.abs().max(numeric.abs()).max(1.0);
        assert!(
            diff <= abs_tol || diff / scale <= rel_tol,
            "analytic={analytic} numeric={numeric} diff={diff}"
        );
    }

    #[test]
    fn construction_allocates_one_layer_per_size_pair() {
        for sizes in [vec![2, 1], vec![2, 3, 1], vec![4, 8, 8, 2], vec![1, 1, 1, 1, 1]] {
            let net = Network::<f32>::new(&sizes, 0.1).unwrap();
            assert_eq!(net.num_layers(), sizes.len() - 1);
            assert_eq!(net.layer_sizes(), sizes.as_slice());
            for i in 0..net.num_layers() {
                let w = net.weights(i).unwrap();
                assert_eq!((w.rows(), w.cols()), (sizes[i + 1], sizes[i]));
                assert_eq!(net.biases(i).unwrap().len(), sizes[i + 1]);
                assert!(net.biases(i).unwrap().is_zero());
            }
            assert!(net.weights(net.num_layers()).is_none());
            assert_eq!(net.activation(), Activation::Sigmoid);
            assert_eq!(net.loss(), Loss::Mse);
        }
    }

    #[test]
    fn rejects_invalid_configuration() {
        assert!(matches!(Network::<f32>::new(&[], 0.1), Err(Error::InvalidConfig(_))));
        assert!(matches!(Network::<f32>::new(&[3], 0.1), Err(Error::InvalidConfig(_))));
        assert!(Network::<f32>::new(&[2, 0, 1], 0.1).is_err());
        assert!(Network::<f32>::new(&[2, 1], 0.0).is_err());
        assert!(Network::<f32>::new(&[2, 1], f32::NAN).is_err());
    }

    #[test]
    fn learning_rate_can_be_changed() {
        let mut net = Network::<f32>::new(&[2, 2, 1], 0.1).unwrap();
        assert_eq!(net.learning_rate(), 0.1);
        net.set_learning_rate(0.5).unwrap();
        assert_eq!(net.learning_rate(), 0.5);
        assert!(net.set_learning_rate(-1.0).is_err());
        assert_eq!(net.learning_rate(), 0.5);
    }

    #[test]
    fn seeded_init_is_deterministic() {
        let mut a = Network::<f32>::new_with_seed(&[3, 5, 2], 0.1, 123).unwrap();
        let b = Network::<f32>::new_with_seed(&[3, 5, 2], 0.1, 123).unwrap();
        assert_eq!(a.layers(), b.layers());

        a.initialize_weights(7).unwrap();
        assert_ne!(a.layers(), b.layers());
        let snapshot = a.layers().to_vec();
        a.initialize_weights(7).unwrap();
        assert_eq!(a.layers(), snapshot.as_slice());
        a.initialize_weights(123).unwrap();
        assert_eq!(a.layers(), b.layers());
    }

    #[test]
    fn reinitialize_overwrites_trained_parameters() {
        let mut net = Network::<f64>::new_with_seed(&[2, 3, 1], 0.5, 9).unwrap();
        let fresh = net.layers().to_vec();
        let x = Vector::from_vec(vec![0.3, 0.9]);
        let t = Vector::from_vec(vec![1.0]);
        net.backward(&x, &t);
        assert_ne!(net.layers(), fresh.as_slice());
        assert!(!net.biases(0).unwrap().is_zero());

        net.initialize_weights(9).unwrap();
        assert_eq!(net.layers(), fresh.as_slice());
        assert!(net.last_pass().is_none());
    }

    #[test]
    fn forward_output_is_in_unit_interval_and_cached() {
        let mut net = Network::<f32>::new(&[2, 2, 1], 0.1).unwrap();
        let x = Vector::from_vec(vec![0.5, 0.8]);
        let y = net.forward(&x);
        assert_eq!(y.len(), 1);
        let v = y.get(0).unwrap();
        assert!((0.0..=1.0).contains(&v));

        let pass = net.last_pass().unwrap();
        assert_eq!(pass.activations().len(), 3);
        assert_eq!(pass.pre_activations().len(), 2);
        assert_eq!(pass.activations()[0], x);
        assert_eq!(pass.output(), &y);
        assert_eq!(net.predict(&x), y);
    }

    #[test]
    fn forward_on_wrong_input_len_returns_zeros_and_keeps_parameters() {
        let mut net = Network::<f32>::new(&[3, 4, 2], 0.1).unwrap();
        let before = net.layers().to_vec();

        let out = net.forward(&Vector::zeros(2));
        assert_eq!(out, Vector::zeros(2));
        assert!(net.last_pass().is_none());
        assert_eq!(net.layers(), before.as_slice());

        let err = net.try_forward(&Vector::zeros(5)).unwrap_err();
        assert_eq!(err.value(), &Vector::zeros(2));
        assert_eq!(err.mismatch().left, Shape::Vector(5));
        assert_eq!(net.predict(&Vector::zeros(1)), Vector::zeros(2));
    }

    #[test]
    fn backward_matches_numeric_gradients() {
        let net = Network::<f64>::new_with_seed(&[2, 3, 2], 0.1, 0).unwrap();
        let input = Vector::from_vec(vec![0.3, -0.7]);
        let target = Vector::from_vec(vec![0.2, 0.9]);

        let pass = net.forward_pass(&input).unwrap();
        let grads = net.gradients(&pass, &target).unwrap();
        assert_eq!(grads.loss(), loss_for(&net, &input, &target));

        let eps = 1e-5;
        let mut probe = net.clone();
        for layer_idx in 0..net.num_layers() {
            let w_len = net.weights(layer_idx).unwrap().as_slice().len();
            for p in 0..w_len {
                let orig = net.weights(layer_idx).unwrap().as_slice()[p];
                probe.layer_mut(layer_idx).unwrap().weights_mut()[p] = orig + eps;
                let plus = loss_for(&probe, &input, &target);
                probe.layer_mut(layer_idx).unwrap().weights_mut()[p] = orig - eps;
                let minus = loss_for(&probe, &input, &target);
                probe.layer_mut(layer_idx).unwrap().weights_mut()[p] = orig;

                let numeric = (plus - minus) / (2.0 * eps);
                let analytic = grads.d_weights(layer_idx).as_slice()[p];
                assert_close(analytic, numeric, 1e-7, 1e-4);
            }

            let b_len = net.biases(layer_idx).unwrap().len();
            for p in 0..b_len {
                let orig = net.biases(layer_idx).unwrap().as_slice()[p];
                probe.layer_mut(layer_idx).unwrap().biases_mut()[p] = orig + eps;
                let plus = loss_for(&probe, &input, &target);
                probe.layer_mut(layer_idx).unwrap().biases_mut()[p] = orig - eps;
                let minus = loss_for(&probe, &input, &target);
                probe.layer_mut(layer_idx).unwrap().biases_mut()[p] = orig;

                let numeric = (plus - minus) / (2.0 * eps);
                let analytic = grads.d_biases(layer_idx).as_slice()[p];
                assert_close(analytic, numeric, 1e-7, 1e-4);
            }
        }
    }

    #[test]
    fn backward_applies_one_sgd_step() {
        let mut net = Network::<f64>::new_with_seed(&[2, 3, 1], 0.25, 5).unwrap();
        let before = net.clone();
        let x = Vector::from_vec(vec![1.0, 0.0]);
        let t = Vector::from_vec(vec![1.0]);

        let pass = before.forward_pass(&x).unwrap();
        let grads = before.gradients(&pass, &t).unwrap();

        let loss = net.backward(&x, &t);
        assert_eq!(loss, grads.loss());
        assert_eq!(net.last_pass(), Some(&pass));

        for i in 0..net.num_layers() {
            let expected_w = before.weights(i).unwrap() - &grads.d_weights(i).scale(0.25);
            let expected_b = before.biases(i).unwrap() - &grads.d_biases(i).scale(0.25);
            assert_eq!(net.weights(i).unwrap(), &expected_w);
            assert_eq!(net.biases(i).unwrap(), &expected_b);
        }
    }

    #[test]
    fn explicit_pass_path_matches_single_call_path() {
        let mut a = Network::<f32>::new_with_seed(&[3, 4, 2], 0.3, 11).unwrap();
        let mut b = a.clone();
        let x = Vector::from_vec(vec![0.1, -0.4, 0.8]);
        let t = Vector::from_vec(vec![0.0, 1.0]);

        let pass = a.forward_pass(&x).unwrap();
        let loss_a = a.backward_from(&pass, &t).unwrap();
        let loss_b = b.backward(&x, &t);
        assert_eq!(loss_a, loss_b);
        assert_eq!(a.layers(), b.layers());
    }

    #[test]
    fn backward_rejects_mismatched_examples_without_update() {
        let mut net = Network::<f32>::new(&[2, 3, 1], 0.5).unwrap();
        let before = net.layers().to_vec();

        assert_eq!(net.backward(&Vector::zeros(3), &Vector::zeros(1)), 0.0);
        assert_eq!(net.backward(&Vector::zeros(2), &Vector::zeros(2)), 0.0);
        assert!(matches!(
            net.try_backward(&Vector::zeros(2), &Vector::zeros(4)),
            Err(Error::Shape(_))
        ));
        assert_eq!(net.layers(), before.as_slice());
    }

    #[test]
    fn wide_network_steps_with_explicit_learning_rate() {
        let mut net = Network::<f32>::new_with_seed(&[128, 256, 256, 10], 0.1, 0).unwrap();
        assert_eq!(net.learning_rate(), 0.1);
        let input = Vector::filled(net.input_dim(), 0.1_f32);
        let target = Vector::zeros(net.output_dim());

        assert_eq!(net.predict(&input).len(), 10);
        let first = net.backward(&input, &target);
        let second = net.backward(&input, &target);
        assert!(first.is_finite() && first > 0.0);
        assert!(second < first, "first={first} second={second}");
    }

    #[test]
    fn foreign_pass_is_rejected() {
        let a = Network::<f32>::new(&[2, 3, 1], 0.5).unwrap();
        let b = Network::<f32>::new(&[2, 4, 1], 0.5).unwrap();
        let pass = b.forward_pass(&Vector::zeros(2)).unwrap();
        assert!(matches!(
            a.gradients(&pass, &Vector::zeros(1)),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn apply_gradients_checks_shapes_first() {
        let mut a = Network::<f32>::new(&[2, 3, 1], 0.5).unwrap();
        let b = Network::<f32>::new(&[2, 4, 1], 0.5).unwrap();
        let pass = b.forward_pass(&Vector::zeros(2)).unwrap();
        let grads = b.gradients(&pass, &Vector::zeros(1)).unwrap();

        let before = a.layers().to_vec();
        assert!(a.apply_gradients(&grads).is_err());
        assert_eq!(a.layers(), before.as_slice());
    }
}
