//! A small feedforward neural network built from scratch.
//!
//! `dense-mlp` implements a fully-connected multi-layer perceptron with a
//! sigmoid activation, mean-squared-error loss and plain per-example gradient
//! descent, on top of its own dense [`Vector`] / [`Matrix`] algebra.
//!
//! # Shape mismatches
//!
//! Algebra operations with a shape precondition come in two forms:
//!
//! - `try_*` methods return [`Checked`]: on mismatch the error side is a
//!   [`Degraded`] holding the [`ShapeMismatch`] *and* the fallback value;
//! - the plain methods and operators (`&a + &b`, `a.matmul(&b)`, `mse`, ...)
//!   log the mismatch through `tracing` at `error` level and return the
//!   fallback, so a caller can keep running.
//!
//! A fallback value (the left operand, a zero vector, an empty matrix) is a
//! symptom of a logic error, not a result to trust.
//!
//! Configuration and I/O problems (bad layer sizes, mismatched datasets,
//! unreadable model files) are reported as [`Error`] before any state changes.
//!
//! # Data layout
//!
//! - Element type is any [`Scalar`] (`f32` or `f64`).
//! - Layer `i` has weights of shape `(layer_sizes[i + 1], layer_sizes[i])`,
//!   stored row-major, and `layer_sizes[i + 1]` biases.
//!
//! # Logging
//!
//! The crate emits `tracing` events and never installs a subscriber.
//!
//! # Quick start
//!
//! ```rust
//! use dense_mlp::{Network, TrainConfig, Vector};
//!
//! # fn main() -> dense_mlp::Result<()> {
//! let xs: Vec<Vector<f64>> = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]
//!     .iter()
//!     .map(|x| Vector::from_slice(x))
//!     .collect();
//! let ys: Vec<Vector<f64>> = [0.0, 1.0, 1.0, 0.0]
//!     .iter()
//!     .map(|&y| Vector::from_vec(vec![y]))
//!     .collect();
//!
//! let mut net = Network::new(&[2, 4, 1], 0.5)?;
//! let history = net.train(&xs, &ys, &TrainConfig::with_epochs(200))?;
//! assert_eq!(history.len(), 200);
//!
//! let y = net.predict(&xs[1]);
//! assert_eq!(y.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Driving a step by hand
//!
//! ```rust
//! use dense_mlp::{Network, Vector};
//!
//! # fn main() -> dense_mlp::Result<()> {
//! let mut net = Network::<f32>::new(&[3, 8, 2], 0.1)?;
//! let x = Vector::from_vec(vec![0.1, -0.2, 0.3]);
//! let t = Vector::from_vec(vec![0.0, 1.0]);
//!
//! let pass = net.forward_pass(&x)?;
//! let grads = net.gradients(&pass, &t)?;
//! net.apply_gradients(&grads)?;
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod builder;
pub mod error;
pub(crate) mod kernel;
pub mod layer;
pub mod loss;
pub mod matrix;
pub mod network;
pub mod persist;
pub mod scalar;
pub mod train;
pub mod vector;

pub use activation::Activation;
pub use builder::NetworkBuilder;
pub use error::{Checked, Degraded, Error, Result, Shape, ShapeMismatch};
pub use layer::Layer;
pub use loss::Loss;
pub use matrix::Matrix;
pub use network::{ForwardPass, Gradients, Network};
pub use persist::{MODEL_FORMAT_VERSION, SerializedLayer, SerializedNetwork};
pub use scalar::Scalar;
pub use train::TrainConfig;
pub use vector::Vector;
