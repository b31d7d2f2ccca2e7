//! Network builder.
//!
//! `NetworkBuilder` spells the layer sizes out one layer at a time instead of
//! as a bare slice, and validates each step as it is added:
//!
//! ```rust
//! use dense_mlp::NetworkBuilder;
//!
//! # fn main() -> dense_mlp::Result<()> {
//! let net = NetworkBuilder::<f64>::new(2)?
//!     .add_layer(4)?
//!     .add_layer(1)?
//!     .learning_rate(0.5)?
//!     .build_with_seed(0)?;
//! assert_eq!(net.layer_sizes(), &[2, 4, 1]);
//! # Ok(())
//! # }
//! ```

use rand::Rng;

use crate::{Error, Network, Result, Scalar};

#[derive(Debug, Clone)]
pub struct NetworkBuilder<T> {
    layer_sizes: Vec<usize>,
    learning_rate: Option<T>,
}

impl<T: Scalar> NetworkBuilder<T> {
    /// Learning rate used when none is set.
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

    /// Start building a network that accepts inputs of length `input_dim`.
    pub fn new(input_dim: usize) -> Result<Self> {
        if input_dim == 0 {
            return Err(Error::InvalidConfig("input_dim must be > 0".to_owned()));
        }
        Ok(Self {
            layer_sizes: vec![input_dim],
            learning_rate: None,
        })
    }

    /// Convenience constructor from a full sizes list (input first, output last).
    pub fn from_sizes(sizes: &[usize]) -> Result<Self> {
        let Some((&input_dim, rest)) = sizes.split_first() else {
            return Err(Error::InvalidConfig(
                "sizes must include input and output dims".to_owned(),
            ));
        };
        if rest.is_empty() {
            return Err(Error::InvalidConfig(
                "sizes must include input and output dims".to_owned(),
            ));
        }
        rest.iter()
            .try_fold(Self::new(input_dim)?, |b, &n| b.add_layer(n))
    }

    /// Append a layer of `size` neurons.
    pub fn add_layer(mut self, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfig("layer size must be > 0".to_owned()));
        }
        self.layer_sizes.push(size);
        Ok(self)
    }

    pub fn learning_rate(mut self, learning_rate: T) -> Result<Self> {
        if !(learning_rate.is_finite() && learning_rate > T::zero()) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be finite and > 0, got {learning_rate}"
            )));
        }
        self.learning_rate = Some(learning_rate);
        Ok(self)
    }

    /// Build with [`Network::DEFAULT_SEED`].
    pub fn build(self) -> Result<Network<T>> {
        self.build_with_seed(Network::<T>::DEFAULT_SEED)
    }

    pub fn build_with_seed(self, seed: u64) -> Result<Network<T>> {
        let lr = self.resolved_learning_rate();
        Network::new_with_seed(&self.layer_sizes, lr, seed)
    }

    pub fn build_with_rng<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Network<T>> {
        let lr = self.resolved_learning_rate();
        Network::new_with_rng(&self.layer_sizes, lr, rng)
    }

    fn resolved_learning_rate(&self) -> T {
        self.learning_rate
            .unwrap_or_else(|| T::from_f64(Self::DEFAULT_LEARNING_RATE))
    }
}
