//! Element type for the network engine.
//!
//! Containers are generic over any `Copy` element, but the engine needs
//! transcendental functions, text round-tripping and normal sampling. `Scalar`
//! collects those requirements; it is implemented for `f32` and `f64`.

use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{Error, Result};

pub trait Scalar:
    Float + FromStr<Err = ParseFloatError> + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Overwrite `out` with independent samples from `N(0, std_dev^2)`.
    fn fill_normal<R: Rng + ?Sized>(rng: &mut R, std_dev: Self, out: &mut [Self]) -> Result<()>;

    /// Lossy conversion used for hyperparameters computed in `f64`.
    fn from_f64(v: f64) -> Self;
}

macro_rules! impl_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                fn fill_normal<R: Rng + ?Sized>(
                    rng: &mut R,
                    std_dev: Self,
                    out: &mut [Self],
                ) -> Result<()> {
                    let normal = Normal::new(0.0, std_dev).map_err(|e| {
                        Error::InvalidConfig(format!("normal std_dev {std_dev} rejected: {e}"))
                    })?;
                    for v in out.iter_mut() {
                        *v = normal.sample(rng);
                    }
                    Ok(())
                }

                #[inline]
                fn from_f64(v: f64) -> Self {
                    v as $t
                }
            }
        )*
    };
}

impl_scalar!(f32, f64);
