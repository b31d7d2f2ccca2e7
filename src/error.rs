use std::fmt;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("index out of bounds: {0}")]
    OutOfBounds(String),
    #[error(transparent)]
    Shape(#[from] ShapeMismatch),
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Dimensions of an operand, used in shape diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Vector(usize),
    Matrix(usize, usize),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Vector(len) => write!(f, "vector[{len}]"),
            Shape::Matrix(rows, cols) => write!(f, "matrix[{rows}x{cols}]"),
        }
    }
}

/// An operation was called with operands of incompatible dimensions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{op}: incompatible operands {left} and {right}")]
pub struct ShapeMismatch {
    pub op: &'static str,
    pub left: Shape,
    pub right: Shape,
}

impl ShapeMismatch {
    pub fn new(op: &'static str, left: Shape, right: Shape) -> Self {
        Self { op, left, right }
    }
}

/// The failure side of a shape-checked operation.
///
/// Carries the value the permissive API hands back on mismatch (an unchanged
/// left operand, a zero vector, an empty matrix, ...) together with the reason,
/// so callers can either assert on the failure or fall back to the value.
#[derive(Debug, Clone, PartialEq)]
pub struct Degraded<V> {
    value: V,
    mismatch: ShapeMismatch,
}

/// Result of a shape-checked operation.
pub type Checked<V> = std::result::Result<V, Degraded<V>>;

impl<V> Degraded<V> {
    pub fn new(value: V, mismatch: ShapeMismatch) -> Self {
        Self { value, mismatch }
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }

    #[inline]
    pub fn mismatch(&self) -> &ShapeMismatch {
        &self.mismatch
    }

    #[inline]
    pub fn into_mismatch(self) -> ShapeMismatch {
        self.mismatch
    }

    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Degraded<U> {
        Degraded {
            value: f(self.value),
            mismatch: self.mismatch,
        }
    }
}

impl<V> fmt::Display for Degraded<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.mismatch, f)
    }
}

impl<V: fmt::Debug> std::error::Error for Degraded<V> {}

impl<V> From<Degraded<V>> for Error {
    fn from(value: Degraded<V>) -> Self {
        Error::Shape(value.mismatch)
    }
}

/// Unwrap a checked result, reporting a mismatch and returning the fallback.
#[inline]
pub(crate) fn degrade<V>(checked: Checked<V>) -> V {
    checked.unwrap_or_else(|d| {
        tracing::error!(op = d.mismatch.op, "{}", d.mismatch);
        d.into_value()
    })
}
