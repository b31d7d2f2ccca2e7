//! Model persistence.
//!
//! The text format is a whitespace-delimited token stream:
//!
//! ```text
//! <count>
//! <size_0> ... <size_{count-1}>
//! <learning_rate>
//! <activation>
//! <loss>
//! # then, per layer:
//! <rows> <cols>
//! <rows * cols weights, row-major>
//! <rows biases>
//! ```
//!
//! The writer puts each weight row and the bias vector on its own line; the
//! reader does not care about line breaks. Floats are written with their
//! shortest round-trip representation, so save → load reproduces every
//! parameter exactly.
//!
//! With the `serde` feature the same [`SerializedNetwork`] can also be stored
//! as JSON, tagged with [`MODEL_FORMAT_VERSION`].
//!
//! Loading always validates the whole model (sizes, chain, finiteness, known
//! function names) before a [`Network`] is built.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Activation, Error, Layer, Loss, Matrix, Network, Result, Scalar, Vector};

pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Format-level view of a network, decoupled from the in-memory types.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedNetwork<T> {
    pub format_version: u32,
    pub layer_sizes: Vec<usize>,
    pub learning_rate: T,
    pub activation: String,
    pub loss: String,
    pub layers: Vec<SerializedLayer<T>>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedLayer<T> {
    pub rows: usize,
    pub cols: usize,
    /// Row-major (rows, cols).
    pub weights: Vec<T>,
    pub biases: Vec<T>,
}

impl<T: Scalar> SerializedNetwork<T> {
    pub fn validate(&self) -> Result<()> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported model format_version {}; expected {}",
                self.format_version, MODEL_FORMAT_VERSION
            )));
        }
        if self.layer_sizes.len() < 2 {
            return Err(Error::InvalidData(format!(
                "model needs at least 2 layer sizes, got {}",
                self.layer_sizes.len()
            )));
        }
        if self.layer_sizes.contains(&0) {
            return Err(Error::InvalidData(format!(
                "layer sizes must be > 0, got {:?}",
                self.layer_sizes
            )));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > T::zero()) {
            return Err(Error::InvalidData(format!(
                "learning rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        self.activation.parse::<Activation>()?;
        self.loss.parse::<Loss>()?;

        if self.layers.len() != self.layer_sizes.len() - 1 {
            return Err(Error::InvalidData(format!(
                "model has {} layer sizes but {} weight layers",
                self.layer_sizes.len(),
                self.layers.len()
            )));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            let (rows, cols) = (self.layer_sizes[i + 1], self.layer_sizes[i]);
            if layer.rows != rows || layer.cols != cols {
                return Err(Error::InvalidData(format!(
                    "layer {i} is {}x{}, expected {rows}x{cols}",
                    layer.rows, layer.cols
                )));
            }
            layer
                .validate()
                .map_err(|e| Error::InvalidData(format!("layer {i} invalid: {e}")))?;
        }
        Ok(())
    }
}

impl<T: Scalar> SerializedLayer<T> {
    fn validate(&self) -> Result<()> {
        let expected_w = self
            .rows
            .checked_mul(self.cols)
            .ok_or_else(|| Error::InvalidData("layer weight shape overflow".to_owned()))?;
        if self.weights.len() != expected_w {
            return Err(Error::InvalidData(format!(
                "weights length {} does not match rows * cols ({} * {})",
                self.weights.len(),
                self.rows,
                self.cols
            )));
        }
        if self.biases.len() != self.rows {
            return Err(Error::InvalidData(format!(
                "biases length {} does not match rows {}",
                self.biases.len(),
                self.rows
            )));
        }
        if self.weights.iter().chain(&self.biases).any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "parameters must contain only finite values".to_owned(),
            ));
        }
        Ok(())
    }
}

impl<T: Scalar> From<&Network<T>> for SerializedNetwork<T> {
    fn from(network: &Network<T>) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            layer_sizes: network.layer_sizes().to_vec(),
            learning_rate: network.learning_rate(),
            activation: network.activation().name().to_owned(),
            loss: network.loss().name().to_owned(),
            layers: network.layers().iter().map(SerializedLayer::from).collect(),
        }
    }
}

impl<T: Scalar> From<&Layer<T>> for SerializedLayer<T> {
    fn from(layer: &Layer<T>) -> Self {
        Self {
            rows: layer.out_dim(),
            cols: layer.in_dim(),
            weights: layer.weights().as_slice().to_vec(),
            biases: layer.biases().as_slice().to_vec(),
        }
    }
}

impl<T: Scalar> TryFrom<SerializedNetwork<T>> for Network<T> {
    type Error = Error;

    fn try_from(value: SerializedNetwork<T>) -> std::result::Result<Self, Self::Error> {
        value.validate()?;
        let activation = value.activation.parse()?;
        let loss = value.loss.parse()?;

        let mut layers = Vec::with_capacity(value.layers.len());
        for layer in value.layers {
            let weights = Matrix::from_vec(layer.rows, layer.cols, layer.weights)?;
            layers.push(Layer::from_parts(weights, Vector::from_vec(layer.biases))?);
        }
        Ok(Network::from_layers(layers, value.learning_rate)?.with_functions(activation, loss))
    }
}

impl<T: Scalar> fmt::Display for SerializedNetwork<T> {
    /// Writes the text model format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.layer_sizes.len())?;
        write_line(f, &self.layer_sizes)?;
        writeln!(f, "{}", self.learning_rate)?;
        writeln!(f, "{}", self.activation)?;
        writeln!(f, "{}", self.loss)?;
        for layer in &self.layers {
            writeln!(f, "{} {}", layer.rows, layer.cols)?;
            for row in layer.weights.chunks(layer.cols.max(1)) {
                write_line(f, row)?;
            }
            write_line(f, &layer.biases)?;
        }
        Ok(())
    }
}

impl<T: Scalar> FromStr for SerializedNetwork<T> {
    type Err = Error;

    /// Parses the text model format. Structural checks are left to
    /// [`SerializedNetwork::validate`].
    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = Tokens::new(s);

        let count: usize = tokens.parse("layer count")?;
        if count < 2 {
            return Err(Error::InvalidData(format!(
                "model needs at least 2 layer sizes, got {count}"
            )));
        }
        let mut layer_sizes = Vec::new();
        for i in 0..count {
            layer_sizes.push(tokens.parse(&format!("layer size {i}"))?);
        }
        let learning_rate = tokens.parse("learning rate")?;
        let activation = tokens.next("activation")?.to_owned();
        let loss = tokens.next("loss")?.to_owned();

        let mut layers = Vec::new();
        for i in 0..count - 1 {
            let rows: usize = tokens.parse(&format!("layer {i} rows"))?;
            let cols: usize = tokens.parse(&format!("layer {i} cols"))?;
            let n_weights = rows
                .checked_mul(cols)
                .ok_or_else(|| Error::InvalidData("layer weight shape overflow".to_owned()))?;

            let mut weights = Vec::new();
            for _ in 0..n_weights {
                weights.push(tokens.parse(&format!("layer {i} weight"))?);
            }
            let mut biases = Vec::new();
            for _ in 0..rows {
                biases.push(tokens.parse(&format!("layer {i} bias"))?);
            }
            layers.push(SerializedLayer {
                rows,
                cols,
                weights,
                biases,
            });
        }
        tokens.finish()?;

        Ok(Self {
            format_version: MODEL_FORMAT_VERSION,
            layer_sizes,
            learning_rate,
            activation,
            loss,
            layers,
        })
    }
}

fn write_line<V: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[V]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{v}")?;
    }
    f.write_str("\n")
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            inner: s.split_whitespace(),
        }
    }

    fn next(&mut self, what: &str) -> Result<&'a str> {
        self.inner.next().ok_or_else(|| {
            Error::InvalidData(format!("unexpected end of model while reading {what}"))
        })
    }

    fn parse<V>(&mut self, what: &str) -> Result<V>
    where
        V: FromStr,
        V::Err: fmt::Display,
    {
        let token = self.next(what)?;
        token
            .parse()
            .map_err(|e| Error::InvalidData(format!("invalid {what} {token:?}: {e}")))
    }

    fn finish(mut self) -> Result<()> {
        match self.inner.next() {
            None => Ok(()),
            Some(extra) => Err(Error::InvalidData(format!(
                "unexpected trailing token {extra:?} after model"
            ))),
        }
    }
}

impl<T: Scalar> Network<T> {
    /// Serialize to the text model format.
    pub fn to_model_string(&self) -> String {
        SerializedNetwork::from(self).to_string()
    }

    /// Parse and validate a network from the text model format.
    pub fn from_model_str(s: &str) -> Result<Self> {
        s.parse::<SerializedNetwork<T>>()?.try_into()
    }

    /// Save in the text model format.
    ///
    /// The model is written to a sibling temporary file which is then renamed
    /// over `path`, so a failed save never leaves a half-written model behind.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        write_atomic(path, self.to_model_string().as_bytes())?;
        tracing::info!(path = %path.display(), layers = ?self.layer_sizes(), "saved model");
        Ok(())
    }

    /// Load a network saved with [`Network::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let network = Self::from_model_str(&text)?;
        tracing::info!(path = %path.display(), layers = ?network.layer_sizes(), "loaded model");
        Ok(network)
    }

    /// Replace this network with the one stored at `path`.
    ///
    /// On error `self` is left untouched.
    pub fn restore<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        *self = Self::load(path)?;
        Ok(())
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let io_err = |source: io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let tmp = temp_path(path).ok_or_else(|| {
        io_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path has no file name",
        ))
    })?;

    let written = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));
    if let Err(source) = written {
        // Best effort; the original error is what matters.
        let _ = fs::remove_file(&tmp);
        return Err(io_err(source));
    }
    Ok(())
}

fn temp_path(path: &Path) -> Option<PathBuf> {
    let mut name = path.file_name()?.to_os_string();
    name.push(".tmp");
    Some(path.with_file_name(name))
}

#[cfg(feature = "serde")]
impl<T> Network<T>
where
    T: Scalar + Serialize + serde::de::DeserializeOwned,
{
    /// Serialize the model to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        let ser = SerializedNetwork::from(self);
        serde_json::to_string_pretty(&ser)
            .map_err(|e| Error::InvalidData(format!("failed to serialize model: {e}")))
    }

    /// Parse a model from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let ser: SerializedNetwork<T> = serde_json::from_str(s)
            .map_err(|e| Error::InvalidData(format!("failed to parse model json: {e}")))?;
        ser.try_into()
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        write_atomic(path, self.to_json_string_pretty()?.as_bytes())?;
        tracing::info!(path = %path.display(), "saved model json");
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let network = Self::from_json_str(&s)?;
        tracing::info!(path = %path.display(), "loaded model json");
        Ok(network)
    }
}
