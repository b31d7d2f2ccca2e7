use crate::{Error, Network, Result, Scalar, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainConfig {
    pub epochs: usize,
    /// Emit `info` progress events while training.
    pub verbose: bool,
    /// Progress interval in epochs when `verbose` is set. The last epoch is always reported.
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 1000,
            verbose: false,
            log_every: 100,
        }
    }
}

impl TrainConfig {
    pub fn with_epochs(epochs: usize) -> Self {
        Self {
            epochs,
            ..Self::default()
        }
    }
}

impl<T: Scalar> Network<T> {
    /// Train with per-example gradient descent.
    ///
    /// Every epoch walks the dataset in order, calls `backward` once per
    /// example and records the mean loss. The returned history has one entry
    /// per epoch.
    ///
    /// The dataset is validated up front: a count mismatch, an empty dataset
    /// or an example of the wrong length is rejected before any parameter
    /// changes.
    pub fn train(
        &mut self,
        inputs: &[Vector<T>],
        targets: &[Vector<T>],
        cfg: &TrainConfig,
    ) -> Result<Vec<T>> {
        self.validate_dataset(inputs, targets)?;
        if cfg.epochs == 0 {
            return Ok(Vec::new());
        }

        let count = T::from_f64(inputs.len() as f64);
        let log_every = cfg.log_every.max(1);
        let mut history = Vec::with_capacity(cfg.epochs);

        for epoch in 0..cfg.epochs {
            let mut total = T::zero();
            for (input, target) in inputs.iter().zip(targets) {
                total = total + self.try_backward(input, target)?;
            }
            let mean = total / count;
            history.push(mean);

            let reported = epoch + 1;
            tracing::debug!(epoch = reported, loss = %mean, "epoch finished");
            if cfg.verbose && (reported % log_every == 0 || reported == cfg.epochs) {
                tracing::info!(epoch = reported, epochs = cfg.epochs, loss = %mean, "training");
            }
        }

        Ok(history)
    }

    /// Mean loss over a dataset without updating any parameter.
    pub fn evaluate(&self, inputs: &[Vector<T>], targets: &[Vector<T>]) -> Result<T> {
        self.validate_dataset(inputs, targets)?;

        let mut total = T::zero();
        for (input, target) in inputs.iter().zip(targets) {
            let output = self.forward_pass(input)?.into_output();
            total = total + self.loss().forward(&output, target)?;
        }
        Ok(total / T::from_f64(inputs.len() as f64))
    }

    fn validate_dataset(&self, inputs: &[Vector<T>], targets: &[Vector<T>]) -> Result<()> {
        if inputs.len() != targets.len() {
            return Err(Error::InvalidConfig(format!(
                "got {} inputs but {} targets",
                inputs.len(),
                targets.len()
            )));
        }
        if inputs.is_empty() {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        }
        for (idx, (input, target)) in inputs.iter().zip(targets).enumerate() {
            if input.len() != self.input_dim() {
                return Err(Error::InvalidData(format!(
                    "input {idx} has len {}, model input_dim is {}",
                    input.len(),
                    self.input_dim()
                )));
            }
            if target.len() != self.output_dim() {
                return Err(Error::InvalidData(format!(
                    "target {idx} has len {}, model output_dim is {}",
                    target.len(),
                    self.output_dim()
                )));
            }
        }
        Ok(())
    }
}
