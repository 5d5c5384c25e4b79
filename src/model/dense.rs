//! Dense (fully connected) model backend

use anyhow::{bail, Result};

use super::config::{Activation, DenseConfig};
use crate::engine::ModelBackend;

/// Single fully connected layer executed on the CPU
#[derive(Debug, Clone)]
pub struct DenseModel {
    config: DenseConfig,
}

impl DenseModel {
    /// Build a model from a validated configuration
    pub fn new(config: DenseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DenseConfig {
        &self.config
    }

    pub fn activation(&self) -> Activation {
        self.config.activation
    }
}

impl ModelBackend for DenseModel {
    fn input_len(&self) -> usize {
        self.config.input_size
    }

    fn output_len(&self) -> usize {
        self.config.output_size
    }

    fn invoke(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        let (n_in, n_out) = (self.config.input_size, self.config.output_size);
        if input.len() != n_in || output.len() != n_out {
            bail!(
                "buffer sizes {} -> {} do not match model {} -> {}",
                input.len(),
                output.len(),
                n_in,
                n_out
            );
        }

        for (row, out) in output.iter_mut().enumerate() {
            let weights = &self.config.weights[row * n_in..(row + 1) * n_in];
            let bias = self
                .config
                .bias
                .as_ref()
                .map(|b| b[row])
                .unwrap_or(0.0);
            *out = weights.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + bias;
        }

        apply_activation(self.config.activation, output);

        if output.iter().any(|v| !v.is_finite()) {
            bail!("non-finite output");
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "dense {} -> {}, {}",
            self.config.input_size,
            self.config.output_size,
            self.activation().as_str()
        )
    }
}

fn apply_activation(activation: Activation, values: &mut [f32]) {
    match activation {
        Activation::Identity => {}
        Activation::Relu => values.iter_mut().for_each(|v| *v = v.max(0.0)),
        Activation::Sigmoid => values
            .iter_mut()
            .for_each(|v| *v = 1.0 / (1.0 + (-*v).exp())),
        Activation::Softmax => {
            let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let mut sum = 0.0;
            for v in values.iter_mut() {
                *v = (*v - max).exp();
                sum += *v;
            }
            values.iter_mut().for_each(|v| *v /= sum);
        }
    }
}
