use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

/// Output activation applied after the affine transform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Identity,
    Relu,
    Sigmoid,
    Softmax,
}

impl Activation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activation::Identity => "identity",
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
            Activation::Softmax => "softmax",
        }
    }
}

/// Dense model artifact: `y = activation(W x + b)`
///
/// `weights` is row-major with `output_size` rows of `input_size` columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseConfig {
    pub input_size: usize,
    pub output_size: usize,
    pub weights: Vec<f32>,

    // Zero bias if omitted
    #[serde(default)]
    pub bias: Option<Vec<f32>>,

    #[serde(default)]
    pub activation: Activation,

    // Free-form label shown by `edgeai info`
    #[serde(default)]
    pub description: Option<String>,
}

impl DenseConfig {
    /// Check shapes and values against the declared sizes
    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 || self.output_size == 0 {
            bail!(
                "tensor sizes must be non-zero (input_size={}, output_size={})",
                self.input_size,
                self.output_size
            );
        }

        let expected = self
            .input_size
            .checked_mul(self.output_size)
            .ok_or_else(|| anyhow!("weight matrix size overflows"))?;
        if self.weights.len() != expected {
            bail!(
                "expected {} weights ({}x{}), found {}",
                expected,
                self.output_size,
                self.input_size,
                self.weights.len()
            );
        }

        if let Some(bias) = &self.bias {
            if bias.len() != self.output_size {
                bail!(
                    "expected {} bias values, found {}",
                    self.output_size,
                    bias.len()
                );
            }
        }

        let all_finite = self
            .weights
            .iter()
            .chain(self.bias.iter().flatten())
            .all(|v| v.is_finite());
        if !all_finite {
            bail!("weights and bias must be finite");
        }

        Ok(())
    }

    /// Identity-like projection keeping the first `output_size` inputs
    pub fn projection(input_size: usize, output_size: usize) -> Self {
        let mut weights = vec![0.0; input_size * output_size];
        for row in 0..output_size.min(input_size) {
            weights[row * input_size + row] = 1.0;
        }
        Self {
            input_size,
            output_size,
            weights,
            bias: None,
            activation: Activation::Identity,
            description: None,
        }
    }
}
