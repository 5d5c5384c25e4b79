//! Built-in model backends.
//!
//! This module contains the dense model artifact format and its CPU executor.

mod config;
mod dense;

pub use config::{Activation, DenseConfig};
pub use dense::DenseModel;
