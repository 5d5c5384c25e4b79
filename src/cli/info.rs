//! Model info command

use std::path::PathBuf;

use anyhow::Result;

use crate::loader::load_config;

/// Show model information
pub async fn info(model: PathBuf) -> Result<()> {
    let (config, source) = load_config(&model)?;

    println!("Model: {}\n", model.display());
    println!("Path: {}", source.path.display());
    println!("Format: {}\n", source.format.as_str());

    println!("Configuration:");
    println!("  Input size: {}", config.input_size);
    println!("  Output size: {}", config.output_size);
    println!("  Activation: {}", config.activation.as_str());
    println!("  Bias: {}", if config.bias.is_some() { "yes" } else { "no" });
    if let Some(description) = &config.description {
        println!("  Description: {}", description);
    }

    if let Ok(metadata) = std::fs::metadata(&source.path) {
        let size_kb = metadata.len() as f64 / 1024.0;
        if size_kb > 1024.0 {
            println!("\nFile size: {:.2} MB", size_kb / 1024.0);
        } else {
            println!("\nFile size: {:.2} KB", size_kb);
        }
    }

    Ok(())
}
