//! List models command

use std::path::Path;

use anyhow::Result;

use crate::loader::{find_model_files, load_config};

/// List available models
pub async fn list(verbose: bool) -> Result<()> {
    let model_dir = super::model_dir();

    if !model_dir.exists() {
        println!("No models directory found at: {}", model_dir.display());
        println!("\nSet EDGEAI_MODEL_DIR environment variable or create a ./models directory.");
        return Ok(());
    }

    println!("Models in {}:\n", model_dir.display());

    let files = find_model_files(&model_dir);
    for path in &files {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        if verbose {
            print_model_details(path, &name);
        } else {
            match load_config(path) {
                Ok((config, source)) => println!(
                    "  {} ({}, {} -> {})",
                    name,
                    source.format.as_str(),
                    config.input_size,
                    config.output_size
                ),
                Err(_) => println!("  {} (invalid)", name),
            }
        }
    }

    if files.is_empty() {
        println!("  No models found.");
        println!("\nTo add models:");
        println!(
            "  - Place JSON or YAML dense model files in {}",
            model_dir.display()
        );
    }

    Ok(())
}

fn print_model_details(path: &Path, name: &str) {
    println!("  {}", name);
    println!("    Path: {}", path.display());

    match load_config(path) {
        Ok((config, source)) => {
            println!("    Format: {}", source.format.as_str());
            println!("    Input size: {}", config.input_size);
            println!("    Output size: {}", config.output_size);
            println!("    Activation: {}", config.activation.as_str());
        }
        Err(e) => println!("    Error: {:#}", e),
    }

    println!();
}
