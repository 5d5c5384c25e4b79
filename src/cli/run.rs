//! Single inference command

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;

use crate::engine::ModelHandle;
use crate::loader::FileLoader;

/// Load a model, run one input through it and print the output
pub async fn run(model: PathBuf, input: Vec<f32>) -> Result<()> {
    let name = model
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());

    tracing::info!("Loading model: {}", model.display());
    let handle = ModelHandle::new(name, model);
    handle.initialize(&FileLoader)?;

    let start = Instant::now();
    let output = handle.run(&input)?;
    let elapsed = start.elapsed();

    let values: Vec<String> = output.iter().map(|v| v.to_string()).collect();
    println!("{}", values.join(","));
    eprintln!("[{} outputs in {:.3} ms]", output.len(), elapsed.as_secs_f64() * 1000.0);

    Ok(())
}
