//! Model format and source detection

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

/// Detected model format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// Dense model described in JSON
    Json,
    /// Dense model described in YAML
    Yaml,
}

impl ModelFormat {
    /// Format for a file extension, if supported
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(ModelFormat::Json),
            "yaml" | "yml" => Some(ModelFormat::Yaml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFormat::Json => "JSON",
            ModelFormat::Yaml => "YAML",
        }
    }
}

/// Detected model source
#[derive(Debug, Clone)]
pub struct ModelSource {
    /// Path to the model artifact
    pub path: PathBuf,
    /// Detected format
    pub format: ModelFormat,
}

/// Detect model format and source from a path
///
/// The path can be:
/// - A direct path to a .json / .yaml / .yml file
/// - A directory containing `model.json`, `model.yaml` or `model.yml`
/// - A directory containing exactly one supported file
pub fn detect_model_source<P: AsRef<Path>>(path: P) -> Result<ModelSource> {
    let path = path.as_ref();

    if path.is_file() {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let format = ModelFormat::from_extension(ext)
            .ok_or_else(|| anyhow!("Unsupported model file format: .{}", ext))?;
        Ok(ModelSource {
            path: path.to_path_buf(),
            format,
        })
    } else if path.is_dir() {
        detect_model_in_directory(path)
    } else {
        Err(anyhow!("Model path does not exist: {}", path.display()))
    }
}

/// Detect model files in a directory
fn detect_model_in_directory(dir: &Path) -> Result<ModelSource> {
    for name in ["model.json", "model.yaml", "model.yml"] {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return detect_model_source(candidate);
        }
    }

    let candidates = find_model_files(dir);
    match candidates.as_slice() {
        [single] => detect_model_source(single),
        [] => Err(anyhow!(
            "No supported model files found in directory: {}",
            dir.display()
        )),
        _ => Err(anyhow!(
            "Multiple model files in {}, name one explicitly or use model.json",
            dir.display()
        )),
    }
}

/// All supported model files directly inside `dir`, sorted
pub fn find_model_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = ["*.json", "*.yaml", "*.yml"]
        .iter()
        .filter_map(|pattern| glob::glob(dir.join(pattern).to_str()?).ok())
        .flat_map(|paths| paths.filter_map(|r| r.ok()))
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ModelFormat::from_extension("json"), Some(ModelFormat::Json));
        assert_eq!(ModelFormat::from_extension("yml"), Some(ModelFormat::Yaml));
        assert_eq!(ModelFormat::from_extension("tflite"), None);
    }

    #[test]
    fn test_detect_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scorer.yaml");
        std::fs::write(&path, "input_size: 1").unwrap();

        let source = detect_model_source(&path).unwrap();
        assert_eq!(source.format, ModelFormat::Yaml);
        assert_eq!(source.path, path);
    }

    #[test]
    fn test_detect_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.tflite");
        std::fs::write(&path, b"\0").unwrap();
        assert!(detect_model_source(&path).is_err());
    }

    #[test]
    fn test_detect_missing_path() {
        assert!(detect_model_source("/definitely/not/here.json").is_err());
    }

    #[test]
    fn test_detect_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("other.yaml"), "").unwrap();
        std::fs::write(dir.path().join("model.json"), "{}").unwrap();

        let source = detect_model_source(dir.path()).unwrap();
        assert_eq!(source.format, ModelFormat::Json);
        assert!(source.path.ends_with("model.json"));
    }

    #[test]
    fn test_detect_directory_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("b.yaml"), "").unwrap();

        assert_eq!(find_model_files(dir.path()).len(), 2);
        assert!(detect_model_source(dir.path()).is_err());
    }
}
