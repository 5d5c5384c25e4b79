//! CLI commands
//!
//! Provides the `edgeai` command-line interface.

mod info;
mod list;
mod run;
mod serve;

pub use info::info;
pub use list::list;
pub use run::run;
pub use serve::serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Edgeai - Multi-model inference runtime for edge devices
#[derive(Parser)]
#[command(name = "edgeai")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start inference server
    Serve {
        /// Configuration file (YAML or JSON)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,

        /// Model to load at startup, as NAME=PATH (repeatable)
        #[arg(long, short)]
        model: Vec<String>,
    },

    /// Run a single inference with a model
    Run {
        /// Model path
        model: PathBuf,

        /// Comma-separated input values
        #[arg(long, short, value_delimiter = ',', allow_hyphen_values = true)]
        input: Vec<f32>,
    },

    /// Show model information
    Info {
        /// Model path
        model: PathBuf,
    },

    /// List available models
    List {
        /// Show detailed information
        #[arg(long, short)]
        verbose: bool,
    },
}

/// Directory scanned by `list`
pub(crate) fn model_dir() -> PathBuf {
    std::env::var("EDGEAI_MODEL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./models"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from([
            "edgeai", "serve", "--port", "9000", "-m", "a=a.json", "-m", "b=b.yaml",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve {
                config,
                host,
                port,
                model,
            } => {
                assert!(config.is_none());
                assert!(host.is_none());
                assert_eq!(port, Some(9000));
                assert_eq!(model, vec!["a=a.json", "b=b.yaml"]);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_run_input() {
        let cli =
            Cli::try_parse_from(["edgeai", "run", "m.json", "--input", "1,-2.5,3"]).unwrap();
        match cli.command {
            Commands::Run { model, input } => {
                assert_eq!(model, PathBuf::from("m.json"));
                assert_eq!(input, vec![1.0, -2.5, 3.0]);
            }
            _ => panic!("expected run"),
        }
    }
}
