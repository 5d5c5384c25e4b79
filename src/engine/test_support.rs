//! Stub backends for engine tests
//!
//! `StubLoader` builds a backend from the artifact's file stem instead of
//! reading a file: `<kind>-<in>x<out>`, e.g. `identity-4x2`.
//!
//! Kinds:
//! - `identity`: copies the first `out` inputs (zero padded)
//! - `double`: like identity, times two
//! - `slow`: identity after sleeping 200ms
//! - `exclusive`: identity that fails if entered concurrently
//! - `broken`: every invocation fails
//! - `flaky`: panics on the first invocation, identity afterwards
//! - `missing`: loading fails
//!
//! `RecordingLoader` wraps the same backends and logs the first input
//! value of every invocation, in execution order.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};

use super::backend::{BackendLoader, BoxedBackend, ModelBackend};

pub(crate) struct StubLoader;

impl BackendLoader for StubLoader {
    fn load(&self, path: &Path) -> Result<BoxedBackend> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("bad stub path: {}", path.display()))?;
        let (kind, dims) = stem
            .split_once('-')
            .ok_or_else(|| anyhow!("bad stub name: {}", stem))?;
        let (input, output) = dims
            .split_once('x')
            .ok_or_else(|| anyhow!("bad stub dims: {}", dims))?;
        let input: usize = input.parse()?;
        let output: usize = output.parse()?;

        if kind == "missing" {
            bail!("no such artifact: {}", path.display());
        }

        Ok(Box::new(StubBackend {
            kind: kind.to_string(),
            input,
            output,
            busy: AtomicBool::new(false),
            calls: 0,
        }))
    }
}

struct StubBackend {
    kind: String,
    input: usize,
    output: usize,
    busy: AtomicBool,
    calls: usize,
}

impl ModelBackend for StubBackend {
    fn input_len(&self) -> usize {
        self.input
    }

    fn output_len(&self) -> usize {
        self.output
    }

    fn invoke(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        self.calls += 1;
        let scale = match self.kind.as_str() {
            "broken" => bail!("backend exploded"),
            "flaky" if self.calls == 1 => panic!("backend panicked"),
            "slow" => {
                std::thread::sleep(Duration::from_millis(200));
                1.0
            }
            "exclusive" => {
                if self.busy.swap(true, Ordering::SeqCst) {
                    bail!("concurrent invocation");
                }
                std::thread::sleep(Duration::from_millis(20));
                self.busy.store(false, Ordering::SeqCst);
                1.0
            }
            "double" => 2.0,
            _ => 1.0,
        };

        for (i, out) in output.iter_mut().enumerate() {
            *out = input.get(i).copied().unwrap_or(0.0) * scale;
        }
        Ok(())
    }
}

pub(crate) struct RecordingLoader {
    pub log: Arc<Mutex<Vec<f32>>>,
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl BackendLoader for RecordingLoader {
    fn load(&self, path: &Path) -> Result<BoxedBackend> {
        Ok(Box::new(RecordingBackend {
            inner: StubLoader.load(path)?,
            log: Arc::clone(&self.log),
        }))
    }
}

struct RecordingBackend {
    inner: BoxedBackend,
    log: Arc<Mutex<Vec<f32>>>,
}

impl ModelBackend for RecordingBackend {
    fn input_len(&self) -> usize {
        self.inner.input_len()
    }

    fn output_len(&self) -> usize {
        self.inner.output_len()
    }

    fn invoke(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        self.log.lock().unwrap().push(input[0]);
        self.inner.invoke(input, output)
    }
}
