//! Process-wide interpreter startup
//!
//! The interpreter is initialized exactly once per process. Layers above
//! call [`Runtime::get`] before resolving anything out of the interpreter;
//! that ordering is a documented precondition, not something discovered
//! lazily mid-operation.

use crate::errors::InitError;
use once_cell::sync::OnceCell;
use pyo3::prelude::*;
use pyo3::types::PyModule;
use tracing::debug;

pub struct Runtime {
    _priv: (),
}

static RUNTIME_INSTANCE: OnceCell<Result<Runtime, InitError>> = OnceCell::new();

impl Runtime {
    /// Get or initialize the process-wide runtime singleton
    pub fn get() -> Result<&'static Runtime, InitError> {
        match RUNTIME_INSTANCE.get_or_init(Runtime::initialize) {
            Ok(runtime) => Ok(runtime),
            Err(e) => Err(InitError::Interpreter(format!("{}", e))),
        }
    }

    fn initialize() -> Result<Runtime, InitError> {
        let start_time = std::time::Instant::now();
        pyo3::Python::initialize();

        Python::attach(|py| {
            let sys = PyModule::import(py, "sys")
                .map_err(|e| InitError::Interpreter(format!("failed to import sys: {}", e)))?;
            let version = sys
                .getattr("version")
                .and_then(|v| v.extract::<String>())
                .map_err(|e| {
                    InitError::Interpreter(format!("failed to read interpreter version: {}", e))
                })?;
            debug!(
                "embedded interpreter {} up in {:?}",
                version.split_whitespace().next().unwrap_or(&version),
                start_time.elapsed()
            );
            Ok(Runtime { _priv: () })
        })
    }
}
