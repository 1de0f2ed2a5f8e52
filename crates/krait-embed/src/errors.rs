use crate::handle::PyHandle;
use pyo3::prelude::*;
use thiserror::Error;

/// Errors that can occur while bringing up the embedded interpreter
#[derive(Error, Debug)]
pub enum InitError {
    #[error("failed to initialize embedded interpreter: {0}")]
    Interpreter(String),
}

/// A structured interpreter exception.
///
/// Carries the exception type, value, and traceback as opaque handles so the
/// layer above can rewrap them. The summary is formatted eagerly; displaying
/// the error never needs the interpreter.
#[derive(Error, Debug)]
#[error("{summary}")]
pub struct PyException {
    pub kind: Option<PyHandle>,
    pub value: Option<PyHandle>,
    pub traceback: Option<PyHandle>,
    summary: String,
}

impl PyException {
    /// Capture the interpreter's error state while still attached.
    pub(crate) fn from_pyerr(py: Python<'_>, err: PyErr) -> Self {
        let summary = err.to_string();
        let kind = Some(PyHandle::new(err.get_type(py).into_any().unbind()));
        let value = Some(PyHandle::new(err.value(py).clone().into_any().unbind()));
        let traceback = err
            .traceback(py)
            .map(|tb| PyHandle::new(tb.into_any().unbind()));
        PyException {
            kind,
            value,
            traceback,
            summary,
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Decompose into (type, value, traceback, summary) so a caller can
    /// rehouse the handles without cloning them.
    pub fn into_parts(
        self,
    ) -> (
        Option<PyHandle>,
        Option<PyHandle>,
        Option<PyHandle>,
        String,
    ) {
        (self.kind, self.value, self.traceback, self.summary)
    }
}
