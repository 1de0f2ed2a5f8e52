//! The primitive operations: everything the delegation layer is allowed to
//! ask of the interpreter.
//!
//! Each operation attaches to the interpreter for its duration and is a
//! single blocking call; there is no retry and no background work. Failures
//! are captured as [`PyException`] with the error state's type, value, and
//! traceback handles intact.

use crate::errors::PyException;
use crate::handle::{PyArg, PyHandle};
use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule, PySequence, PyString, PyTuple};

fn attach<T>(f: impl FnOnce(Python<'_>) -> PyResult<T>) -> Result<T, PyException> {
    Python::attach(|py| f(py).map_err(|e| PyException::from_pyerr(py, e)))
}

/// Call `callee` with positional arguments.
pub fn apply(callee: &PyHandle, args: &[PyArg]) -> Result<PyHandle, PyException> {
    attach(|py| {
        let callee = callee.bind(py);
        let result = if args.is_empty() {
            callee.call0()?
        } else {
            let objects = args
                .iter()
                .map(|a| a.to_object(py))
                .collect::<PyResult<Vec<_>>>()?;
            callee.call1(PyTuple::new(py, objects)?)?
        };
        Ok(PyHandle::new(result.unbind()))
    })
}

/// Call `callee` with a foreign sequence of positionals and a foreign
/// mapping of keywords.
///
/// The generic keyword-aware apply is not resolvable out of the builtin
/// namespace on current interpreters, so it lives here on the native call
/// protocol instead; it stays a separate operation from the plain [`apply`].
pub fn apply_kw(
    callee: &PyHandle,
    positional: &PyHandle,
    keywords: &PyHandle,
) -> Result<PyHandle, PyException> {
    attach(|py| {
        let positional = positional
            .bind(py)
            .cast::<PySequence>()
            .map_err(|e| PyTypeError::new_err(format!("positional arguments: {}", e)))?
            .to_tuple()?;
        let keywords = keywords
            .bind(py)
            .cast::<PyDict>()
            .map_err(|e| PyTypeError::new_err(format!("keyword arguments: {}", e)))?;
        let result = callee.bind(py).call(positional, Some(keywords))?;
        Ok(PyHandle::new(result.unbind()))
    })
}

/// Attribute lookup on `target`; `name` must be a foreign string.
pub fn getattr(target: &PyHandle, name: &PyHandle) -> Result<PyHandle, PyException> {
    attach(|py| {
        let name = name
            .bind(py)
            .cast::<PyString>()
            .map_err(|e| PyTypeError::new_err(format!("attribute name: {}", e)))?;
        let result = target.bind(py).getattr(name)?;
        Ok(PyHandle::new(result.unbind()))
    })
}

/// Construct a foreign string from host text.
pub fn unicode(text: &str) -> Result<PyHandle, PyException> {
    attach(|py| Ok(PyHandle::new(PyString::new(py, text).into_any().unbind())))
}

/// Foreign truthiness, as a host bool.
pub fn truth(value: &PyHandle) -> Result<bool, PyException> {
    attach(|py| value.bind(py).is_truthy())
}

/// Foreign `repr`, as a host string.
pub fn repr_of(value: &PyHandle) -> Result<String, PyException> {
    attach(|py| Ok(value.bind(py).repr()?.to_string_lossy().into_owned()))
}

/// Foreign `str`, as a host string.
pub fn str_of(value: &PyHandle) -> Result<String, PyException> {
    attach(|py| Ok(value.bind(py).str()?.to_string_lossy().into_owned()))
}

/// Handle to the interpreter's builtin namespace module.
pub fn builtins() -> Result<PyHandle, PyException> {
    attach(|py| {
        let module = PyModule::import(py, "builtins")?;
        Ok(PyHandle::new(module.into_any().unbind()))
    })
}
