use pyo3::prelude::*;
use pyo3::IntoPyObjectExt;
use std::fmt;

/// An opaque, owned reference to a value living in the embedded interpreter.
///
/// The interpreter's reference counting governs the value's lifetime: cloning
/// a handle bumps the count, dropping the last handle releases it. Nothing
/// outside this crate can see or construct the inner object, so a handle is
/// never null and never forged from an arbitrary host value.
pub struct PyHandle(Py<PyAny>);

impl PyHandle {
    pub(crate) fn new(obj: Py<PyAny>) -> Self {
        PyHandle(obj)
    }

    pub(crate) fn bind<'py>(&self, py: Python<'py>) -> &Bound<'py, PyAny> {
        self.0.bind(py)
    }

    pub(crate) fn to_object(&self, py: Python<'_>) -> Py<PyAny> {
        self.0.clone_ref(py)
    }

    /// Interpreter identity: do both handles refer to the same object?
    pub fn ptr_eq(&self, other: &PyHandle) -> bool {
        self.0.as_ptr() == other.0.as_ptr()
    }
}

impl Clone for PyHandle {
    fn clone(&self) -> Self {
        Python::attach(|py| PyHandle(self.0.clone_ref(py)))
    }
}

impl fmt::Debug for PyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PyHandle({:p})", self.0.as_ptr())
    }
}

/// A positional argument at the primitive boundary: either a handle to an
/// interpreter value or a host-native value converted at call time.
#[derive(Debug, Clone)]
pub enum PyArg {
    Handle(PyHandle),
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    None,
}

impl PyArg {
    pub(crate) fn to_object(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        match self {
            PyArg::Handle(h) => Ok(h.to_object(py)),
            PyArg::Int(i) => i.into_py_any(py),
            PyArg::Float(f) => f.into_py_any(py),
            PyArg::Bool(b) => b.into_py_any(py),
            PyArg::Str(s) => s.into_py_any(py),
            PyArg::None => Ok(py.None()),
        }
    }
}
