//! The wrapped value and its host-facing surface

use crate::errors::{DelegateError, ForeignException};
use crate::shortcuts::Shortcuts;
use krait_embed::{self as embed, PyArg, PyException, PyHandle};
use std::fmt;
use std::sync::Arc;

mod dispatch;
mod kwargs;

pub use kwargs::KwArgs;

/// A host object housing exactly one foreign handle plus the registry it was
/// built with.
///
/// Cloning duplicates the housing, never the identity: the foreign reference
/// count is bumped and the registry `Arc` is shared.
#[derive(Clone)]
pub struct Delegator {
    handle: PyHandle,
    sc: Arc<Shortcuts>,
}

/// An argument to a delegated operation: a wrapped foreign value, or a
/// host-native value passed through to the interpreter as-is.
#[derive(Debug, Clone)]
pub enum Arg {
    Object(Delegator),
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    None,
}

impl Arg {
    /// Best-effort unwrap: wrapped values yield their handle, natives pass
    /// through for the primitive layer to convert.
    pub(crate) fn lower(&self) -> PyArg {
        match self {
            Arg::Object(d) => PyArg::Handle(d.handle.clone()),
            Arg::Int(i) => PyArg::Int(*i),
            Arg::Float(f) => PyArg::Float(*f),
            Arg::Bool(b) => PyArg::Bool(*b),
            Arg::Str(s) => PyArg::Str(s.clone()),
            Arg::None => PyArg::None,
        }
    }
}

pub(crate) fn lower(args: &[Arg]) -> Vec<PyArg> {
    args.iter().map(Arg::lower).collect()
}

impl From<Delegator> for Arg {
    fn from(value: Delegator) -> Self {
        Arg::Object(value)
    }
}

impl From<&Delegator> for Arg {
    fn from(value: &Delegator) -> Self {
        Arg::Object(value.clone())
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl Delegator {
    /// Wrap a handle with the process-wide registry.
    pub fn wrap(handle: PyHandle) -> Result<Delegator, DelegateError> {
        Ok(Delegator::with_registry(handle, Shortcuts::global()?))
    }

    /// Wrap a handle with an explicit registry.
    pub fn with_registry(handle: PyHandle, sc: Arc<Shortcuts>) -> Delegator {
        Delegator { handle, sc }
    }

    /// The held handle — the only sanctioned way back into the primitive
    /// layer. Performs no translation.
    pub fn handle(&self) -> &PyHandle {
        &self.handle
    }

    pub(crate) fn registry(&self) -> &Arc<Shortcuts> {
        &self.sc
    }

    /// Wrap a primitive-level result in a delegator sharing this registry.
    pub(crate) fn rewrap(&self, handle: PyHandle) -> Delegator {
        Delegator::with_registry(handle, Arc::clone(&self.sc))
    }

    pub(crate) fn foreign(&self, raw: PyException) -> DelegateError {
        DelegateError::Foreign(ForeignException::rewrap(raw, &self.sc))
    }

    /// Foreign truthiness, as a host bool.
    pub fn truthy(&self) -> Result<bool, DelegateError> {
        embed::truth(&self.handle).map_err(|e| self.foreign(e))
    }

    /// Boolean negation: foreign truthiness, inverted.
    pub fn not_(&self) -> Result<bool, DelegateError> {
        Ok(!self.truthy()?)
    }

    /// Equality, routed through the operator table like every other binary
    /// operator.
    pub fn eq(&self, other: impl Into<Arg>) -> Result<bool, DelegateError> {
        self.invoke("==", &[other.into()])?.truthy()
    }

    /// Inequality: the foreign equality operator, inverted.
    pub fn ne(&self, other: impl Into<Arg>) -> Result<bool, DelegateError> {
        let other = other.into();
        let verdict = embed::apply(
            &self.sc.eq,
            &[PyArg::Handle(self.handle.clone()), other.lower()],
        )
        .map_err(|e| self.foreign(e))?;
        let equal = embed::truth(&verdict).map_err(|e| self.foreign(e))?;
        Ok(!equal)
    }

    /// Foreign `repr`, verbatim; the result is already host-native text.
    pub fn repr(&self) -> Result<String, DelegateError> {
        embed::repr_of(&self.handle).map_err(|e| self.foreign(e))
    }

    /// Foreign `str`, verbatim.
    pub fn to_text(&self) -> Result<String, DelegateError> {
        embed::str_of(&self.handle).map_err(|e| self.foreign(e))
    }

    /// Bare attribute read. Sugar for a zero-argument [`invoke`], which
    /// never auto-invokes the attribute.
    ///
    /// [`invoke`]: Delegator::invoke
    pub fn attr(&self, name: &str) -> Result<Delegator, DelegateError> {
        self.invoke(name, &[])
    }

    pub fn get_item(&self, key: impl Into<Arg>) -> Result<Delegator, DelegateError> {
        self.invoke("[]", &[key.into()])
    }

    pub fn set_item(
        &self,
        key: impl Into<Arg>,
        value: impl Into<Arg>,
    ) -> Result<(), DelegateError> {
        self.invoke("[]=", &[key.into(), value.into()]).map(drop)
    }

    pub fn set_attr(&self, name: &str, value: impl Into<Arg>) -> Result<(), DelegateError> {
        self.invoke(&format!("{}=", name), &[value.into()]).map(drop)
    }

    /// Invoke the wrapped value itself as a callable.
    pub fn call(&self, args: &[Arg]) -> Result<Delegator, DelegateError> {
        match embed::apply(&self.handle, &lower(args)) {
            Ok(result) => Ok(self.rewrap(result)),
            Err(raw) => Err(self.foreign(raw)),
        }
    }

    /// Invoke the wrapped value itself with keyword arguments supplied by a
    /// builder callback.
    pub fn call_kw<F>(&self, args: &[Arg], build: F) -> Result<Delegator, DelegateError>
    where
        F: FnOnce(&KwArgs) -> Result<(), DelegateError>,
    {
        self.keyword_call("call", &self.handle.clone(), args, build)
    }
}

impl fmt::Debug for Delegator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Delegator").field(&self.handle).finish()
    }
}

/// The wrapped builtin namespace under the process-wide registry. Most
/// callers start here.
pub fn builtins() -> Result<Delegator, DelegateError> {
    let sc = Shortcuts::global()?;
    let namespace =
        embed::builtins().map_err(|e| DelegateError::Foreign(ForeignException::rewrap(e, &sc)))?;
    Ok(Delegator::with_registry(namespace, sc))
}

/// Import a module through the registry's import shortcut and wrap it.
pub fn import_module(name: &str) -> Result<Delegator, DelegateError> {
    let sc = Shortcuts::global()?;
    let module = embed::apply(&sc.import, &[PyArg::Str(name.to_string())])
        .map_err(|e| DelegateError::Foreign(ForeignException::rewrap(e, &sc)))?;
    Ok(Delegator::with_registry(module, sc))
}
