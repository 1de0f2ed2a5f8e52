//! Keyword-argument marshalling.
//!
//! Keyword calls use a builder protocol rather than a host data literal: the
//! bridge materializes a foreign list for positionals and a foreign mapping
//! for keywords, hands the mapping to the caller's builder callback, and
//! dispatches through the keyword-aware apply. Population happens entirely
//! by the callback's side effects; its return value is only there for `?`.

use super::{Arg, Delegator};
use crate::errors::DelegateError;
use crate::shortcuts::Shortcuts;
use krait_embed::{self as embed, PyHandle};
use std::sync::Arc;

/// The scratch mapping a builder callback populates before a keyword-style
/// call is dispatched. Index-assignment coerces the host key into a foreign
/// string before delegating.
pub struct KwArgs {
    inner: Delegator,
}

impl KwArgs {
    pub(crate) fn new(sc: Arc<Shortcuts>) -> Result<KwArgs, DelegateError> {
        let mapping = match embed::apply(&sc.dict, &[]) {
            Ok(mapping) => mapping,
            Err(raw) => {
                return Err(DelegateError::Foreign(
                    crate::errors::ForeignException::rewrap(raw, &sc),
                ))
            }
        };
        Ok(KwArgs {
            inner: Delegator::with_registry(mapping, sc),
        })
    }

    /// Assign one keyword entry.
    pub fn set(&self, key: &str, value: impl Into<Arg>) -> Result<(), DelegateError> {
        let key = embed::unicode(key).map_err(|raw| self.inner.foreign(raw))?;
        self.inner
            .invoke("[]=", &[Arg::Object(self.inner.rewrap(key)), value.into()])
            .map(drop)
    }

    pub(crate) fn handle(&self) -> &PyHandle {
        self.inner.handle()
    }
}

impl Delegator {
    /// The keyword-call protocol: positional list, keyword mapping, builder
    /// side effects, then the keyword-aware apply. `name` is only used to
    /// attribute failures.
    pub(crate) fn keyword_call<F>(
        &self,
        name: &str,
        callee: &PyHandle,
        args: &[Arg],
        build: F,
    ) -> Result<Delegator, DelegateError>
    where
        F: FnOnce(&KwArgs) -> Result<(), DelegateError>,
    {
        let positional = match embed::apply(&self.registry().list, &[]) {
            Ok(list) => self.rewrap(list),
            Err(raw) => return Err(self.foreign(raw)),
        };
        for arg in args {
            positional.invoke("append", std::slice::from_ref(arg))?;
        }

        let kwargs = KwArgs::new(Arc::clone(self.registry()))?;
        build(&kwargs)?;

        match embed::apply_kw(callee, positional.handle(), kwargs.handle()) {
            Ok(result) => Ok(self.rewrap(result)),
            Err(raw) => Err(self.classify(name, raw)),
        }
    }
}
