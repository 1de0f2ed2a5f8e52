//! The shortcut registry: resolved references to the foreign built-ins and
//! operator functions the dispatch layer depends on.
//!
//! Resolution is strictly ordered: interpreter bootstrap, then the builtin
//! namespace's item-lookup function, then everything else through it. Nothing
//! here may depend on a shortcut that has not been resolved yet. The registry
//! is immutable once resolved; steady-state reads need no synchronization.

use crate::errors::BootstrapError;
use krait_embed::{self as embed, PyArg, PyHandle, PyException, Runtime};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::debug;

pub struct Shortcuts {
    pub(crate) get_builtin: PyHandle,
    pub(crate) import: PyHandle,
    pub(crate) issubclass: PyHandle,
    pub(crate) setattr: PyHandle,
    pub(crate) dict: PyHandle,
    pub(crate) list: PyHandle,
    pub(crate) attribute_error: PyHandle,
    pub(crate) getitem: PyHandle,
    pub(crate) setitem: PyHandle,
    pub(crate) eq: PyHandle,
    pub(crate) pow: PyHandle,
    pub(crate) invert: PyHandle,
    pub(crate) add: PyHandle,
    pub(crate) sub: PyHandle,
    pub(crate) pos: PyHandle,
    pub(crate) neg: PyHandle,
    pub(crate) mul: PyHandle,
    pub(crate) truediv: PyHandle,
    pub(crate) modulo: PyHandle,
    pub(crate) rshift: PyHandle,
    pub(crate) lshift: PyHandle,
    pub(crate) bitand: PyHandle,
    pub(crate) xor: PyHandle,
    pub(crate) bitor: PyHandle,
    pub(crate) le: PyHandle,
    pub(crate) lt: PyHandle,
    pub(crate) gt: PyHandle,
    pub(crate) ge: PyHandle,
    pub(crate) contains: PyHandle,
}

static GLOBAL_SHORTCUTS: OnceCell<Result<Arc<Shortcuts>, BootstrapError>> = OnceCell::new();

fn resolve_failure(name: &'static str) -> impl FnOnce(PyException) -> BootstrapError {
    move |source| BootstrapError::Resolve { name, source }
}

fn member(target: &PyHandle, name: &'static str) -> Result<PyHandle, BootstrapError> {
    let name_str = embed::unicode(name).map_err(resolve_failure(name))?;
    embed::getattr(target, &name_str).map_err(resolve_failure(name))
}

impl Shortcuts {
    /// Get or resolve the process-wide registry.
    ///
    /// Every `Delegator` built without an explicit registry shares this
    /// instance. A failed bootstrap stays failed for the life of the process.
    pub fn global() -> Result<Arc<Shortcuts>, BootstrapError> {
        match GLOBAL_SHORTCUTS.get_or_init(|| Shortcuts::resolve().map(Arc::new)) {
            Ok(shortcuts) => Ok(Arc::clone(shortcuts)),
            Err(e) => Err(BootstrapError::Unavailable(format!("{}", e))),
        }
    }

    /// Look a name out of the builtin namespace through the resolved
    /// item-lookup shortcut.
    pub fn builtin(&self, name: &str) -> Result<PyHandle, PyException> {
        embed::apply(&self.get_builtin, &[PyArg::Str(name.to_string())])
    }

    /// Resolve a fresh registry.
    ///
    /// Order matters: the builtin namespace's item-lookup function comes
    /// first, everything else is reached through it.
    pub fn resolve() -> Result<Shortcuts, BootstrapError> {
        Runtime::get()?;
        let start_time = std::time::Instant::now();

        // builtins.__dict__.__getitem__
        let namespace = embed::builtins().map_err(resolve_failure("builtins"))?;
        let namespace_dict = member(&namespace, "__dict__")?;
        let get_builtin = member(&namespace_dict, "__getitem__")?;

        let builtin = |name: &'static str| -> Result<PyHandle, BootstrapError> {
            embed::apply(&get_builtin, &[PyArg::Str(name.to_string())])
                .map_err(resolve_failure(name))
        };

        let import = builtin("__import__")?;
        let issubclass = builtin("issubclass")?;
        let setattr = builtin("setattr")?;
        let dict = builtin("dict")?;
        let list = builtin("list")?;
        // exception types live in the builtin namespace
        let attribute_error = builtin("AttributeError")?;

        let operator_module = embed::apply(&import, &[PyArg::Str("operator".to_string())])
            .map_err(resolve_failure("operator"))?;
        let op = |name: &'static str| member(&operator_module, name);

        let shortcuts = Shortcuts {
            getitem: op("getitem")?,
            setitem: op("setitem")?,
            eq: op("eq")?,
            pow: op("pow")?,
            invert: op("invert")?,
            add: op("add")?,
            sub: op("sub")?,
            pos: op("pos")?,
            neg: op("neg")?,
            mul: op("mul")?,
            truediv: op("truediv")?,
            modulo: op("mod")?,
            rshift: op("rshift")?,
            lshift: op("lshift")?,
            bitand: op("and_")?,
            xor: op("xor")?,
            bitor: op("or_")?,
            le: op("le")?,
            lt: op("lt")?,
            gt: op("gt")?,
            ge: op("ge")?,
            contains: op("contains")?,
            get_builtin,
            import,
            issubclass,
            setattr,
            dict,
            list,
            attribute_error,
        };

        debug!("shortcut registry resolved in {:?}", start_time.elapsed());
        Ok(shortcuts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves() {
        Shortcuts::resolve().expect("registry bootstrap");
    }

    #[test]
    fn global_registry_is_shared() {
        let a = Shortcuts::global().expect("global registry");
        let b = Shortcuts::global().expect("global registry");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn independent_registries_resolve_the_same_operators() {
        let a = Shortcuts::resolve().expect("first registry");
        let b = Shortcuts::resolve().expect("second registry");
        // operator.add is a module-level singleton; both registries see it
        assert!(a.add.ptr_eq(&b.add));
    }
}
