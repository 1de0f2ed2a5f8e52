//! Primitive embedding layer over the in-process Python interpreter
//!
//! This crate owns everything that touches the interpreter directly:
//! process-wide startup, opaque value handles, and a small set of primitive
//! operations (`apply`, `getattr`, `unicode`, `truth`, `repr_of`, `str_of`).
//! Interpreter failures surface as a structured [`PyException`] carrying the
//! exception type, value, and traceback as handles.
//!
//! Handles never leave this crate in raw form; callers above receive
//! [`PyHandle`] values and hand them back to these primitives. The delegation
//! layer (`krait-delegate`) builds the whole dynamic-dispatch surface out of
//! this contract without ever touching the interpreter itself.

pub mod errors;
mod handle;
mod prim;
mod runtime;

pub use errors::{InitError, PyException};
pub use handle::{PyArg, PyHandle};
pub use prim::{apply, apply_kw, builtins, getattr, repr_of, str_of, truth, unicode};
pub use runtime::Runtime;
