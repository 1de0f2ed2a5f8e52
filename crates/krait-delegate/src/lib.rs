//! Delegation and dispatch bridge over the embedded Python interpreter
//!
//! This crate lets host code manipulate interpreter values as if they were
//! ordinary host objects. A [`Delegator`] wraps a single foreign handle;
//! every named operation against it — attribute reads, method calls,
//! subscripts, operators, attribute assignment — is translated into the
//! primitive operations of `krait-embed`, and any handle produced on the way
//! back is rewrapped before host code sees it, so chained access stays
//! transparent.
//!
//! The fixed set of foreign built-ins and operator functions the translation
//! needs is resolved once per process into a [`Shortcuts`] registry; every
//! wrapped value carries the registry it was built with, so tests can run
//! against isolated registries.
//!
//! Interpreter exceptions cross the boundary as [`ForeignException`] with
//! their type, value, and traceback rewrapped. The one reclassified case is
//! the interpreter's attribute-error: it becomes
//! [`DelegateError::NoSuchMember`], shaped like a native missing-member
//! signal, so host-side probing idioms keep working.

pub mod delegate;
pub mod errors;
pub mod shortcuts;

pub use delegate::{builtins, import_module, Arg, Delegator, KwArgs};
pub use errors::{BootstrapError, DelegateError, ForeignException};
pub use shortcuts::Shortcuts;
