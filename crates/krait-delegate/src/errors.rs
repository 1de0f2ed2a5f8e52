use crate::delegate::Delegator;
use crate::shortcuts::Shortcuts;
use krait_embed::{InitError, PyException};
use std::sync::Arc;
use thiserror::Error;

/// Fatal failures while bringing up the bridge.
///
/// The registry cannot function partially; any resolution failure kills the
/// whole bootstrap and names the shortcut that failed.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("interpreter bootstrap failed: {0}")]
    Runtime(#[from] InitError),

    #[error("failed to resolve `{name}` during registry bootstrap: {source}")]
    Resolve {
        name: &'static str,
        #[source]
        source: PyException,
    },

    #[error("registry bootstrap failed: {0}")]
    Unavailable(String),
}

/// Errors surfaced by delegated operations
#[derive(Error, Debug)]
pub enum DelegateError {
    /// A dispatch branch received the wrong number of arguments.
    #[error("wrong number of arguments ({got} for {expected})")]
    WrongArity { got: usize, expected: usize },

    /// The interpreter's attribute-error, reclassified into the host's
    /// missing-member shape.
    #[error("undefined member `{member}` for {receiver}")]
    NoSuchMember {
        member: String,
        receiver: &'static str,
    },

    /// Any other interpreter exception, with its payload rewrapped.
    #[error(transparent)]
    Foreign(#[from] ForeignException),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}

/// An interpreter exception whose type, value, and traceback have been
/// rewrapped into [`Delegator`]s, so the caller can keep delegating into the
/// payload (render it, walk the traceback) like any other foreign value.
#[derive(Error, Debug)]
#[error("{summary}")]
pub struct ForeignException {
    pub exc_type: Option<Delegator>,
    pub value: Option<Delegator>,
    pub traceback: Option<Delegator>,
    summary: String,
}

impl ForeignException {
    /// The one transform from raw to wrapped form: each present handle is
    /// wrapped, absent fields stay absent.
    pub(crate) fn rewrap(raw: PyException, sc: &Arc<Shortcuts>) -> Self {
        let (kind, value, traceback, summary) = raw.into_parts();
        let wrap = |h: Option<krait_embed::PyHandle>| {
            h.map(|h| Delegator::with_registry(h, Arc::clone(sc)))
        };
        ForeignException {
            exc_type: wrap(kind),
            value: wrap(value),
            traceback: wrap(traceback),
            summary,
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }
}
