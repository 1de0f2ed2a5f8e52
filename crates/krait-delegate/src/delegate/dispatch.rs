//! Named-operation dispatch: the translation from host-side operations on a
//! wrapped value into primitive calls.
//!
//! Resolution order: subscript access, the operator table, assignment-style
//! names, then generic attribute lookup. Every branch funnels its result
//! through the rewrap guarantee, and every branch runs inside the exception
//! translation guard.

use super::{lower, Arg, Delegator, KwArgs};
use crate::errors::{DelegateError, ForeignException};
use krait_embed::{self as embed, PyArg, PyException, PyHandle};
use tracing::trace;

/// The closed set of operator tags recognized ahead of generic attribute
/// lookup. Tags are spelled as operator symbols so they can never shadow a
/// legitimate foreign attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamedOp {
    GetItem,
    SetItem,
    Pow,
    Invert,
    Add,
    Sub,
    Pos,
    Neg,
    Mul,
    Div,
    Mod,
    Rshift,
    Lshift,
    BitAnd,
    Xor,
    BitOr,
    Le,
    Lt,
    Gt,
    Ge,
    Eq,
    Cmp,
    Contains,
}

impl NamedOp {
    fn from_name(name: &str) -> Option<NamedOp> {
        let op = match name {
            "[]" => NamedOp::GetItem,
            "[]=" => NamedOp::SetItem,
            "**" => NamedOp::Pow,
            "~" => NamedOp::Invert,
            "+" => NamedOp::Add,
            "-" => NamedOp::Sub,
            "+@" => NamedOp::Pos,
            "-@" => NamedOp::Neg,
            "*" => NamedOp::Mul,
            "/" => NamedOp::Div,
            "%" => NamedOp::Mod,
            ">>" => NamedOp::Rshift,
            "<<" => NamedOp::Lshift,
            "&" => NamedOp::BitAnd,
            "^" => NamedOp::Xor,
            "|" => NamedOp::BitOr,
            "<=" => NamedOp::Le,
            "<" => NamedOp::Lt,
            ">" => NamedOp::Gt,
            ">=" => NamedOp::Ge,
            "==" => NamedOp::Eq,
            "<=>" => NamedOp::Cmp,
            "in" => NamedOp::Contains,
            _ => return None,
        };
        Some(op)
    }
}

/// What a dispatch branch can raise before translation: a host arity error
/// or a raw interpreter exception.
enum RawFailure {
    Arity { got: usize, expected: usize },
    Foreign(PyException),
}

impl From<PyException> for RawFailure {
    fn from(raw: PyException) -> Self {
        RawFailure::Foreign(raw)
    }
}

fn expect_arity(args: &[PyArg], expected: usize) -> Result<(), RawFailure> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RawFailure::Arity {
            got: args.len(),
            expected,
        })
    }
}

impl Delegator {
    /// Perform a named operation against the wrapped value.
    ///
    /// With zero arguments a non-operator name is a bare attribute read and
    /// the attribute value is returned uninvoked; with arguments the
    /// attribute is looked up and called. The result handle is rewrapped
    /// before return; interpreter exceptions come back rewrapped, with the
    /// attribute-error case reclassified into
    /// [`DelegateError::NoSuchMember`].
    pub fn invoke(&self, name: &str, args: &[Arg]) -> Result<Delegator, DelegateError> {
        trace!(operation = name, argc = args.len(), "delegating");
        let lowered = lower(args);
        match self.dispatch_raw(name, &lowered) {
            Ok(handle) => Ok(self.rewrap(handle)),
            Err(RawFailure::Arity { got, expected }) => {
                Err(DelegateError::WrongArity { got, expected })
            }
            Err(RawFailure::Foreign(raw)) => Err(self.classify(name, raw)),
        }
    }

    /// Like [`invoke`], but the looked-up attribute is always keyword-called
    /// with the builder-populated mapping, even with zero positionals.
    ///
    /// [`invoke`]: Delegator::invoke
    pub fn invoke_kw<F>(&self, name: &str, args: &[Arg], build: F) -> Result<Delegator, DelegateError>
    where
        F: FnOnce(&KwArgs) -> Result<(), DelegateError>,
    {
        trace!(operation = name, argc = args.len(), "delegating with keywords");
        let attr = self
            .member_raw(name)
            .map_err(|raw| self.classify(name, raw))?;
        self.keyword_call(name, &attr, args, build)
    }

    fn dispatch_raw(&self, name: &str, args: &[PyArg]) -> Result<PyHandle, RawFailure> {
        if let Some(op) = NamedOp::from_name(name) {
            return self.dispatch_op(op, args);
        }

        if let Some(attr_name) = name.strip_suffix('=') {
            // Assignment-style name; subscript-set was already consumed by
            // the operator table above.
            expect_arity(args, 1)?;
            let attr_name = embed::unicode(attr_name)?;
            Ok(embed::apply(
                &self.registry().setattr,
                &[
                    PyArg::Handle(self.handle().clone()),
                    PyArg::Handle(attr_name),
                    args[0].clone(),
                ],
            )?)
        } else if args.is_empty() {
            // Bare attribute read; never auto-invoked.
            self.member_raw(name).map_err(RawFailure::Foreign)
        } else {
            let attr = self.member_raw(name)?;
            Ok(embed::apply(&attr, args)?)
        }
    }

    fn dispatch_op(&self, op: NamedOp, args: &[PyArg]) -> Result<PyHandle, RawFailure> {
        let sc = self.registry();
        match op {
            NamedOp::GetItem => {
                expect_arity(args, 1)?;
                self.apply_op(&sc.getitem, args)
            }
            NamedOp::SetItem => {
                expect_arity(args, 2)?;
                self.apply_op(&sc.setitem, args)
            }
            NamedOp::Cmp => self.three_way(args),
            NamedOp::Pow => self.apply_op(&sc.pow, args),
            NamedOp::Invert => self.apply_op(&sc.invert, args),
            NamedOp::Add => self.apply_op(&sc.add, args),
            NamedOp::Sub => self.apply_op(&sc.sub, args),
            NamedOp::Pos => self.apply_op(&sc.pos, args),
            NamedOp::Neg => self.apply_op(&sc.neg, args),
            NamedOp::Mul => self.apply_op(&sc.mul, args),
            NamedOp::Div => self.apply_op(&sc.truediv, args),
            NamedOp::Mod => self.apply_op(&sc.modulo, args),
            NamedOp::Rshift => self.apply_op(&sc.rshift, args),
            NamedOp::Lshift => self.apply_op(&sc.lshift, args),
            NamedOp::BitAnd => self.apply_op(&sc.bitand, args),
            NamedOp::Xor => self.apply_op(&sc.xor, args),
            NamedOp::BitOr => self.apply_op(&sc.bitor, args),
            NamedOp::Le => self.apply_op(&sc.le, args),
            NamedOp::Lt => self.apply_op(&sc.lt, args),
            NamedOp::Gt => self.apply_op(&sc.gt, args),
            NamedOp::Ge => self.apply_op(&sc.ge, args),
            NamedOp::Eq => self.apply_op(&sc.eq, args),
            NamedOp::Contains => self.apply_op(&sc.contains, args),
        }
    }

    /// Apply an operator function to the wrapped value and the lowered
    /// arguments.
    fn apply_op(&self, op_fn: &PyHandle, args: &[PyArg]) -> Result<PyHandle, RawFailure> {
        let mut call_args = Vec::with_capacity(args.len() + 1);
        call_args.push(PyArg::Handle(self.handle().clone()));
        call_args.extend_from_slice(args);
        Ok(embed::apply(op_fn, &call_args)?)
    }

    /// Three-way comparison. The interpreter no longer ships a three-way
    /// builtin; (a > b) - (a < b) is the documented replacement.
    fn three_way(&self, args: &[PyArg]) -> Result<PyHandle, RawFailure> {
        expect_arity(args, 1)?;
        let gt = self.apply_op(&self.registry().gt, args)?;
        let lt = self.apply_op(&self.registry().lt, args)?;
        Ok(embed::apply(
            &self.registry().sub,
            &[PyArg::Handle(gt), PyArg::Handle(lt)],
        )?)
    }

    /// Generic attribute lookup, raw form.
    fn member_raw(&self, name: &str) -> Result<PyHandle, PyException> {
        let name = embed::unicode(name)?;
        embed::getattr(self.handle(), &name)
    }

    /// The translation guard's exception half: rewrap the raw exception, and
    /// reclassify the attribute-error case into the host's missing-member
    /// shape. A failing subclass probe falls back to propagation.
    pub(crate) fn classify(&self, member: &str, raw: PyException) -> DelegateError {
        let sc = self.registry();
        let is_attribute_error = raw
            .kind
            .as_ref()
            .and_then(|kind| {
                embed::apply(
                    &sc.issubclass,
                    &[
                        PyArg::Handle(kind.clone()),
                        PyArg::Handle(sc.attribute_error.clone()),
                    ],
                )
                .ok()
            })
            .and_then(|verdict| embed::truth(&verdict).ok())
            .unwrap_or(false);

        if is_attribute_error {
            DelegateError::NoSuchMember {
                member: member.to_string(),
                receiver: "Delegator",
            }
        } else {
            DelegateError::Foreign(ForeignException::rewrap(raw, sc))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NamedOp;

    #[test]
    fn operator_tags_are_recognized() {
        assert_eq!(NamedOp::from_name("[]"), Some(NamedOp::GetItem));
        assert_eq!(NamedOp::from_name("[]="), Some(NamedOp::SetItem));
        assert_eq!(NamedOp::from_name("=="), Some(NamedOp::Eq));
        assert_eq!(NamedOp::from_name("<=>"), Some(NamedOp::Cmp));
        assert_eq!(NamedOp::from_name("in"), Some(NamedOp::Contains));
    }

    #[test]
    fn attribute_names_are_not_operator_tags() {
        // "add" must reach the foreign attribute named add, not operator.add
        assert_eq!(NamedOp::from_name("add"), None);
        assert_eq!(NamedOp::from_name("upper"), None);
        // assignment-style names fall through to the setattr branch
        assert_eq!(NamedOp::from_name("foo="), None);
    }
}
