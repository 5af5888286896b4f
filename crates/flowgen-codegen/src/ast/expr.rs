// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Target-language expression trees.
//!
//! [`Expr`] is the shape of a compiled expression; [`CompiledExpr`] pairs it
//! with the [`ReferenceSet`] of every symbol the expression depends on.
//! Whole-file rendering lives outside this crate; the `Display` impl here is
//! a compact Python-ish rendering for logs and diagnostics.

use super::reference::{Reference, ReferenceSet};
use super::sdk;

/// A target-language expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The `None` literal
    None,

    /// A literal constant embedded from the IR
    Constant(serde_json::Value),

    /// A named symbol, possibly with an attribute access chain
    Symbol(Reference),

    /// Attribute access on a base expression
    Attribute {
        /// The accessed expression
        base: Box<Expr>,
        /// The attribute name
        name: String,
    },

    /// Subscript access on a base expression
    Subscript {
        /// The subscripted expression
        base: Box<Expr>,
        /// The index expression
        index: Box<Expr>,
    },

    /// A call expression
    Call {
        /// The called expression
        callee: Box<Expr>,
        /// Positional arguments
        args: Vec<Expr>,
        /// Keyword arguments
        kwargs: Vec<(String, Expr)>,
    },

    /// A list literal
    List(Vec<Expr>),

    /// A dict literal with string keys
    Dict(Vec<(String, Expr)>),

    /// A zero-argument deferred-evaluation wrapper around an expression.
    ///
    /// Emitted in place of a direct symbol when the referenced name is not
    /// yet bound at the point of definition (forward or self reference).
    Deferred(Box<Expr>),

    /// A sentinel that raises `ValueError` with `message` at the point of
    /// use. Substituted for unresolvable workflow-input references so the
    /// surrounding file still compiles.
    RaiseOnUse {
        /// The error message raised at use time
        message: String,
    },
}

impl Expr {
    /// Attribute access helper: `self.name`.
    pub fn attr(self, name: impl Into<String>) -> Expr {
        Expr::Attribute {
            base: Box::new(self),
            name: name.into(),
        }
    }

    /// Method call helper: `self.name(args)`.
    pub fn method_call(self, name: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Call {
            callee: Box::new(self.attr(name)),
            args,
            kwargs: Vec::new(),
        }
    }

    /// Subscript helper: `self[index]`.
    pub fn subscript(self, index: Expr) -> Expr {
        Expr::Subscript {
            base: Box::new(self),
            index: Box::new(index),
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::None => write!(f, "None"),
            Expr::Constant(value) => fmt_constant(value, f),
            Expr::Symbol(reference) => {
                let display_name = reference.alias.as_deref().unwrap_or(&reference.name);
                write!(f, "{}", display_name)?;
                if let Some(attributes) = &reference.attribute_path {
                    for attribute in attributes {
                        write!(f, ".{}", attribute)?;
                    }
                }
                Ok(())
            }
            Expr::Attribute { base, name } => write!(f, "{}.{}", base, name),
            Expr::Subscript { base, index } => write!(f, "{}[{}]", base, index),
            Expr::Call {
                callee,
                args,
                kwargs,
            } => {
                write!(f, "{}(", callee)?;
                let mut first = true;
                for arg in args {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                    first = false;
                }
                for (key, value) in kwargs {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", key, value)?;
                    first = false;
                }
                write!(f, ")")
            }
            Expr::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Expr::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Expr::Deferred(inner) => write!(f, "LazyReference(lambda: {})", inner),
            Expr::RaiseOnUse { message } => {
                write!(f, "LazyReference(lambda: _raise(ValueError({:?})))", message)
            }
        }
    }
}

/// A compiled expression together with its full transitive reference set.
///
/// Every compiler rule returns one of these; embedding a child fragment
/// merges the child's references, so the root set is the union over all
/// leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpr {
    /// The expression shape
    pub expr: Expr,

    /// Every symbol the expression depends on
    pub references: ReferenceSet,
}

impl CompiledExpr {
    /// A fragment with no references.
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            references: ReferenceSet::new(),
        }
    }

    /// A fragment that is a single symbol reference.
    pub fn symbol(reference: Reference) -> Self {
        Self {
            expr: Expr::Symbol(reference.clone()),
            references: ReferenceSet::single(reference),
        }
    }

    /// The `None` literal with no references.
    pub fn none() -> Self {
        Self::new(Expr::None)
    }

    /// Absorb a child fragment, returning its expression and merging its
    /// references into this fragment's set.
    pub fn absorb(&mut self, child: CompiledExpr) -> Expr {
        self.references.merge(&child.references);
        child.expr
    }

    /// Wrap this fragment in a deferred-evaluation thunk. The thunk itself
    /// is an SDK symbol, so it joins the reference set.
    pub fn deferred(mut self) -> Self {
        self.references.insert(sdk::lazy_reference());
        self.expr = Expr::Deferred(Box::new(self.expr));
        self
    }
}

/// Render a JSON constant as Python source.
fn fmt_constant(value: &serde_json::Value, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match value {
        serde_json::Value::Null => write!(f, "None"),
        serde_json::Value::Bool(true) => write!(f, "True"),
        serde_json::Value::Bool(false) => write!(f, "False"),
        serde_json::Value::Number(n) => write!(f, "{}", n),
        serde_json::Value::String(s) => write!(f, "{:?}", s),
        composite => write!(
            f,
            "{}",
            serde_json::to_string(composite).unwrap_or_else(|_| "None".to_string())
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_symbol_with_attributes() {
        let expr = Expr::Symbol(
            Reference::new("Inputs", &["inputs"]).with_attributes(&["my_input"]),
        );
        assert_eq!(expr.to_string(), "Inputs.my_input");
    }

    #[test]
    fn test_display_method_call() {
        let lhs = Expr::Symbol(Reference::new("Inputs", &["inputs"]).with_attributes(&["city"]));
        let rhs = Expr::Constant(json!("Warsaw"));
        let expr = lhs.method_call("equals", vec![rhs]);
        assert_eq!(expr.to_string(), "Inputs.city.equals(\"Warsaw\")");
    }

    #[test]
    fn test_display_constants() {
        assert_eq!(Expr::Constant(json!(null)).to_string(), "None");
        assert_eq!(Expr::Constant(json!(true)).to_string(), "True");
        assert_eq!(Expr::Constant(json!(42)).to_string(), "42");
        assert_eq!(Expr::Constant(json!("hi")).to_string(), "\"hi\"");
    }

    #[test]
    fn test_display_deferred() {
        let inner = Expr::Symbol(Reference::new("MyNode", &["nodes", "my_node"]));
        let expr = Expr::Deferred(Box::new(inner));
        assert_eq!(expr.to_string(), "LazyReference(lambda: MyNode)");
    }

    #[test]
    fn test_absorb_merges_references() {
        let mut parent = CompiledExpr::new(Expr::List(Vec::new()));
        let child = CompiledExpr::symbol(Reference::new("Inputs", &["inputs"]));
        let child_expr = parent.absorb(child);
        parent.expr = Expr::List(vec![child_expr]);
        assert_eq!(parent.references.len(), 1);
    }

    #[test]
    fn test_deferred_adds_sdk_reference() {
        let fragment = CompiledExpr::symbol(Reference::new("MyNode", &["nodes", "my_node"]));
        let deferred = fragment.deferred();
        assert!(deferred.references.contains(&sdk::lazy_reference()));
        assert!(matches!(deferred.expr, Expr::Deferred(_)));
    }
}
