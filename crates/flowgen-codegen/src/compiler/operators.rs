// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Compiler rules for operator expressions.
//!
//! Every operator lowers to an SDK method call on its first operand, so
//! literal operands are first normalized into `ConstantValueReference`
//! wrappers: `5 > x` becomes `ConstantValueReference(5).greater_than(x)`
//! and every operand answers the same comparison protocol.

use flowgen_dsl::{BinaryOperator, TernaryOperator, UnaryOperator, ValueDescriptor};

use super::ExpressionCompiler;
use crate::ast::{sdk, CompiledExpr, Expr};
use crate::error::{CompileError, CompileIssue};

/// SDK method invoked by a unary operator.
fn unary_method(operator: UnaryOperator) -> &'static str {
    match operator {
        UnaryOperator::Null => "is_null",
        UnaryOperator::NotNull => "is_not_null",
        UnaryOperator::IsNil => "is_nil",
        UnaryOperator::IsNotNil => "is_not_nil",
        UnaryOperator::IsError => "is_error",
        UnaryOperator::IsBlank => "is_blank",
        UnaryOperator::IsNotBlank => "is_not_blank",
    }
}

/// SDK method invoked by a binary operator. `AccessField` and `Coalesce`
/// with a missing left operand are handled structurally and never reach
/// this table through those paths.
fn binary_method(operator: BinaryOperator) -> &'static str {
    match operator {
        BinaryOperator::Equals => "equals",
        BinaryOperator::DoesNotEqual => "does_not_equal",
        BinaryOperator::LessThan => "less_than",
        BinaryOperator::GreaterThan => "greater_than",
        BinaryOperator::LessThanOrEqualTo => "less_than_or_equal_to",
        BinaryOperator::GreaterThanOrEqualTo => "greater_than_or_equal_to",
        BinaryOperator::Contains => "contains",
        BinaryOperator::DoesNotContain => "does_not_contain",
        BinaryOperator::In => "in_",
        BinaryOperator::NotIn => "not_in",
        BinaryOperator::BeginsWith => "begins_with",
        BinaryOperator::EndsWith => "ends_with",
        BinaryOperator::And => "and_",
        BinaryOperator::Or => "or_",
        BinaryOperator::Coalesce => "coalesce",
        BinaryOperator::AccessField => "access_field",
    }
}

/// SDK method invoked by a ternary operator.
fn ternary_method(operator: TernaryOperator) -> &'static str {
    match operator {
        TernaryOperator::Between => "between",
        TernaryOperator::NotBetween => "not_between",
    }
}

impl ExpressionCompiler<'_> {
    /// Compile an operand of an operator expression, normalizing bare
    /// constants into `ConstantValueReference` wrappers so the generated
    /// call sites are uniform regardless of operand shape.
    fn compile_operand(
        &mut self,
        descriptor: &ValueDescriptor,
    ) -> Result<CompiledExpr, CompileError> {
        let mut fragment = self.compile(descriptor)?;
        if let Expr::Constant(_) | Expr::None = fragment.expr {
            let reference = sdk::constant_value_reference();
            fragment.expr = Expr::Call {
                callee: Box::new(Expr::Symbol(reference.clone())),
                args: vec![fragment.expr],
                kwargs: Vec::new(),
            };
            fragment.references.insert(reference);
        }
        Ok(fragment)
    }

    pub(super) fn compile_unary(
        &mut self,
        operator: UnaryOperator,
        lhs: &ValueDescriptor,
    ) -> Result<CompiledExpr, CompileError> {
        let CompiledExpr { expr, references } = self.compile_operand(lhs)?;
        Ok(CompiledExpr {
            expr: expr.method_call(unary_method(operator), Vec::new()),
            references,
        })
    }

    pub(super) fn compile_binary(
        &mut self,
        operator: BinaryOperator,
        lhs: Option<&ValueDescriptor>,
        rhs: &ValueDescriptor,
    ) -> Result<CompiledExpr, CompileError> {
        let lhs = match lhs {
            Some(lhs) => lhs,
            None if operator == BinaryOperator::Coalesce => {
                // Historical documents carry coalesce chains whose head
                // operand was dropped by an editor bug. Degrade to the right
                // operand alone rather than rejecting the whole expression.
                self.ctx.add_issue(CompileIssue::ambiguous_coalesce(
                    "coalesce expression is missing its left operand; \
                     compiling the right operand alone"
                        .to_string(),
                ))?;
                return self.compile(rhs);
            }
            None => {
                self.ctx.add_issue(CompileIssue::reference_not_found(format!(
                    "binary '{}' expression is missing its left operand",
                    operator
                )))?;
                return Ok(CompiledExpr::none());
            }
        };

        if operator == BinaryOperator::AccessField {
            // Field access is a subscript, not a method call, and its key
            // operand is embedded verbatim rather than operand-normalized.
            let mut fragment = self.compile_operand(lhs)?;
            let key = self.compile(rhs)?;
            let key_expr = fragment.absorb(key);
            fragment.expr = fragment.expr.subscript(key_expr);
            return Ok(fragment);
        }

        let mut fragment = self.compile_operand(lhs)?;
        let rhs = self.compile_operand(rhs)?;
        let rhs_expr = fragment.absorb(rhs);
        fragment.expr = fragment
            .expr
            .method_call(binary_method(operator), vec![rhs_expr]);
        Ok(fragment)
    }

    pub(super) fn compile_ternary(
        &mut self,
        operator: TernaryOperator,
        base: &ValueDescriptor,
        lhs: &ValueDescriptor,
        rhs: &ValueDescriptor,
    ) -> Result<CompiledExpr, CompileError> {
        let mut fragment = self.compile_operand(base)?;
        let lhs = self.compile_operand(lhs)?;
        let rhs = self.compile_operand(rhs)?;
        let lhs_expr = fragment.absorb(lhs);
        let rhs_expr = fragment.absorb(rhs);
        fragment.expr = fragment
            .expr
            .method_call(ternary_method(operator), vec![lhs_expr, rhs_expr]);
        Ok(fragment)
    }
}
