// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Value-descriptor compilation.
//!
//! [`ExpressionCompiler`] turns one IR [`ValueDescriptor`] tree into a
//! [`CompiledExpr`], consulting the owning [`WorkflowContext`] for every
//! reference. Unresolvable references degrade to a `None`-equivalent
//! fragment plus a logged warning unless the registry is strict.
//!
//! The match over the descriptor union is exhaustive on purpose: adding an
//! IR variant without a compiler rule is a build failure, not a runtime
//! `UnsupportedDescriptor` error.

mod leaves;
mod operators;
pub mod ordering;

use flowgen_dsl::ValueDescriptor;

use crate::ast::CompiledExpr;
use crate::context::WorkflowContext;
use crate::error::CompileError;

/// Recursive compiler for one expression tree.
///
/// `origin` names the node whose attribute is being compiled; the
/// forward-reference rule ([`ordering::needs_deferred`]) compares its
/// declaration index against referenced nodes'.
pub struct ExpressionCompiler<'w> {
    ctx: &'w mut WorkflowContext,
    origin_index: Option<usize>,
}

impl<'w> ExpressionCompiler<'w> {
    /// Create a compiler for expressions owned by `origin_node_id` (or by
    /// no node, e.g. workflow output defaults).
    pub fn new(ctx: &'w mut WorkflowContext, origin_node_id: Option<&str>) -> Self {
        let origin_index = origin_node_id.and_then(|id| ctx.declaration_index(id));
        Self { ctx, origin_index }
    }

    /// Compile one descriptor tree into a target expression.
    ///
    /// Always returns a complete, well-formed fragment in non-strict mode;
    /// in strict mode an unresolvable reference aborts with an error.
    pub fn compile(
        &mut self,
        descriptor: &ValueDescriptor,
    ) -> Result<CompiledExpr, CompileError> {
        match descriptor {
            ValueDescriptor::ConstantValue { value } => Ok(self.compile_constant(value)),
            ValueDescriptor::NodeOutput {
                node_id,
                node_output_id,
            } => self.compile_node_output(node_id, node_output_id),
            ValueDescriptor::WorkflowInput { input_variable_id } => {
                self.compile_workflow_input(input_variable_id)
            }
            ValueDescriptor::WorkflowState { state_variable_id } => {
                self.compile_workflow_state(state_variable_id)
            }
            ValueDescriptor::WorkspaceSecret { name } => Ok(self.compile_workspace_secret(name)),
            ValueDescriptor::EnvironmentVariable { name } => {
                Ok(self.compile_environment_variable(name))
            }
            ValueDescriptor::ExecutionCounter { node_id } => {
                self.compile_execution_counter(node_id)
            }
            ValueDescriptor::TriggerAttribute {
                trigger_id,
                attribute_id,
            } => self.compile_trigger_attribute(trigger_id, attribute_id),
            ValueDescriptor::Array { items } => self.compile_array(items),
            ValueDescriptor::Dictionary { entries } => self.compile_dictionary(entries),
            ValueDescriptor::UnaryExpression { operator, lhs } => {
                self.compile_unary(*operator, lhs)
            }
            ValueDescriptor::BinaryExpression { operator, lhs, rhs } => {
                self.compile_binary(*operator, lhs.as_deref(), rhs)
            }
            ValueDescriptor::TernaryExpression {
                operator,
                base,
                lhs,
                rhs,
            } => self.compile_ternary(*operator, base, lhs, rhs),
        }
    }

    fn origin_index(&self) -> Option<usize> {
        self.origin_index
    }
}
