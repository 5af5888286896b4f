// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Compiler rules for reference leaves and composite literals.

use flowgen_dsl::{DictionaryEntry, ValueDescriptor};

use super::{ordering, ExpressionCompiler};
use crate::ast::{sdk, CompiledExpr, Expr};
use crate::error::{CompileError, CompileIssue};

impl ExpressionCompiler<'_> {
    pub(super) fn compile_constant(&mut self, value: &serde_json::Value) -> CompiledExpr {
        CompiledExpr::new(Expr::Constant(value.clone()))
    }

    pub(super) fn compile_node_output(
        &mut self,
        node_id: &str,
        node_output_id: &str,
    ) -> Result<CompiledExpr, CompileError> {
        // Copy out what we need so the registry borrow ends before any
        // issue is recorded.
        let resolved = self.ctx.find_node(node_id).map(|node| {
            (
                node.declaration_index(),
                node.output_name(node_output_id)
                    .map(|name| node.output_reference(name)),
            )
        });

        match resolved {
            None => {
                self.ctx.add_issue(CompileIssue::reference_not_found(format!(
                    "node '{}' referenced by a NODE_OUTPUT descriptor is not defined",
                    node_id
                )))?;
                Ok(CompiledExpr::none())
            }
            Some((_, None)) => {
                self.ctx.add_issue(CompileIssue::reference_not_found(format!(
                    "node '{}' has no output with id '{}'",
                    node_id, node_output_id
                )))?;
                Ok(CompiledExpr::none())
            }
            Some((target_index, Some(reference))) => {
                let fragment = CompiledExpr::symbol(reference);
                if ordering::needs_deferred(self.origin_index(), target_index) {
                    Ok(fragment.deferred())
                } else {
                    Ok(fragment)
                }
            }
        }
    }

    pub(super) fn compile_workflow_input(
        &mut self,
        input_variable_id: &str,
    ) -> Result<CompiledExpr, CompileError> {
        match self.ctx.find_input(input_variable_id) {
            Some(input) => Ok(CompiledExpr::symbol(input.reference())),
            None => {
                self.ctx.add_issue(CompileIssue::reference_not_found(format!(
                    "workflow input variable '{}' is not defined",
                    input_variable_id
                )))?;
                // Preserved leniency: the fragment still compiles, but
                // raises a descriptive error at the point of use.
                let mut fragment = CompiledExpr::new(Expr::RaiseOnUse {
                    message: format!(
                        "Workflow input variable '{}' was not resolved",
                        input_variable_id
                    ),
                });
                fragment.references.insert(sdk::lazy_reference());
                Ok(fragment)
            }
        }
    }

    pub(super) fn compile_workflow_state(
        &mut self,
        state_variable_id: &str,
    ) -> Result<CompiledExpr, CompileError> {
        match self.ctx.find_state(state_variable_id) {
            Some(state) => Ok(CompiledExpr::symbol(state.reference())),
            None => {
                self.ctx.add_issue(CompileIssue::reference_not_found(format!(
                    "workflow state variable '{}' is not defined",
                    state_variable_id
                )))?;
                Ok(CompiledExpr::none())
            }
        }
    }

    pub(super) fn compile_workspace_secret(&mut self, name: &str) -> CompiledExpr {
        let reference = sdk::workspace_secret_reference();
        let mut fragment = CompiledExpr::new(Expr::Call {
            callee: Box::new(Expr::Symbol(reference.clone())),
            args: vec![Expr::Constant(serde_json::Value::String(name.to_string()))],
            kwargs: Vec::new(),
        });
        fragment.references.insert(reference);
        fragment
    }

    pub(super) fn compile_environment_variable(&mut self, name: &str) -> CompiledExpr {
        let reference = sdk::environment_variable_reference();
        let mut fragment = CompiledExpr::new(Expr::Call {
            callee: Box::new(Expr::Symbol(reference.clone())),
            args: vec![Expr::Constant(serde_json::Value::String(name.to_string()))],
            kwargs: Vec::new(),
        });
        fragment.references.insert(reference);
        fragment
    }

    pub(super) fn compile_execution_counter(
        &mut self,
        node_id: &str,
    ) -> Result<CompiledExpr, CompileError> {
        let resolved = self
            .ctx
            .find_node(node_id)
            .map(|node| (node.declaration_index(), node.execution_count_reference()));

        match resolved {
            None => {
                self.ctx.add_issue(CompileIssue::reference_not_found(format!(
                    "node '{}' referenced by an EXECUTION_COUNTER descriptor is not defined",
                    node_id
                )))?;
                Ok(CompiledExpr::none())
            }
            Some((target_index, reference)) => {
                let fragment = CompiledExpr::symbol(reference);
                if ordering::needs_deferred(self.origin_index(), target_index) {
                    Ok(fragment.deferred())
                } else {
                    Ok(fragment)
                }
            }
        }
    }

    pub(super) fn compile_trigger_attribute(
        &mut self,
        trigger_id: &str,
        attribute_id: &str,
    ) -> Result<CompiledExpr, CompileError> {
        let resolved = self.ctx.find_trigger(trigger_id).map(|trigger| {
            trigger
                .attribute_name(attribute_id)
                .map(|name| trigger.attribute_reference(name))
        });

        match resolved {
            None => {
                self.ctx.add_issue(CompileIssue::reference_not_found(format!(
                    "trigger '{}' referenced by a TRIGGER_ATTRIBUTE descriptor is not defined",
                    trigger_id
                )))?;
                Ok(CompiledExpr::none())
            }
            Some(None) => {
                self.ctx.add_issue(CompileIssue::reference_not_found(format!(
                    "trigger '{}' has no attribute with id '{}'",
                    trigger_id, attribute_id
                )))?;
                Ok(CompiledExpr::none())
            }
            Some(Some(reference)) => Ok(CompiledExpr::symbol(reference)),
        }
    }

    pub(super) fn compile_array(
        &mut self,
        items: &[ValueDescriptor],
    ) -> Result<CompiledExpr, CompileError> {
        let mut fragment = CompiledExpr::none();
        let mut compiled_items = Vec::with_capacity(items.len());
        for item in items {
            let child = self.compile(item)?;
            compiled_items.push(fragment.absorb(child));
        }
        fragment.expr = Expr::List(compiled_items);
        Ok(fragment)
    }

    pub(super) fn compile_dictionary(
        &mut self,
        entries: &[DictionaryEntry],
    ) -> Result<CompiledExpr, CompileError> {
        let mut fragment = CompiledExpr::none();
        let mut compiled_entries = Vec::with_capacity(entries.len());
        for entry in entries {
            let child = self.compile(&entry.value)?;
            compiled_entries.push((entry.key.clone(), fragment.absorb(child)));
        }
        fragment.expr = Expr::Dict(compiled_entries);
        Ok(fragment)
    }
}
