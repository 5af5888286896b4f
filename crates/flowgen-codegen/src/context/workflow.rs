// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The per-graph registry.
//!
//! A [`WorkflowContext`] owns every context of one graph, the dedup
//! namespaces they reserve names in, the declaration order of nodes, the
//! strict-mode flag, and the accumulated issue log. Nested graphs (map and
//! inline subworkflow bodies) own independent child registries reachable
//! through their [`NodeContext`].

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::pin::Pin;

use flowgen_dsl::{NodeKind, ValueDescriptor, Workflow};
use tracing::{debug, error, warn};

use super::node::NodeContext;
use super::trigger::TriggerContext;
use super::variables::{InputVariableContext, OutputVariableContext, StateVariableContext};
use super::Namespace;
use crate::error::{CompileError, CompileIssue, Severity};
use crate::resolver::MetadataResolver;

/// The per-graph symbol registry and error/mode policy.
#[derive(Debug)]
pub struct WorkflowContext {
    strict: bool,
    inputs: HashMap<String, InputVariableContext>,
    states: HashMap<String, StateVariableContext>,
    outputs: HashMap<String, OutputVariableContext>,
    nodes: HashMap<String, NodeContext>,
    triggers: HashMap<String, TriggerContext>,
    node_order: Vec<String>,
    issues: Vec<CompileIssue>,
    input_names: Namespace,
    state_names: Namespace,
    output_names: Namespace,
    node_class_names: Namespace,
    trigger_module_names: Namespace,
}

impl WorkflowContext {
    /// Build the registry for `workflow` in a single registration pass.
    ///
    /// Name assignment never fails: collisions are resolved by suffix
    /// probing in the relevant namespace.
    pub fn new(workflow: &Workflow, strict: bool) -> Self {
        let mut ctx = Self {
            strict,
            inputs: HashMap::new(),
            states: HashMap::new(),
            outputs: HashMap::new(),
            nodes: HashMap::new(),
            triggers: HashMap::new(),
            node_order: Vec::new(),
            issues: Vec::new(),
            input_names: Namespace::new(),
            state_names: Namespace::new(),
            output_names: Namespace::new(),
            node_class_names: Namespace::new(),
            trigger_module_names: Namespace::new(),
        };

        for variable in &workflow.input_variables {
            let context = InputVariableContext::new(variable, &mut ctx);
            ctx.inputs.insert(variable.id.clone(), context);
        }
        for variable in &workflow.state_variables {
            let context = StateVariableContext::new(variable, &mut ctx);
            ctx.states.insert(variable.id.clone(), context);
        }
        for variable in &workflow.output_variables {
            let context = OutputVariableContext::new(variable, &mut ctx);
            ctx.outputs.insert(variable.id.clone(), context);
        }
        for trigger in &workflow.triggers {
            let context = TriggerContext::new(trigger, &mut ctx);
            ctx.triggers.insert(trigger.id.clone(), context);
        }
        for (index, node) in workflow.nodes.iter().enumerate() {
            let context = NodeContext::new(node, index, &mut ctx);
            ctx.node_order.push(node.id.clone());
            ctx.nodes.insert(node.id.clone(), context);
        }

        debug!(
            nodes = ctx.nodes.len(),
            inputs = ctx.inputs.len(),
            states = ctx.states.len(),
            outputs = ctx.outputs.len(),
            triggers = ctx.triggers.len(),
            strict,
            "registered workflow contexts"
        );

        ctx
    }

    /// Whether degradable issues abort compilation.
    pub fn strict(&self) -> bool {
        self.strict
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Node context by id, or `EntityNotFound`.
    pub fn get_node(&self, id: &str) -> Result<&NodeContext, CompileError> {
        self.nodes.get(id).ok_or(CompileError::EntityNotFound {
            entity: "node",
            id: id.to_string(),
        })
    }

    /// Node context by id, or `None`.
    pub fn find_node(&self, id: &str) -> Option<&NodeContext> {
        self.nodes.get(id)
    }

    pub(crate) fn find_node_mut(&mut self, id: &str) -> Option<&mut NodeContext> {
        self.nodes.get_mut(id)
    }

    /// Input variable context by id, or `EntityNotFound`.
    pub fn get_input(&self, id: &str) -> Result<&InputVariableContext, CompileError> {
        self.inputs.get(id).ok_or(CompileError::EntityNotFound {
            entity: "input variable",
            id: id.to_string(),
        })
    }

    /// Input variable context by id, or `None`.
    pub fn find_input(&self, id: &str) -> Option<&InputVariableContext> {
        self.inputs.get(id)
    }

    /// State variable context by id, or `EntityNotFound`.
    pub fn get_state(&self, id: &str) -> Result<&StateVariableContext, CompileError> {
        self.states.get(id).ok_or(CompileError::EntityNotFound {
            entity: "state variable",
            id: id.to_string(),
        })
    }

    /// State variable context by id, or `None`.
    pub fn find_state(&self, id: &str) -> Option<&StateVariableContext> {
        self.states.get(id)
    }

    /// Output variable context by id, or `EntityNotFound`.
    pub fn get_output_variable(&self, id: &str) -> Result<&OutputVariableContext, CompileError> {
        self.outputs.get(id).ok_or(CompileError::EntityNotFound {
            entity: "output variable",
            id: id.to_string(),
        })
    }

    /// Output variable context by id, or `None`.
    pub fn find_output_variable(&self, id: &str) -> Option<&OutputVariableContext> {
        self.outputs.get(id)
    }

    /// Trigger context by id, or `EntityNotFound`.
    pub fn get_trigger(&self, id: &str) -> Result<&TriggerContext, CompileError> {
        self.triggers.get(id).ok_or(CompileError::EntityNotFound {
            entity: "trigger",
            id: id.to_string(),
        })
    }

    /// Trigger context by id, or `None`.
    pub fn find_trigger(&self, id: &str) -> Option<&TriggerContext> {
        self.triggers.get(id)
    }

    /// Declaration index of a node id, when the node is registered.
    pub fn declaration_index(&self, node_id: &str) -> Option<usize> {
        self.nodes.get(node_id).map(|n| n.declaration_index())
    }

    /// Node ids in declaration order.
    pub fn node_order(&self) -> &[String] {
        &self.node_order
    }

    // ========================================================================
    // Issue Log
    // ========================================================================

    /// Record an issue. In strict mode, issues classified as strict-fatal
    /// are upgraded and returned as an error instead of accumulating.
    pub fn add_issue(&mut self, issue: CompileIssue) -> Result<(), CompileError> {
        if self.strict && issue.strict_fatal() {
            return Err(CompileError::from_issue(&issue));
        }
        match issue.severity {
            Severity::Warning => warn!("{}", issue.message),
            Severity::Error => error!("{}", issue.message),
        }
        self.issues.push(issue);
        Ok(())
    }

    /// The accumulated issue log.
    pub fn issues(&self) -> &[CompileIssue] {
        &self.issues
    }

    /// Drain the accumulated issue log.
    pub fn take_issues(&mut self) -> Vec<CompileIssue> {
        std::mem::take(&mut self.issues)
    }

    // ========================================================================
    // Namespace Reservation
    // ========================================================================

    /// Whether `name` is taken in the input-variable namespace.
    pub fn is_input_name_used(&self, name: &str) -> bool {
        self.input_names.is_used(name)
    }

    /// Reserve a name in the input-variable namespace.
    pub fn reserve_input_name(&mut self, base: &str) -> String {
        self.input_names.reserve(base)
    }

    /// Whether `name` is taken in the state-variable namespace.
    pub fn is_state_name_used(&self, name: &str) -> bool {
        self.state_names.is_used(name)
    }

    /// Reserve a name in the state-variable namespace.
    pub fn reserve_state_name(&mut self, base: &str) -> String {
        self.state_names.reserve(base)
    }

    /// Whether `name` is taken in the output-variable namespace.
    pub fn is_output_name_used(&self, name: &str) -> bool {
        self.output_names.is_used(name)
    }

    /// Reserve a name in the output-variable namespace.
    pub fn reserve_output_name(&mut self, base: &str) -> String {
        self.output_names.reserve(base)
    }

    /// Whether `name` is taken in the node class-name namespace.
    pub fn is_node_class_name_used(&self, name: &str) -> bool {
        self.node_class_names.is_used(name)
    }

    /// Reserve a name in the node class-name namespace.
    pub fn reserve_node_class_name(&mut self, base: &str) -> String {
        self.node_class_names.reserve(base)
    }

    /// Whether `name` is taken in the trigger module-name namespace.
    pub fn is_trigger_module_name_used(&self, name: &str) -> bool {
        self.trigger_module_names.is_used(name)
    }

    /// Reserve a name in the trigger module-name namespace.
    pub fn reserve_trigger_module_name(&mut self, base: &str) -> String {
        self.trigger_module_names.reserve(base)
    }

    // ========================================================================
    // External Metadata Resolution
    // ========================================================================

    /// Await every node's metadata hook, depth-first through nested graphs.
    ///
    /// Must complete before the expression-compiler pass runs, so that the
    /// pass itself needs no concurrency primitives. A missing external
    /// entity degrades to a warning in non-strict mode and aborts in strict
    /// mode.
    pub async fn resolve_metadata<R: MetadataResolver>(
        &mut self,
        workflow: &Workflow,
        resolver: &R,
    ) -> Result<(), CompileError> {
        self.resolve_metadata_boxed(workflow, resolver).await
    }

    /// Boxed recursion helper: nested graphs make this future self-referential.
    fn resolve_metadata_boxed<'a, R: MetadataResolver>(
        &'a mut self,
        workflow: &'a Workflow,
        resolver: &'a R,
    ) -> Pin<Box<dyn Future<Output = Result<(), CompileError>> + 'a>> {
        Box::pin(async move {
            for node in &workflow.nodes {
                if let NodeKind::Prompt {
                    deployment_name: Some(name),
                } = &node.kind
                {
                    match resolver.resolve_prompt_deployment(name).await {
                        Ok(metadata) => {
                            if let Some(context) = self.find_node_mut(&node.id) {
                                context.set_metadata(metadata);
                            }
                        }
                        Err(err) => {
                            self.add_issue(CompileIssue::external_entity_not_found(format!(
                                "node '{}': {}",
                                node.id, err
                            )))?;
                        }
                    }
                }

                if let NodeKind::Subworkflow {
                    deployment_name: Some(name),
                    ..
                } = &node.kind
                {
                    match resolver.resolve_subworkflow_deployment(name).await {
                        Ok(metadata) => {
                            if let Some(context) = self.find_node_mut(&node.id) {
                                context.set_metadata(metadata);
                            }
                        }
                        Err(err) => {
                            self.add_issue(CompileIssue::external_entity_not_found(format!(
                                "node '{}': {}",
                                node.id, err
                            )))?;
                        }
                    }
                }

                let child_graph = match &node.kind {
                    NodeKind::Map { subworkflow } => Some(subworkflow.as_ref()),
                    NodeKind::Subworkflow {
                        subworkflow: Some(subworkflow),
                        ..
                    } => Some(subworkflow.as_ref()),
                    _ => None,
                };
                // Child issues stay on the child registry; they surface
                // when the child graph is compiled.
                if let Some(child_graph) = child_graph
                    && let Some(child) = self
                        .find_node_mut(&node.id)
                        .and_then(|n| n.child_context_mut())
                {
                    child.resolve_metadata_boxed(child_graph, resolver).await?;
                }
            }

            for name in referenced_secret_names(workflow) {
                if !resolver.workspace_secret_exists(&name).await {
                    self.add_issue(CompileIssue::external_entity_not_found(format!(
                        "workspace secret '{}' not found",
                        name
                    )))?;
                }
            }

            Ok(())
        })
    }
}

/// Collect every workspace-secret name referenced by the graph's
/// expressions, deduplicated and in deterministic order.
fn referenced_secret_names(workflow: &Workflow) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for node in &workflow.nodes {
        for attribute in &node.attributes {
            if let Some(descriptor) = &attribute.value {
                collect_secret_names(descriptor, &mut names);
            }
        }
    }
    for variable in &workflow.output_variables {
        if let Some(descriptor) = &variable.value {
            collect_secret_names(descriptor, &mut names);
        }
    }
    names
}

fn collect_secret_names(descriptor: &ValueDescriptor, names: &mut BTreeSet<String>) {
    match descriptor {
        ValueDescriptor::WorkspaceSecret { name } => {
            names.insert(name.clone());
        }
        ValueDescriptor::Array { items } => {
            for item in items {
                collect_secret_names(item, names);
            }
        }
        ValueDescriptor::Dictionary { entries } => {
            for entry in entries {
                collect_secret_names(&entry.value, names);
            }
        }
        ValueDescriptor::UnaryExpression { lhs, .. } => collect_secret_names(lhs, names),
        ValueDescriptor::BinaryExpression { lhs, rhs, .. } => {
            if let Some(lhs) = lhs {
                collect_secret_names(lhs, names);
            }
            collect_secret_names(rhs, names);
        }
        ValueDescriptor::TernaryExpression { base, lhs, rhs, .. } => {
            collect_secret_names(base, names);
            collect_secret_names(lhs, names);
            collect_secret_names(rhs, names);
        }
        ValueDescriptor::ConstantValue { .. }
        | ValueDescriptor::NodeOutput { .. }
        | ValueDescriptor::WorkflowInput { .. }
        | ValueDescriptor::WorkflowState { .. }
        | ValueDescriptor::EnvironmentVariable { .. }
        | ValueDescriptor::ExecutionCounter { .. }
        | ValueDescriptor::TriggerAttribute { .. } => {}
    }
}
