// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The per-graph compilation pass.
//!
//! [`compile_workflow`] walks one graph document in declaration order and
//! compiles every node attribute and workflow output default into a
//! [`CompiledExpr`]. Nested graphs owned by map and inline subworkflow nodes
//! are compiled recursively into child [`CompiledWorkflow`]s with their own
//! issue logs.
//!
//! [`compile_workflow_with`] additionally awaits an injected
//! [`MetadataResolver`] before the pass runs, so deployment-backed nodes
//! carry their resolved output shapes and workspace-secret references are
//! validated against the workspace.

use flowgen_dsl::{NodeKind, Workflow};
use tracing::debug;

use crate::ast::{CompiledExpr, ReferenceSet};
use crate::compiler::ExpressionCompiler;
use crate::context::WorkflowContext;
use crate::error::{CompileError, CompileIssue};
use crate::resolver::MetadataResolver;

/// Knobs for one compilation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Abort on degradable reference issues instead of warning.
    pub strict: bool,
}

/// One compiled node attribute.
#[derive(Debug, Clone)]
pub struct CompiledAttribute {
    /// The IR attribute key
    pub key: String,
    /// The compiled value expression
    pub value: CompiledExpr,
}

/// One compiled workflow output default.
#[derive(Debug, Clone)]
pub struct CompiledOutput {
    /// The assigned output member name
    pub name: String,
    /// The compiled value expression
    pub value: CompiledExpr,
}

/// Compilation result for one node.
#[derive(Debug, Clone)]
pub struct CompiledNode {
    /// The IR node id
    pub node_id: String,
    /// The assigned class name of the generated node
    pub class_name: String,
    /// Compiled attributes, in IR order
    pub attributes: Vec<CompiledAttribute>,
    /// The nested graph's result, for map and inline subworkflow nodes
    pub child: Option<CompiledWorkflow>,
}

/// Compilation result for one graph.
#[derive(Debug, Clone)]
pub struct CompiledWorkflow {
    /// Compiled nodes, in declaration order
    pub nodes: Vec<CompiledNode>,
    /// Compiled workflow output defaults
    pub outputs: Vec<CompiledOutput>,
    /// Union of every reference used by this graph's expressions, for
    /// import planning
    pub references: ReferenceSet,
    /// Issues accumulated while compiling this graph
    pub issues: Vec<CompileIssue>,
}

/// Compile one graph document without external metadata resolution.
///
/// Deployment-backed nodes compile with no resolved output shape and
/// workspace-secret existence goes unchecked; use [`compile_workflow_with`]
/// when a resolver is available.
pub fn compile_workflow(
    workflow: &Workflow,
    options: &CompileOptions,
) -> Result<CompiledWorkflow, CompileError> {
    let mut ctx = WorkflowContext::new(workflow, options.strict);
    compile_graph(workflow, &mut ctx)
}

/// Compile one graph document, resolving external metadata first.
pub async fn compile_workflow_with<R: MetadataResolver>(
    workflow: &Workflow,
    options: &CompileOptions,
    resolver: &R,
) -> Result<CompiledWorkflow, CompileError> {
    let mut ctx = WorkflowContext::new(workflow, options.strict);
    ctx.resolve_metadata(workflow, resolver).await?;
    compile_graph(workflow, &mut ctx)
}

/// The recursive body shared by both entry points. `ctx` must have been
/// built from `workflow`.
fn compile_graph(
    workflow: &Workflow,
    ctx: &mut WorkflowContext,
) -> Result<CompiledWorkflow, CompileError> {
    let mut references = ReferenceSet::new();
    let mut nodes = Vec::with_capacity(workflow.nodes.len());

    for node in &workflow.nodes {
        let class_name = ctx.get_node(&node.id)?.class_name().to_string();
        debug!(node = %node.id, class = %class_name, "compiling node attributes");

        let mut attributes = Vec::with_capacity(node.attributes.len());
        for attribute in &node.attributes {
            let Some(descriptor) = &attribute.value else {
                continue;
            };
            let value =
                ExpressionCompiler::new(ctx, Some(&node.id)).compile(descriptor)?;
            references.merge(&value.references);
            attributes.push(CompiledAttribute {
                key: attribute.key.clone(),
                value,
            });
        }

        let child_graph = match &node.kind {
            NodeKind::Map { subworkflow } => Some(subworkflow.as_ref()),
            NodeKind::Subworkflow {
                subworkflow: Some(subworkflow),
                ..
            } => Some(subworkflow.as_ref()),
            _ => None,
        };
        let child = match child_graph {
            Some(child_graph) => {
                let child_ctx = ctx
                    .find_node_mut(&node.id)
                    .and_then(|n| n.child_context_mut())
                    .ok_or(CompileError::EntityNotFound {
                        entity: "child graph registry",
                        id: node.id.clone(),
                    })?;
                Some(compile_graph(child_graph, child_ctx)?)
            }
            None => None,
        };

        nodes.push(CompiledNode {
            node_id: node.id.clone(),
            class_name,
            attributes,
            child,
        });
    }

    let mut outputs = Vec::new();
    for variable in &workflow.output_variables {
        let Some(descriptor) = &variable.value else {
            continue;
        };
        let name = ctx.get_output_variable(&variable.id)?.name().to_string();
        let value = ExpressionCompiler::new(ctx, None).compile(descriptor)?;
        references.merge(&value.references);
        outputs.push(CompiledOutput { name, value });
    }

    let issues = ctx.take_issues();
    debug!(
        nodes = nodes.len(),
        outputs = outputs.len(),
        references = references.len(),
        issues = issues.len(),
        "compiled graph"
    );

    Ok(CompiledWorkflow {
        nodes,
        outputs,
        references,
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgen_dsl::parse_workflow;
    use serde_json::json;

    #[test]
    fn test_attributes_without_values_are_skipped() {
        let workflow = parse_workflow(&json!({
            "nodes": [
                {
                    "id": "n1",
                    "type": "GENERIC",
                    "label": "Step",
                    "attributes": [
                        { "id": "a1", "key": "prompt" },
                        {
                            "id": "a2",
                            "key": "city",
                            "value": { "type": "CONSTANT_VALUE", "value": "Warsaw" }
                        }
                    ]
                }
            ]
        }))
        .unwrap();
        let compiled = compile_workflow(&workflow, &CompileOptions::default()).unwrap();
        assert_eq!(compiled.nodes.len(), 1);
        assert_eq!(compiled.nodes[0].class_name, "Step");
        assert_eq!(compiled.nodes[0].attributes.len(), 1);
        assert_eq!(compiled.nodes[0].attributes[0].key, "city");
    }

    #[test]
    fn test_map_node_compiles_child_graph() {
        let workflow = parse_workflow(&json!({
            "nodes": [
                {
                    "id": "m1",
                    "type": "MAP",
                    "label": "For Each",
                    "subworkflow": {
                        "inputVariables": [
                            { "id": "item", "key": "item", "type": "JSON" }
                        ],
                        "nodes": [
                            {
                                "id": "c1",
                                "type": "GENERIC",
                                "label": "Inner",
                                "attributes": [
                                    {
                                        "id": "a1",
                                        "key": "value",
                                        "value": {
                                            "type": "WORKFLOW_INPUT",
                                            "inputVariableId": "item"
                                        }
                                    }
                                ]
                            }
                        ]
                    }
                }
            ]
        }))
        .unwrap();
        let compiled = compile_workflow(&workflow, &CompileOptions::default()).unwrap();
        let child = compiled.nodes[0].child.as_ref().unwrap();
        assert_eq!(child.nodes.len(), 1);
        assert_eq!(
            child.nodes[0].attributes[0].value.expr.to_string(),
            "Inputs.item"
        );
    }

    #[test]
    fn test_output_defaults_compile_without_origin() {
        let workflow = parse_workflow(&json!({
            "nodes": [
                {
                    "id": "n1",
                    "type": "GENERIC",
                    "label": "Step",
                    "outputs": [
                        { "id": "o1", "name": "result", "type": "STRING" }
                    ]
                }
            ],
            "outputVariables": [
                {
                    "id": "out1",
                    "key": "final",
                    "type": "STRING",
                    "value": { "type": "NODE_OUTPUT", "nodeId": "n1", "nodeOutputId": "o1" }
                }
            ]
        }))
        .unwrap();
        let compiled = compile_workflow(&workflow, &CompileOptions::default()).unwrap();
        assert_eq!(compiled.outputs.len(), 1);
        assert_eq!(compiled.outputs[0].name, "final");
        // Outputs are emitted after all node definitions, so the reference
        // is direct even though it points at a node.
        assert_eq!(
            compiled.outputs[0].value.expr.to_string(),
            "Step.Outputs.result"
        );
    }

    #[test]
    fn test_issue_log_surfaces_in_result() {
        let workflow = parse_workflow(&json!({
            "nodes": [
                {
                    "id": "n1",
                    "type": "GENERIC",
                    "label": "Step",
                    "attributes": [
                        {
                            "id": "a1",
                            "key": "value",
                            "value": { "type": "WORKFLOW_STATE", "stateVariableId": "missing" }
                        }
                    ]
                }
            ]
        }))
        .unwrap();
        let compiled = compile_workflow(&workflow, &CompileOptions::default()).unwrap();
        assert_eq!(compiled.issues.len(), 1);
        assert!(compiled.issues[0].message.contains("missing"));
        assert_eq!(
            compiled.nodes[0].attributes[0].value.expr.to_string(),
            "None"
        );
    }

    #[test]
    fn test_strict_mode_aborts_on_missing_reference() {
        let workflow = parse_workflow(&json!({
            "nodes": [
                {
                    "id": "n1",
                    "type": "GENERIC",
                    "label": "Step",
                    "attributes": [
                        {
                            "id": "a1",
                            "key": "value",
                            "value": { "type": "WORKFLOW_STATE", "stateVariableId": "missing" }
                        }
                    ]
                }
            ]
        }))
        .unwrap();
        let err = compile_workflow(&workflow, &CompileOptions { strict: true }).unwrap_err();
        assert!(matches!(err, CompileError::ReferenceNotFound { .. }));
    }
}
