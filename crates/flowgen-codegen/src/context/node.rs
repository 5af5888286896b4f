// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-node symbol-table context.
//!
//! A [`NodeContext`] owns the node's class name, module segment, output and
//! port member names, its position in declaration order, and - for map and
//! inline subworkflow nodes - the child graph's own [`WorkflowContext`].

use std::collections::{HashMap, HashSet};

use flowgen_dsl::{Node, NodeKind, Workflow};

use super::workflow::WorkflowContext;
use super::Namespace;
use crate::ast::Reference;
use crate::naming;
use crate::resolver::DeploymentMetadata;

/// Context for one outgoing port of a node.
#[derive(Debug, Clone)]
pub struct PortContext {
    id: String,
    name: String,
}

impl PortContext {
    /// The wrapped IR element's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The assigned member name on the node's `Ports` class.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Context for one node of the graph.
#[derive(Debug)]
pub struct NodeContext {
    node_id: String,
    class_name: String,
    module_segment: String,
    declaration_index: usize,
    output_names: HashMap<String, String>,
    ports: Vec<PortContext>,
    used_port_names: HashSet<String>,
    metadata: Option<DeploymentMetadata>,
    child: Option<Box<WorkflowContext>>,
}

impl NodeContext {
    /// Register `node` against the owning registry's node namespace.
    ///
    /// `declaration_index` is the node's position in the graph's node list;
    /// the forward-reference mechanism compares these indices.
    pub fn new(node: &Node, declaration_index: usize, registry: &mut WorkflowContext) -> Self {
        let raw_label = match &node.label {
            Some(label) if !label.trim().is_empty() => label.clone(),
            _ => format!("{} node", node.kind.as_str()),
        };
        let base = naming::to_class_name(&raw_label);
        let class_name = registry.reserve_node_class_name(&base);
        let module_segment = naming::to_module_segment(&class_name);

        let mut output_namespace = Namespace::new();
        let mut output_names = HashMap::new();
        for output in &node.outputs {
            let member = output_namespace.reserve(&naming::to_valid_identifier(
                &output.name,
                "output_",
            ));
            output_names.insert(output.id.clone(), member);
        }

        let mut context = Self {
            node_id: node.id.clone(),
            class_name,
            module_segment,
            declaration_index,
            output_names,
            ports: Vec::new(),
            used_port_names: HashSet::new(),
            metadata: None,
            child: child_context_for(node, registry),
        };

        for port in &node.ports {
            let raw = match &port.name {
                Some(name) if !name.trim().is_empty() => name.as_str(),
                _ if port.is_default => "default",
                _ => "port",
            };
            let mut candidate = naming::to_valid_identifier(raw, "port_");
            let mut suffix = 1usize;
            while context.is_port_name_used(&candidate) {
                candidate = format!("{}_{}", naming::to_valid_identifier(raw, "port_"), suffix);
                suffix += 1;
            }
            context.add_used_port_name(&candidate);
            context.ports.push(PortContext {
                id: port.id.clone(),
                name: candidate,
            });
        }

        context
    }

    /// The wrapped IR element's id.
    pub fn id(&self) -> &str {
        &self.node_id
    }

    /// The assigned class name of the generated node.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The module path segment the node's file lives in.
    pub fn module_segment(&self) -> &str {
        &self.module_segment
    }

    /// The node's position in the graph's declaration order.
    pub fn declaration_index(&self) -> usize {
        self.declaration_index
    }

    /// Whether this node's definition precedes `other`'s in the generated
    /// output, i.e. a reference from `other` to this node needs no thunk.
    pub fn is_declared_before(&self, other: &NodeContext) -> bool {
        self.declaration_index < other.declaration_index
    }

    /// The assigned member name for `output_id`, if the output exists.
    pub fn output_name(&self, output_id: &str) -> Option<&str> {
        self.output_names.get(output_id).map(|s| s.as_str())
    }

    /// The context for `port_id`, if the port exists.
    pub fn port(&self, port_id: &str) -> Option<&PortContext> {
        self.ports.iter().find(|p| p.id() == port_id)
    }

    /// Whether `name` is already taken in this node's port namespace.
    pub fn is_port_name_used(&self, name: &str) -> bool {
        self.used_port_names.contains(name)
    }

    /// Reserve `name` in this node's port namespace.
    pub fn add_used_port_name(&mut self, name: &str) {
        self.used_port_names.insert(name.to_string());
    }

    /// Reference to the node class itself.
    pub fn reference(&self) -> Reference {
        Reference::new(
            self.class_name.clone(),
            &["nodes", self.module_segment.as_str()],
        )
    }

    /// Reference to `<Class>.Outputs.<output_name>`.
    pub fn output_reference(&self, output_name: &str) -> Reference {
        self.reference()
            .with_attributes(&["Outputs", output_name])
    }

    /// Reference to `<Class>.Execution.count`.
    pub fn execution_count_reference(&self) -> Reference {
        self.reference().with_attributes(&["Execution", "count"])
    }

    /// Resolved deployment metadata, when the node is deployment-backed and
    /// the resolution pass has run.
    pub fn metadata(&self) -> Option<&DeploymentMetadata> {
        self.metadata.as_ref()
    }

    /// Attach resolved deployment metadata.
    pub fn set_metadata(&mut self, metadata: DeploymentMetadata) {
        self.metadata = Some(metadata);
    }

    /// The child graph's registry, for map and inline subworkflow nodes.
    pub fn child_context(&self) -> Option<&WorkflowContext> {
        self.child.as_deref()
    }

    /// Mutable access to the child graph's registry.
    pub fn child_context_mut(&mut self) -> Option<&mut WorkflowContext> {
        self.child.as_deref_mut()
    }
}

/// Build the child registry for nodes that own a nested graph.
fn child_context_for(node: &Node, registry: &WorkflowContext) -> Option<Box<WorkflowContext>> {
    let child_graph: Option<&Workflow> = match &node.kind {
        NodeKind::Map { subworkflow } => Some(subworkflow),
        NodeKind::Subworkflow {
            subworkflow: Some(subworkflow),
            ..
        } => Some(subworkflow),
        _ => None,
    };
    child_graph.map(|graph| Box::new(WorkflowContext::new(graph, registry.strict())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgen_dsl::parse_workflow;
    use serde_json::json;

    fn context_for(doc: serde_json::Value) -> WorkflowContext {
        let workflow = parse_workflow(&doc).unwrap();
        WorkflowContext::new(&workflow, false)
    }

    #[test]
    fn test_class_name_from_label() {
        let ctx = context_for(json!({
            "nodes": [
                { "id": "n1", "type": "GENERIC", "label": "extract entities!" }
            ]
        }));
        let node = ctx.find_node("n1").unwrap();
        assert_eq!(node.class_name(), "ExtractEntities");
        assert_eq!(node.module_segment(), "extract_entities");
    }

    #[test]
    fn test_class_name_fallback_from_kind() {
        let ctx = context_for(json!({
            "nodes": [
                { "id": "n1", "type": "FINAL_OUTPUT" }
            ]
        }));
        let node = ctx.find_node("n1").unwrap();
        assert_eq!(node.class_name(), "FinalOutputNode");
    }

    #[test]
    fn test_duplicate_labels_are_suffixed() {
        let ctx = context_for(json!({
            "nodes": [
                { "id": "n1", "type": "GENERIC", "label": "Step" },
                { "id": "n2", "type": "GENERIC", "label": "Step" },
                { "id": "n3", "type": "GENERIC", "label": "Step" }
            ]
        }));
        assert_eq!(ctx.find_node("n1").unwrap().class_name(), "Step");
        assert_eq!(ctx.find_node("n2").unwrap().class_name(), "Step_1");
        assert_eq!(ctx.find_node("n3").unwrap().class_name(), "Step_2");
    }

    #[test]
    fn test_output_names_deduplicated_per_node() {
        let ctx = context_for(json!({
            "nodes": [
                {
                    "id": "n1",
                    "type": "GENERIC",
                    "outputs": [
                        { "id": "o1", "name": "Result!", "type": "STRING" },
                        { "id": "o2", "name": "result", "type": "STRING" }
                    ]
                }
            ]
        }));
        let node = ctx.find_node("n1").unwrap();
        assert_eq!(node.output_name("o1"), Some("result"));
        assert_eq!(node.output_name("o2"), Some("result_1"));
        assert_eq!(node.output_name("o3"), None);
    }

    #[test]
    fn test_default_port_named_default() {
        let ctx = context_for(json!({
            "nodes": [
                {
                    "id": "n1",
                    "type": "GENERIC",
                    "ports": [
                        { "id": "p1", "isDefault": true },
                        { "id": "p2", "name": "on error" }
                    ]
                }
            ]
        }));
        let node = ctx.find_node("n1").unwrap();
        assert_eq!(node.port("p1").unwrap().name(), "default");
        assert_eq!(node.port("p2").unwrap().name(), "on_error");
        assert!(node.is_port_name_used("default"));
    }

    #[test]
    fn test_declaration_order() {
        let ctx = context_for(json!({
            "nodes": [
                { "id": "a", "type": "GENERIC" },
                { "id": "b", "type": "GENERIC" }
            ]
        }));
        let a = ctx.find_node("a").unwrap();
        let b = ctx.find_node("b").unwrap();
        assert!(a.is_declared_before(b));
        assert!(!b.is_declared_before(a));
        assert!(!a.is_declared_before(a));
    }

    #[test]
    fn test_map_node_owns_child_registry() {
        let ctx = context_for(json!({
            "nodes": [
                {
                    "id": "m1",
                    "type": "MAP",
                    "subworkflow": {
                        "inputVariables": [
                            { "id": "item", "key": "item", "type": "JSON" }
                        ]
                    }
                }
            ]
        }));
        let node = ctx.find_node("m1").unwrap();
        let child = node.child_context().unwrap();
        assert_eq!(child.find_input("item").unwrap().name(), "item");
    }
}
