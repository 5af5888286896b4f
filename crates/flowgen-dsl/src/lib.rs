// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Workflow Graph IR - Single Source of Truth
//!
//! This crate defines the workflow graph types used throughout the codebase:
//! - Deserialization of workflow JSON documents
//! - Compiler type-safe access to graph structure
//! - JSON Schema generation via schemars
//!
//! The graph is an *unordered* collection of nodes, triggers, and variables
//! connected by id references; the expression IR ([`ValueDescriptor`]) is a
//! closed recursive union of reference leaves and operators.

mod ir;

pub use ir::*;

// ============================================================================
// Parsing Functions
// ============================================================================

/// Parse a workflow graph from a JSON value.
pub fn parse_workflow(json: &serde_json::Value) -> Result<Workflow, String> {
    serde_json::from_value(json.clone()).map_err(|e| format!("Failed to parse workflow: {}", e))
}

/// Parse a single value descriptor from a JSON value.
pub fn parse_value_descriptor(json: &serde_json::Value) -> Result<ValueDescriptor, String> {
    serde_json::from_value(json.clone())
        .map_err(|e| format!("Failed to parse value descriptor: {}", e))
}

// ============================================================================
// VariableType Helper Methods
// ============================================================================

impl VariableType {
    /// Get as string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::String => "STRING",
            VariableType::Number => "NUMBER",
            VariableType::Json => "JSON",
            VariableType::ChatHistory => "CHAT_HISTORY",
            VariableType::SearchResults => "SEARCH_RESULTS",
            VariableType::Error => "ERROR",
            VariableType::Array => "ARRAY",
            VariableType::FunctionCall => "FUNCTION_CALL",
            VariableType::Image => "IMAGE",
            VariableType::Audio => "AUDIO",
            VariableType::Null => "NULL",
        }
    }
}

impl std::fmt::Display for VariableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_minimal_workflow() {
        let doc = json!({
            "name": "My Workflow",
            "nodes": [
                {
                    "id": "n1",
                    "type": "GENERIC",
                    "label": "First Step",
                    "outputs": [
                        { "id": "o1", "name": "result", "type": "STRING" }
                    ]
                }
            ]
        });

        let workflow = parse_workflow(&doc).unwrap();
        assert_eq!(workflow.name.as_deref(), Some("My Workflow"));
        assert_eq!(workflow.nodes.len(), 1);
        assert!(matches!(workflow.nodes[0].kind, NodeKind::Generic));
        assert_eq!(workflow.nodes[0].outputs[0].name, "result");
    }

    #[test]
    fn test_parse_node_output_descriptor() {
        let doc = json!({
            "type": "NODE_OUTPUT",
            "nodeId": "n2",
            "nodeOutputId": "out1"
        });

        let descriptor = parse_value_descriptor(&doc).unwrap();
        match descriptor {
            ValueDescriptor::NodeOutput {
                node_id,
                node_output_id,
            } => {
                assert_eq!(node_id, "n2");
                assert_eq!(node_output_id, "out1");
            }
            other => panic!("unexpected descriptor: {:?}", other),
        }
    }

    #[test]
    fn test_parse_binary_expression_with_wire_operator() {
        let doc = json!({
            "type": "BINARY_EXPRESSION",
            "operator": "=",
            "lhs": { "type": "WORKFLOW_INPUT", "inputVariableId": "in1" },
            "rhs": { "type": "CONSTANT_VALUE", "value": "expected" }
        });

        let descriptor = parse_value_descriptor(&doc).unwrap();
        match descriptor {
            ValueDescriptor::BinaryExpression { operator, lhs, .. } => {
                assert_eq!(operator, BinaryOperator::Equals);
                assert!(lhs.is_some());
            }
            other => panic!("unexpected descriptor: {:?}", other),
        }
    }

    #[test]
    fn test_parse_binary_expression_without_lhs() {
        // Older editors omit lhs for coalesce chains; the IR must accept it.
        let doc = json!({
            "type": "BINARY_EXPRESSION",
            "operator": "coalesce",
            "rhs": { "type": "CONSTANT_VALUE", "value": 1 }
        });

        let descriptor = parse_value_descriptor(&doc).unwrap();
        match descriptor {
            ValueDescriptor::BinaryExpression { operator, lhs, .. } => {
                assert_eq!(operator, BinaryOperator::Coalesce);
                assert!(lhs.is_none());
            }
            other => panic!("unexpected descriptor: {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_composite_descriptor() {
        let doc = json!({
            "type": "ARRAY",
            "items": [
                { "type": "CONSTANT_VALUE", "value": 1 },
                {
                    "type": "DICTIONARY",
                    "entries": [
                        {
                            "key": "inner",
                            "value": { "type": "WORKFLOW_STATE", "stateVariableId": "s1" }
                        }
                    ]
                }
            ]
        });

        let descriptor = parse_value_descriptor(&doc).unwrap();
        match descriptor {
            ValueDescriptor::Array { items } => {
                assert_eq!(items.len(), 2);
                assert!(matches!(items[1], ValueDescriptor::Dictionary { .. }));
            }
            other => panic!("unexpected descriptor: {:?}", other),
        }
    }

    #[test]
    fn test_parse_trigger() {
        let doc = json!({
            "name": "Scheduled",
            "triggers": [
                {
                    "id": "t1",
                    "type": "SCHEDULED",
                    "cron": "0 * * * *",
                    "attributes": [
                        { "id": "a1", "key": "fired at", "type": "STRING" }
                    ]
                }
            ]
        });

        let workflow = parse_workflow(&doc).unwrap();
        assert_eq!(workflow.triggers.len(), 1);
        match &workflow.triggers[0].kind {
            TriggerKind::Scheduled { cron } => assert_eq!(cron, "0 * * * *"),
            other => panic!("unexpected trigger kind: {:?}", other),
        }
    }

    #[test]
    fn test_parse_map_node_owns_child_graph() {
        let doc = json!({
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
        });

        let workflow = parse_workflow(&doc).unwrap();
        match &workflow.nodes[0].kind {
            NodeKind::Map { subworkflow } => {
                assert_eq!(subworkflow.input_variables.len(), 1);
            }
            other => panic!("unexpected node kind: {:?}", other),
        }
    }

    #[test]
    fn test_descriptor_round_trips_operator_tokens() {
        let descriptor = ValueDescriptor::BinaryExpression {
            operator: BinaryOperator::AccessField,
            lhs: Some(Box::new(ValueDescriptor::WorkflowInput {
                input_variable_id: "in1".to_string(),
            })),
            rhs: Box::new(ValueDescriptor::ConstantValue {
                value: json!("field"),
            }),
        };

        let serialized = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(serialized["operator"], "accessField");
    }
}
