// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Workflow graph IR - Single Source of Truth
//!
//! These types define the workflow graph document structure and are used by:
//! 1. The server - for deserializing workflow JSON
//! 2. The compiler - for type-safe access to graph structure
//! 3. Tooling - for auto-generating JSON Schema via schemars
//!
//! The IR is constructed once from the external JSON document and is never
//! mutated during compilation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// IR version - bump when making breaking changes
pub const IR_VERSION: &str = "1.2.0";

// ============================================================================
// Root Types
// ============================================================================

/// A complete workflow graph definition
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Human-readable name for the workflow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Typed input variables supplied at execution start
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_variables: Vec<InputVariable>,

    /// Typed state variables readable/writable during execution
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub state_variables: Vec<StateVariable>,

    /// Typed output variables produced by the workflow
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_variables: Vec<OutputVariable>,

    /// All nodes in declaration order. Declaration order is significant:
    /// the compiler uses it to decide when a cross-node reference must be
    /// deferred.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,

    /// Connectivity edges between node ports. Used for graph layout and
    /// validation upstream of expression compilation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<Edge>,

    /// Triggers that can start the workflow
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<Trigger>,
}

// ============================================================================
// Variables
// ============================================================================

/// An input variable declared on the workflow
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InputVariable {
    /// Graph-unique identifier
    pub id: String,

    /// Raw user-facing name. May be any string, including one that is not a
    /// valid identifier in the target language.
    pub key: String,

    /// Declared variable type
    #[serde(rename = "type")]
    pub variable_type: VariableType,

    /// Default value used when no input is supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Whether the input must be supplied at execution start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// A state variable declared on the workflow
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StateVariable {
    /// Graph-unique identifier
    pub id: String,

    /// Raw user-facing name
    pub key: String,

    /// Declared variable type
    #[serde(rename = "type")]
    pub variable_type: VariableType,

    /// Initial value of the state variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// An output variable declared on the workflow
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputVariable {
    /// Graph-unique identifier
    pub id: String,

    /// Raw user-facing name
    pub key: String,

    /// Declared variable type
    #[serde(rename = "type")]
    pub variable_type: VariableType,

    /// Expression producing the output value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueDescriptor>,
}

/// Declared type of a workflow variable or node output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    /// Plain text
    String,
    /// Floating point number
    Number,
    /// Arbitrary JSON value
    Json,
    /// Chat message history
    ChatHistory,
    /// Search results from a retrieval step
    SearchResults,
    /// Error value propagated from a failed node
    Error,
    /// Array of values
    Array,
    /// Function call payload
    FunctionCall,
    /// Image payload
    Image,
    /// Audio payload
    Audio,
    /// Null value
    Null,
}

// ============================================================================
// Nodes
// ============================================================================

/// A single node in the workflow graph
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Graph-unique identifier
    pub id: String,

    /// Human-readable label shown in the editor. Used to derive the node's
    /// class name in generated code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Node behavior, discriminated by the `type` field
    #[serde(flatten)]
    pub kind: NodeKind,

    /// Outgoing branches of this node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<Port>,

    /// Named outputs other nodes can reference
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<NodeOutput>,

    /// Configured attribute expressions, keyed by attribute name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<NodeAttribute>,
}

impl Node {
    /// Returns the node's default port, if any.
    pub fn default_port(&self) -> Option<&Port> {
        self.ports.iter().find(|p| p.is_default)
    }
}

/// Union of all node behaviors, discriminated by the `type` field
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// A plain code node with no special behavior
    Generic,
    /// Terminal node exposing a value as a workflow output
    FinalOutput,
    /// Template rendering node
    Templating,
    /// Outbound HTTP request node
    Api,
    /// LLM prompt invocation, inline or against a deployed prompt
    #[serde(rename_all = "camelCase")]
    Prompt {
        /// Name of the deployed prompt, when invoking a deployment
        #[serde(skip_serializing_if = "Option::is_none")]
        deployment_name: Option<String>,
    },
    /// Invocation of another workflow, inline or deployed
    #[serde(rename_all = "camelCase")]
    Subworkflow {
        /// Name of the deployed workflow, when invoking a deployment
        #[serde(skip_serializing_if = "Option::is_none")]
        deployment_name: Option<String>,

        /// Inline child graph, when not invoking a deployment
        #[serde(skip_serializing_if = "Option::is_none")]
        subworkflow: Option<Box<Workflow>>,
    },
    /// Fan-out over a collection, running a child graph per item
    #[serde(rename_all = "camelCase")]
    Map {
        /// Child graph executed once per item
        subworkflow: Box<Workflow>,
    },
    /// Fan-in joining multiple branches
    Merge,
}

impl NodeKind {
    /// Stable lowercase tag for this node kind, used in fallback names.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Generic => "generic",
            NodeKind::FinalOutput => "final_output",
            NodeKind::Templating => "templating",
            NodeKind::Api => "api",
            NodeKind::Prompt { .. } => "prompt",
            NodeKind::Subworkflow { .. } => "subworkflow",
            NodeKind::Map { .. } => "map",
            NodeKind::Merge => "merge",
        }
    }
}

/// An outgoing branch of a node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    /// Graph-unique identifier
    pub id: String,

    /// Optional branch name. The default port is used when no name is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Whether this is the node's default port
    #[serde(default)]
    pub is_default: bool,
}

/// A named output exposed by a node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeOutput {
    /// Graph-unique identifier
    pub id: String,

    /// Raw user-facing output name
    pub name: String,

    /// Declared output type
    #[serde(rename = "type")]
    pub output_type: VariableType,
}

/// A configured attribute expression on a node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttribute {
    /// Graph-unique identifier
    pub id: String,

    /// Attribute name on the node class
    pub key: String,

    /// Expression producing the attribute value. Absent when the attribute
    /// was left unconfigured in the editor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueDescriptor>,
}

// ============================================================================
// Edges
// ============================================================================

/// A connectivity edge between two node ports
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Source node identifier
    pub source_node_id: String,

    /// Source port identifier on the source node
    pub source_handle_id: String,

    /// Target node identifier
    pub target_node_id: String,

    /// Target handle identifier on the target node
    pub target_handle_id: String,
}

// ============================================================================
// Triggers
// ============================================================================

/// A trigger that can start the workflow
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    /// Graph-unique identifier
    pub id: String,

    /// Trigger behavior, discriminated by the `type` field
    #[serde(flatten)]
    pub kind: TriggerKind,

    /// Typed attributes the trigger exposes to expressions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<TriggerAttribute>,
}

/// Union of all trigger behaviors, discriminated by the `type` field
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerKind {
    /// Started explicitly by a user or API call
    Manual,
    /// Started on a cron schedule
    Scheduled {
        /// Cron expression describing the schedule
        cron: String,
    },
    /// Started by an external integration event
    Integration {
        /// Integration identifier, e.g. `"slack"`
        slug: String,
    },
    /// Started by an incoming chat message
    ChatMessage,
}

impl TriggerKind {
    /// Stable lowercase tag for this trigger kind, used to derive module names.
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Manual => "manual",
            TriggerKind::Scheduled { .. } => "scheduled",
            TriggerKind::Integration { .. } => "integration",
            TriggerKind::ChatMessage => "chat_message",
        }
    }
}

/// A typed attribute exposed by a trigger
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAttribute {
    /// Graph-unique identifier
    pub id: String,

    /// Raw user-facing attribute name
    pub key: String,

    /// Declared attribute type
    #[serde(rename = "type")]
    pub attribute_type: VariableType,
}

// ============================================================================
// Value Descriptors (expression IR)
// ============================================================================

/// A node in the expression IR: either a reference leaf or an operator.
///
/// This is a closed union - the compiler matches it exhaustively, so adding
/// a variant without a corresponding compiler rule fails the build.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueDescriptor {
    /// A literal constant value
    #[serde(rename_all = "camelCase")]
    ConstantValue {
        /// The literal value
        value: serde_json::Value,
    },

    /// A reference to another node's output
    #[serde(rename_all = "camelCase")]
    NodeOutput {
        /// The referenced node
        node_id: String,
        /// The referenced output on that node
        node_output_id: String,
    },

    /// A reference to a workflow input variable
    #[serde(rename_all = "camelCase")]
    WorkflowInput {
        /// The referenced input variable
        input_variable_id: String,
    },

    /// A reference to a workflow state variable
    #[serde(rename_all = "camelCase")]
    WorkflowState {
        /// The referenced state variable
        state_variable_id: String,
    },

    /// A reference to a workspace secret, resolved at execution time
    #[serde(rename_all = "camelCase")]
    WorkspaceSecret {
        /// Name of the secret
        name: String,
    },

    /// A reference to an environment variable, resolved at execution time
    #[serde(rename_all = "camelCase")]
    EnvironmentVariable {
        /// Name of the environment variable
        name: String,
    },

    /// A reference to a node's execution counter
    #[serde(rename_all = "camelCase")]
    ExecutionCounter {
        /// The counted node
        node_id: String,
    },

    /// A reference to a trigger attribute
    #[serde(rename_all = "camelCase")]
    TriggerAttribute {
        /// The referenced trigger
        trigger_id: String,
        /// The referenced attribute on that trigger
        attribute_id: String,
    },

    /// An array whose items may themselves be any descriptor
    #[serde(rename_all = "camelCase")]
    Array {
        /// Item expressions, in order
        items: Vec<ValueDescriptor>,
    },

    /// A dictionary whose values may themselves be any descriptor
    #[serde(rename_all = "camelCase")]
    Dictionary {
        /// Entry expressions, in order
        entries: Vec<DictionaryEntry>,
    },

    /// A unary operator applied to one operand
    #[serde(rename_all = "camelCase")]
    UnaryExpression {
        /// The operator token
        operator: UnaryOperator,
        /// The operand
        lhs: Box<ValueDescriptor>,
    },

    /// A binary operator applied to two operands.
    ///
    /// `lhs` is optional on the wire: documents produced by older editors
    /// omit it for `coalesce` chains, which the compiler degrades rather
    /// than rejects.
    #[serde(rename_all = "camelCase")]
    BinaryExpression {
        /// The operator token
        operator: BinaryOperator,
        /// The left operand, possibly absent
        #[serde(skip_serializing_if = "Option::is_none")]
        lhs: Option<Box<ValueDescriptor>>,
        /// The right operand
        rhs: Box<ValueDescriptor>,
    },

    /// A ternary operator applied to a base and two operands
    #[serde(rename_all = "camelCase")]
    TernaryExpression {
        /// The operator token
        operator: TernaryOperator,
        /// The tested expression
        base: Box<ValueDescriptor>,
        /// The lower operand
        lhs: Box<ValueDescriptor>,
        /// The upper operand
        rhs: Box<ValueDescriptor>,
    },
}

/// A single key/value entry of a dictionary descriptor
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    /// The entry key
    pub key: String,

    /// The entry value expression
    pub value: ValueDescriptor,
}

// ============================================================================
// Operators
// ============================================================================

/// Unary operator tokens
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, strum::Display,
)]
pub enum UnaryOperator {
    /// Value is null
    #[serde(rename = "null")]
    #[strum(serialize = "null")]
    Null,
    /// Value is not null
    #[serde(rename = "notNull")]
    #[strum(serialize = "notNull")]
    NotNull,
    /// Value is nil (null or absent)
    #[serde(rename = "isNil")]
    #[strum(serialize = "isNil")]
    IsNil,
    /// Value is not nil
    #[serde(rename = "isNotNil")]
    #[strum(serialize = "isNotNil")]
    IsNotNil,
    /// Value is an error
    #[serde(rename = "isError")]
    #[strum(serialize = "isError")]
    IsError,
    /// Value is blank (empty string)
    #[serde(rename = "isBlank")]
    #[strum(serialize = "isBlank")]
    IsBlank,
    /// Value is not blank
    #[serde(rename = "isNotBlank")]
    #[strum(serialize = "isNotBlank")]
    IsNotBlank,
}

/// Binary operator tokens
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, strum::Display,
)]
pub enum BinaryOperator {
    /// Equality test
    #[serde(rename = "=")]
    #[strum(serialize = "=")]
    Equals,
    /// Inequality test
    #[serde(rename = "!=")]
    #[strum(serialize = "!=")]
    DoesNotEqual,
    /// Less-than comparison
    #[serde(rename = "<")]
    #[strum(serialize = "<")]
    LessThan,
    /// Greater-than comparison
    #[serde(rename = ">")]
    #[strum(serialize = ">")]
    GreaterThan,
    /// Less-than-or-equal comparison
    #[serde(rename = "<=")]
    #[strum(serialize = "<=")]
    LessThanOrEqualTo,
    /// Greater-than-or-equal comparison
    #[serde(rename = ">=")]
    #[strum(serialize = ">=")]
    GreaterThanOrEqualTo,
    /// Containment test on the left operand
    #[serde(rename = "contains")]
    #[strum(serialize = "contains")]
    Contains,
    /// Non-containment test on the left operand
    #[serde(rename = "doesNotContain")]
    #[strum(serialize = "doesNotContain")]
    DoesNotContain,
    /// Membership test of the left operand in the right
    #[serde(rename = "in")]
    #[strum(serialize = "in")]
    In,
    /// Non-membership test
    #[serde(rename = "notIn")]
    #[strum(serialize = "notIn")]
    NotIn,
    /// String prefix test
    #[serde(rename = "beginsWith")]
    #[strum(serialize = "beginsWith")]
    BeginsWith,
    /// String suffix test
    #[serde(rename = "endsWith")]
    #[strum(serialize = "endsWith")]
    EndsWith,
    /// Logical conjunction
    #[serde(rename = "and")]
    #[strum(serialize = "and")]
    And,
    /// Logical disjunction
    #[serde(rename = "or")]
    #[strum(serialize = "or")]
    Or,
    /// Null-coalescing: right operand when the left is null
    #[serde(rename = "coalesce")]
    #[strum(serialize = "coalesce")]
    Coalesce,
    /// Field access on the left operand
    #[serde(rename = "accessField")]
    #[strum(serialize = "accessField")]
    AccessField,
}

/// Ternary operator tokens
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, strum::Display,
)]
pub enum TernaryOperator {
    /// Base is within the inclusive range [lhs, rhs]
    #[serde(rename = "between")]
    #[strum(serialize = "between")]
    Between,
    /// Base is outside the inclusive range [lhs, rhs]
    #[serde(rename = "notBetween")]
    #[strum(serialize = "notBetween")]
    NotBetween,
}
