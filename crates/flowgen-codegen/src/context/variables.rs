// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Contexts for workflow input, state, and output variables.

use flowgen_dsl::{InputVariable, OutputVariable, StateVariable};

use super::workflow::WorkflowContext;
use crate::ast::Reference;
use crate::naming;

/// Context for one workflow input variable.
#[derive(Debug)]
pub struct InputVariableContext {
    id: String,
    name: String,
}

impl InputVariableContext {
    /// Register `variable` against the owning registry's input namespace.
    pub fn new(variable: &InputVariable, registry: &mut WorkflowContext) -> Self {
        let base = naming::to_valid_identifier(&variable.key, "input_");
        let name = registry.reserve_input_name(&base);
        Self {
            id: variable.id.clone(),
            name,
        }
    }

    /// The wrapped IR element's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The assigned member name on the generated `Inputs` class.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference to `Inputs.<name>`.
    pub fn reference(&self) -> Reference {
        Reference::new("Inputs", &["inputs"]).with_attributes(&[&self.name])
    }
}

/// Context for one workflow state variable.
#[derive(Debug)]
pub struct StateVariableContext {
    id: String,
    name: String,
}

impl StateVariableContext {
    /// Register `variable` against the owning registry's state namespace.
    pub fn new(variable: &StateVariable, registry: &mut WorkflowContext) -> Self {
        let base = naming::to_valid_identifier(&variable.key, "state_");
        let name = registry.reserve_state_name(&base);
        Self {
            id: variable.id.clone(),
            name,
        }
    }

    /// The wrapped IR element's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The assigned member name on the generated `State` class.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference to `State.<name>`.
    pub fn reference(&self) -> Reference {
        Reference::new("State", &["state"]).with_attributes(&[&self.name])
    }
}

/// Context for one workflow output variable.
#[derive(Debug)]
pub struct OutputVariableContext {
    id: String,
    name: String,
}

impl OutputVariableContext {
    /// Register `variable` against the owning registry's output namespace.
    pub fn new(variable: &OutputVariable, registry: &mut WorkflowContext) -> Self {
        let base = naming::to_valid_identifier(&variable.key, "output_");
        let name = registry.reserve_output_name(&base);
        Self {
            id: variable.id.clone(),
            name,
        }
    }

    /// The wrapped IR element's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The assigned member name on the generated `Outputs` class.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference to `Outputs.<name>`.
    pub fn reference(&self) -> Reference {
        Reference::new("Outputs", &["outputs"]).with_attributes(&[&self.name])
    }
}
