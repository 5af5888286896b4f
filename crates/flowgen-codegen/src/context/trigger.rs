// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-trigger symbol-table context.

use std::collections::HashMap;

use flowgen_dsl::Trigger;

use super::workflow::WorkflowContext;
use super::Namespace;
use crate::ast::Reference;
use crate::naming;

/// Context for one trigger of the graph.
#[derive(Debug)]
pub struct TriggerContext {
    id: String,
    module_name: String,
    class_name: String,
    attribute_names: HashMap<String, String>,
}

impl TriggerContext {
    /// Register `trigger` against the owning registry's trigger namespace.
    pub fn new(trigger: &Trigger, registry: &mut WorkflowContext) -> Self {
        let slug = trigger.kind.as_str();
        let module_name = registry.reserve_trigger_module_name(&naming::to_module_segment(slug));
        let class_name = naming::to_class_name(&format!("{} trigger", slug));

        let mut attribute_namespace = Namespace::new();
        let mut attribute_names = HashMap::new();
        for attribute in &trigger.attributes {
            let member = attribute_namespace
                .reserve(&naming::to_valid_identifier(&attribute.key, "attribute_"));
            attribute_names.insert(attribute.id.clone(), member);
        }

        Self {
            id: trigger.id.clone(),
            module_name,
            class_name,
            attribute_names,
        }
    }

    /// The wrapped IR element's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The assigned module name of the generated trigger file.
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// The class name of the generated trigger.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The assigned member name for `attribute_id`, if the attribute exists.
    pub fn attribute_name(&self, attribute_id: &str) -> Option<&str> {
        self.attribute_names.get(attribute_id).map(|s| s.as_str())
    }

    /// Reference to `<TriggerClass>.<attribute_name>`.
    pub fn attribute_reference(&self, attribute_name: &str) -> Reference {
        Reference::new(
            self.class_name.clone(),
            &["triggers", self.module_name.as_str()],
        )
        .with_attributes(&[attribute_name])
    }
}
