// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Symbol-table contexts.
//!
//! One context wraps each IR element and owns its stable, deduplicated
//! target-language identifier(s). All names are assigned during the single
//! registration pass that builds the [`WorkflowContext`] and never change
//! afterwards.

pub mod node;
pub mod trigger;
pub mod variables;
pub mod workflow;

pub use node::{NodeContext, PortContext};
pub use trigger::TriggerContext;
pub use variables::{InputVariableContext, OutputVariableContext, StateVariableContext};
pub use workflow::WorkflowContext;

use std::collections::HashSet;

/// One dedup namespace. Probes `name`, `name_1`, `name_2`, ... until an
/// unused name is found, then reserves the winner.
#[derive(Debug, Default)]
pub(crate) struct Namespace {
    used: HashSet<String>,
}

impl Namespace {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    pub(crate) fn reserve(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let mut suffix = 1usize;
        loop {
            let candidate = format!("{}_{}", base, suffix);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_reserves_suffixed_names() {
        let mut namespace = Namespace::new();
        assert_eq!(namespace.reserve("name"), "name");
        assert_eq!(namespace.reserve("name"), "name_1");
        assert_eq!(namespace.reserve("name"), "name_2");
        assert_eq!(namespace.reserve("other"), "other");
        assert!(namespace.is_used("name_1"));
        assert!(!namespace.is_used("name_3"));
    }

    #[test]
    fn test_namespace_names_are_pairwise_distinct() {
        let mut namespace = Namespace::new();
        let mut assigned = std::collections::HashSet::new();
        for _ in 0..50 {
            let name = namespace.reserve("result");
            assert!(name.starts_with("result"));
            assert!(assigned.insert(name));
        }
    }
}
