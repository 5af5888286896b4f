// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The forward-reference ordering rule.
//!
//! Generated node definitions appear in declaration order, so a reference
//! from one node's attribute to another node's symbol is only valid when
//! the referenced node is defined strictly earlier. Anything else - a
//! forward reference or a node referring to itself - must be wrapped in a
//! deferred-evaluation thunk or the generated file would name an unbound
//! symbol (or, for self-references, bind eagerly against itself).

/// Decide whether a node-level reference must be deferred.
///
/// `origin_index` is the declaration index of the node whose attribute is
/// being compiled (`None` when compiling outside any node, e.g. a workflow
/// output default, which is emitted after all node definitions).
/// `target_index` is the declaration index of the referenced node.
pub fn needs_deferred(origin_index: Option<usize>, target_index: usize) -> bool {
    match origin_index {
        Some(origin) => target_index >= origin,
        None => false,
    }
}
