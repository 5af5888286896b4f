// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Well-known SDK symbols emitted by the compiler.
//!
//! Generated expressions lean on a small set of runtime helpers from the
//! workflow SDK. The constructors here are the single place their names and
//! module paths are spelled.

use super::reference::Reference;

const REFERENCES_MODULE: &[&str] = &["sdk", "workflows", "references"];

/// `LazyReference` - the zero-argument deferred-evaluation wrapper.
pub fn lazy_reference() -> Reference {
    Reference::new("LazyReference", REFERENCES_MODULE)
}

/// `ConstantValueReference` - wraps a literal so operator call signatures
/// stay uniform when an operand is a constant rather than a reference.
pub fn constant_value_reference() -> Reference {
    Reference::new("ConstantValueReference", REFERENCES_MODULE)
}

/// `EnvironmentVariableReference` - resolves an environment variable at
/// execution time.
pub fn environment_variable_reference() -> Reference {
    Reference::new("EnvironmentVariableReference", REFERENCES_MODULE)
}

/// `WorkspaceSecretReference` - resolves a workspace secret at execution
/// time.
pub fn workspace_secret_reference() -> Reference {
    Reference::new("WorkspaceSecretReference", REFERENCES_MODULE)
}
