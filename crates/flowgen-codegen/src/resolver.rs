// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! External metadata resolution boundary.
//!
//! Deployment-backed nodes and workspace-secret references name entities
//! that live outside the graph document. The compiler only consumes the
//! *result* of looking them up; the transport (HTTP client, cache, fixture)
//! is injected behind [`MetadataResolver`]. All hooks are awaited to
//! completion before the expression-compiler pass begins, so the pass
//! itself stays synchronous.

use flowgen_dsl::VariableType;

use crate::error::ExternalLookupError;

/// One output variable of a resolved deployment.
#[derive(Debug, Clone)]
pub struct DeploymentOutput {
    /// Output variable name
    pub name: String,
    /// Declared output type
    pub output_type: VariableType,
}

/// Resolved shape of a deployed prompt or subworkflow.
#[derive(Debug, Clone, Default)]
pub struct DeploymentMetadata {
    /// Output variables the deployment exposes
    pub outputs: Vec<DeploymentOutput>,
}

/// Injected lookup capability for external entities.
#[allow(async_fn_in_trait)]
pub trait MetadataResolver {
    /// Resolve the output schema of a deployed prompt.
    async fn resolve_prompt_deployment(
        &self,
        name: &str,
    ) -> Result<DeploymentMetadata, ExternalLookupError>;

    /// Resolve the output schema of a deployed subworkflow.
    async fn resolve_subworkflow_deployment(
        &self,
        name: &str,
    ) -> Result<DeploymentMetadata, ExternalLookupError>;

    /// Whether a workspace secret with this name exists.
    async fn workspace_secret_exists(&self, name: &str) -> bool;
}

/// Resolver that treats every external entity as existing with an empty
/// shape. Used for offline compilation and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl MetadataResolver for NoopResolver {
    async fn resolve_prompt_deployment(
        &self,
        _name: &str,
    ) -> Result<DeploymentMetadata, ExternalLookupError> {
        Ok(DeploymentMetadata::default())
    }

    async fn resolve_subworkflow_deployment(
        &self,
        _name: &str,
    ) -> Result<DeploymentMetadata, ExternalLookupError> {
        Ok(DeploymentMetadata::default())
    }

    async fn workspace_secret_exists(&self, _name: &str) -> bool {
        true
    }
}
