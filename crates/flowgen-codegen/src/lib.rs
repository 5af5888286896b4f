// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Flowgen Codegen - Workflow Graph Compilation to SDK Source
//!
//! This crate compiles workflow graph documents (JSON IR from `flowgen-dsl`)
//! into target-language expression trees against the workflow SDK. Whole-file
//! rendering and packaging live with the callers; this crate owns the symbol
//! tables, the naming policy, and the expression compiler.
//!
//! # Compilation Pipeline
//!
//! ```text
//!     ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!     │   Graph     │      │   Symbol    │      │  Compiled   │
//!     │  Document   │─────▶│  Contexts   │─────▶│ Expressions │
//!     │  (JSON IR)  │      │ (registry)  │      │ (+ imports) │
//!     └─────────────┘      └─────────────┘      └─────────────┘
//!                                │
//!                                ▼
//!                          ┌─────────────┐
//!                          │  Metadata   │
//!                          │  Resolver   │
//!                          │  (async)    │
//!                          └─────────────┘
//! ```
//!
//! 1. **Register**: [`context::WorkflowContext`] walks the graph once and
//!    assigns every entity a collision-free generated name.
//! 2. **Resolve**: an injected [`resolver::MetadataResolver`] is awaited for
//!    deployment-backed nodes and workspace-secret existence.
//! 3. **Compile**: [`compiler::ExpressionCompiler`] lowers every value
//!    descriptor to an [`ast::CompiledExpr`], propagating the reference set
//!    of every symbol the expression depends on and thunking forward and
//!    self references.
//!
//! # Usage
//!
//! ```ignore
//! use flowgen_codegen::{CompileOptions, compile_workflow};
//! use flowgen_dsl::parse_workflow;
//!
//! let workflow = parse_workflow(&document)?;
//! let compiled = compile_workflow(&workflow, &CompileOptions::default())?;
//! for issue in &compiled.issues {
//!     eprintln!("{}: {}", issue.severity, issue.message);
//! }
//! ```
//!
//! # Modules
//!
//! - [`ast`]: target-language expression trees and reference sets
//! - [`compile`]: the per-graph compilation pass
//! - [`compiler`]: the recursive value-descriptor compiler
//! - [`context`]: per-entity symbol-table contexts and the graph registry
//! - [`error`]: issue log and error taxonomy
//! - [`naming`]: identifier and class-name derivation
//! - [`resolver`]: the external metadata resolution boundary

#![deny(missing_docs)]

/// Target-language expression trees and reference sets.
pub mod ast;

/// The per-graph compilation pass.
pub mod compile;

/// The recursive value-descriptor compiler.
pub mod compiler;

/// Per-entity symbol-table contexts and the graph registry.
pub mod context;

/// Issue log and error taxonomy.
pub mod error;

/// Identifier and class-name derivation.
pub mod naming;

/// The external metadata resolution boundary.
pub mod resolver;

// Re-export main types
pub use ast::{CompiledExpr, Expr, Reference, ReferenceSet};
pub use compile::{
    CompileOptions, CompiledAttribute, CompiledNode, CompiledOutput, CompiledWorkflow,
    compile_workflow, compile_workflow_with,
};
pub use compiler::ExpressionCompiler;
pub use context::WorkflowContext;
pub use error::{CompileError, CompileIssue, ExternalLookupError, IssueKind, Severity};
pub use resolver::{DeploymentMetadata, DeploymentOutput, MetadataResolver, NoopResolver};

// Re-export DSL types for convenience
pub use flowgen_dsl::{ValueDescriptor, Workflow};
