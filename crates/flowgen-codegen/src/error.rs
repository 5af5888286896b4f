// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error taxonomy for the compilation core.
//!
//! Two layers: [`CompileIssue`] is an accumulated log entry (the non-strict
//! degraded path always produces one instead of failing), while
//! [`CompileError`] aborts compilation - either a hard registry miss via the
//! `get_*` accessors, or a strict-mode upgrade of an otherwise degradable
//! issue.

// ============================================================================
// Accumulated Issues
// ============================================================================

/// Severity of an accumulated issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Compilation continued with a degraded result.
    Warning,
    /// Compilation produced a placeholder that is likely wrong.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Classification of an accumulated issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// A value descriptor pointed at an id with no registered context.
    ReferenceNotFound,
    /// A metadata lookup reported the external entity does not exist.
    ExternalEntityNotFound,
    /// A coalesce expression with a null/absent left operand.
    AmbiguousCoalesce,
}

/// One entry of the per-graph issue log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileIssue {
    /// Issue classification
    pub kind: IssueKind,
    /// Severity of the entry
    pub severity: Severity,
    /// Human-readable description, including the offending id or name
    pub message: String,
}

impl CompileIssue {
    /// A degraded unresolved-reference entry.
    pub fn reference_not_found(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::ReferenceNotFound,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// A missing-external-entity entry. Error severity: the dependent
    /// node's compiled output is best-effort at most.
    pub fn external_entity_not_found(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::ExternalEntityNotFound,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// A coalesce-with-null-operand entry. Never upgraded, even in strict
    /// mode.
    pub fn ambiguous_coalesce(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::AmbiguousCoalesce,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Whether strict mode turns this entry into an immediate
    /// [`CompileError`].
    pub fn strict_fatal(&self) -> bool {
        matches!(
            self.kind,
            IssueKind::ReferenceNotFound | IssueKind::ExternalEntityNotFound
        ) || self.severity == Severity::Error
    }
}

impl std::fmt::Display for CompileIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

// ============================================================================
// Fatal Errors
// ============================================================================

/// Errors that abort compilation.
#[derive(Debug, Clone)]
pub enum CompileError {
    /// A `get_*` registry lookup failed. The caller had no degraded path.
    EntityNotFound {
        /// The kind of graph element, e.g. `"node"`.
        entity: &'static str,
        /// The unresolvable id.
        id: String,
    },
    /// Strict-mode upgrade of an unresolved reference.
    ReferenceNotFound {
        /// Description of the unresolved reference.
        message: String,
    },
    /// Strict-mode upgrade of a missing external entity.
    ExternalEntityNotFound {
        /// Description of the missing entity.
        message: String,
    },
}

impl CompileError {
    /// Upgrade an accumulated issue to a fatal error (strict mode).
    pub fn from_issue(issue: &CompileIssue) -> Self {
        match issue.kind {
            IssueKind::ExternalEntityNotFound => CompileError::ExternalEntityNotFound {
                message: issue.message.clone(),
            },
            _ => CompileError::ReferenceNotFound {
                message: issue.message.clone(),
            },
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::EntityNotFound { entity, id } => {
                write!(f, "[C001] No {} registered for id '{}'", entity, id)
            }
            CompileError::ReferenceNotFound { message } => {
                write!(f, "[C002] {}", message)
            }
            CompileError::ExternalEntityNotFound { message } => {
                write!(f, "[C003] {}", message)
            }
        }
    }
}

impl std::error::Error for CompileError {}

/// Errors reported by an external metadata resolver.
#[derive(Debug, Clone)]
pub enum ExternalLookupError {
    /// The referenced entity does not exist in the workspace.
    NotFound {
        /// The kind of external entity, e.g. `"prompt deployment"`.
        entity: &'static str,
        /// The name that failed to resolve.
        name: String,
    },
}

impl std::fmt::Display for ExternalLookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExternalLookupError::NotFound { entity, name } => {
                write!(f, "{} '{}' not found", entity, name)
            }
        }
    }
}

impl std::error::Error for ExternalLookupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_fatal_classification() {
        assert!(CompileIssue::reference_not_found("x").strict_fatal());
        assert!(CompileIssue::external_entity_not_found("x").strict_fatal());
        assert!(!CompileIssue::ambiguous_coalesce("x").strict_fatal());
    }

    #[test]
    fn test_issue_display_includes_severity() {
        let issue = CompileIssue::reference_not_found("node 'n9' is not defined");
        assert_eq!(issue.to_string(), "WARNING: node 'n9' is not defined");

        let issue = CompileIssue::external_entity_not_found("secret 'api-key' not found");
        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.to_string(), "ERROR: secret 'api-key' not found");
    }

    #[test]
    fn test_error_severity_is_strict_fatal() {
        let issue = CompileIssue {
            kind: IssueKind::AmbiguousCoalesce,
            severity: Severity::Error,
            message: "x".to_string(),
        };
        assert!(issue.strict_fatal());
    }

    #[test]
    fn test_error_upgrade_preserves_kind() {
        let issue = CompileIssue::external_entity_not_found("secret 'api-key' not found");
        match CompileError::from_issue(&issue) {
            CompileError::ExternalEntityNotFound { message } => {
                assert!(message.contains("api-key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
