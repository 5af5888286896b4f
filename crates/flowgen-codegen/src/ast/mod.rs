// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Target-language AST fragments with reference propagation.

pub mod expr;
pub mod reference;
pub mod sdk;

pub use expr::{CompiledExpr, Expr};
pub use reference::{Reference, ReferenceSet};
