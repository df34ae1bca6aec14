// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Fatal errors of an [`ExecutionContext`].
//!
//! [`ExecutionContext`]: crate::ExecutionContext

use derive_more::with_trait::{Display, Error};

use crate::scope::{ScopeId, ScopeKind};

/// Violation of an [`ExecutionContext`] invariant.
///
/// Unlike a test failure, this means the harness drives the context
/// incorrectly (or the context itself is broken), so it should be reported
/// as a setup/framework failure.
///
/// [`ExecutionContext`]: crate::ExecutionContext
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum ConsistencyError {
    /// Statistics were about to be rolled into an already finished parent.
    #[display("Cannot roll {kind} {child} into finished parent {parent}")]
    ParentFinished {
        /// [`ScopeKind`] of the finishing child.
        kind: ScopeKind,

        /// Finishing child.
        child: ScopeId,

        /// Already finished parent.
        parent: ScopeId,
    },

    /// Scope requires an enclosing scope which isn't open.
    #[display("Cannot start {kind} `{name}`: no open {required}")]
    MissingParent {
        /// [`ScopeKind`] of the scope being started.
        kind: ScopeKind,

        /// Name of the scope being started.
        #[error(not(source))]
        name: String,

        /// [`ScopeKind`] of the missing enclosing scope.
        required: ScopeKind,
    },

    /// Scope isn't known to the context.
    #[display("Unknown scope {id}")]
    UnknownScope {
        /// [`ScopeId`] of the scope.
        id: ScopeId,
    },
}

/// Result type alias using [`ConsistencyError`].
pub type Result<T> = std::result::Result<T, ConsistencyError>;

impl ConsistencyError {
    /// Creates a new [`ConsistencyError::MissingParent`].
    #[must_use]
    pub fn missing_parent(
        kind: ScopeKind,
        name: impl Into<String>,
        required: ScopeKind,
    ) -> Self {
        Self::MissingParent { kind, name: name.into(), required }
    }
}
