// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Recoverable conditions signalled during a run.

use derive_more::with_trait::Display;

use crate::{config::SinkKind, scope::ScopeKind};

/// Recoverable condition recorded by an [`ExecutionContext`].
///
/// None of these abort a run: each is logged and recorded, so a harness may
/// inspect them afterwards via [`ExecutionContext::conditions()`].
///
/// [`ExecutionContext`]: crate::ExecutionContext
/// [`ExecutionContext::conditions()`]: crate::ExecutionContext::conditions
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum Condition {
    /// A scope was finished while none of its kind was open.
    #[display("Scope underflow: no open {_0} to finish")]
    ScopeUnderflow(ScopeKind),

    /// A sink failed to persist and is skipped for the rest of the run.
    #[display("Sink `{sink}` degraded: {error}")]
    SinkWriteFailure {
        /// Kind of the failed sink.
        sink: SinkKind,

        /// Rendered error of the failed call.
        error: String,
    },

    /// A step was logged while no scope was open.
    #[display("Step dropped, no open scope: {_0}")]
    DroppedStep(String),
}

impl Condition {
    /// Indicates whether this is a [`Condition::ScopeUnderflow`].
    #[must_use]
    pub const fn is_underflow(&self) -> bool {
        matches!(self, Self::ScopeUnderflow(_))
    }

    /// Indicates whether this is a [`Condition::SinkWriteFailure`].
    #[must_use]
    pub const fn is_sink_failure(&self) -> bool {
        matches!(self, Self::SinkWriteFailure { .. })
    }
}
