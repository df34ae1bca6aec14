// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for outputting scope, step and status events into reports.

pub mod fanout;
#[cfg(feature = "output-junit")]
pub mod junit;
pub mod out;
pub mod recorder;
pub mod text;

use derive_more::with_trait::Display;

use crate::{
    error::SinkResult,
    scope::{Parent, ScopeId, ScopeKind},
    status::Status,
    step::Section,
};

#[cfg(feature = "output-junit")]
#[doc(inline)]
pub use self::junit::JUnit;
#[doc(inline)]
pub use self::{
    fanout::Sinks,
    recorder::{Call, Recorder},
    text::Text,
};

/// Kind of a test case annotation.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Annotation {
    /// Link to an external resource (issue tracker, requirement).
    #[display("LINK")]
    Link,

    /// Free-form comment.
    #[display("COMMENT")]
    Comment,

    /// Comment describing a failure.
    #[display("FAIL_COMMENT")]
    FailComment,

    /// Comment describing why a test case was skipped.
    #[display("SKIP_COMMENT")]
    SkipComment,
}

/// Writer of an execution report.
///
/// Calls referencing a [`ScopeId`] are always preceded by the
/// [`ReportSink::add_scope()`] call introducing it, and
/// [`ReportSink::save()`] follows every other call.
pub trait ReportSink {
    /// Introduces a new scope.
    ///
    /// # Errors
    ///
    /// If the sink fails to persist the event.
    fn add_scope(
        &mut self,
        parent: Parent,
        kind: ScopeKind,
        name: &str,
        id: ScopeId,
    ) -> SinkResult<()>;

    /// Sets the final [`Status`] of a finished scope.
    ///
    /// # Errors
    ///
    /// If the sink fails to persist the event.
    fn set_status(&mut self, id: ScopeId, status: Status) -> SinkResult<()>;

    /// Attaches a rendered statistics summary to a finished scope.
    ///
    /// # Errors
    ///
    /// If the sink fails to persist the event.
    fn add_statistics(&mut self, id: ScopeId, summary: &str) -> SinkResult<()>;

    /// Adds a logged step to a scope.
    ///
    /// # Errors
    ///
    /// If the sink fails to persist the event.
    fn add_step(
        &mut self,
        scope: ScopeId,
        text: &str,
        screenshot: Option<&str>,
        section: Section,
    ) -> SinkResult<()>;

    /// Annotates a test case.
    ///
    /// # Errors
    ///
    /// If the sink fails to persist the event.
    fn add_test_case_annotation(
        &mut self,
        scope: ScopeId,
        kind: Annotation,
        value: &str,
    ) -> SinkResult<()>;

    /// Persists everything received so far. Must be idempotent.
    ///
    /// # Errors
    ///
    /// If the sink fails to persist.
    fn save(&mut self) -> SinkResult<()>;
}
