// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! In-memory [`ReportSink`] recording every call.

use std::{
    io,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    error::{SinkError, SinkResult},
    scope::{Parent, ScopeId, ScopeKind},
    status::Status,
    step::Section,
};

use super::{Annotation, ReportSink};

/// Single recorded [`ReportSink`] call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    /// [`ReportSink::add_scope()`] call.
    AddScope {
        /// Parent of the scope.
        parent: Parent,
        /// Kind of the scope.
        kind: ScopeKind,
        /// Name of the scope.
        name: String,
        /// Id of the scope.
        id: ScopeId,
    },

    /// [`ReportSink::set_status()`] call.
    SetStatus {
        /// Id of the scope.
        id: ScopeId,
        /// Resolved status.
        status: Status,
    },

    /// [`ReportSink::add_statistics()`] call.
    AddStatistics {
        /// Id of the scope.
        id: ScopeId,
        /// Rendered summary.
        summary: String,
    },

    /// [`ReportSink::add_step()`] call.
    AddStep {
        /// Id of the scope.
        scope: ScopeId,
        /// Step text.
        text: String,
        /// Screenshot reference.
        screenshot: Option<String>,
        /// Section of the step.
        section: Section,
    },

    /// [`ReportSink::add_test_case_annotation()`] call.
    Annotate {
        /// Id of the test case.
        scope: ScopeId,
        /// Annotation kind.
        kind: Annotation,
        /// Annotation value.
        value: String,
    },

    /// [`ReportSink::save()`] call.
    Save,
}

#[derive(Debug, Default)]
struct Journal {
    calls: Vec<Call>,
    fail_after: Option<usize>,
}

/// [`ReportSink`] keeping every call in memory.
///
/// Clones share the same journal, so a clone registered into an
/// [`ExecutionContext`] can be inspected through another one.
///
/// [`ExecutionContext`]: crate::ExecutionContext
#[derive(Clone, Debug, Default)]
pub struct Recorder(Arc<Mutex<Journal>>);

impl Recorder {
    /// Creates a new empty [`Recorder`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a [`Recorder`] failing every call after the first `calls`
    /// succeeded ones. Failed calls are still recorded.
    #[must_use]
    pub fn failing_after(calls: usize) -> Self {
        Self(Arc::new(Mutex::new(Journal {
            calls: Vec::new(),
            fail_after: Some(calls),
        })))
    }

    fn journal(&self) -> MutexGuard<'_, Journal> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&mut self, call: Call) -> SinkResult<()> {
        let mut journal = self.journal();
        let failing = journal.fail_after.is_some_and(|n| journal.calls.len() >= n);
        journal.calls.push(call);
        if failing {
            return Err(SinkError::Io(io::Error::new(
                io::ErrorKind::Other,
                "recorder is set to fail",
            )));
        }
        Ok(())
    }

    /// Returns all the recorded calls.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.journal().calls.clone()
    }

    /// Counts the recorded calls matching the `predicate`.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.journal().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Number of [`ReportSink::save()`] calls.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.count(|c| matches!(c, Call::Save))
    }

    /// Last [`Status`] set for the given scope.
    #[must_use]
    pub fn status_of(&self, id: ScopeId) -> Option<Status> {
        self.journal().calls.iter().rev().find_map(|c| match c {
            Call::SetStatus { id: i, status } if *i == id => Some(*status),
            _ => None,
        })
    }

    /// Texts of the steps added to the given scope.
    #[must_use]
    pub fn steps_of(&self, id: ScopeId) -> Vec<String> {
        self.journal()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::AddStep { scope, text, .. } if *scope == id => {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect()
    }
}

impl ReportSink for Recorder {
    fn add_scope(
        &mut self,
        parent: Parent,
        kind: ScopeKind,
        name: &str,
        id: ScopeId,
    ) -> SinkResult<()> {
        self.record(Call::AddScope { parent, kind, name: name.into(), id })
    }

    fn set_status(&mut self, id: ScopeId, status: Status) -> SinkResult<()> {
        self.record(Call::SetStatus { id, status })
    }

    fn add_statistics(&mut self, id: ScopeId, summary: &str) -> SinkResult<()> {
        self.record(Call::AddStatistics { id, summary: summary.into() })
    }

    fn add_step(
        &mut self,
        scope: ScopeId,
        text: &str,
        screenshot: Option<&str>,
        section: Section,
    ) -> SinkResult<()> {
        self.record(Call::AddStep {
            scope,
            text: text.into(),
            screenshot: screenshot.map(Into::into),
            section,
        })
    }

    fn add_test_case_annotation(
        &mut self,
        scope: ScopeId,
        kind: Annotation,
        value: &str,
    ) -> SinkResult<()> {
        self.record(Call::Annotate { scope, kind, value: value.into() })
    }

    fn save(&mut self) -> SinkResult<()> {
        self.record(Call::Save)
    }
}
