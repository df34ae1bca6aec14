// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scopes of a test execution: [`Suite`]s, [`Script`]s, [`Group`]s and
//! [`TestCase`]s.
//!
//! [`Group`]: ScopeKind::Group
//! [`Script`]: ScopeKind::Script
//! [`Suite`]: ScopeKind::Suite
//! [`TestCase`]: ScopeKind::TestCase

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, SystemTime},
};

use derive_more::with_trait::Display;

use crate::{stats::Statistics, status::Status, timer::Timer};

/// Kind of a scope.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ScopeKind {
    /// Suite, possibly nested into another [`ScopeKind::Suite`].
    #[display("suite")]
    Suite,

    /// Script, executed standalone or under the current [`ScopeKind::Suite`].
    #[display("script")]
    Script,

    /// Group of test cases inside a [`ScopeKind::Script`].
    #[display("group")]
    Group,

    /// Single test case.
    #[display("test case")]
    TestCase,
}

impl ScopeKind {
    /// All the [`ScopeKind`]s, outermost first.
    pub const ALL: [Self; 4] =
        [Self::Suite, Self::Script, Self::Group, Self::TestCase];
}

/// Source of [`ScopeId`]s, shared by every [`ExecutionContext`].
///
/// [`ExecutionContext`]: crate::ExecutionContext
static SCOPE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a scope.
///
/// Identifiers are drawn from a process-wide counter and never reused, so a
/// [`ScopeId`] passed to a [`ReportSink`] always refers to exactly one scope,
/// even when the sink is shared by several [`ExecutionContext`]s.
///
/// [`ExecutionContext`]: crate::ExecutionContext
///
/// [`ReportSink`]: crate::ReportSink
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[display("#{_0}")]
pub struct ScopeId(u64);

impl ScopeId {
    /// Returns the raw numeric value of this [`ScopeId`].
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Allocates a new [`ScopeId`], unique across the whole process.
    pub(crate) fn next() -> Self {
        Self(SCOPE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Parent reference passed to [`ReportSink::add_scope()`].
///
/// [`ReportSink::add_scope()`]: crate::ReportSink::add_scope
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Parent {
    /// Scope is a root of the report.
    Root,

    /// Scope is nested into another one.
    Scope(ScopeId),
}

impl From<Option<ScopeId>> for Parent {
    fn from(id: Option<ScopeId>) -> Self {
        id.map_or(Self::Root, Self::Scope)
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("ROOT"),
            Self::Scope(id) => fmt::Display::fmt(id, f),
        }
    }
}

/// Outcome flags set on a [`ScopeKind::TestCase`] by the harness.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Verdict {
    /// Test case has failed.
    pub failed: bool,

    /// Failure is a known issue (a comment is attached to it), so it's
    /// reported as a warning.
    pub known_issue: bool,

    /// Test case was skipped.
    pub skipped: bool,
}

/// One live or finished scope of an [`ExecutionContext`].
///
/// [`ExecutionContext`]: crate::ExecutionContext
#[derive(Clone, Debug)]
pub struct ScopeNode {
    pub(crate) id: ScopeId,
    pub(crate) kind: ScopeKind,
    pub(crate) name: String,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) timer: Timer,
    pub(crate) stats: Statistics,
    pub(crate) explicit_failure: bool,
    pub(crate) verdict: Verdict,
    pub(crate) status: Option<Status>,
}

impl ScopeNode {
    pub(crate) fn new(
        id: ScopeId,
        kind: ScopeKind,
        name: impl Into<String>,
        parent: Option<ScopeId>,
    ) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            parent,
            timer: Timer::start(),
            stats: Statistics::default(),
            explicit_failure: false,
            verdict: Verdict::default(),
            status: None,
        }
    }

    /// Indicates whether this scope has been finished already.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.status.is_some()
    }

    /// Takes a read-only [`ScopeSnapshot`] of this scope.
    #[must_use]
    pub fn snapshot(&self) -> ScopeSnapshot {
        ScopeSnapshot {
            id: self.id,
            kind: self.kind,
            name: self.name.clone(),
            parent: self.parent,
            stats: self.stats,
            status: self.status,
            started_at: self.timer.started_at(),
            elapsed: self.timer.elapsed(),
            explicit_failure: self.explicit_failure,
        }
    }
}

/// Copy of a scope's state handed out to callers and sinks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScopeSnapshot {
    /// [`ScopeId`] of the scope.
    pub id: ScopeId,

    /// [`ScopeKind`] of the scope.
    pub kind: ScopeKind,

    /// Name (or description, for a test case) of the scope.
    pub name: String,

    /// Parent of the scope, if any.
    pub parent: Option<ScopeId>,

    /// [`Statistics`] collected so far.
    pub stats: Statistics,

    /// Resolved [`Status`], once the scope is finished.
    pub status: Option<Status>,

    /// Wall-clock time the scope was started at.
    pub started_at: SystemTime,

    /// Time the scope has been running (or ran, once finished).
    pub elapsed: Duration,

    /// Whether the harness explicitly marked the scope as failed.
    pub explicit_failure: bool,
}
