// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`ExecutionContext`] tracking nested scopes of a test run.

mod lifecycle;
mod steps;

use std::collections::HashMap;

use crate::{
    config::{Config, SinkKind},
    error::{Condition, ConsistencyError, Result},
    scope::{ScopeId, ScopeNode, ScopeSnapshot},
    sink::{ReportSink, Sinks},
    step::{ScreenCapture, SectionProbe, StepRouter},
};

/// Outcome of finishing a scope.
#[derive(Clone, Debug, PartialEq)]
pub struct Closed {
    /// State of the scope right after it was finished.
    pub snapshot: ScopeSnapshot,

    /// Name of the status rule that matched.
    pub rule: &'static str,
}

/// Tracker of the scopes of a single test run.
///
/// At most one script, one group and one test case are open at a time, while
/// suites form a stack. Every scope transition and logged step is passed to
/// the registered [`ReportSink`]s.
///
/// One [`ExecutionContext`] is meant to be driven by a single worker. Being
/// [`Send`], it can be moved into that worker's thread.
///
/// ```rust
/// # use scope_report::{ExecutionContext, Status};
/// let mut ctx = ExecutionContext::default();
/// ctx.start_suite("Regression").unwrap();
/// ctx.start_script("Login").unwrap();
/// ctx.start_group("Forms").unwrap();
/// ctx.start_test_case("valid credentials").unwrap();
/// ctx.log_step("open login page");
/// let closed = ctx.finish_group().unwrap().unwrap();
/// assert_eq!(closed.snapshot.status, Some(Status::Pass));
/// ```
#[derive(Debug)]
pub struct ExecutionContext {
    /// Configuration this context was created with.
    config: Config,

    /// Every scope ever started in this context.
    nodes: HashMap<ScopeId, ScopeNode>,

    /// Stack of open suites, innermost last.
    suites: Vec<ScopeId>,

    script: Option<ScopeId>,

    group: Option<ScopeId>,

    test_case: Option<ScopeId>,

    sinks: Sinks,

    /// Recoverable conditions met so far.
    conditions: Vec<Condition>,

    router: StepRouter,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ExecutionContext {
    /// Creates a new [`ExecutionContext`] with the given [`Config`] and no
    /// [`ReportSink`]s.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            nodes: HashMap::new(),
            suites: Vec::new(),
            script: None,
            group: None,
            test_case: None,
            sinks: Sinks::new(config.sinks.clone()),
            conditions: Vec::new(),
            router: StepRouter::new(&config),
            config,
        }
    }

    /// Registers a [`ReportSink`] of the given `kind`.
    ///
    /// Sinks of a kind disabled in the [`Config`] are skipped.
    #[must_use]
    pub fn with_sink(
        mut self,
        kind: SinkKind,
        sink: impl ReportSink + Send + 'static,
    ) -> Self {
        self.register_sink(kind, sink);
        self
    }

    /// Registers a [`ReportSink`] of the given `kind`.
    pub fn register_sink(
        &mut self,
        kind: SinkKind,
        sink: impl ReportSink + Send + 'static,
    ) {
        self.sinks.register(kind, sink);
    }

    /// Sets the [`SectionProbe`] deciding the section of logged steps.
    #[must_use]
    pub fn with_section_probe(
        mut self,
        probe: impl SectionProbe + Send + 'static,
    ) -> Self {
        self.router.set_probe(probe);
        self
    }

    /// Sets the [`ScreenCapture`] taking screenshots of error steps.
    #[must_use]
    pub fn with_screen_capture(
        mut self,
        capture: impl ScreenCapture + Send + 'static,
    ) -> Self {
        self.router.set_capture(capture);
        self
    }

    /// Returns the [`Config`] of this context.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the registered [`Sinks`].
    #[must_use]
    pub const fn sinks(&self) -> &Sinks {
        &self.sinks
    }

    /// Returns the recoverable [`Condition`]s met so far.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Indicates whether any suite is open.
    #[must_use]
    pub fn is_suite_started(&self) -> bool {
        !self.suites.is_empty()
    }

    /// Indicates whether a script is open.
    #[must_use]
    pub const fn is_script_started(&self) -> bool {
        self.script.is_some()
    }

    /// Indicates whether a group is open.
    #[must_use]
    pub const fn is_group_started(&self) -> bool {
        self.group.is_some()
    }

    /// Indicates whether a test case is open.
    #[must_use]
    pub const fn is_test_case_started(&self) -> bool {
        self.test_case.is_some()
    }

    /// Returns the innermost open suite.
    #[must_use]
    pub fn current_suite(&self) -> Option<ScopeId> {
        self.suites.last().copied()
    }

    /// Returns the open script.
    #[must_use]
    pub const fn current_script(&self) -> Option<ScopeId> {
        self.script
    }

    /// Returns the open group.
    #[must_use]
    pub const fn current_group(&self) -> Option<ScopeId> {
        self.group
    }

    /// Returns the open test case.
    #[must_use]
    pub const fn current_test_case(&self) -> Option<ScopeId> {
        self.test_case
    }

    /// Takes a [`ScopeSnapshot`] of any scope started in this context,
    /// finished ones included.
    #[must_use]
    pub fn snapshot(&self, id: ScopeId) -> Option<ScopeSnapshot> {
        self.nodes.get(&id).map(ScopeNode::snapshot)
    }

    /// Innermost open scope: a test case, a group, a script or a suite,
    /// in this order.
    fn innermost(&self) -> Option<ScopeId> {
        self.test_case
            .or(self.group)
            .or(self.script)
            .or_else(|| self.current_suite())
    }

    fn node(&self, id: ScopeId) -> Result<&ScopeNode> {
        self.nodes
            .get(&id)
            .ok_or(ConsistencyError::UnknownScope { id })
    }

    fn node_mut(&mut self, id: ScopeId) -> Result<&mut ScopeNode> {
        self.nodes
            .get_mut(&id)
            .ok_or(ConsistencyError::UnknownScope { id })
    }

    /// Passes an event to all the [`Sinks`], recording failures.
    fn notify<F>(&mut self, call: F)
    where
        F: FnMut(&mut dyn ReportSink) -> crate::error::SinkResult<()>,
    {
        let failed = self.sinks.dispatch(call);
        self.conditions.extend(failed);
    }
}
