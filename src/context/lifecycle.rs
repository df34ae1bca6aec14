// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Starting and finishing scopes.

use tracing::{debug, warn};

use crate::{
    error::{Condition, ConsistencyError, Result},
    scope::{Parent, ScopeId, ScopeKind, ScopeNode},
    stats::render_summary,
    status::{self, Inputs, Resolution, Status},
    timer::format_duration,
};

use super::{Closed, ExecutionContext};

impl ExecutionContext {
    /// Starts a new suite, nested into the currently open one, if any.
    ///
    /// # Errors
    ///
    /// Never, for now. The signature matches the other `start_*` methods.
    pub fn start_suite(&mut self, name: impl Into<String>) -> Result<ScopeId> {
        let parent = self.current_suite();
        let id = self.open(ScopeKind::Suite, name.into(), parent);
        self.suites.push(id);
        Ok(id)
    }

    /// Starts a new script in the currently open suite, or in the root of
    /// the report if there is none.
    ///
    /// An already open script is finished first.
    ///
    /// # Errors
    ///
    /// If auto-finishing the open script fails.
    pub fn start_script(&mut self, name: impl Into<String>) -> Result<ScopeId> {
        if self.script.is_some() {
            debug!("script still open, finishing it");
            _ = self.finish_script()?;
        }
        let id = self.open(ScopeKind::Script, name.into(), self.current_suite());
        self.script = Some(id);
        Ok(id)
    }

    /// Starts a new group in the open script.
    ///
    /// An already open group (along with its test case) is finished first.
    ///
    /// # Errors
    ///
    /// - [`ConsistencyError::MissingParent`] if no script is open.
    /// - If auto-finishing the open group fails.
    pub fn start_group(&mut self, name: impl Into<String>) -> Result<ScopeId> {
        let name = name.into();
        let Some(script) = self.script else {
            return Err(ConsistencyError::missing_parent(
                ScopeKind::Group,
                name,
                ScopeKind::Script,
            ));
        };
        if self.group.is_some() {
            debug!("group still open, finishing it");
            _ = self.finish_group()?;
        } else if self.test_case.is_some() {
            _ = self.finish_test_case()?;
        }
        let id = self.open(ScopeKind::Group, name, Some(script));
        self.group = Some(id);
        Ok(id)
    }

    /// Starts a new test case in the open group, or directly in the open
    /// script if there is no group.
    ///
    /// An already open test case is finished first.
    ///
    /// # Errors
    ///
    /// - [`ConsistencyError::MissingParent`] if neither a group nor a script
    ///   is open.
    /// - If auto-finishing the open test case fails.
    pub fn start_test_case(
        &mut self,
        description: impl Into<String>,
    ) -> Result<ScopeId> {
        let description = description.into();
        let Some(parent) = self.group.or(self.script) else {
            return Err(ConsistencyError::missing_parent(
                ScopeKind::TestCase,
                description,
                ScopeKind::Script,
            ));
        };
        if self.test_case.is_some() {
            debug!("test case still open, finishing it");
            _ = self.finish_test_case()?;
        }
        let id = self.open(ScopeKind::TestCase, description, Some(parent));
        self.test_case = Some(id);
        Ok(id)
    }

    /// Finishes the innermost open suite.
    ///
    /// A script left open in this suite is **not** finished, and finishing it
    /// later fails with [`ConsistencyError::ParentFinished`].
    ///
    /// Returns [`None`] if no suite is open.
    ///
    /// # Errors
    ///
    /// If the statistics can't be rolled into the parent suite.
    pub fn finish_suite(&mut self) -> Result<Option<Closed>> {
        let Some(id) = self.suites.pop() else {
            return Ok(self.underflow(ScopeKind::Suite));
        };
        let orphan = self
            .script
            .and_then(|s| self.node(s).ok())
            .filter(|script| script.parent == Some(id));
        if let Some(script) = orphan {
            warn!(
                scope.id = %id,
                script.id = %script.id,
                "suite finished while its script is still open",
            );
        }
        self.close(id).map(Some)
    }

    /// Finishes the open script along with its open group and test case.
    ///
    /// Returns [`None`] if no script is open.
    ///
    /// # Errors
    ///
    /// - [`ConsistencyError::ParentFinished`] if the enclosing suite has been
    ///   finished already.
    /// - If finishing the open group or test case fails.
    pub fn finish_script(&mut self) -> Result<Option<Closed>> {
        if self.group.is_some() {
            _ = self.finish_group()?;
        } else if self.test_case.is_some() {
            _ = self.finish_test_case()?;
        }
        match self.script.take() {
            Some(id) => self.close(id).map(Some),
            None => Ok(self.underflow(ScopeKind::Script)),
        }
    }

    /// Finishes the open group along with its open test case.
    ///
    /// Returns [`None`] if no group is open.
    ///
    /// # Errors
    ///
    /// If the statistics can't be rolled into the script.
    pub fn finish_group(&mut self) -> Result<Option<Closed>> {
        let Some(id) = self.group else {
            return Ok(self.underflow(ScopeKind::Group));
        };
        if self.test_case.is_some() {
            _ = self.finish_test_case()?;
        }
        self.group = None;
        self.close(id).map(Some)
    }

    /// Finishes the open test case.
    ///
    /// Returns [`None`] if no test case is open.
    ///
    /// # Errors
    ///
    /// If the statistics can't be rolled into the enclosing scope.
    pub fn finish_test_case(&mut self) -> Result<Option<Closed>> {
        match self.test_case.take() {
            Some(id) => self.close(id).map(Some),
            None => Ok(self.underflow(ScopeKind::TestCase)),
        }
    }

    /// Finishes every open scope, innermost first.
    ///
    /// # Errors
    ///
    /// If any of the scopes fails to finish.
    pub fn finish_all(&mut self) -> Result<Vec<Closed>> {
        let mut closed = Vec::new();
        if self.test_case.is_some() {
            closed.extend(self.finish_test_case()?);
        }
        if self.group.is_some() {
            closed.extend(self.finish_group()?);
        }
        if self.script.is_some() {
            closed.extend(self.finish_script()?);
        }
        while self.is_suite_started() {
            closed.extend(self.finish_suite()?);
        }
        Ok(closed)
    }

    /// Creates a new scope and announces it to the sinks.
    fn open(
        &mut self,
        kind: ScopeKind,
        name: String,
        parent: Option<ScopeId>,
    ) -> ScopeId {
        let id = ScopeId::next();
        debug!(
            scope.id = %id,
            scope.kind = %kind,
            parent = %Parent::from(parent),
            name = %name,
            "scope started",
        );
        self.notify(|s| s.add_scope(Parent::from(parent), kind, &name, id));
        _ = self.nodes.insert(id, ScopeNode::new(id, kind, name, parent));
        id
    }

    /// Records finishing a scope of the given `kind` while none is open.
    fn underflow(&mut self, kind: ScopeKind) -> Option<Closed> {
        warn!(scope.kind = %kind, "nothing to finish");
        self.conditions.push(Condition::ScopeUnderflow(kind));
        None
    }

    /// Resolves the status of a scope, reports it and rolls its statistics
    /// into the parent scope.
    fn close(&mut self, id: ScopeId) -> Result<Closed> {
        let propagate = self.config.propagate_script_failures;

        let node = self.node_mut(id)?;
        let elapsed = node.timer.stop();
        let Resolution { status, rule } = status::resolve(
            node.kind,
            &Inputs::new(&node.stats)
                .explicit_failure(node.explicit_failure)
                .verdict(node.verdict),
        );
        if node.kind == ScopeKind::TestCase {
            node.stats.complete_test_case(status);
        }
        node.status = Some(status);

        let snapshot = node.snapshot();
        debug!(
            scope.id = %id,
            scope.kind = %snapshot.kind,
            elapsed = %format_duration(elapsed),
            %status,
            rule,
            "scope finished",
        );

        let summary = render_summary(snapshot.kind, &snapshot.stats);
        self.notify(|s| s.set_status(id, status));
        self.notify(|s| s.add_statistics(id, &summary));

        if let Some(parent) = snapshot.parent {
            let contributed = match (snapshot.kind, status) {
                (ScopeKind::Script, _) if snapshot.explicit_failure => {
                    Status::Fail
                }
                (ScopeKind::Script, Status::Fail) if !propagate => Status::Pass,
                _ => status,
            };
            let target = self.node_mut(parent)?;
            if target.is_finished() {
                return Err(ConsistencyError::ParentFinished {
                    kind: snapshot.kind,
                    child: id,
                    parent,
                });
            }
            snapshot.stats.roll_into(
                &mut target.stats,
                snapshot.kind,
                contributed,
            );
        }

        Ok(Closed { snapshot, rule })
    }
}
