// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Logging steps, counting activity and annotating test cases.

use tracing::{debug, warn};

use crate::{
    error::Condition,
    scope::{ScopeId, Verdict},
    sink::Annotation,
    stats::Statistics,
    step::Step,
};

use super::ExecutionContext;

impl ExecutionContext {
    /// Counts an action in the innermost open scope.
    ///
    /// Returns the [`ScopeId`] it was attributed to, or [`None`] if nothing
    /// is open.
    pub fn record_action(&mut self) -> Option<ScopeId> {
        self.attribute(Statistics::record_action)
    }

    /// Counts an error in the innermost open scope.
    ///
    /// Returns the [`ScopeId`] it was attributed to, or [`None`] if nothing
    /// is open.
    pub fn record_error(&mut self) -> Option<ScopeId> {
        self.attribute(Statistics::record_error)
    }

    fn attribute(&mut self, record: fn(&mut Statistics)) -> Option<ScopeId> {
        let Some(id) = self.innermost() else {
            warn!("no open scope to attribute activity to");
            return None;
        };
        if let Ok(node) = self.node_mut(id) {
            record(&mut node.stats);
        }
        Some(id)
    }

    /// Logs a [`Step`] into the innermost open scope and passes it to the
    /// sinks.
    ///
    /// A step matching the configured fail marker counts as an error only,
    /// never as an action as well, and fails the open test case it's logged
    /// into. Any other step counts as an action. If nothing is open, the step
    /// is dropped.
    ///
    /// Returns the [`ScopeId`] the step was logged into.
    pub fn log_step(&mut self, step: impl Into<Step>) -> Option<ScopeId> {
        let step = step.into();
        let Some(target) = self.innermost() else {
            warn!(text = %step.text, "no open scope, step dropped");
            self.conditions.push(Condition::DroppedStep(step.text));
            return None;
        };

        let routed = self.router.route(target, step);
        if routed.is_error {
            _ = self.record_error();
            if self.test_case == Some(target) {
                debug!(scope.id = %target, "error step fails the test case");
                if let Ok(node) = self.node_mut(target) {
                    node.verdict.failed = true;
                }
            }
        } else {
            _ = self.record_action();
        }

        self.notify(|s| {
            s.add_step(
                target,
                &routed.text,
                routed.screenshot.as_deref(),
                routed.section,
            )
        });
        Some(target)
    }

    /// Marks the open script as failed, regardless of its statistics.
    ///
    /// Returns `false` if no script is open.
    pub fn set_failed(&mut self) -> bool {
        let Some(id) = self.script else {
            warn!("no open script to mark as failed");
            return false;
        };
        self.node_mut(id).map(|node| node.explicit_failure = true).is_ok()
    }

    /// Marks the open test case as failed, with the given `comment`.
    ///
    /// Returns `false` if no test case is open.
    pub fn mark_test_case_failed(&mut self, comment: &str) -> bool {
        self.annotate(Annotation::FailComment, comment, |v| v.failed = true)
    }

    /// Attaches a known issue `comment` to the open test case. A failed test
    /// case with a known issue resolves to a warning.
    ///
    /// Returns `false` if no test case is open.
    pub fn mark_test_case_known_issue(&mut self, comment: &str) -> bool {
        self.annotate(Annotation::Comment, comment, |v| v.known_issue = true)
    }

    /// Marks the open test case as skipped, for the given `reason`.
    ///
    /// Returns `false` if no test case is open.
    pub fn mark_test_case_skipped(&mut self, reason: &str) -> bool {
        self.annotate(Annotation::SkipComment, reason, |v| v.skipped = true)
    }

    /// Links the open test case to an external resource.
    ///
    /// Returns `false` if no test case is open.
    pub fn add_test_case_link(&mut self, url: &str) -> bool {
        self.annotate(Annotation::Link, url, |_| {})
    }

    /// Attaches a free-form comment to the open test case.
    ///
    /// Returns `false` if no test case is open.
    pub fn add_test_case_comment(&mut self, text: &str) -> bool {
        self.annotate(Annotation::Comment, text, |_| {})
    }

    fn annotate(
        &mut self,
        kind: Annotation,
        value: &str,
        flag: impl FnOnce(&mut Verdict),
    ) -> bool {
        let Some(id) = self.test_case else {
            warn!(annotation = %kind, "no open test case to annotate");
            return false;
        };
        let Ok(node) = self.node_mut(id) else { return false };
        flag(&mut node.verdict);
        self.notify(|s| s.add_test_case_annotation(id, kind, value));
        true
    }
}
