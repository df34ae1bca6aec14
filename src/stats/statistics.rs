// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-scope [`Statistics`] and their roll-up into a parent scope.

use crate::{scope::ScopeKind, status::Status};

use super::Counts;

/// Statistics attached to every scope.
///
/// Base counters ([`Statistics::test_cases`], [`Statistics::actions`],
/// [`Statistics::errors`]) are meaningful on every level. Nested counter sets
/// describe the next levels down: a script counts its [`groups`], a suite
/// counts its [`scripts`] and child [`suites`].
///
/// [`groups`]: Statistics::groups
/// [`scripts`]: Statistics::scripts
/// [`suites`]: Statistics::suites
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Statistics {
    /// Executed test cases and their outcomes.
    pub test_cases: Counts,

    /// Number of logged steps (actions).
    pub actions: usize,

    /// Number of logged errors.
    pub errors: usize,

    /// Executed groups and their outcomes.
    pub groups: Counts,

    /// Executed scripts and their outcomes.
    pub scripts: Counts,

    /// Executed child suites and their outcomes.
    pub suites: Counts,
}

impl Statistics {
    /// Creates new empty [`Statistics`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a logged step.
    pub fn record_action(&mut self) {
        self.actions += 1;
    }

    /// Records a logged error.
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Records the outcome of the test case these [`Statistics`] belong to.
    ///
    /// A finished test case counts itself as exactly one executed test case,
    /// so its parent receives it through the ordinary base counters.
    pub fn complete_test_case(&mut self, status: Status) {
        self.test_cases = Counts::new();
        self.test_cases.record(status);
    }

    /// Returns the counter set tracking children of the given `kind`.
    #[must_use]
    pub const fn level(&self, kind: ScopeKind) -> &Counts {
        match kind {
            ScopeKind::Suite => &self.suites,
            ScopeKind::Script => &self.scripts,
            ScopeKind::Group => &self.groups,
            ScopeKind::TestCase => &self.test_cases,
        }
    }

    fn level_mut(&mut self, kind: ScopeKind) -> &mut Counts {
        match kind {
            ScopeKind::Suite => &mut self.suites,
            ScopeKind::Script => &mut self.scripts,
            ScopeKind::Group => &mut self.groups,
            ScopeKind::TestCase => &mut self.test_cases,
        }
    }

    /// Rolls these [`Statistics`] of a finished child of `kind` into the
    /// `parent` ones.
    ///
    /// All the counters are added into the `parent`'s equivalent ones, and
    /// the child itself is recorded on its own level with the given
    /// `status`. Test cases are not recorded twice, as their base counters
    /// already describe them.
    pub fn roll_into(&self, parent: &mut Self, kind: ScopeKind, status: Status) {
        parent.test_cases += self.test_cases;
        parent.actions += self.actions;
        parent.errors += self.errors;
        parent.groups += self.groups;
        parent.scripts += self.scripts;
        parent.suites += self.suites;

        if kind != ScopeKind::TestCase {
            parent.level_mut(kind).record(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished_case(status: Status) -> Statistics {
        let mut stats = Statistics::new();
        stats.record_action();
        stats.complete_test_case(status);
        stats
    }

    #[test]
    fn test_cases_roll_into_group_base_counters() {
        let mut group = Statistics::new();
        for status in [Status::Pass, Status::Fail, Status::Pass] {
            finished_case(status).roll_into(
                &mut group,
                ScopeKind::TestCase,
                status,
            );
        }

        assert_eq!(group.test_cases.executed, 3);
        assert_eq!(group.test_cases.failed, 1);
        assert_eq!(group.test_cases.passed(), 2);
        assert_eq!(group.actions, 3);
        assert!(group.groups.is_empty());
    }

    #[test]
    fn group_is_counted_once_on_its_level() {
        let mut group = Statistics::new();
        finished_case(Status::Warning).roll_into(
            &mut group,
            ScopeKind::TestCase,
            Status::Warning,
        );

        let mut script = Statistics::new();
        group.roll_into(&mut script, ScopeKind::Group, Status::Warning);

        assert_eq!(script.groups.executed, 1);
        assert_eq!(script.groups.warning, 1);
        assert_eq!(script.groups.failed, 0);
        assert_eq!(script.test_cases.warning, 1);
    }

    #[test]
    fn child_suite_folds_nested_levels() {
        let mut child = Statistics::new();
        child.scripts.record(Status::Pass);
        child.scripts.record(Status::Fail);

        let mut root = Statistics::new();
        child.roll_into(&mut root, ScopeKind::Suite, Status::Fail);

        assert_eq!(root.scripts.executed, 2);
        assert_eq!(root.scripts.failed, 1);
        assert_eq!(root.suites.executed, 1);
        assert_eq!(root.suites.failed, 1);
    }

    #[test]
    fn errors_and_actions_are_summed() {
        let mut child = Statistics::new();
        child.record_error();
        child.record_error();
        child.record_action();

        let mut parent = Statistics::new();
        parent.record_action();
        child.roll_into(&mut parent, ScopeKind::Script, Status::Pass);

        assert_eq!(parent.errors, 2);
        assert_eq!(parent.actions, 2);
        assert_eq!(parent.level(ScopeKind::Script).passed(), 1);
    }
}
