// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Resolution of a finished scope's [`Status`].
//!
//! Every [`ScopeKind`] has an ordered table of [`Rule`]s, the first matching
//! one decides the [`Status`]. The last rule of every table always matches.

use derive_more::with_trait::Display;

use crate::{
    scope::{ScopeKind, Verdict},
    stats::Statistics,
};

/// Final status of a scope.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Status {
    /// Scope passed.
    #[display("PASS")]
    Pass,

    /// Scope failed.
    #[display("FAIL")]
    Fail,

    /// Scope passed with a warning.
    #[display("WARNING")]
    Warning,

    /// Scope was skipped.
    #[display("SKIP")]
    Skip,
}

impl Status {
    /// Indicates whether this [`Status`] is [`Status::Fail`].
    #[must_use]
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::Fail)
    }
}

/// Everything a [`Status`] is resolved from.
#[derive(Clone, Copy, Debug)]
pub struct Inputs<'s> {
    /// [`Statistics`] of the scope.
    pub stats: &'s Statistics,

    /// Explicit failure flag set by the harness.
    pub explicit_failure: bool,

    /// Outcome flags of a test case.
    pub verdict: Verdict,
}

impl<'s> Inputs<'s> {
    /// Creates [`Inputs`] from [`Statistics`] only.
    #[must_use]
    pub fn new(stats: &'s Statistics) -> Self {
        Self { stats, explicit_failure: false, verdict: Verdict::default() }
    }

    /// Sets the explicit failure flag.
    #[must_use]
    pub const fn explicit_failure(mut self, failed: bool) -> Self {
        self.explicit_failure = failed;
        self
    }

    /// Sets the test case [`Verdict`].
    #[must_use]
    pub const fn verdict(mut self, verdict: Verdict) -> Self {
        self.verdict = verdict;
        self
    }
}

/// Single row of a decision table.
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    /// Stable name of this [`Rule`].
    pub name: &'static str,

    /// [`Status`] this [`Rule`] resolves to.
    pub status: Status,

    condition: fn(&Inputs<'_>) -> bool,
}

impl Rule {
    /// Checks whether this [`Rule`] applies to the given [`Inputs`].
    #[must_use]
    pub fn matches(&self, inputs: &Inputs<'_>) -> bool {
        (self.condition)(inputs)
    }
}

/// Result of resolving a [`Status`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Resolution {
    /// Resolved [`Status`].
    pub status: Status,

    /// Name of the [`Rule`] that matched.
    pub rule: &'static str,
}

const TEST_CASE: &[Rule] = &[
    Rule {
        name: "failed-known-issue",
        status: Status::Warning,
        condition: |i| i.verdict.failed && i.verdict.known_issue,
    },
    Rule {
        name: "failed",
        status: Status::Fail,
        condition: |i| i.verdict.failed,
    },
    Rule {
        name: "skipped",
        status: Status::Skip,
        condition: |i| i.verdict.skipped,
    },
    Rule { name: "passed", status: Status::Pass, condition: |_| true },
];

const GROUP: &[Rule] = &[
    Rule {
        name: "failed-test-cases",
        status: Status::Fail,
        condition: |i| i.stats.test_cases.failed > 0,
    },
    Rule {
        name: "nothing-executed",
        status: Status::Fail,
        condition: |i| {
            let tc = &i.stats.test_cases;
            tc.effective() == 0 && tc.skipped == 0
        },
    },
    Rule {
        name: "all-skipped",
        status: Status::Skip,
        condition: |i| {
            let tc = &i.stats.test_cases;
            tc.effective() == 0
                && tc.skipped > 0
                && tc.failed == 0
                && tc.warning == 0
        },
    },
    Rule {
        name: "warning-test-cases",
        status: Status::Warning,
        condition: |i| {
            i.stats.test_cases.failed == 0 && i.stats.test_cases.warning > 0
        },
    },
    Rule { name: "passed", status: Status::Pass, condition: |_| true },
];

const SCRIPT: &[Rule] = &[
    Rule {
        name: "explicit-failure",
        status: Status::Fail,
        condition: |i| i.explicit_failure,
    },
    Rule {
        name: "nothing-executed",
        status: Status::Fail,
        condition: |i| {
            i.stats.groups.executed == 0 && i.stats.test_cases.executed == 0
        },
    },
    Rule {
        name: "failed-groups",
        status: Status::Fail,
        condition: |i| i.stats.groups.failed > 0,
    },
    Rule {
        name: "warnings",
        status: Status::Warning,
        condition: |i| {
            i.stats.groups.failed == 0
                && (i.stats.groups.warning > 0
                    || i.stats.test_cases.warning > 0)
        },
    },
    Rule { name: "passed", status: Status::Pass, condition: |_| true },
];

// No warning row: suites only ever pass or fail.
const SUITE: &[Rule] = &[
    Rule {
        name: "no-scripts",
        status: Status::Fail,
        condition: |i| i.stats.scripts.executed == 0,
    },
    Rule {
        name: "failed-scripts",
        status: Status::Fail,
        condition: |i| i.stats.scripts.failed > 0,
    },
    Rule {
        name: "failed-suites",
        status: Status::Fail,
        condition: |i| i.stats.suites.failed > 0,
    },
    Rule { name: "passed", status: Status::Pass, condition: |_| true },
];

/// Returns the decision table of the given [`ScopeKind`].
#[must_use]
pub const fn rules(kind: ScopeKind) -> &'static [Rule] {
    match kind {
        ScopeKind::Suite => SUITE,
        ScopeKind::Script => SCRIPT,
        ScopeKind::Group => GROUP,
        ScopeKind::TestCase => TEST_CASE,
    }
}

/// Resolves the [`Status`] of a scope of the given [`ScopeKind`].
#[must_use]
pub fn resolve(kind: ScopeKind, inputs: &Inputs<'_>) -> Resolution {
    rules(kind)
        .iter()
        .find(|rule| rule.matches(inputs))
        .map_or(
            Resolution { status: Status::Pass, rule: "passed" },
            |rule| Resolution { status: rule.status, rule: rule.name },
        )
}
