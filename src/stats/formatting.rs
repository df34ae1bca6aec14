// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rendering of [`Statistics`] into the summary text handed to sinks.

use itertools::Itertools as _;

use crate::scope::ScopeKind;

use super::{format_percentage, Counts, Statistics};

/// Renders the summary of a finished scope of the given `kind`.
///
/// ```text
/// 1 group (1 failed) | 3 test cases (2 passed, 1 failed) | pass rate 66.67% | 7 actions, 1 error
/// ```
#[must_use]
pub fn render_summary(kind: ScopeKind, stats: &Statistics) -> String {
    let levels: Vec<(&str, &Counts)> = match kind {
        ScopeKind::Suite => vec![
            ("suite", &stats.suites),
            ("script", &stats.scripts),
            ("test case", &stats.test_cases),
        ],
        ScopeKind::Script => {
            vec![("group", &stats.groups), ("test case", &stats.test_cases)]
        }
        ScopeKind::Group => vec![("test case", &stats.test_cases)],
        ScopeKind::TestCase => vec![],
    };

    let mut parts = levels
        .into_iter()
        .filter(|(name, counts)| *name == "test case" || !counts.is_empty())
        .map(|(name, counts)| format_counts(name, counts))
        .collect::<Vec<_>>();

    if kind != ScopeKind::TestCase {
        parts.push(format!(
            "pass rate {}%",
            format_percentage(stats.test_cases.passed_percentage()),
        ));
    }
    parts.push(format!(
        "{}, {}",
        maybe_plural("action", stats.actions),
        maybe_plural("error", stats.errors),
    ));

    parts.join(" | ")
}

/// Formats [`Counts`] as `3 test cases (2 passed, 1 failed)`.
#[must_use]
pub fn format_counts(singular: &str, counts: &Counts) -> String {
    let outcomes = [
        (counts.passed(), "passed"),
        (counts.failed, "failed"),
        (counts.warning, "warning"),
        (counts.skipped, "skipped"),
    ]
    .into_iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, label)| format!("{n} {label}"))
    .join(", ");

    let total = maybe_plural(singular, counts.executed);
    if outcomes.is_empty() {
        total
    } else {
        format!("{total} ({outcomes})")
    }
}

fn maybe_plural(singular: &str, num: usize) -> String {
    format!("{num} {singular}{}", if num == 1 { "" } else { "s" })
}
