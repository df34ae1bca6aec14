// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Outcome counters of a single level of scopes.

use std::ops::AddAssign;

use crate::status::Status;

/// Counters of executed scopes (or test cases) and their outcomes.
///
/// The number of passed items is never stored, but derived via
/// [`Counts::passed()`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Counts {
    /// Number of executed items.
    pub executed: usize,

    /// Number of failed items.
    pub failed: usize,

    /// Number of items finished with a warning.
    pub warning: usize,

    /// Number of skipped items.
    pub skipped: usize,
}

impl Counts {
    /// Creates new [`Counts`] with everything set to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { executed: 0, failed: 0, warning: 0, skipped: 0 }
    }

    /// Records one executed item finished with the given [`Status`].
    pub fn record(&mut self, status: Status) {
        self.executed += 1;
        match status {
            Status::Pass => {}
            Status::Fail => self.failed += 1,
            Status::Warning => self.warning += 1,
            Status::Skip => self.skipped += 1,
        }
    }

    /// Number of passed items, clamped to zero.
    #[must_use]
    pub const fn passed(&self) -> usize {
        self.executed
            .saturating_sub(self.failed)
            .saturating_sub(self.warning)
            .saturating_sub(self.skipped)
    }

    /// Number of executed and not skipped items, used as the denominator of
    /// all the percentages.
    #[must_use]
    pub const fn effective(&self) -> usize {
        self.executed.saturating_sub(self.skipped)
    }

    /// Indicates whether nothing has been recorded yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.executed == 0
    }

    /// Returns the `count` as a percentage of [`Counts::effective()`] items,
    /// or `0.0` if there are none.
    #[must_use]
    pub fn percentage(&self, count: usize) -> f64 {
        match self.effective() {
            0 => 0.0,
            total => {
                #[allow(clippy::cast_precision_loss)] // counts stay small
                let ratio = count as f64 / total as f64;
                ratio * 100.0
            }
        }
    }

    /// Percentage of passed items.
    #[must_use]
    pub fn passed_percentage(&self) -> f64 {
        self.percentage(self.passed())
    }

    /// Percentage of failed items.
    #[must_use]
    pub fn failed_percentage(&self) -> f64 {
        self.percentage(self.failed)
    }

    /// Percentage of items finished with a warning.
    #[must_use]
    pub fn warning_percentage(&self) -> f64 {
        self.percentage(self.warning)
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, rhs: Self) {
        self.executed += rhs.executed;
        self.failed += rhs.failed;
        self.warning += rhs.warning;
        self.skipped += rhs.skipped;
    }
}

/// Formats a percentage with exactly 2 decimals.
#[must_use]
pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}")
}
