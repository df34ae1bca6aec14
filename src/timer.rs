// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Wall-clock duration tracking of scopes.

use std::time::{Duration, Instant, SystemTime};

/// Wall-clock timer attached to every scope.
///
/// Keeps running until [`Timer::stop()`] is called, after which
/// [`Timer::elapsed()`] is frozen.
#[derive(Clone, Copy, Debug)]
pub struct Timer {
    /// [`SystemTime`] the timer was started at.
    started_at: SystemTime,

    /// Monotonic start point.
    start: Instant,

    /// Frozen duration, once stopped.
    stopped: Option<Duration>,
}

impl Timer {
    /// Starts a new [`Timer`].
    #[must_use]
    pub fn start() -> Self {
        Self {
            started_at: SystemTime::now(),
            start: Instant::now(),
            stopped: None,
        }
    }

    /// Stops this [`Timer`], freezing its [`Timer::elapsed()`] value.
    ///
    /// Stopping an already stopped [`Timer`] keeps the first value.
    pub fn stop(&mut self) -> Duration {
        let start = self.start;
        *self.stopped.get_or_insert_with(|| start.elapsed())
    }

    /// Returns the [`SystemTime`] this [`Timer`] was started at.
    #[must_use]
    pub const fn started_at(&self) -> SystemTime {
        self.started_at
    }

    /// Returns the elapsed [`Duration`].
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.stopped.unwrap_or_else(|| self.start.elapsed())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

/// Formats the given [`Duration`] truncated to milliseconds (`1s 250ms`).
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let truncated = Duration::from_millis(
        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
    );
    humantime::format_duration(truncated).to_string()
}
