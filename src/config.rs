// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Resolved configuration of an [`ExecutionContext`].
//!
//! [`ExecutionContext`]: crate::ExecutionContext

use std::{collections::BTreeSet, path::PathBuf, str::FromStr};

use derive_more::with_trait::Display;
use regex::Regex;
use smart_default::SmartDefault;

use crate::error::{ConfigError, ConfigResult};

/// Default pattern of step texts reporting a failure or an error.
pub const DEFAULT_FAIL_MARKER: &str = r"(?i)^\s*(fail|failed|failure|error)\b";

/// Kind of a report sink.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SinkKind {
    /// Structured XML document.
    #[display("xml")]
    Xml,

    /// Interactive HTML document.
    #[display("html")]
    Html,

    /// JUnit-style XML report.
    #[display("junit")]
    Junit,

    /// Plain text log.
    #[display("txt")]
    Txt,
}

impl SinkKind {
    /// All the [`SinkKind`]s.
    pub const ALL: [Self; 4] = [Self::Xml, Self::Html, Self::Junit, Self::Txt];
}

impl FromStr for SinkKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "html" => Ok(Self::Html),
            "junit" => Ok(Self::Junit),
            "txt" | "text" => Ok(Self::Txt),
            _ => Err(ConfigError::unknown_sink(s)),
        }
    }
}

/// Set of enabled [`SinkKind`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SinkSet(BTreeSet<SinkKind>);

impl SinkSet {
    /// Set with every [`SinkKind`] enabled.
    #[must_use]
    pub fn all() -> Self {
        SinkKind::ALL.into_iter().collect()
    }

    /// Set with nothing enabled.
    #[must_use]
    pub const fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Checks whether the given [`SinkKind`] is enabled.
    #[must_use]
    pub fn contains(&self, kind: SinkKind) -> bool {
        self.0.contains(&kind)
    }

    /// Enables the given [`SinkKind`].
    pub fn insert(&mut self, kind: SinkKind) {
        _ = self.0.insert(kind);
    }

    /// Number of enabled [`SinkKind`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether nothing is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the enabled [`SinkKind`]s, in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = SinkKind> + '_ {
        self.0.iter().copied()
    }
}

impl Default for SinkSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<SinkKind> for SinkSet {
    fn from_iter<I: IntoIterator<Item = SinkKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for SinkSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(SinkKind::from_str)
            .collect()
    }
}

/// Already resolved configuration values.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Enabled sinks, others are silently skipped.
    pub sinks: SinkSet,

    /// Prefix of every output path (screenshots, report files).
    #[default(PathBuf::from("report"))]
    pub output_prefix: PathBuf,

    /// Whether screenshots are captured for failure/error steps.
    pub capture_images: bool,

    /// Pattern of step texts reporting a failure or an error.
    // `regex!` accepts literals only: keep in sync with `DEFAULT_FAIL_MARKER`.
    #[default(Regex::clone(lazy_regex::regex!(r"(?i)^\s*(fail|failed|failure|error)\b")))]
    pub fail_marker: Regex,

    /// Whether a failed script fails its suite by its resolved status.
    ///
    /// By default only an explicit [`ExecutionContext::set_failed()`] makes a
    /// script count as failed for its suite.
    ///
    /// [`ExecutionContext::set_failed()`]: crate::ExecutionContext::set_failed
    pub propagate_script_failures: bool,
}

impl Config {
    /// Creates a new default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the enabled [`SinkSet`].
    #[must_use]
    pub fn with_sinks(mut self, sinks: impl IntoIterator<Item = SinkKind>) -> Self {
        self.sinks = sinks.into_iter().collect();
        self
    }

    /// Sets the output path prefix.
    #[must_use]
    pub fn with_output_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    /// Enables or disables screenshots of failure/error steps.
    #[must_use]
    pub fn with_capture_images(mut self, enabled: bool) -> Self {
        self.capture_images = enabled;
        self
    }

    /// Makes failed scripts fail their suite without an explicit flag.
    #[must_use]
    pub fn with_propagated_script_failures(mut self, enabled: bool) -> Self {
        self.propagate_script_failures = enabled;
        self
    }

    /// Sets the fail/error marker pattern.
    ///
    /// # Errors
    ///
    /// If the `pattern` isn't a valid [`Regex`].
    pub fn with_fail_marker(mut self, pattern: &str) -> ConfigResult<Self> {
        self.fail_marker = Regex::new(pattern).map_err(|source| {
            ConfigError::InvalidFailMarker { pattern: pattern.into(), source }
        })?;
        Ok(self)
    }
}
