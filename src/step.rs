// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Logged [`Step`]s and their classification before being passed to
//! [`ReportSink`]s.
//!
//! [`ReportSink`]: crate::ReportSink

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use derive_more::with_trait::Display;
use regex::Regex;
use tracing::{debug, warn};

use crate::{config::Config, scope::ScopeId};

/// Phase of a test case a [`Step`] is logged in.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Section {
    /// Setup, before the test case body.
    #[display("BEFORE")]
    Before,

    /// Test case body.
    #[default]
    #[display("CURRENT")]
    Current,

    /// Teardown, after the test case body.
    #[display("AFTER")]
    After,
}

/// Single log entry of a test run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Step {
    /// Text of this [`Step`].
    pub text: String,

    /// Reference to an already taken screenshot.
    pub screenshot: Option<String>,

    /// [`Section`] override. If [`None`], the [`SectionProbe`] decides.
    pub section: Option<Section>,
}

impl Step {
    /// Creates a new [`Step`] with the given `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), screenshot: None, section: None }
    }

    /// Attaches a reference to an already taken screenshot.
    #[must_use]
    pub fn with_screenshot(mut self, screenshot: impl Into<String>) -> Self {
        self.screenshot = Some(screenshot.into());
        self
    }

    /// Overrides the [`Section`] this [`Step`] is logged in.
    #[must_use]
    pub fn in_section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }
}

impl From<&str> for Step {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Step {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Source of the [`Section`] currently executed by a test runner.
pub trait SectionProbe {
    /// Returns the currently executed [`Section`].
    fn current_section(&self) -> Section;
}

impl<F: Fn() -> Section> SectionProbe for F {
    fn current_section(&self) -> Section {
        self()
    }
}

/// Taker of screenshots for failure/error [`Step`]s.
pub trait ScreenCapture {
    /// Captures the screen into a file at the given `path`.
    ///
    /// Returns whether the screenshot was actually taken.
    fn capture_screen(&mut self, path: &Path, is_error: bool) -> bool;
}

impl<F: FnMut(&Path, bool) -> bool> ScreenCapture for F {
    fn capture_screen(&mut self, path: &Path, is_error: bool) -> bool {
        self(path, is_error)
    }
}

/// [`Step`] ready to be passed to [`ReportSink`]s.
///
/// [`ReportSink`]: crate::ReportSink
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Routed {
    pub(crate) text: String,
    pub(crate) screenshot: Option<String>,
    pub(crate) section: Section,

    /// Whether the step matched the fail marker.
    pub(crate) is_error: bool,
}

/// Classifier of logged [`Step`]s.
pub(crate) struct StepRouter {
    /// Pattern of step texts reporting a failure or an error.
    marker: Regex,

    probe: Box<dyn SectionProbe + Send>,

    capture: Option<Box<dyn ScreenCapture + Send>>,

    capture_images: bool,

    /// Directory screenshots are stored in.
    screenshots: PathBuf,

    /// Number of screenshots taken per scope.
    shots: HashMap<ScopeId, usize>,
}

impl StepRouter {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            marker: config.fail_marker.clone(),
            probe: Box::new(Section::default),
            capture: None,
            capture_images: config.capture_images,
            screenshots: config.output_prefix.join("screenshots"),
            shots: HashMap::new(),
        }
    }

    pub(crate) fn set_probe(&mut self, probe: impl SectionProbe + Send + 'static) {
        self.probe = Box::new(probe);
    }

    pub(crate) fn set_capture(
        &mut self,
        capture: impl ScreenCapture + Send + 'static,
    ) {
        self.capture = Some(Box::new(capture));
    }

    /// Indicates whether the given `text` reports a failure or an error.
    fn is_error(&self, text: &str) -> bool {
        self.marker.is_match(text)
    }

    /// Classifies the given [`Step`] logged into the `target` scope.
    pub(crate) fn route(&mut self, target: ScopeId, step: Step) -> Routed {
        let is_error = self.is_error(&step.text);
        let section =
            step.section.unwrap_or_else(|| self.probe.current_section());
        let screenshot = match step.screenshot {
            Some(s) => Some(s),
            None if is_error && self.capture_images => self.capture(target),
            None => None,
        };
        Routed { text: step.text, screenshot, section, is_error }
    }

    /// Takes a screenshot for the `target` scope, returning its path.
    fn capture(&mut self, target: ScopeId) -> Option<String> {
        let Some(capture) = self.capture.as_mut() else {
            debug!(scope.id = %target, "no screen capture, screenshot skipped");
            return None;
        };

        let n = self.shots.entry(target).or_default();
        *n += 1;
        let path = self.screenshots.join(format!("{}-{n}.png", target.get()));
        if capture.capture_screen(&path, true) {
            Some(path.display().to_string())
        } else {
            warn!(scope.id = %target, path = %path.display(), "screenshot failed");
            None
        }
    }
}

impl fmt::Debug for StepRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRouter")
            .field("marker", &self.marker.as_str())
            .field("capture", &self.capture.is_some())
            .field("capture_images", &self.capture_images)
            .field("screenshots", &self.screenshots)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn section_defaults_to_probe() {
        let id = ScopeId::next();
        let mut router = StepRouter::new(&Config::default());

        assert_eq!(router.route(id, "open page".into()).section, Section::Current);

        router.set_probe(|| Section::After);
        assert_eq!(router.route(id, "close page".into()).section, Section::After);
        assert_eq!(
            router
                .route(id, Step::new("seed data").in_section(Section::Before))
                .section,
            Section::Before,
        );
    }

    #[test]
    fn classifies_by_fail_marker() {
        let id = ScopeId::next();
        let mut router = StepRouter::new(&Config::default());

        assert!(router.route(id, "FAILED: no button".into()).is_error);
        assert!(router.route(id, "  error while loading".into()).is_error);
        assert!(!router.route(id, "click Errors tab".into()).is_error);
    }

    #[test]
    fn captures_error_steps_only_when_enabled() {
        let id = ScopeId::next();
        let taken = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&taken);
        let config = Config::default()
            .with_output_prefix("out")
            .with_capture_images(true);
        let mut router = StepRouter::new(&config);
        router.set_capture(move |p: &Path, is_error: bool| {
            sink.lock().unwrap().push((p.to_path_buf(), is_error));
            true
        });

        assert_eq!(router.route(id, "click".into()).screenshot, None);
        let routed = router.route(id, "fail: boom".into());
        let expected = Path::new("out")
            .join("screenshots")
            .join(format!("{}-1.png", id.get()));
        assert_eq!(routed.screenshot, Some(expected.display().to_string()));
        assert_eq!(*taken.lock().unwrap(), vec![(expected, true)]);
    }

    #[test]
    fn explicit_screenshot_is_kept() {
        let id = ScopeId::next();
        let mut router =
            StepRouter::new(&Config::default().with_capture_images(true));
        router.set_capture(|_: &Path, _: bool| -> bool {
            panic!("must not capture")
        });

        let routed =
            router.route(id, Step::new("error").with_screenshot("given.png"));
        assert_eq!(routed.screenshot.as_deref(), Some("given.png"));
    }

    #[test]
    fn failed_capture_yields_no_screenshot() {
        let id = ScopeId::next();
        let mut router =
            StepRouter::new(&Config::default().with_capture_images(true));
        router.set_capture(|_: &Path, _: bool| false);

        assert_eq!(router.route(id, "failure".into()).screenshot, None);
    }
}
