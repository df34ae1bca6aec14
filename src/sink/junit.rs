// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [JUnit XML report][1] [`ReportSink`].
//!
//! [1]: https://llg.cubic.org/docs/junit

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use junit_report::{Duration, Report, TestCase, TestSuite, TestSuiteBuilder};

use crate::{
    error::{SinkError, SinkResult},
    scope::{Parent, ScopeId, ScopeKind},
    status::Status,
    step::Section,
};

use super::{Annotation, ReportSink};

/// Scope as seen by the [`JUnit`] sink.
#[derive(Debug)]
struct Entry {
    kind: ScopeKind,
    name: String,
    parent: Option<ScopeId>,
    started: Instant,

    /// Captured steps and annotations, rendered as `system-out`.
    output: Vec<String>,

    /// Final [`Status`] along with the measured duration.
    outcome: Option<(Status, std::time::Duration)>,

    /// Rendered statistics summary.
    summary: Option<String>,
}

/// [JUnit XML report][1] [`ReportSink`].
///
/// Every script and group becomes a `<testsuite>` named by its full path,
/// and every finished test case becomes a `<testcase>` of its closest
/// enclosing one. A [`Status::Warning`] test case is reported as a
/// successful one with the warning noted in its `system-out`.
///
/// The document is written on [`ReportSink::save()`] only after a root scope
/// (a top-level suite or a standalone script) got its [`Status`], so a run
/// rewrites the file once per root scope rather than once per event.
///
/// [1]: https://llg.cubic.org/docs/junit
#[derive(Debug)]
pub struct JUnit {
    /// Path of the XML file to write.
    path: PathBuf,

    /// Known scopes.
    entries: HashMap<ScopeId, Entry>,

    /// Containers in the order they were introduced.
    order: Vec<ScopeId>,

    /// Whether a root scope was finished since the last write.
    pending: bool,
}

impl JUnit {
    /// Creates a new [`JUnit`] sink writing into the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: HashMap::new(),
            order: Vec::new(),
            pending: false,
        }
    }

    /// Returns the path of the written XML file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entry_mut(&mut self, id: ScopeId) -> SinkResult<&mut Entry> {
        self.entries.get_mut(&id).ok_or_else(|| SinkError::unknown_scope(id))
    }

    /// Builds the full name of a container, joined with its ancestors.
    fn path_of(&self, id: ScopeId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(entry) = current.and_then(|i| self.entries.get(&i)) {
            names.push(entry.name.as_str());
            current = entry.parent;
        }
        names.reverse();
        names.join(" / ")
    }

    /// Closest enclosing scope of the given one that is rendered as a
    /// `<testsuite>`.
    fn container_of(&self, id: ScopeId) -> Option<ScopeId> {
        let mut current = self.entries.get(&id)?.parent;
        while let Some(cid) = current {
            let entry = self.entries.get(&cid)?;
            if entry.kind != ScopeKind::TestCase {
                return Some(cid);
            }
            current = entry.parent;
        }
        None
    }

    fn test_case(name: &str, entry: &Entry) -> Option<TestCase> {
        let (status, elapsed) = entry.outcome?;
        let duration = Duration::try_from(elapsed).unwrap_or(Duration::ZERO);
        let mut case = match status {
            Status::Pass | Status::Warning => TestCase::success(name, duration),
            Status::Fail => TestCase::failure(
                name,
                duration,
                "FAIL",
                &entry.summary.clone().unwrap_or_default(),
            ),
            Status::Skip => TestCase::skipped(name),
        };

        let mut output = entry.output.clone();
        if status == Status::Warning {
            output.insert(0, format!("{status}"));
        }
        if !output.is_empty() {
            case.set_system_out(&output.join("\n"));
        }
        Some(case)
    }

    /// Builds the [`Report`] out of everything received so far.
    fn report(&self) -> Report {
        let mut cases: HashMap<ScopeId, Vec<TestCase>> = HashMap::new();
        let mut ids = self
            .entries
            .iter()
            .filter(|(_, e)| e.kind == ScopeKind::TestCase)
            .map(|(id, _)| *id)
            .collect::<Vec<_>>();
        ids.sort_unstable();
        for id in ids {
            let Some(container) = self.container_of(id) else { continue };
            if let Some(case) = self
                .entries
                .get(&id)
                .and_then(|e| Self::test_case(&e.name, e))
            {
                cases.entry(container).or_default().push(case);
            }
        }

        let suites = self
            .order
            .iter()
            .filter(|id| {
                self.entries.get(id).is_some_and(|e| {
                    matches!(e.kind, ScopeKind::Script | ScopeKind::Group)
                })
            })
            .map(|id| {
                let mut suite: TestSuite =
                    TestSuiteBuilder::new(&self.path_of(*id)).build();
                for case in cases.remove(id).unwrap_or_default() {
                    suite.add_testcase(case);
                }
                if let Some(summary) =
                    self.entries.get(id).and_then(|e| e.summary.as_deref())
                {
                    suite.set_system_out(summary);
                }
                suite
            })
            .collect::<Vec<_>>();

        let mut report = Report::new();
        report.add_testsuites(suites);
        report
    }
}

impl ReportSink for JUnit {
    fn add_scope(
        &mut self,
        parent: Parent,
        kind: ScopeKind,
        name: &str,
        id: ScopeId,
    ) -> SinkResult<()> {
        let parent = match parent {
            Parent::Root => None,
            Parent::Scope(p) if self.entries.contains_key(&p) => Some(p),
            Parent::Scope(p) => return Err(SinkError::unknown_scope(p)),
        };
        _ = self.entries.insert(
            id,
            Entry {
                kind,
                name: name.to_owned(),
                parent,
                started: Instant::now(),
                output: Vec::new(),
                outcome: None,
                summary: None,
            },
        );
        if kind != ScopeKind::TestCase {
            self.order.push(id);
        }
        Ok(())
    }

    fn set_status(&mut self, id: ScopeId, status: Status) -> SinkResult<()> {
        let entry = self.entry_mut(id)?;
        entry.outcome = Some((status, entry.started.elapsed()));
        if entry.parent.is_none() {
            self.pending = true;
        }
        Ok(())
    }

    fn add_statistics(&mut self, id: ScopeId, summary: &str) -> SinkResult<()> {
        self.entry_mut(id)?.summary = Some(summary.to_owned());
        Ok(())
    }

    fn add_step(
        &mut self,
        scope: ScopeId,
        text: &str,
        screenshot: Option<&str>,
        section: Section,
    ) -> SinkResult<()> {
        let line = match screenshot {
            Some(s) => format!("[{section}] {text} ({s})"),
            None => format!("[{section}] {text}"),
        };
        self.entry_mut(scope)?.output.push(line);
        Ok(())
    }

    fn add_test_case_annotation(
        &mut self,
        scope: ScopeId,
        kind: Annotation,
        value: &str,
    ) -> SinkResult<()> {
        self.entry_mut(scope)?.output.push(format!("{kind}: {value}"));
        Ok(())
    }

    fn save(&mut self) -> SinkResult<()> {
        if !self.pending {
            return Ok(());
        }
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty())
        {
            fs::create_dir_all(dir)?;
        }
        let file = fs::File::create(&self.path)?;
        self.report()
            .write_xml(file)
            .map_err(|e| SinkError::xml(e.to_string()))?;
        self.pending = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_scripts_groups_and_cases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.xml");
        let (suite, script, group, ok, bad, warn) = (
            ScopeId::next(),
            ScopeId::next(),
            ScopeId::next(),
            ScopeId::next(),
            ScopeId::next(),
            ScopeId::next(),
        );

        let mut sink = JUnit::new(&path);
        sink.add_scope(Parent::Root, ScopeKind::Suite, "Regression", suite)
            .unwrap();
        sink.add_scope(Parent::Scope(suite), ScopeKind::Script, "Login", script)
            .unwrap();
        sink.add_scope(Parent::Scope(script), ScopeKind::Group, "Forms", group)
            .unwrap();
        for (id, name, status) in [
            (ok, "valid", Status::Pass),
            (bad, "invalid", Status::Fail),
            (warn, "slow", Status::Warning),
        ] {
            sink.add_scope(Parent::Scope(group), ScopeKind::TestCase, name, id)
                .unwrap();
            sink.add_step(id, "click <submit>", None, Section::Current)
                .unwrap();
            sink.set_status(id, status).unwrap();
        }
        sink.add_statistics(group, "3 test cases").unwrap();
        sink.set_status(group, Status::Fail).unwrap();
        sink.set_status(script, Status::Fail).unwrap();
        sink.set_status(suite, Status::Pass).unwrap();
        sink.save().unwrap();

        let xml = fs::read_to_string(&path).unwrap();
        assert!(xml.contains("Regression / Login / Forms"), "{xml}");
        assert!(xml.contains("Regression / Login\""), "{xml}");
        assert!(xml.contains("name=\"valid\""), "{xml}");
        assert!(xml.contains("<failure"), "{xml}");
        assert!(xml.contains("WARNING"), "{xml}");
        assert!(xml.contains("click"), "{xml}");
    }

    #[test]
    fn unknown_parent_is_an_error() {
        let (ghost, id) = (ScopeId::next(), ScopeId::next());
        let mut sink = JUnit::new("unused.xml");

        let err = sink
            .add_scope(Parent::Scope(ghost), ScopeKind::Group, "G", id)
            .unwrap_err();
        assert!(matches!(err, SinkError::UnknownScope { .. }));
    }

    #[test]
    fn writes_only_once_a_root_scope_is_finished() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xml");
        let (script, case) = (ScopeId::next(), ScopeId::next());
        let mut sink = JUnit::new(&path);

        sink.add_scope(Parent::Root, ScopeKind::Script, "Login", script)
            .unwrap();
        sink.save().unwrap();
        sink.add_scope(Parent::Scope(script), ScopeKind::TestCase, "tc", case)
            .unwrap();
        sink.save().unwrap();
        for _ in 0..3 {
            sink.add_step(case, "click", None, Section::Current).unwrap();
            sink.save().unwrap();
        }
        sink.set_status(case, Status::Pass).unwrap();
        sink.save().unwrap();
        assert!(!path.exists(), "written before the root scope finished");

        sink.set_status(script, Status::Pass).unwrap();
        sink.save().unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("name=\"tc\""));

        fs::write(&path, "untouched").unwrap();
        sink.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "untouched");
    }

    #[test]
    fn unwritable_path_fails_save() {
        let dir = tempfile::tempdir().unwrap();
        let script = ScopeId::next();
        let mut sink = JUnit::new(dir.path());
        sink.add_scope(Parent::Root, ScopeKind::Script, "Login", script)
            .unwrap();
        sink.set_status(script, Status::Pass).unwrap();

        assert!(sink.save().unwrap_err().is_io_error());
    }
}
