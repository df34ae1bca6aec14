// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Plain text log [`ReportSink`].

use std::{collections::HashMap, io};

use crate::{
    error::{SinkError, SinkResult},
    scope::{Parent, ScopeId, ScopeKind},
    status::Status,
    step::Section,
};

use super::{out::WriteStrExt as _, Annotation, ReportSink};

/// Indentation of a single nesting level.
const INDENT: &str = "  ";

/// [`ReportSink`] writing a human-readable log into an [`io::Write`]
/// implementor, indented by the nesting depth of scopes.
///
/// ```text
/// suite Regression [#1]
///   script Login [#2]
///     test case Valid credentials [#3]
///       - Open login page
///       - [AFTER] Close browser
///     test case Valid credentials: PASS (0 actions, 0 errors)
/// ```
#[derive(Debug)]
pub struct Text<Out: io::Write> {
    /// [`io::Write`] implementor to output the log into.
    output: Out,

    /// Nesting depth and name of every known scope.
    scopes: HashMap<ScopeId, (usize, ScopeKind, String)>,
}

impl<Out: io::Write> Text<Out> {
    /// Creates a new [`Text`] sink outputting into the given `output`.
    #[must_use]
    pub fn new(output: Out) -> Self {
        Self { output, scopes: HashMap::new() }
    }

    /// Returns the underlying output.
    #[must_use]
    pub fn into_inner(self) -> Out {
        self.output
    }

    fn scope(&self, id: ScopeId) -> SinkResult<&(usize, ScopeKind, String)> {
        self.scopes.get(&id).ok_or_else(|| SinkError::unknown_scope(id))
    }

    fn line(&mut self, depth: usize, text: &str) -> SinkResult<()> {
        self.output.write_line(format!("{}{text}", INDENT.repeat(depth)))?;
        Ok(())
    }
}

impl<Out: io::Write> ReportSink for Text<Out> {
    fn add_scope(
        &mut self,
        parent: Parent,
        kind: ScopeKind,
        name: &str,
        id: ScopeId,
    ) -> SinkResult<()> {
        let depth = match parent {
            Parent::Root => 0,
            Parent::Scope(p) => self.scope(p)?.0 + 1,
        };
        _ = self.scopes.insert(id, (depth, kind, name.to_owned()));
        self.line(depth, &format!("{kind} {name} [{id}]"))
    }

    fn set_status(&mut self, id: ScopeId, status: Status) -> SinkResult<()> {
        let (depth, kind, name) = self.scope(id)?.clone();
        self.line(depth, &format!("{kind} {name}: {status}"))
    }

    fn add_statistics(&mut self, id: ScopeId, summary: &str) -> SinkResult<()> {
        let depth = self.scope(id)?.0;
        self.line(depth + 1, &format!("= {summary}"))
    }

    fn add_step(
        &mut self,
        scope: ScopeId,
        text: &str,
        screenshot: Option<&str>,
        section: Section,
    ) -> SinkResult<()> {
        let depth = self.scope(scope)?.0;
        let section = match section {
            Section::Current => String::new(),
            other => format!("[{other}] "),
        };
        let screenshot =
            screenshot.map(|s| format!(" (screenshot: {s})")).unwrap_or_default();
        self.line(depth + 1, &format!("- {section}{text}{screenshot}"))
    }

    fn add_test_case_annotation(
        &mut self,
        scope: ScopeId,
        kind: Annotation,
        value: &str,
    ) -> SinkResult<()> {
        let depth = self.scope(scope)?.0;
        self.line(depth + 1, &format!("{kind}: {value}"))
    }

    fn save(&mut self) -> SinkResult<()> {
        self.output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::sink::out::WritableString;

    use super::*;

    #[test]
    fn indents_by_depth() {
        let (suite, script) = (ScopeId::next(), ScopeId::next());
        let mut sink = Text::new(WritableString::default());

        sink.add_scope(Parent::Root, ScopeKind::Suite, "Regression", suite)
            .unwrap();
        sink.add_scope(Parent::Scope(suite), ScopeKind::Script, "Login", script)
            .unwrap();
        sink.add_step(script, "Open login page", None, Section::Current)
            .unwrap();
        sink.add_step(script, "Close browser", Some("shot.png"), Section::After)
            .unwrap();
        sink.add_statistics(script, "1 test case").unwrap();
        sink.set_status(script, Status::Fail).unwrap();
        sink.save().unwrap();

        assert_eq!(
            sink.into_inner().0,
            format!(
                "suite Regression [{suite}]\n\
                 \x20 script Login [{script}]\n\
                 \x20   - Open login page\n\
                 \x20   - [AFTER] Close browser (screenshot: shot.png)\n\
                 \x20   = 1 test case\n\
                 \x20 script Login: FAIL\n",
            ),
        );
    }

    #[test]
    fn unknown_scope_is_an_error() {
        let mut sink = Text::new(WritableString::default());

        let err = sink.set_status(ScopeId::next(), Status::Pass).unwrap_err();
        assert!(matches!(err, SinkError::UnknownScope { .. }));
    }
}
