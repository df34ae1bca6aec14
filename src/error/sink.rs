// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of [`ReportSink`]s.
//!
//! [`ReportSink`]: crate::ReportSink

use std::{fmt, io};

use derive_more::with_trait::{Display, Error};

/// Error of a single [`ReportSink`] call.
///
/// [`ReportSink`]: crate::ReportSink
#[derive(Debug, Display, Error)]
pub enum SinkError {
    /// I/O error while persisting a report.
    #[display("I/O error: {_0}")]
    Io(io::Error),

    /// Report formatting error.
    #[display("Format error: {_0}")]
    Format(fmt::Error),

    /// XML generation error (for JUnit output).
    #[display("XML generation failed: {_0}")]
    Xml(#[error(not(source))] String),

    /// Sink refers to a scope it has never been told about.
    #[display("Unknown scope: {id}")]
    UnknownScope {
        /// Raw id of the scope.
        #[error(not(source))]
        id: String,
    },
}

/// Result type alias for [`ReportSink`] operations.
///
/// [`ReportSink`]: crate::ReportSink
pub type SinkResult<T> = std::result::Result<T, SinkError>;

impl SinkError {
    /// Creates a new XML error.
    #[must_use]
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Creates a new unknown scope error.
    #[must_use]
    pub fn unknown_scope(id: impl fmt::Display) -> Self {
        Self::UnknownScope { id: id.to_string() }
    }

    /// Returns true if this is an I/O error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

impl From<io::Error> for SinkError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<fmt::Error> for SinkError {
    fn from(err: fmt::Error) -> Self {
        Self::Format(err)
    }
}
