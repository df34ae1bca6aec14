// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration errors.

use derive_more::with_trait::{Display, Error};

/// Configuration and validation errors.
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// Fail/error marker isn't a valid regular expression.
    #[display("Invalid fail marker `{pattern}`: {source}")]
    InvalidFailMarker {
        /// The invalid pattern.
        #[error(not(source))]
        pattern: String,

        /// Regex compilation error.
        source: regex::Error,
    },

    /// Unknown sink name.
    #[display("Unknown sink `{name}`, possible options: xml, html, junit, txt")]
    UnknownSink {
        /// The unknown name.
        #[error(not(source))]
        name: String,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    /// Creates a new unknown sink error.
    #[must_use]
    pub fn unknown_sink(name: impl Into<String>) -> Self {
        Self::UnknownSink { name: name.into() }
    }
}
