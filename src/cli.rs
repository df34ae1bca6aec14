// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI options of the reporting.
//!
//! [`Opts`] are meant to be flattened into the CLI of a test harness:
//!
//! ```rust
//! # use clap::Parser as _;
//! # use scope_report::cli;
//! #[derive(clap::Parser)]
//! struct HarnessCli {
//!     /// Browser to run the scripts in.
//!     #[arg(long, default_value = "firefox")]
//!     browser: String,
//!
//!     #[command(flatten)]
//!     report: cli::Opts,
//! }
//!
//! let cli = HarnessCli::parse_from(["harness", "--report-sinks", "txt"]);
//! let config = cli.report.into_config().unwrap();
//! assert_eq!(config.sinks.len(), 1);
//! ```

use std::path::PathBuf;

use smart_default::SmartDefault;

use crate::{
    config::{Config, SinkSet},
    error::ConfigResult,
};

/// CLI options of an [`ExecutionContext`].
///
/// [`ExecutionContext`]: crate::ExecutionContext
#[derive(Clone, Debug, SmartDefault, clap::Args)]
#[group(skip)]
pub struct Opts {
    /// Comma-separated report sinks to write into.
    #[arg(
        long = "report-sinks",
        value_name = "xml,html,junit,txt",
        default_value = "xml,html,junit,txt",
        global = true
    )]
    #[default(SinkSet::all())]
    pub sinks: SinkSet,

    /// Directory to place reports and screenshots into.
    #[arg(
        long = "report-dir",
        value_name = "dir",
        default_value = "report",
        global = true
    )]
    #[default(PathBuf::from("report"))]
    pub dir: PathBuf,

    /// Capture screenshots of failure and error steps.
    #[arg(long, global = true)]
    pub capture_images: bool,

    /// Regex marking failure and error steps.
    #[arg(long, value_name = "regex", global = true)]
    pub fail_marker: Option<String>,

    /// Count a failed script as a failure of its suite, even if it wasn't
    /// explicitly marked as failed.
    #[arg(long, global = true)]
    pub propagate_script_failures: bool,
}

impl Opts {
    /// Converts these [`Opts`] into a [`Config`].
    ///
    /// # Errors
    ///
    /// If the fail marker isn't a valid regex.
    pub fn into_config(self) -> ConfigResult<Config> {
        let config = Config::new()
            .with_sinks(self.sinks.iter())
            .with_output_prefix(self.dir)
            .with_capture_images(self.capture_images)
            .with_propagated_script_failures(self.propagate_script_failures);
        match self.fail_marker {
            Some(pattern) => config.with_fail_marker(&pattern),
            None => Ok(config),
        }
    }
}
