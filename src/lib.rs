// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(nonstandard_style, trivial_casts, trivial_numeric_casts)]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(
    clippy::as_conversions,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::missing_const_for_fn,
    clippy::pedantic,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::str_to_string,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    missing_debug_implementations,
    missing_docs,
    rustdoc::all,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod scope;
pub mod sink;
pub mod stats;
pub mod status;
pub mod step;
pub mod timer;


#[doc(inline)]
pub use self::{
    config::{Config, SinkKind, SinkSet},
    context::{Closed, ExecutionContext},
    error::{Condition, ConsistencyError, SinkError},
    scope::{Parent, ScopeId, ScopeKind, ScopeSnapshot},
    sink::{Annotation, ReportSink},
    stats::{Counts, Statistics},
    status::Status,
    step::{ScreenCapture, Section, SectionProbe, Step},
};
