// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error handling types of the crate.
//!
//! Only [`ConsistencyError`]s are fatal: they mean the execution tree itself
//! is broken and are expected to surface as a framework failure. Everything
//! else is recovered locally and recorded as a [`Condition`].
//!
//! - [`consistency`] - fatal [`ConsistencyError`]s of an execution context
//! - [`condition`] - recoverable [`Condition`]s recorded during a run
//! - [`sink`] - [`SinkError`]s of report sinks
//! - [`config`] - configuration [`ConfigError`]s

pub mod condition;
pub mod config;
pub mod consistency;
pub mod sink;

pub use self::{
    condition::Condition,
    config::{ConfigError, ConfigResult},
    consistency::{ConsistencyError, Result},
    sink::{SinkError, SinkResult},
};
