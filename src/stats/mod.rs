// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Statistics of scopes and their roll-up.
//!
//! - [`counts`] - outcome counters of a single level
//! - [`statistics`] - per-scope [`Statistics`] and the roll-up algorithm
//! - [`formatting`] - summary text rendering

pub mod counts;
pub mod formatting;
pub mod statistics;

pub use self::{
    counts::{format_percentage, Counts},
    formatting::{format_counts, render_summary},
    statistics::Statistics,
};
